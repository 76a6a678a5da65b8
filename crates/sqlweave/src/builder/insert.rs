use super::Phase;
use super::statement::{Statement, StatementKind};
use crate::dialect::DialectProfile;
use crate::entity::EntityMeta;
use crate::error::{SqlError, SqlResult, require_name};
use crate::query::SqlQuery;
use crate::value::{SqlArgument, SqlValue};
use std::sync::Arc;

/// INSERT statement builder.
///
/// `into` → `columns` → `values` → `to_sql_query`, producing
/// `INSERT INTO table (c1,c2) VALUES (p0,p1)`.
#[must_use]
#[derive(Debug, Clone)]
pub struct InsertBuilder {
    stmt: Statement,
    column_count: usize,
}

impl InsertBuilder {
    pub(crate) fn new(profile: Arc<DialectProfile>) -> Self {
        Self {
            stmt: Statement::new(profile, StatementKind::Insert, "INSERT INTO"),
            column_count: 0,
        }
    }

    /// Target table.
    pub fn into(mut self, table: &str) -> SqlResult<Self> {
        require_name("table", table)?;
        self.stmt.require("into", &[Phase::Initial])?;

        self.stmt.push(" ");
        self.stmt.push_identifier(table);
        self.stmt.set_phase(Phase::Sourced);
        Ok(self)
    }

    /// Target the table mapped by `T` and list its insertable columns.
    pub fn into_entity<T: EntityMeta>(self) -> SqlResult<Self> {
        self.into(&T::TABLE.qualified_name())?
            .columns(T::TABLE.insert_columns())
    }

    pub fn columns<I, S>(mut self, columns: I) -> SqlResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stmt.require("columns", &[Phase::Sourced])?;
        let columns: Vec<String> = columns.into_iter().map(|c| c.as_ref().to_string()).collect();
        if columns.is_empty() {
            return Err(SqlError::invalid_argument("columns", "at least one column is required"));
        }
        for column in &columns {
            require_name("column", column)?;
        }

        self.stmt.push(" (");
        self.stmt.push_identifiers(&columns);
        self.stmt.push(")");
        self.column_count = columns.len();
        self.stmt.set_phase(Phase::Projected);
        Ok(self)
    }

    /// One value per column, in column order.
    pub fn values<I, V>(self, values: I) -> SqlResult<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        self.arguments(values.into_iter().map(|v| SqlArgument::new(v.into())))
    }

    /// Like [`values`](Self::values), with explicitly typed arguments.
    pub fn arguments(mut self, arguments: impl IntoIterator<Item = SqlArgument>) -> SqlResult<Self> {
        self.stmt.require("values", &[Phase::Projected])?;
        let arguments: Vec<SqlArgument> = arguments.into_iter().collect();
        if arguments.len() != self.column_count {
            return Err(SqlError::invalid_argument(
                "values",
                format!(
                    "expected {} values to match the column list, got {}",
                    self.column_count,
                    arguments.len()
                ),
            ));
        }

        self.stmt.push(" VALUES (");
        self.stmt.push_arguments(arguments);
        self.stmt.push(")");
        self.stmt.set_phase(Phase::Finalized);
        Ok(self)
    }

    pub fn phase(&self) -> Phase {
        self.stmt.phase()
    }

    /// Finish the statement. Legal once `values` has been called.
    pub fn to_sql_query(self) -> SqlResult<SqlQuery> {
        self.stmt.require("to_sql_query", &[Phase::Finalized])?;
        Ok(self.stmt.finish())
    }
}
