use super::Phase;
use super::predicate::impl_where_methods;
use super::statement::{Statement, StatementKind};
use crate::dialect::DialectProfile;
use crate::entity::EntityMeta;
use crate::error::{SqlError, SqlResult, require_name};
use crate::query::SqlQuery;
use crate::value::{SqlArgument, SqlValue};
use std::sync::Arc;

/// UPDATE statement builder.
///
/// `table` → one or more `set_column_value` → optional `where_*`.
#[must_use]
#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    stmt: Statement,
}

impl UpdateBuilder {
    pub(crate) fn new(profile: Arc<DialectProfile>) -> Self {
        Self {
            stmt: Statement::new(profile, StatementKind::Update, "UPDATE"),
        }
    }

    pub fn table(mut self, table: &str) -> SqlResult<Self> {
        require_name("table", table)?;
        self.stmt.require("table", &[Phase::Initial])?;

        self.stmt.push(" ");
        self.stmt.push_identifier(table);
        self.stmt.set_phase(Phase::Sourced);
        Ok(self)
    }

    /// Update the table mapped by `T`.
    pub fn table_entity<T: EntityMeta>(self) -> SqlResult<Self> {
        self.table(&T::TABLE.qualified_name())
    }

    /// ` SET column = p`; later calls append `,column = p`.
    pub fn set_column_value(self, column: &str, value: impl Into<SqlValue>) -> SqlResult<Self> {
        self.set_column_argument(column, SqlArgument::new(value.into()))
    }

    /// Like [`set_column_value`](Self::set_column_value), with an explicitly
    /// typed argument.
    pub fn set_column_argument(mut self, column: &str, argument: SqlArgument) -> SqlResult<Self> {
        require_name("column", column)?;
        self.stmt
            .require("set_column_value", &[Phase::Sourced, Phase::Projected])?;

        let separator = if self.stmt.phase() == Phase::Projected { "," } else { " SET " };
        self.stmt.push(separator);
        self.stmt.push_identifier(column);
        self.stmt.push(" = ");
        self.stmt.push_argument(argument);
        self.stmt.set_phase(Phase::Projected);
        Ok(self)
    }

    /// Set every updatable column of `T`, in declaration order, from `values`.
    ///
    /// Generated and read-only-after-insert columns are skipped.
    pub fn set_entity_values<T: EntityMeta>(
        mut self,
        values: impl IntoIterator<Item = SqlValue>,
    ) -> SqlResult<Self> {
        let columns: Vec<&'static str> = T::TABLE.update_columns().collect();
        let values: Vec<SqlValue> = values.into_iter().collect();
        if columns.len() != values.len() {
            return Err(SqlError::invalid_argument(
                "values",
                format!(
                    "expected {} values to match the updatable columns, got {}",
                    columns.len(),
                    values.len()
                ),
            ));
        }

        for (column, value) in columns.into_iter().zip(values) {
            self = self.set_column_value(column, value)?;
        }
        Ok(self)
    }

    // ==================== Filter ====================

    impl_where_methods!(open: [Phase::Projected]);

    pub fn phase(&self) -> Phase {
        self.stmt.phase()
    }

    /// Finish the statement. Legal once at least one column is set.
    pub fn to_sql_query(self) -> SqlResult<SqlQuery> {
        self.stmt
            .require("to_sql_query", &[Phase::Projected, Phase::Filtered])?;
        Ok(self.stmt.finish())
    }
}
