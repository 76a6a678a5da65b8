use super::Phase;
use super::predicate::impl_where_methods;
use super::statement::{Statement, StatementKind};
use crate::dialect::DialectProfile;
use crate::entity::EntityMeta;
use crate::error::{SqlResult, require_name};
use crate::query::SqlQuery;
use std::sync::Arc;

/// DELETE statement builder: `from` plus optional `where_*`.
#[must_use]
#[derive(Debug, Clone)]
pub struct DeleteBuilder {
    stmt: Statement,
}

impl DeleteBuilder {
    pub(crate) fn new(profile: Arc<DialectProfile>) -> Self {
        Self {
            stmt: Statement::new(profile, StatementKind::Delete, "DELETE"),
        }
    }

    pub fn from(mut self, table: &str) -> SqlResult<Self> {
        require_name("table", table)?;
        self.stmt.require("from", &[Phase::Initial])?;

        self.stmt.push(" FROM ");
        self.stmt.push_identifier(table);
        self.stmt.set_phase(Phase::Sourced);
        Ok(self)
    }

    /// Delete from the table mapped by `T`.
    pub fn from_entity<T: EntityMeta>(self) -> SqlResult<Self> {
        self.from(&T::TABLE.qualified_name())
    }

    impl_where_methods!(open: [Phase::Sourced]);

    pub fn phase(&self) -> Phase {
        self.stmt.phase()
    }

    /// Finish the statement. Legal once a table has been given.
    pub fn to_sql_query(self) -> SqlResult<SqlQuery> {
        self.stmt
            .require("to_sql_query", &[Phase::Sourced, Phase::Filtered])?;
        Ok(self.stmt.finish())
    }
}
