use super::Phase;
use super::statement::{Statement, StatementKind};
use crate::dialect::DialectProfile;
use crate::error::{SqlError, SqlResult, require_name};
use crate::query::SqlQuery;
use crate::value::{SqlArgument, SqlValue};
use std::sync::Arc;

/// Stored procedure invocation: `<command> <name> <param>,<param>`.
///
/// Named dialects write each parameter under the name it was given (the
/// dialect prefix is added when missing); positional dialects write the bare
/// placeholder. Arguments keep call order either way. Parameter names must be
/// unique, ignoring case and the prefix.
#[must_use]
#[derive(Debug, Clone)]
pub struct ProcedureBuilder {
    stmt: Statement,
    names: Vec<String>,
}

impl ProcedureBuilder {
    pub(crate) fn new(profile: Arc<DialectProfile>, procedure: &str) -> SqlResult<Self> {
        require_name("procedure", procedure)?;
        if profile.stored_procedure_invocation_command.trim().is_empty() {
            return Err(SqlError::invalid_argument(
                "procedure",
                "the dialect has no stored procedure invocation command",
            ));
        }

        let keyword = profile.stored_procedure_invocation_command.clone();
        let mut stmt = Statement::new(profile, StatementKind::Procedure, &keyword);
        stmt.push(" ");
        stmt.push(procedure);
        stmt.set_phase(Phase::Sourced);
        Ok(Self {
            stmt,
            names: Vec::new(),
        })
    }

    pub fn with_parameter(self, name: &str, value: impl Into<SqlValue>) -> SqlResult<Self> {
        self.with_argument(name, SqlArgument::new(value.into()))
    }

    /// Like [`with_parameter`](Self::with_parameter), with an explicitly typed
    /// argument.
    pub fn with_argument(mut self, name: &str, argument: SqlArgument) -> SqlResult<Self> {
        require_name("name", name)?;
        self.stmt
            .require("with_parameter", &[Phase::Sourced, Phase::Projected])?;

        let profile = self.stmt.profile();
        let named = profile.supports_named_parameters;
        let placeholder = if name.starts_with(profile.sql_parameter.as_str()) {
            name.to_string()
        } else {
            format!("{}{}", profile.sql_parameter, name)
        };
        if self.names.iter().any(|n| n.eq_ignore_ascii_case(&placeholder)) {
            return Err(SqlError::invalid_argument(
                "name",
                format!("duplicate parameter name '{placeholder}'"),
            ));
        }

        let separator = if self.stmt.phase() == Phase::Projected { "," } else { " " };
        self.stmt.push(separator);

        if named {
            self.stmt.push(&placeholder);
            self.stmt.bind(vec![argument]);
        } else {
            self.stmt.push_argument(argument);
        }
        self.names.push(placeholder);
        self.stmt.set_phase(Phase::Projected);
        Ok(self)
    }

    pub fn phase(&self) -> Phase {
        self.stmt.phase()
    }

    pub fn to_sql_query(self) -> SqlResult<SqlQuery> {
        self.stmt
            .require("to_sql_query", &[Phase::Sourced, Phase::Projected])?;
        Ok(self.stmt.finish())
    }
}
