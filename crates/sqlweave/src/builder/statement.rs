//! Shared text buffer and argument list behind every builder.

use super::Phase;
use crate::dialect::DialectProfile;
use crate::error::{SqlError, SqlResult};
use crate::param::renumber;
use crate::query::SqlQuery;
use crate::value::{SqlArgument, SqlValue};
use std::borrow::Cow;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Procedure,
}

impl StatementKind {
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "select",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
            StatementKind::Procedure => "procedure",
        }
    }
}

/// Statement under construction.
///
/// Invariant: every placeholder written to `text` has exactly one entry in
/// `arguments`, in the same left-to-right order.
#[derive(Debug, Clone)]
pub(crate) struct Statement {
    profile: Arc<DialectProfile>,
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    kind: StatementKind,
    text: String,
    arguments: Vec<SqlArgument>,
    phase: Phase,
}

impl Statement {
    pub(crate) fn new(profile: Arc<DialectProfile>, kind: StatementKind, keyword: &str) -> Self {
        Self {
            profile,
            kind,
            text: keyword.to_string(),
            arguments: Vec::new(),
            phase: Phase::Initial,
        }
    }

    pub(crate) fn profile(&self) -> &DialectProfile {
        &self.profile
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Fail unless the current phase is one of `allowed`.
    pub(crate) fn require(&self, operation: &'static str, allowed: &[Phase]) -> SqlResult<()> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(SqlError::invalid_phase(operation, self.phase))
        }
    }

    pub(crate) fn escape<'a>(&self, name: &'a str) -> Cow<'a, str> {
        self.profile.escape_identifier(name)
    }

    pub(crate) fn push(&mut self, sql: &str) {
        self.text.push_str(sql);
    }

    pub(crate) fn push_identifier(&mut self, name: &str) {
        let escaped = self.profile.escape_identifier(name);
        self.text.push_str(&escaped);
    }

    /// Write `names` escaped and comma-joined.
    pub(crate) fn push_identifiers(&mut self, names: &[String]) {
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.text.push(',');
            }
            self.push_identifier(name);
        }
    }

    /// Write one placeholder and bind its argument.
    pub(crate) fn push_argument(&mut self, argument: SqlArgument) {
        let placeholder = self.profile.name_parameter(self.arguments.len());
        self.text.push_str(&placeholder);
        self.arguments.push(argument);
    }

    pub(crate) fn push_value(&mut self, value: SqlValue) {
        self.push_argument(SqlArgument::new(value));
    }

    /// Write comma-joined placeholders and bind all arguments.
    pub(crate) fn push_arguments(&mut self, arguments: Vec<SqlArgument>) {
        let list = self.profile.parameter_list(self.arguments.len(), arguments.len());
        self.text.push_str(&list);
        self.arguments.extend(arguments);
    }

    /// Renumber a fragment into the running sequence without writing it.
    ///
    /// The caller writes the returned text and then calls [`Statement::bind`]
    /// with the returned arguments.
    pub(crate) fn renumber(&self, fragment: &str, arguments: Vec<SqlArgument>) -> SqlResult<(String, Vec<SqlArgument>)> {
        let renumbered = renumber(fragment, arguments, self.arguments.len(), &self.profile)?;
        Ok((renumbered.text, renumbered.arguments))
    }

    pub(crate) fn bind(&mut self, arguments: Vec<SqlArgument>) {
        self.arguments.extend(arguments);
    }

    /// Trim trailing separators and produce the immutable query.
    pub(crate) fn finish(mut self) -> SqlQuery {
        let trimmed_len = self
            .text
            .trim_end_matches(|c: char| c == ',' || c.is_whitespace())
            .len();
        self.text.truncate(trimmed_len);
        self.phase = Phase::Finalized;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "sqlweave.sql",
            statement = self.kind.as_str(),
            param_count = self.arguments.len(),
            sql = %truncate_sql(&self.text, MAX_LOGGED_SQL),
            "built statement"
        );

        SqlQuery::from_arguments(self.text, self.arguments)
    }
}

#[cfg(feature = "tracing")]
const MAX_LOGGED_SQL: usize = 200;

/// Truncate to at most `max` bytes on a char boundary, marking the cut.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
fn truncate_sql(sql: &str, max: usize) -> Cow<'_, str> {
    if sql.len() <= max {
        return Cow::Borrowed(sql);
    }
    let mut end = max;
    while !sql.is_char_boundary(end) {
        end -= 1;
    }
    Cow::Owned(format!("{}...", &sql[..end]))
}
