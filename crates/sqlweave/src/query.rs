//! The finished statement: command text plus ordered arguments.

use crate::dialect::DialectProfile;
use crate::error::{SqlError, SqlResult};
use crate::param::renumber_in_order;
use crate::value::{SqlArgument, SqlValue};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// An immutable SQL statement with its arguments in binding order.
///
/// Built by a builder's `to_sql_query()`, or directly from literal SQL with
/// [`SqlQuery::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[must_use]
pub struct SqlQuery {
    command_text: String,
    arguments: Vec<SqlArgument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout: Option<Duration>,
}

impl SqlQuery {
    /// Create a query from literal SQL and its values, in placeholder order.
    ///
    /// ```
    /// use sqlweave::{SqlQuery, args};
    ///
    /// let q = SqlQuery::new("SELECT Id FROM Table WHERE Column = ?", args![1024]);
    /// assert_eq!(q.arguments().len(), 1);
    /// ```
    pub fn new(command_text: impl Into<String>, values: impl IntoIterator<Item = SqlValue>) -> Self {
        Self::from_arguments(command_text, values.into_iter().map(SqlArgument::new).collect())
    }

    /// Create a query from literal SQL and already-typed arguments.
    pub fn from_arguments(command_text: impl Into<String>, arguments: Vec<SqlArgument>) -> Self {
        Self {
            command_text: command_text.into(),
            arguments,
            timeout: None,
        }
    }

    /// Attach a command timeout for the execution layer.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn command_text(&self) -> &str {
        &self.command_text
    }

    pub fn arguments(&self) -> &[SqlArgument] {
        &self.arguments
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Split into command text and arguments.
    pub fn into_parts(self) -> (String, Vec<SqlArgument>) {
        (self.command_text, self.arguments)
    }

    /// Combine several queries into one batch.
    ///
    /// Statements are joined with the profile's statement separator and every
    /// query's placeholders are renumbered to continue the batch's sequence.
    /// Each member's arguments bind to its placeholders left to right, so a
    /// named procedure call such as `EXEC P @Zeta,@Alpha` keeps its order.
    /// The batch timeout is the largest timeout of its members.
    ///
    /// ```
    /// use sqlweave::{DialectProfile, SqlQuery, args};
    ///
    /// let mssql = DialectProfile::mssql();
    /// let batch = SqlQuery::combine(
    ///     [
    ///         SqlQuery::new("DELETE FROM A WHERE Id = @p0", args![1]),
    ///         SqlQuery::new("DELETE FROM B WHERE Id = @p0", args![2]),
    ///     ],
    ///     &mssql,
    /// )?;
    /// assert_eq!(
    ///     batch.command_text(),
    ///     "DELETE FROM A WHERE Id = @p0;\r\nDELETE FROM B WHERE Id = @p1"
    /// );
    /// # Ok::<(), sqlweave::SqlError>(())
    /// ```
    pub fn combine(
        queries: impl IntoIterator<Item = SqlQuery>,
        profile: &DialectProfile,
    ) -> SqlResult<SqlQuery> {
        let mut command_text = String::new();
        let mut arguments = Vec::new();
        let mut timeout: Option<Duration> = None;

        for query in queries {
            if !command_text.is_empty() {
                command_text.push_str(&profile.statement_separator);
                command_text.push_str("\r\n");
            }
            timeout = timeout.max(query.timeout);
            let (text, args) = query.into_parts();
            let text = text.trim_end().trim_end_matches(profile.statement_separator.as_str());
            let renumbered = renumber_in_order(text, args, arguments.len(), profile)?;
            command_text.push_str(&renumbered.text);
            arguments.extend(renumbered.arguments);
        }

        if command_text.is_empty() {
            return Err(SqlError::invalid_argument("queries", "at least one query is required"));
        }

        Ok(SqlQuery {
            command_text,
            arguments,
            timeout,
        })
    }
}

impl fmt::Display for SqlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::value::DbType;

    #[test]
    fn test_new_infers_types() {
        let q = SqlQuery::new("SELECT * FROM t WHERE a = ? AND b = ?", args![1, "x"]);
        assert_eq!(q.arguments()[0].db_type(), DbType::Int32);
        assert_eq!(q.arguments()[1].db_type(), DbType::String);
        assert_eq!(q.to_string(), "SELECT * FROM t WHERE a = ? AND b = ?");
    }

    #[test]
    fn test_equality_includes_arguments() {
        let a = SqlQuery::new("SELECT ?", args![1]);
        let b = SqlQuery::new("SELECT ?", args![1]);
        let c = SqlQuery::new("SELECT ?", args![2]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_combine_positional() {
        let empty = DialectProfile::empty();
        let batch = SqlQuery::combine(
            [
                SqlQuery::new("UPDATE A SET x = ?;", args![1]),
                SqlQuery::new("UPDATE B SET y = ? WHERE z = ?", args![2, 3]),
            ],
            &empty,
        )
        .unwrap();
        assert_eq!(batch.command_text(), "UPDATE A SET x = ?;\r\nUPDATE B SET y = ? WHERE z = ?");
        assert_eq!(batch.arguments().len(), 3);
    }

    #[test]
    fn test_combine_keeps_argument_order_of_named_members() {
        let mssql = DialectProfile::mssql();
        let batch = SqlQuery::combine(
            [
                SqlQuery::new("DELETE FROM A WHERE Id = @p0", args![1]),
                SqlQuery::new("EXEC P @Zeta,@Alpha", args!["z", "a"]),
            ],
            &mssql,
        )
        .unwrap();
        assert_eq!(batch.command_text(), "DELETE FROM A WHERE Id = @p0;\r\nEXEC P @p1,@p2");
        let values: Vec<_> = batch.arguments().iter().map(|a| a.value().clone()).collect();
        assert_eq!(values, args![1, "z", "a"]);
    }

    #[test]
    fn test_combine_keeps_largest_timeout() {
        let empty = DialectProfile::empty();
        let batch = SqlQuery::combine(
            [
                SqlQuery::new("SELECT 1", args![]).with_timeout(Duration::from_secs(5)),
                SqlQuery::new("SELECT 2", args![]).with_timeout(Duration::from_secs(30)),
            ],
            &empty,
        )
        .unwrap();
        assert_eq!(batch.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_combine_requires_queries() {
        let err = SqlQuery::combine(Vec::new(), &DialectProfile::empty()).unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
