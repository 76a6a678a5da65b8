//! SQL dialect profiles.
//!
//! A [`DialectProfile`] describes the few conventions the text engine needs to
//! know about a target database:
//!
//! - identifier delimiters (`[` `]`, `"` `"`, or none)
//! - the placeholder prefix (`?`, `@`, `:`) and whether placeholders are named
//! - the keyword used to invoke a stored procedure
//!
//! Profiles are read-only and can be shared between any number of builders.
//!
//! # Example
//!
//! ```
//! use sqlweave::DialectProfile;
//!
//! let mssql = DialectProfile::mssql();
//! assert_eq!(mssql.escape_identifier("dbo.Customers"), "[dbo].[Customers]");
//! assert_eq!(mssql.name_parameter(3), "@p3");
//!
//! let empty = DialectProfile::empty();
//! assert_eq!(empty.escape_identifier("dbo.Customers"), "dbo.Customers");
//! assert_eq!(empty.name_parameter(3), "?");
//! ```

use crate::error::SqlResult;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Conventions of a target SQL dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialectProfile {
    /// Opening identifier delimiter (empty = no escaping).
    pub left_delimiter: String,
    /// Closing identifier delimiter (empty = no escaping).
    pub right_delimiter: String,
    /// Placeholder prefix, e.g. `?`, `@` or `:`.
    pub sql_parameter: String,
    /// Whether placeholders carry a name (`@p0`) or are bare positional tokens.
    pub supports_named_parameters: bool,
    /// Keyword used to call a stored procedure, e.g. `EXEC`.
    pub stored_procedure_invocation_command: String,
    /// Separator placed between statements in a batch.
    pub statement_separator: String,
    /// Column wildcard.
    pub wildcard: String,
    /// Wildcard used in LIKE patterns.
    pub like_wildcard: String,
}

impl Default for DialectProfile {
    fn default() -> Self {
        Self::empty()
    }
}

impl DialectProfile {
    /// Neutral baseline: no identifier escaping and positional `?` parameters.
    pub fn empty() -> Self {
        Self {
            left_delimiter: String::new(),
            right_delimiter: String::new(),
            sql_parameter: "?".to_string(),
            supports_named_parameters: false,
            stored_procedure_invocation_command: "EXEC".to_string(),
            statement_separator: ";".to_string(),
            wildcard: "*".to_string(),
            like_wildcard: "%".to_string(),
        }
    }

    /// SQL Server: `[bracket]` escaping and `@pN` parameters.
    pub fn mssql() -> Self {
        Self {
            left_delimiter: "[".to_string(),
            right_delimiter: "]".to_string(),
            sql_parameter: "@".to_string(),
            supports_named_parameters: true,
            ..Self::empty()
        }
    }

    /// PostgreSQL: `"double quote"` escaping and `:pN` parameters.
    pub fn postgres() -> Self {
        Self {
            left_delimiter: "\"".to_string(),
            right_delimiter: "\"".to_string(),
            sql_parameter: ":".to_string(),
            supports_named_parameters: true,
            stored_procedure_invocation_command: "SELECT".to_string(),
            ..Self::empty()
        }
    }

    /// MySQL: `` `backtick` `` escaping and `@pN` parameters.
    pub fn mysql() -> Self {
        Self {
            left_delimiter: "`".to_string(),
            right_delimiter: "`".to_string(),
            sql_parameter: "@".to_string(),
            supports_named_parameters: true,
            stored_procedure_invocation_command: "CALL".to_string(),
            ..Self::empty()
        }
    }

    /// SQLite: `"double quote"` escaping and `@pN` parameters. No stored procedures.
    pub fn sqlite() -> Self {
        Self {
            left_delimiter: "\"".to_string(),
            right_delimiter: "\"".to_string(),
            sql_parameter: "@".to_string(),
            supports_named_parameters: true,
            stored_procedure_invocation_command: String::new(),
            ..Self::empty()
        }
    }

    /// Firebird: `"double quote"` escaping and `@pN` parameters.
    pub fn firebird() -> Self {
        Self {
            left_delimiter: "\"".to_string(),
            right_delimiter: "\"".to_string(),
            sql_parameter: "@".to_string(),
            supports_named_parameters: true,
            stored_procedure_invocation_command: "EXECUTE PROCEDURE".to_string(),
            ..Self::empty()
        }
    }

    /// Load a profile from TOML. Missing keys take the [`DialectProfile::empty`] value.
    ///
    /// ```
    /// use sqlweave::DialectProfile;
    ///
    /// let profile = DialectProfile::from_toml_str(r#"
    ///     left_delimiter = "["
    ///     right_delimiter = "]"
    ///     sql_parameter = "@"
    ///     supports_named_parameters = true
    /// "#)?;
    /// assert_eq!(profile, DialectProfile::mssql());
    /// # Ok::<(), sqlweave::SqlError>(())
    /// ```
    pub fn from_toml_str(source: &str) -> SqlResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Whether identifiers are wrapped in delimiters.
    pub fn escapes_identifiers(&self) -> bool {
        !self.left_delimiter.is_empty() && !self.right_delimiter.is_empty()
    }

    /// Escape an identifier, wrapping each `.`-separated segment individually.
    ///
    /// Already-escaped segments and the wildcard are left untouched, so escaping
    /// is idempotent.
    pub fn escape_identifier<'a>(&self, name: &'a str) -> Cow<'a, str> {
        if !self.escapes_identifiers() || name.is_empty() || self.is_escaped(name) {
            return Cow::Borrowed(name);
        }

        let mut escaped = String::with_capacity(name.len() + 4);
        for (i, segment) in self.segments(name).into_iter().enumerate() {
            if i > 0 {
                escaped.push('.');
            }
            if segment == self.wildcard || self.is_escaped(segment) {
                escaped.push_str(segment);
            } else {
                escaped.push_str(&self.left_delimiter);
                escaped.push_str(segment);
                escaped.push_str(&self.right_delimiter);
            }
        }
        Cow::Owned(escaped)
    }

    /// Split on `.` outside delimited segments: `dbo.[my.table]` is two segments.
    fn segments<'a>(&self, name: &'a str) -> Vec<&'a str> {
        let (left, right) = (self.left_delimiter.as_str(), self.right_delimiter.as_str());
        let mut segments = Vec::new();
        let mut start = 0;
        let mut quoted = false;
        let mut i = 0;
        while i < name.len() {
            let rest = &name[i..];
            if quoted && rest.starts_with(right) {
                quoted = false;
                i += right.len();
            } else if !quoted && rest.starts_with(left) {
                quoted = true;
                i += left.len();
            } else if !quoted && rest.starts_with('.') {
                segments.push(&name[start..i]);
                i += 1;
                start = i;
            } else {
                i += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
        segments.push(&name[start..]);
        segments
    }

    fn is_escaped(&self, name: &str) -> bool {
        name.len() >= self.left_delimiter.len() + self.right_delimiter.len()
            && name.starts_with(self.left_delimiter.as_str())
            && name.ends_with(self.right_delimiter.as_str())
    }

    /// Placeholder token for the zero-based argument `position`.
    ///
    /// Named dialects produce `prefix + "p" + position`; positional dialects
    /// produce the bare prefix for every position.
    pub fn name_parameter(&self, position: usize) -> String {
        if self.supports_named_parameters {
            format!("{}p{}", self.sql_parameter, position)
        } else {
            self.sql_parameter.clone()
        }
    }

    /// Comma-separated placeholders for `count` arguments starting at `offset`.
    pub(crate) fn parameter_list(&self, offset: usize, count: usize) -> String {
        (offset..offset + count)
            .map(|position| self.name_parameter(position))
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_segments() {
        let mssql = DialectProfile::mssql();
        assert_eq!(mssql.escape_identifier("Table"), "[Table]");
        assert_eq!(mssql.escape_identifier("Schema.Table"), "[Schema].[Table]");
        assert_eq!(mssql.escape_identifier("[Schema].Table"), "[Schema].[Table]");
        assert_eq!(mssql.escape_identifier("t.*"), "[t].*");
        assert_eq!(mssql.escape_identifier("*"), "*");
    }

    #[test]
    fn test_escape_keeps_dots_inside_delimiters() {
        let mssql = DialectProfile::mssql();
        assert_eq!(mssql.escape_identifier("dbo.[my.table]"), "[dbo].[my.table]");
        assert_eq!(mssql.escape_identifier("[my.schema].Orders"), "[my.schema].[Orders]");

        let postgres = DialectProfile::postgres();
        assert_eq!(postgres.escape_identifier("public.\"a.b\""), "\"public\".\"a.b\"");

        let once = mssql.escape_identifier("dbo.[my.table]").into_owned();
        assert_eq!(mssql.escape_identifier(&once), once);
    }

    #[test]
    fn test_escape_is_idempotent() {
        let profiles = [
            DialectProfile::empty(),
            DialectProfile::mssql(),
            DialectProfile::postgres(),
            DialectProfile::mysql(),
            DialectProfile::sqlite(),
            DialectProfile::firebird(),
        ];
        for profile in &profiles {
            for name in ["Table", "Schema.Table", "t.*", "*", "[Already]", "\"Quoted\".Col"] {
                let once = profile.escape_identifier(name).into_owned();
                let twice = profile.escape_identifier(&once).into_owned();
                assert_eq!(once, twice, "profile {profile:?} name {name}");
            }
        }
    }

    #[test]
    fn test_empty_profile_does_not_escape() {
        let empty = DialectProfile::empty();
        assert!(!empty.escapes_identifiers());
        assert!(matches!(empty.escape_identifier("Schema.Table"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_name_parameter() {
        assert_eq!(DialectProfile::mssql().name_parameter(0), "@p0");
        assert_eq!(DialectProfile::postgres().name_parameter(12), ":p12");
        assert_eq!(DialectProfile::empty().name_parameter(12), "?");
    }

    #[test]
    fn test_parameter_list() {
        assert_eq!(DialectProfile::mssql().parameter_list(2, 3), "@p2,@p3,@p4");
        assert_eq!(DialectProfile::empty().parameter_list(2, 3), "?,?,?");
        assert_eq!(DialectProfile::empty().parameter_list(0, 0), "");
    }

    #[test]
    fn test_from_toml_defaults() {
        let profile = DialectProfile::from_toml_str("sql_parameter = \":\"\n").unwrap();
        assert_eq!(profile.sql_parameter, ":");
        assert_eq!(profile.wildcard, "*");
        assert!(!profile.supports_named_parameters);
    }

    #[test]
    fn test_from_toml_error() {
        let err = DialectProfile::from_toml_str("supports_named_parameters = \"yes\"").unwrap_err();
        assert!(matches!(err, crate::SqlError::Config(_)));
    }
}
