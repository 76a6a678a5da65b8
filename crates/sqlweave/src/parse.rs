//! Clause decomposition of finished SQL text.
//!
//! [`SqlString::parse`] splits a single SELECT statement into the inner text
//! of its SELECT, FROM, WHERE, GROUP BY and ORDER BY clauses. Keywords are
//! located case-insensitively, first occurrence wins, and a keyword must be
//! preceded by a space and followed by whitespace or the end of the text.
//! Line breaks are treated as spaces.
//!
//! ```
//! use sqlweave::{Clauses, SqlString};
//!
//! let parsed = SqlString::parse(
//!     "SELECT Id FROM Customers WHERE Id = @p0 GROUP BY Id ORDER BY Id",
//!     Clauses::WHERE | Clauses::GROUP_BY,
//! );
//! assert_eq!(parsed.where_clause, "Id = @p0");
//! assert_eq!(parsed.group_by, "Id");
//! assert_eq!(parsed.select, "");
//! ```

use serde::Serialize;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A set of clauses to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Clauses(u8);

impl Clauses {
    pub const NONE: Self = Self(0);
    pub const SELECT: Self = Self(1);
    pub const FROM: Self = Self(1 << 1);
    pub const WHERE: Self = Self(1 << 2);
    pub const GROUP_BY: Self = Self(1 << 3);
    pub const ORDER_BY: Self = Self(1 << 4);
    pub const ALL: Self = Self(0b1_1111);

    /// Whether every clause in `other` is also in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Clauses {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for Clauses {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Display for Clauses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Clauses, &str); 5] = [
            (Clauses::SELECT, "SELECT"),
            (Clauses::FROM, "FROM"),
            (Clauses::WHERE, "WHERE"),
            (Clauses::GROUP_BY, "GROUP BY"),
            (Clauses::ORDER_BY, "ORDER BY"),
        ];
        let mut first = true;
        for (clause, name) in NAMES {
            if self.contains(clause) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("NONE")?;
        }
        Ok(())
    }
}

/// The inner text of each clause of a SELECT statement.
///
/// A clause that is absent, or was not requested, is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SqlString {
    pub select: String,
    pub from: String,
    #[serde(rename = "where")]
    pub where_clause: String,
    pub group_by: String,
    pub order_by: String,
}

/// Byte offsets of each located keyword: `(start of keyword, start of body)`.
#[derive(Debug, Default)]
struct Keywords {
    select: Option<(usize, usize)>,
    from: Option<(usize, usize)>,
    where_clause: Option<(usize, usize)>,
    group_by: Option<(usize, usize)>,
    order_by: Option<(usize, usize)>,
}

impl SqlString {
    /// Extract the `requested` clauses from `command_text`.
    pub fn parse(command_text: &str, requested: Clauses) -> Self {
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "sqlweave.parse", clauses = %requested, len = command_text.len(), "parsing sql");

        if requested.is_empty() {
            return Self::default();
        }

        let text = normalize_line_breaks(command_text);
        let upper = text.to_ascii_uppercase();
        let keywords = Keywords {
            select: find_leading_select(&upper),
            from: find_keyword(&upper, " FROM"),
            where_clause: find_keyword(&upper, " WHERE"),
            group_by: find_keyword(&upper, " GROUP BY"),
            order_by: find_keyword(&upper, " ORDER BY"),
        };

        let clause = |wanted: Clauses, at: Option<(usize, usize)>, bounds: &[Option<(usize, usize)>]| {
            match at {
                Some((_, body)) if requested.contains(wanted) => {
                    let end = bounds
                        .iter()
                        .flatten()
                        .map(|&(start, _)| start)
                        .filter(|&start| start >= body)
                        .min()
                        .unwrap_or(text.len());
                    text[body..end].trim().to_string()
                }
                _ => String::new(),
            }
        };

        Self {
            select: clause(
                Clauses::SELECT,
                keywords.select,
                &[keywords.from, keywords.where_clause, keywords.group_by, keywords.order_by],
            ),
            from: clause(
                Clauses::FROM,
                keywords.from,
                &[keywords.where_clause, keywords.group_by, keywords.order_by],
            ),
            where_clause: clause(
                Clauses::WHERE,
                keywords.where_clause,
                &[keywords.group_by, keywords.order_by],
            ),
            group_by: clause(Clauses::GROUP_BY, keywords.group_by, &[keywords.order_by]),
            order_by: clause(Clauses::ORDER_BY, keywords.order_by, &[]),
        }
    }

    /// Extract every clause.
    pub fn parse_all(command_text: &str) -> Self {
        Self::parse(command_text, Clauses::ALL)
    }
}

fn normalize_line_breaks(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

/// `SELECT` at the start of the text (after leading whitespace).
fn find_leading_select(upper: &str) -> Option<(usize, usize)> {
    let start = upper.len() - upper.trim_start().len();
    let rest = &upper[start..];
    let body = start + "SELECT".len();
    (rest.starts_with("SELECT") && is_boundary(upper, body)).then_some((start, body))
}

/// First occurrence of `keyword` followed by whitespace or end of text.
fn find_keyword(upper: &str, keyword: &str) -> Option<(usize, usize)> {
    upper
        .match_indices(keyword)
        .map(|(start, _)| (start, start + keyword.len()))
        .find(|&(_, body)| is_boundary(upper, body))
}

fn is_boundary(text: &str, at: usize) -> bool {
    text[at..].chars().next().is_none_or(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUERY: &str = "SELECT Id FROM Customers WHERE Id = @p0 GROUP BY Id ORDER BY Id";

    #[test]
    fn test_requested_clauses_only() {
        let parsed = SqlString::parse(QUERY, Clauses::WHERE | Clauses::GROUP_BY);
        assert_eq!(parsed.where_clause, "Id = @p0");
        assert_eq!(parsed.group_by, "Id");
        assert_eq!(parsed.select, "");
        assert_eq!(parsed.from, "");
        assert_eq!(parsed.order_by, "");
    }

    #[test]
    fn test_parse_all() {
        let parsed = SqlString::parse_all(QUERY);
        assert_eq!(parsed.select, "Id");
        assert_eq!(parsed.from, "Customers");
        assert_eq!(parsed.where_clause, "Id = @p0");
        assert_eq!(parsed.group_by, "Id");
        assert_eq!(parsed.order_by, "Id");
    }

    #[test]
    fn test_missing_clauses_are_empty() {
        let parsed = SqlString::parse_all("SELECT Name, Age FROM Customers ORDER BY Name DESC");
        assert_eq!(parsed.select, "Name, Age");
        assert_eq!(parsed.from, "Customers");
        assert_eq!(parsed.where_clause, "");
        assert_eq!(parsed.group_by, "");
        assert_eq!(parsed.order_by, "Name DESC");
    }

    #[test]
    fn test_case_insensitive_and_line_breaks() {
        let sql = "select Id\r\nfrom Customers\nwhere Status = ?\rorder by Id";
        let parsed = SqlString::parse_all(sql);
        assert_eq!(parsed.select, "Id");
        assert_eq!(parsed.from, "Customers");
        assert_eq!(parsed.where_clause, "Status = ?");
        assert_eq!(parsed.order_by, "Id");
    }

    #[test]
    fn test_keyword_needs_word_boundary() {
        let parsed = SqlString::parse_all("SELECT FromDate, Wherever FROM Events");
        assert_eq!(parsed.select, "FromDate, Wherever");
        assert_eq!(parsed.from, "Events");
    }

    #[test]
    fn test_from_bounded_by_order_by_without_where() {
        let parsed = SqlString::parse("SELECT * FROM [Sales].[Customers] ORDER BY [Name]", Clauses::FROM);
        assert_eq!(parsed.from, "[Sales].[Customers]");
    }

    #[test]
    fn test_no_clauses_requested() {
        assert_eq!(SqlString::parse(QUERY, Clauses::NONE), SqlString::default());
    }

    #[test]
    fn test_clauses_set_ops() {
        let mut set = Clauses::SELECT | Clauses::FROM;
        assert!(set.contains(Clauses::FROM));
        assert!(!set.contains(Clauses::WHERE));
        set |= Clauses::WHERE;
        assert!(set.contains(Clauses::SELECT | Clauses::WHERE));
        assert!(Clauses::ALL.contains(set));
        assert_eq!(set.to_string(), "SELECT | FROM | WHERE");
        assert_eq!(Clauses::NONE.to_string(), "NONE");
    }
}
