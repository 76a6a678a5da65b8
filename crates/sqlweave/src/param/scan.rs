use crate::dialect::DialectProfile;
use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::{Mutex, OnceLock};

/// Token pattern for a placeholder prefix, cached per prefix.
///
/// Named dialects match `prefix+ word+`, positional dialects match `prefix+`.
/// The repeated prefix lets the scanner see (and skip) `@@IDENTITY`-style tokens
/// as a whole instead of matching their tail.
fn token_regex(prefix: &str, named: bool) -> Regex {
    static CACHE: OnceLock<Mutex<HashMap<(String, bool), Regex>>> = OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));

    let key = (prefix.to_string(), named);
    // A poisoned cache only means another thread panicked mid-insert; the map is still valid.
    let mut cache = cache.lock().unwrap_or_else(|e| e.into_inner());
    cache
        .entry(key)
        .or_insert_with(|| {
            let escaped = regex::escape(prefix);
            let pattern = if named {
                format!(r"(?i)(?:{escaped})+\w+")
            } else {
                format!(r"(?:{escaped})+")
            };
            Regex::new(&pattern).expect("escaped placeholder prefix is a valid regex")
        })
        .clone()
}

/// Byte ranges covered by single-quoted string literals (quotes included).
///
/// An escaped quote (`''`) simply closes and reopens the literal, which keeps
/// the covered range contiguous.
fn literal_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut open: Option<usize> = None;
    for (i, b) in text.bytes().enumerate() {
        if b != b'\'' {
            continue;
        }
        match open.take() {
            Some(start) => ranges.push(start..i + 1),
            None => open = Some(i),
        }
    }
    if let Some(start) = open {
        ranges.push(start..text.len());
    }
    ranges
}

/// Byte spans of every placeholder token in `text`, left to right.
pub(crate) fn placeholder_spans(text: &str, profile: &DialectProfile) -> Vec<Range<usize>> {
    let prefix = profile.sql_parameter.as_str();
    if prefix.is_empty() {
        return Vec::new();
    }

    let literals = literal_ranges(text);
    let in_literal = |pos: usize| literals.iter().any(|r| r.contains(&pos));

    token_regex(prefix, profile.supports_named_parameters)
        .find_iter(text)
        .filter(|m| !in_literal(m.start()))
        .filter(|m| {
            // Exactly one prefix: `@@x` and `::int` are not placeholders.
            let rest = &m.as_str()[prefix.len()..];
            !rest.starts_with(prefix)
        })
        .map(|m| m.range())
        .collect()
}

/// Distinct placeholder tokens in first-occurrence order.
///
/// Positional dialects have no token identity, so every `?` is returned.
///
/// ```
/// use sqlweave::DialectProfile;
/// use sqlweave::param::parameter_names;
///
/// let names = parameter_names("a = @p1 OR b = @p0 OR c = @p1", &DialectProfile::mssql());
/// assert_eq!(names, ["@p1", "@p0"]);
/// ```
pub fn parameter_names<'a>(text: &'a str, profile: &DialectProfile) -> Vec<&'a str> {
    let mut names: Vec<&'a str> = Vec::new();
    for span in placeholder_spans(text, profile) {
        let name = &text[span];
        if !profile.supports_named_parameters || !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            names.push(name);
        }
    }
    names
}

/// Byte index of the first placeholder token, if any.
pub fn first_parameter_position(text: &str, profile: &DialectProfile) -> Option<usize> {
    placeholder_spans(text, profile).first().map(|span| span.start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_tokens() {
        let mssql = DialectProfile::mssql();
        let names = parameter_names("SELECT * FROM t WHERE a = @p0 AND b = @p10 AND c = @p0", &mssql);
        assert_eq!(names, ["@p0", "@p10"]);
    }

    #[test]
    fn test_tokens_are_case_insensitive() {
        let mssql = DialectProfile::mssql();
        let names = parameter_names("a = @P0 OR b = @p0", &mssql);
        assert_eq!(names, ["@P0"]);
    }

    #[test]
    fn test_positional_tokens() {
        let empty = DialectProfile::empty();
        let names = parameter_names("a = ? AND b IN (?,?)", &empty);
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_quoted_literals_are_skipped() {
        let mssql = DialectProfile::mssql();
        assert_eq!(parameter_names("a = '@p0' AND b = @p1", &mssql), ["@p1"]);
        assert_eq!(parameter_names("a = 'it''s @p0' AND b = @p1", &mssql), ["@p1"]);

        let empty = DialectProfile::empty();
        assert_eq!(parameter_names("a = '?' AND b = ?", &empty).len(), 1);
    }

    #[test]
    fn test_double_prefix_is_skipped() {
        let mssql = DialectProfile::mssql();
        assert!(parameter_names("SELECT @@IDENTITY", &mssql).is_empty());

        let postgres = DialectProfile::postgres();
        assert_eq!(parameter_names("a::int = :p0", &postgres), [":p0"]);
    }

    #[test]
    fn test_first_parameter_position() {
        let mssql = DialectProfile::mssql();
        assert_eq!(first_parameter_position("a = '@p9' AND b = @p0", &mssql), Some(18));
        assert_eq!(first_parameter_position("SELECT 1", &mssql), None);
    }
}
