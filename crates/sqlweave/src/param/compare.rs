use std::cmp::Ordering;

#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Number(&'a str),
    Text(&'a str),
}

impl Ord for Chunk<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            // Leading zeros are stripped, so the longer run is the larger number.
            (Chunk::Number(a), Chunk::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Chunk::Text(a), Chunk::Text(b)) => a.cmp(b),
            (Chunk::Number(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Chunk<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn chunks(name: &str) -> impl Iterator<Item = Chunk<'_>> {
    let bytes = name.as_bytes();
    let mut pos = 0;
    std::iter::from_fn(move || {
        if pos >= bytes.len() {
            return None;
        }
        let start = pos;
        let digits = bytes[pos].is_ascii_digit();
        while pos < bytes.len() && bytes[pos].is_ascii_digit() == digits {
            pos += 1;
        }
        let run = &name[start..pos];
        Some(if digits {
            Chunk::Number(run.trim_start_matches('0'))
        } else {
            Chunk::Text(run)
        })
    })
}

/// Order two placeholder names so that embedded numbers compare numerically.
///
/// `@p2` sorts before `@p10` even though an ordinal comparison says otherwise.
/// Names that are equal chunk-by-chunk (`@p1` vs `@p01`) fall back to length,
/// then ordinal comparison, which keeps the ordering total.
///
/// ```
/// use sqlweave::param::compare_parameter_names;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_parameter_names("@p9", "@p10"), Ordering::Less);
/// assert_eq!(compare_parameter_names("@p10", "@p10"), Ordering::Equal);
/// ```
pub fn compare_parameter_names(x: &str, y: &str) -> Ordering {
    if x == y {
        return Ordering::Equal;
    }
    chunks(x)
        .cmp(chunks(y))
        .then_with(|| x.len().cmp(&y.len()))
        .then_with(|| x.cmp(y))
}

/// Placeholder name ordered with [`compare_parameter_names`].
///
/// Usable as a `BTreeMap`/`BTreeSet` key or with `sort()` directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParameterName<'a>(pub &'a str);

impl Ord for ParameterName<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_parameter_names(self.0, other.0)
    }
}

impl PartialOrd for ParameterName<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_digit_ordering() {
        assert_eq!(compare_parameter_names("@p9", "@p10"), Ordering::Less);
        assert_eq!(compare_parameter_names("@p10", "@p9"), Ordering::Greater);
        assert_eq!(compare_parameter_names("@p2", "@p10"), Ordering::Less);
        assert_eq!(compare_parameter_names("@p99", "@p123"), Ordering::Less);
        assert_eq!(compare_parameter_names("@p10", "@p11"), Ordering::Less);
    }

    #[test]
    fn test_equal_names() {
        assert_eq!(compare_parameter_names("@p0", "@p0"), Ordering::Equal);
        assert_eq!(compare_parameter_names("", ""), Ordering::Equal);
    }

    #[test]
    fn test_leading_zeros_fall_back_to_length() {
        assert_eq!(compare_parameter_names("@p1", "@p01"), Ordering::Less);
    }

    #[test]
    fn test_text_names_compare_ordinally() {
        assert_eq!(compare_parameter_names("@a", "@b"), Ordering::Less);
        assert_eq!(compare_parameter_names(":p3", "@p3"), Ordering::Less);
    }

    #[test]
    fn test_sort_is_numeric() {
        let mut names = vec!["@p10", "@p2", "@p1", "@p0", "@p9", "@p11"];
        names.sort_by(|a, b| compare_parameter_names(a, b));
        assert_eq!(names, ["@p0", "@p1", "@p2", "@p9", "@p10", "@p11"]);
    }

    #[test]
    fn test_parameter_name_in_btree_set() {
        let set: std::collections::BTreeSet<_> =
            ["@p10", "@p9", "@p1"].into_iter().map(ParameterName).collect();
        let ordered: Vec<_> = set.into_iter().map(|n| n.0).collect();
        assert_eq!(ordered, ["@p1", "@p9", "@p10"]);
    }
}
