use super::compare::compare_parameter_names;
use super::scan::placeholder_spans;
use crate::dialect::DialectProfile;
use crate::error::{SqlError, SqlResult};
use crate::value::SqlArgument;

/// A fragment rewritten to a new starting offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renumbered {
    /// Fragment text with its placeholders renumbered.
    pub text: String,
    /// Arguments in the order of the renumbered placeholders.
    pub arguments: Vec<SqlArgument>,
}

/// Renumber the placeholders in `text` so they start at `offset`.
///
/// Named dialects: each distinct token takes one value. Values are matched to
/// tokens in ascending token order (`@p0` takes the first value, `@p1` the
/// second, ...), and the rewritten tokens are numbered `offset, offset + 1, ...`
/// in first-occurrence order. Arguments are reordered to match. A token used
/// twice refers to a single value.
///
/// Positional dialects: the text is returned unchanged; the number of `?`
/// tokens must equal the number of values.
///
/// # Errors
///
/// [`SqlError::MissingArgument`] if there are fewer values than distinct tokens,
/// [`SqlError::UnusedArguments`] if there are more.
///
/// ```
/// use sqlweave::{DialectProfile, SqlArgument};
/// use sqlweave::param::renumber;
///
/// let renumbered = renumber(
///     "a = @p0 OR b = @p1",
///     vec![SqlArgument::new(1), SqlArgument::new(2)],
///     3,
///     &DialectProfile::mssql(),
/// )?;
/// assert_eq!(renumbered.text, "a = @p3 OR b = @p4");
/// # Ok::<(), sqlweave::SqlError>(())
/// ```
pub fn renumber(
    text: &str,
    arguments: Vec<SqlArgument>,
    offset: usize,
    profile: &DialectProfile,
) -> SqlResult<Renumbered> {
    rewrite(text, arguments, offset, profile, Binding::Ascending)
}

/// Like [`renumber`], but values bind to distinct tokens in first-occurrence
/// order, so the argument order is kept as is.
///
/// This is the reading of a finished [`SqlQuery`](crate::SqlQuery), whose
/// arguments line up with its placeholders left to right whatever the tokens
/// are called (`EXEC P @Zeta,@Alpha` binds its first value to `@Zeta`).
///
/// ```
/// use sqlweave::{DialectProfile, SqlArgument};
/// use sqlweave::param::renumber_in_order;
///
/// let renumbered = renumber_in_order(
///     "EXEC P @Zeta,@Alpha",
///     vec![SqlArgument::new("z"), SqlArgument::new("a")],
///     2,
///     &DialectProfile::mssql(),
/// )?;
/// assert_eq!(renumbered.text, "EXEC P @p2,@p3");
/// assert_eq!(renumbered.arguments[0], SqlArgument::new("z"));
/// # Ok::<(), sqlweave::SqlError>(())
/// ```
pub fn renumber_in_order(
    text: &str,
    arguments: Vec<SqlArgument>,
    offset: usize,
    profile: &DialectProfile,
) -> SqlResult<Renumbered> {
    rewrite(text, arguments, offset, profile, Binding::FirstOccurrence)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    /// `@p0` takes the first value, whatever its position in the text.
    Ascending,
    /// The first token in the text takes the first value.
    FirstOccurrence,
}

fn rewrite(
    text: &str,
    arguments: Vec<SqlArgument>,
    offset: usize,
    profile: &DialectProfile,
    binding: Binding,
) -> SqlResult<Renumbered> {
    let spans = placeholder_spans(text, profile);

    if !profile.supports_named_parameters {
        if spans.len() != arguments.len() {
            return Err(mismatch(spans.len(), arguments.len(), || {
                profile.sql_parameter.clone()
            }));
        }
        trace_renumber(offset, spans.len(), false);
        return Ok(Renumbered {
            text: text.to_string(),
            arguments,
        });
    }

    // Distinct tokens in first-occurrence order; `slot[i]` is the index into
    // `distinct` for span `i`.
    let mut distinct: Vec<&str> = Vec::new();
    let mut slot = Vec::with_capacity(spans.len());
    for span in &spans {
        let name = &text[span.clone()];
        let idx = match distinct.iter().position(|d| d.eq_ignore_ascii_case(name)) {
            Some(idx) => idx,
            None => {
                distinct.push(name);
                distinct.len() - 1
            }
        };
        slot.push(idx);
    }

    // `order[v]` is the distinct token that takes value `v`.
    let mut order: Vec<usize> = (0..distinct.len()).collect();
    if binding == Binding::Ascending {
        order.sort_by(|&a, &b| {
            compare_parameter_names(&distinct[a].to_ascii_lowercase(), &distinct[b].to_ascii_lowercase())
        });
    }

    if distinct.len() != arguments.len() {
        return Err(mismatch(distinct.len(), arguments.len(), || {
            distinct[order[arguments.len()]].to_string()
        }));
    }

    let mut pending: Vec<Option<SqlArgument>> = arguments.into_iter().map(Some).collect();
    let mut value_of = vec![0usize; distinct.len()];
    for (value_idx, &token_idx) in order.iter().enumerate() {
        value_of[token_idx] = value_idx;
    }
    let reordered: Vec<SqlArgument> = value_of
        .iter()
        .filter_map(|&value_idx| pending[value_idx].take())
        .collect();

    let mut rewritten = String::with_capacity(text.len() + spans.len() * 2);
    let mut last = 0;
    for (span, &idx) in spans.iter().zip(&slot) {
        rewritten.push_str(&text[last..span.start]);
        rewritten.push_str(&profile.name_parameter(offset + idx));
        last = span.end;
    }
    rewritten.push_str(&text[last..]);

    trace_renumber(offset, distinct.len(), true);
    Ok(Renumbered {
        text: rewritten,
        arguments: reordered,
    })
}

fn mismatch(expected: usize, supplied: usize, missing_token: impl FnOnce() -> String) -> SqlError {
    if supplied < expected {
        SqlError::MissingArgument {
            position: supplied,
            token: missing_token(),
        }
    } else {
        SqlError::UnusedArguments { expected, supplied }
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn trace_renumber(offset: usize, tokens: usize, named: bool) {
    #[cfg(feature = "tracing")]
    tracing::trace!(target: "sqlweave.renumber", offset, tokens, named, "renumbered fragment");
}
