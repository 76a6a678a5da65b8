//! Placeholder handling.
//!
//! Fragments of SQL are written with their own local placeholder numbering
//! (`@p0, @p1, ...` or bare `?`). When fragments are merged into a larger
//! statement, their placeholders are renumbered so the merged text has one
//! contiguous sequence that matches the argument list, left to right.
//!
//! - [`compare_parameter_names`]: numeric-aware ordering (`@p9 < @p10`)
//! - [`parameter_names`] / [`first_parameter_position`]: token discovery
//! - [`renumber`]: rewrite a fragment to start at a given offset
//! - [`renumber_in_order`]: the same for a finished query, keeping its argument order
//!
//! Tokens inside single-quoted literals and double-prefix tokens such as
//! `@@IDENTITY` or `::int` are never treated as placeholders.

mod compare;
mod renumber;
mod scan;

pub use compare::{ParameterName, compare_parameter_names};
pub use renumber::{Renumbered, renumber, renumber_in_order};
pub use scan::{first_parameter_position, parameter_names};
