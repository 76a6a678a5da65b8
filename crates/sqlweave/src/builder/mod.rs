//! Fluent statement builders.
//!
//! [`SqlBuilder`] holds a shared [`DialectProfile`] and hands out one builder
//! per statement kind. Each builder appends to a single text buffer and a
//! running argument list as calls are made, so placeholders are always
//! numbered in the order their values were supplied.
//!
//! ## Design
//!
//! - Every fallible call returns `SqlResult<Self>`; errors surface at the call
//!   that caused them, before any text is written.
//! - Legal call order is tracked with an explicit [`Phase`]; calling an
//!   operation out of order yields [`SqlError::InvalidPhase`](crate::SqlError::InvalidPhase).
//! - Raw predicates and sub-queries are renumbered into the running sequence.
//!
//! # Example
//!
//! ```
//! use sqlweave::{DialectProfile, SqlBuilder};
//!
//! let sb = SqlBuilder::new(DialectProfile::mssql());
//! let query = sb
//!     .select(["Column1"])?
//!     .from("Table")?
//!     .where_col("Column1")?
//!     .is_in([1, 2, 3])?
//!     .to_sql_query()?;
//!
//! assert_eq!(
//!     query.command_text(),
//!     "SELECT [Column1] FROM [Table] WHERE ([Column1] IN (@p0,@p1,@p2))"
//! );
//! # Ok::<(), sqlweave::SqlError>(())
//! ```

pub mod delete;
pub mod insert;
pub mod predicate;
pub mod procedure;
pub mod select;
pub mod update;

mod statement;

pub use delete::DeleteBuilder;
pub use insert::InsertBuilder;
pub use predicate::ColumnPredicate;
pub use procedure::ProcedureBuilder;
pub use select::SelectBuilder;
pub use update::UpdateBuilder;

use crate::dialect::DialectProfile;
use crate::entity::EntityMeta;
use crate::error::SqlResult;
use std::fmt;
use std::sync::Arc;

/// Stage of statement construction.
///
/// Each builder moves forward through these phases; an operation is only legal
/// in the phases listed in its documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing but the statement keyword has been written.
    Initial,
    /// A column list (or SET list, or parameter list) has been written.
    Projected,
    /// The target table has been written.
    Sourced,
    /// At least one WHERE predicate has been written.
    Filtered,
    /// A GROUP BY list has been written.
    Grouped,
    /// An ORDER BY list has been written.
    Ordered,
    /// The statement is complete.
    Finalized,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Initial => "initial",
            Phase::Projected => "projected",
            Phase::Sourced => "sourced",
            Phase::Filtered => "filtered",
            Phase::Grouped => "grouped",
            Phase::Ordered => "ordered",
            Phase::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

/// Entry point: creates statement builders sharing one dialect profile.
#[derive(Debug, Clone, Default)]
pub struct SqlBuilder {
    profile: Arc<DialectProfile>,
}

impl SqlBuilder {
    pub fn new(profile: DialectProfile) -> Self {
        Self::with_shared(Arc::new(profile))
    }

    /// Create from a profile already shared elsewhere.
    pub fn with_shared(profile: Arc<DialectProfile>) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &DialectProfile {
        &self.profile
    }

    /// `SELECT *`, legal to finish without a table.
    pub fn select_all(&self) -> SelectBuilder {
        SelectBuilder::new(self.profile.clone(), false)
    }

    /// `SELECT c1,c2,...`. An empty list means `*`.
    pub fn select<I, S>(&self, columns: I) -> SqlResult<SelectBuilder>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        SelectBuilder::new(self.profile.clone(), false).columns(columns)
    }

    /// `SELECT DISTINCT c1,c2,...`.
    pub fn select_distinct<I, S>(&self, columns: I) -> SqlResult<SelectBuilder>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        SelectBuilder::new(self.profile.clone(), true).columns(columns)
    }

    /// Select every mapped column of `T` from its table.
    pub fn select_entity<T: EntityMeta>(&self) -> SqlResult<SelectBuilder> {
        self.select(T::TABLE.column_names())?.from_entity::<T>()
    }

    pub fn insert(&self) -> InsertBuilder {
        InsertBuilder::new(self.profile.clone())
    }

    pub fn update(&self) -> UpdateBuilder {
        UpdateBuilder::new(self.profile.clone())
    }

    pub fn delete(&self) -> DeleteBuilder {
        DeleteBuilder::new(self.profile.clone())
    }

    /// `DELETE FROM` the table mapped by `T`.
    pub fn delete_from_entity<T: EntityMeta>(&self) -> SqlResult<DeleteBuilder> {
        self.delete().from_entity::<T>()
    }

    /// Invoke a stored procedure.
    pub fn execute(&self, procedure: &str) -> SqlResult<ProcedureBuilder> {
        ProcedureBuilder::new(self.profile.clone(), procedure)
    }
}
