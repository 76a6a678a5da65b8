//! # sqlweave
//!
//! Dialect-agnostic SQL text engine for a data-access layer.
//!
//! ## Features
//!
//! - **Fluent builders**: SELECT/INSERT/UPDATE/DELETE and stored procedure calls,
//!   with a runtime-checked [`Phase`] for legal call order
//! - **Dialect profiles**: identifier escaping, `?` vs `@pN`/`:pN` placeholders and
//!   procedure syntax come from a [`DialectProfile`], loadable from TOML
//! - **Parameter renumbering**: raw predicates and sub-queries keep their own local
//!   numbering and are rewritten to continue the statement's sequence
//! - **Clause decomposition**: [`SqlString::parse`] splits finished SQL into its
//!   SELECT/FROM/WHERE/GROUP BY/ORDER BY clauses
//!
//! The engine only produces text and ordered arguments; executing a [`SqlQuery`]
//! belongs to the caller.
//!
//! ## Example
//!
//! ```
//! use sqlweave::{DialectProfile, SqlBuilder, SqlQuery, args};
//!
//! let sb = SqlBuilder::new(DialectProfile::mssql());
//! let active = SqlQuery::new("SELECT [CustomerId] FROM [Orders] WHERE [Status] = @p0", args!["open"]);
//!
//! let query = sb
//!     .select(["Id", "Name"])?
//!     .from("Customers")?
//!     .where_sql("[Region] = @p0", args!["EU"])?
//!     .and_where_col("Id")?
//!     .is_in_query(active)?
//!     .order_by_ascending(["Name"])?
//!     .to_sql_query()?;
//!
//! assert_eq!(
//!     query.command_text(),
//!     "SELECT [Id],[Name] FROM [Customers] WHERE ([Region] = @p0) AND ([Id] IN \
//!      (SELECT [CustomerId] FROM [Orders] WHERE [Status] = @p1)) ORDER BY [Name] ASC"
//! );
//! assert_eq!(query.arguments().len(), 2);
//! # Ok::<(), sqlweave::SqlError>(())
//! ```

pub mod builder;
pub mod dialect;
pub mod entity;
pub mod error;
pub mod param;
pub mod parse;
pub mod query;
pub mod value;

pub use builder::{
    ColumnPredicate, DeleteBuilder, InsertBuilder, Phase, ProcedureBuilder, SelectBuilder,
    SqlBuilder, UpdateBuilder,
};
pub use dialect::DialectProfile;
pub use entity::{ColumnInfo, EntityMeta, TableInfo};
pub use error::{SqlError, SqlResult};
pub use parse::{Clauses, SqlString};
pub use query::SqlQuery;
pub use value::{DbType, SqlArgument, SqlValue};

/// Build a `Vec<SqlValue>` from heterogeneous values.
///
/// ```
/// use sqlweave::{SqlValue, args};
///
/// let values = args!["FOO", 1024, None::<i32>];
/// assert_eq!(values[1], SqlValue::I32(1024));
/// assert!(values[2].is_null());
/// assert!(args![].is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::SqlValue>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::SqlValue::from($value)),+]
    };
}
