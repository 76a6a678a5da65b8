//! WHERE/HAVING predicate composition.
//!
//! Predicates come in two styles:
//!
//! - raw text with positional values, e.g. `where_sql("Column2 = ?", args!["FOO"])`,
//!   renumbered into the running placeholder sequence;
//! - column-first, e.g. `where_col("Column1")?.is_in([1, 2, 3])`, which emits
//!   `(column OPERATOR placeholder[s])`.
//!
//! The first predicate opens the clause (` WHERE `, ` HAVING `); later ones are
//! joined with ` AND ` or ` OR `. Every predicate is parenthesized, except that
//! `EXISTS` wraps only its sub-query.

use super::Phase;
use super::statement::Statement;
use crate::error::{SqlError, SqlResult, require_name};
use crate::query::SqlQuery;
use crate::value::{SqlArgument, SqlValue};

/// How a predicate attaches to the text before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Join {
    Where,
    Having,
    And,
    Or,
}

impl Join {
    fn prefix(self) -> &'static str {
        match self {
            Join::Where => " WHERE ",
            Join::Having => " HAVING ",
            Join::And => " AND ",
            Join::Or => " OR ",
        }
    }
}

fn open(stmt: &mut Statement, join: Join) {
    stmt.push(join.prefix());
    if join == Join::Where {
        stmt.set_phase(Phase::Filtered);
    }
}

fn to_arguments(values: impl IntoIterator<Item = SqlValue>) -> Vec<SqlArgument> {
    values.into_iter().map(SqlArgument::new).collect()
}

/// `(predicate)` with its placeholders renumbered to continue the sequence.
pub(crate) fn raw(
    stmt: &mut Statement,
    join: Join,
    predicate: &str,
    values: impl IntoIterator<Item = SqlValue>,
) -> SqlResult<()> {
    require_name("predicate", predicate)?;
    let (text, arguments) = stmt.renumber(predicate, to_arguments(values))?;

    open(stmt, join);
    stmt.push("(");
    stmt.push(&text);
    stmt.push(")");
    stmt.bind(arguments);
    Ok(())
}

/// `EXISTS (sub-query)` / `NOT EXISTS (sub-query)`.
pub(crate) fn exists(stmt: &mut Statement, join: Join, negated: bool, sub_query: SqlQuery) -> SqlResult<()> {
    let (text, arguments) = splice(stmt, sub_query)?;

    open(stmt, join);
    stmt.push(if negated { "NOT EXISTS (" } else { "EXISTS (" });
    stmt.push(&text);
    stmt.push(")");
    stmt.bind(arguments);
    Ok(())
}

/// Renumber a sub-query at the current offset.
fn splice(stmt: &Statement, sub_query: SqlQuery) -> SqlResult<(String, Vec<SqlArgument>)> {
    require_name("sub_query", sub_query.command_text())?;
    let (text, arguments) = sub_query.into_parts();
    stmt.renumber(text.trim(), arguments)
}

/// Comparison operators for the column-first style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compare {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    NotLike,
}

impl Compare {
    fn as_sql(self) -> &'static str {
        match self {
            Compare::Eq => "=",
            Compare::Ne => "<>",
            Compare::Gt => ">",
            Compare::Gte => ">=",
            Compare::Lt => "<",
            Compare::Lte => "<=",
            Compare::Like => "LIKE",
            Compare::NotLike => "NOT LIKE",
        }
    }
}

/// Column-first predicate, completed by one operator call.
///
/// Returned by `where_col`, `and_where_col` and `or_where_col`; every operator
/// consumes it and hands the owning builder back.
#[must_use = "a column predicate does nothing until an operator is applied"]
pub struct ColumnPredicate<B> {
    builder: B,
    column: String,
    join: Join,
    statement: fn(&mut B) -> &mut Statement,
}

impl<B> ColumnPredicate<B> {
    pub(crate) fn new(builder: B, column: &str, join: Join, statement: fn(&mut B) -> &mut Statement) -> Self {
        Self {
            builder,
            column: column.to_string(),
            join,
            statement,
        }
    }

    /// Write `(column` + `body` + `)` after the join prefix.
    fn finish(mut self, body: impl FnOnce(&mut Statement)) -> B {
        let stmt = (self.statement)(&mut self.builder);
        open(stmt, self.join);
        stmt.push("(");
        stmt.push_identifier(&self.column);
        body(stmt);
        stmt.push(")");
        self.builder
    }

    fn compare(self, op: Compare, value: SqlValue) -> SqlResult<B> {
        Ok(self.finish(|stmt| {
            stmt.push(" ");
            stmt.push(op.as_sql());
            stmt.push(" ");
            stmt.push_value(value);
        }))
    }

    /// LIKE with the dialect's wildcard placed around `text`.
    fn like_wildcarded(mut self, text: &str, leading: bool, trailing: bool) -> SqlResult<B> {
        let wildcard = (self.statement)(&mut self.builder).profile().like_wildcard.clone();
        let mut pattern = String::with_capacity(text.len() + 2 * wildcard.len());
        if leading {
            pattern.push_str(&wildcard);
        }
        pattern.push_str(text);
        if trailing {
            pattern.push_str(&wildcard);
        }
        self.compare(Compare::Like, SqlValue::from(pattern))
    }

    fn between_values(self, negated: bool, lower: SqlValue, upper: SqlValue) -> SqlResult<B> {
        if lower.is_null() {
            return Err(SqlError::invalid_argument("lower", "BETWEEN bound cannot be NULL"));
        }
        if upper.is_null() {
            return Err(SqlError::invalid_argument("upper", "BETWEEN bound cannot be NULL"));
        }
        Ok(self.finish(|stmt| {
            stmt.push(if negated { " NOT BETWEEN " } else { " BETWEEN " });
            stmt.push_value(lower);
            stmt.push(" AND ");
            stmt.push_value(upper);
        }))
    }

    fn in_values(self, negated: bool, values: Vec<SqlArgument>) -> SqlResult<B> {
        if values.is_empty() {
            return Err(SqlError::invalid_argument("values", "at least one value is required"));
        }
        Ok(self.finish(|stmt| {
            stmt.push(if negated { " NOT IN (" } else { " IN (" });
            stmt.push_arguments(values);
            stmt.push(")");
        }))
    }

    fn in_sub_query(mut self, negated: bool, sub_query: SqlQuery) -> SqlResult<B> {
        let (text, arguments) = splice((self.statement)(&mut self.builder), sub_query)?;
        Ok(self.finish(|stmt| {
            stmt.push(if negated { " NOT IN (" } else { " IN (" });
            stmt.push(&text);
            stmt.push(")");
            stmt.bind(arguments);
        }))
    }

    /// `(column = value)`
    pub fn is_equal_to(self, value: impl Into<SqlValue>) -> SqlResult<B> {
        self.compare(Compare::Eq, value.into())
    }

    /// `(column <> value)`
    pub fn is_not_equal_to(self, value: impl Into<SqlValue>) -> SqlResult<B> {
        self.compare(Compare::Ne, value.into())
    }

    /// `(column > value)`
    pub fn is_greater_than(self, value: impl Into<SqlValue>) -> SqlResult<B> {
        self.compare(Compare::Gt, value.into())
    }

    /// `(column >= value)`
    pub fn is_greater_than_or_equal_to(self, value: impl Into<SqlValue>) -> SqlResult<B> {
        self.compare(Compare::Gte, value.into())
    }

    /// `(column < value)`
    pub fn is_less_than(self, value: impl Into<SqlValue>) -> SqlResult<B> {
        self.compare(Compare::Lt, value.into())
    }

    /// `(column <= value)`
    pub fn is_less_than_or_equal_to(self, value: impl Into<SqlValue>) -> SqlResult<B> {
        self.compare(Compare::Lte, value.into())
    }

    /// `(column LIKE pattern)`
    pub fn is_like(self, pattern: impl Into<SqlValue>) -> SqlResult<B> {
        self.compare(Compare::Like, pattern.into())
    }

    /// `(column NOT LIKE pattern)`
    pub fn is_not_like(self, pattern: impl Into<SqlValue>) -> SqlResult<B> {
        self.compare(Compare::NotLike, pattern.into())
    }

    /// `(column LIKE pattern)` matching values that begin with `text`.
    pub fn starts_with(self, text: &str) -> SqlResult<B> {
        self.like_wildcarded(text, false, true)
    }

    /// `(column LIKE pattern)` matching values that end with `text`.
    pub fn ends_with(self, text: &str) -> SqlResult<B> {
        self.like_wildcarded(text, true, false)
    }

    /// `(column LIKE pattern)` matching values that contain `text`.
    pub fn contains(self, text: &str) -> SqlResult<B> {
        self.like_wildcarded(text, true, true)
    }

    /// `(column BETWEEN lower AND upper)`. Neither bound may be `NULL`.
    pub fn between(self, lower: impl Into<SqlValue>, upper: impl Into<SqlValue>) -> SqlResult<B> {
        self.between_values(false, lower.into(), upper.into())
    }

    /// `(column NOT BETWEEN lower AND upper)`. Neither bound may be `NULL`.
    pub fn not_between(self, lower: impl Into<SqlValue>, upper: impl Into<SqlValue>) -> SqlResult<B> {
        self.between_values(true, lower.into(), upper.into())
    }

    /// `(column IN (p0,p1,...))`. At least one value is required.
    pub fn is_in<I, V>(self, values: I) -> SqlResult<B>
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        let values = values.into_iter().map(|v| SqlArgument::new(v.into())).collect();
        self.in_values(false, values)
    }

    /// `(column NOT IN (p0,p1,...))`. At least one value is required.
    pub fn is_not_in<I, V>(self, values: I) -> SqlResult<B>
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        let values = values.into_iter().map(|v| SqlArgument::new(v.into())).collect();
        self.in_values(true, values)
    }

    /// `(column IN (sub-query))`, with the sub-query's placeholders continuing
    /// the outer sequence.
    pub fn is_in_query(self, sub_query: SqlQuery) -> SqlResult<B> {
        self.in_sub_query(false, sub_query)
    }

    /// `(column NOT IN (sub-query))`.
    pub fn is_not_in_query(self, sub_query: SqlQuery) -> SqlResult<B> {
        self.in_sub_query(true, sub_query)
    }

    /// `(column IS NULL)`
    pub fn is_null(self) -> SqlResult<B> {
        Ok(self.finish(|stmt| stmt.push(" IS NULL")))
    }

    /// `(column IS NOT NULL)`
    pub fn is_not_null(self) -> SqlResult<B> {
        Ok(self.finish(|stmt| stmt.push(" IS NOT NULL")))
    }
}

/// WHERE entry points shared by the SELECT, UPDATE and DELETE builders.
///
/// `open` lists the phases in which the first predicate may be added. The
/// builder must keep its statement in a field named `stmt`.
macro_rules! impl_where_methods {
    (open: [$($open:expr),+ $(,)?]) => {
        fn where_entry(
            mut self,
            operation: &'static str,
            join: $crate::builder::predicate::Join,
            predicate: &str,
            values: impl IntoIterator<Item = $crate::value::SqlValue>,
        ) -> $crate::error::SqlResult<Self> {
            self.stmt.require(operation, $crate::builder::predicate::where_phases(join, &[$($open),+]))?;
            $crate::builder::predicate::raw(&mut self.stmt, join, predicate, values)?;
            Ok(self)
        }

        fn column_entry(
            self,
            operation: &'static str,
            join: $crate::builder::predicate::Join,
            column: &str,
        ) -> $crate::error::SqlResult<$crate::builder::predicate::ColumnPredicate<Self>> {
            $crate::error::require_name("column", column)?;
            self.stmt.require(operation, $crate::builder::predicate::where_phases(join, &[$($open),+]))?;
            Ok($crate::builder::predicate::ColumnPredicate::new(self, column, join, |b| &mut b.stmt))
        }

        fn exists_entry(
            mut self,
            operation: &'static str,
            join: $crate::builder::predicate::Join,
            negated: bool,
            sub_query: $crate::query::SqlQuery,
        ) -> $crate::error::SqlResult<Self> {
            self.stmt.require(operation, $crate::builder::predicate::where_phases(join, &[$($open),+]))?;
            $crate::builder::predicate::exists(&mut self.stmt, join, negated, sub_query)?;
            Ok(self)
        }

        /// Open the WHERE clause with a raw predicate: ` WHERE (predicate)`.
        ///
        /// Placeholders in `predicate` use the dialect's own convention with
        /// local numbering from zero; they are renumbered to follow any
        /// arguments already in the statement.
        pub fn where_sql(
            self,
            predicate: &str,
            values: impl IntoIterator<Item = $crate::value::SqlValue>,
        ) -> $crate::error::SqlResult<Self> {
            self.where_entry("where_sql", $crate::builder::predicate::Join::Where, predicate, values)
        }

        /// ` AND (predicate)`
        pub fn and_where_sql(
            self,
            predicate: &str,
            values: impl IntoIterator<Item = $crate::value::SqlValue>,
        ) -> $crate::error::SqlResult<Self> {
            self.where_entry("and_where_sql", $crate::builder::predicate::Join::And, predicate, values)
        }

        /// ` OR (predicate)`
        pub fn or_where_sql(
            self,
            predicate: &str,
            values: impl IntoIterator<Item = $crate::value::SqlValue>,
        ) -> $crate::error::SqlResult<Self> {
            self.where_entry("or_where_sql", $crate::builder::predicate::Join::Or, predicate, values)
        }

        /// Open the WHERE clause with a column-first predicate.
        pub fn where_col(
            self,
            column: &str,
        ) -> $crate::error::SqlResult<$crate::builder::predicate::ColumnPredicate<Self>> {
            self.column_entry("where_col", $crate::builder::predicate::Join::Where, column)
        }

        /// Continue the WHERE clause with ` AND (column ...)`.
        pub fn and_where_col(
            self,
            column: &str,
        ) -> $crate::error::SqlResult<$crate::builder::predicate::ColumnPredicate<Self>> {
            self.column_entry("and_where_col", $crate::builder::predicate::Join::And, column)
        }

        /// Continue the WHERE clause with ` OR (column ...)`.
        pub fn or_where_col(
            self,
            column: &str,
        ) -> $crate::error::SqlResult<$crate::builder::predicate::ColumnPredicate<Self>> {
            self.column_entry("or_where_col", $crate::builder::predicate::Join::Or, column)
        }

        /// ` WHERE EXISTS (sub-query)`
        pub fn where_exists(self, sub_query: $crate::query::SqlQuery) -> $crate::error::SqlResult<Self> {
            self.exists_entry("where_exists", $crate::builder::predicate::Join::Where, false, sub_query)
        }

        /// ` WHERE NOT EXISTS (sub-query)`
        pub fn where_not_exists(self, sub_query: $crate::query::SqlQuery) -> $crate::error::SqlResult<Self> {
            self.exists_entry("where_not_exists", $crate::builder::predicate::Join::Where, true, sub_query)
        }

        /// ` AND EXISTS (sub-query)`
        pub fn and_exists(self, sub_query: $crate::query::SqlQuery) -> $crate::error::SqlResult<Self> {
            self.exists_entry("and_exists", $crate::builder::predicate::Join::And, false, sub_query)
        }

        /// ` AND NOT EXISTS (sub-query)`
        pub fn and_not_exists(self, sub_query: $crate::query::SqlQuery) -> $crate::error::SqlResult<Self> {
            self.exists_entry("and_not_exists", $crate::builder::predicate::Join::And, true, sub_query)
        }

        /// ` OR EXISTS (sub-query)`
        pub fn or_exists(self, sub_query: $crate::query::SqlQuery) -> $crate::error::SqlResult<Self> {
            self.exists_entry("or_exists", $crate::builder::predicate::Join::Or, false, sub_query)
        }

        /// ` OR NOT EXISTS (sub-query)`
        pub fn or_not_exists(self, sub_query: $crate::query::SqlQuery) -> $crate::error::SqlResult<Self> {
            self.exists_entry("or_not_exists", $crate::builder::predicate::Join::Or, true, sub_query)
        }
    };
}

pub(crate) use impl_where_methods;

/// Phases in which a WHERE predicate with the given join is legal.
pub(crate) fn where_phases(join: Join, open: &'static [Phase]) -> &'static [Phase] {
    match join {
        Join::Where | Join::Having => open,
        Join::And | Join::Or => &[Phase::Filtered],
    }
}
