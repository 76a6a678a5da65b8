use super::Phase;
use super::predicate::{Join, impl_where_methods};
use super::statement::{Statement, StatementKind};
use crate::dialect::DialectProfile;
use crate::entity::EntityMeta;
use crate::error::{SqlError, SqlResult, require_name};
use crate::query::SqlQuery;
use crate::value::SqlValue;
use std::sync::Arc;

/// SELECT statement builder.
///
/// Phases: `Initial` (no projection yet) → `Projected` (columns or aggregates)
/// → `Sourced` (`from`) → `Filtered` (`where_*`) → `Grouped` (`group_by`,
/// `having`) → `Ordered` (`order_by_*`).
#[must_use]
#[derive(Debug, Clone)]
pub struct SelectBuilder {
    stmt: Statement,
    having_open: bool,
}

#[derive(Debug, Clone, Copy)]
enum Aggregate {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl Aggregate {
    fn as_sql(self) -> &'static str {
        match self {
            Aggregate::Count => "COUNT",
            Aggregate::Sum => "SUM",
            Aggregate::Avg => "AVG",
            Aggregate::Min => "MIN",
            Aggregate::Max => "MAX",
        }
    }

    fn operation(self) -> &'static str {
        match self {
            Aggregate::Count => "count",
            Aggregate::Sum => "sum",
            Aggregate::Avg => "avg",
            Aggregate::Min => "min",
            Aggregate::Max => "max",
        }
    }
}

impl SelectBuilder {
    pub(crate) fn new(profile: Arc<DialectProfile>, distinct: bool) -> Self {
        let keyword = if distinct { "SELECT DISTINCT" } else { "SELECT" };
        Self {
            stmt: Statement::new(profile, StatementKind::Select, keyword),
            having_open: false,
        }
    }

    /// Write the column list. An empty list leaves the projection as `*`.
    pub(crate) fn columns<I, S>(mut self, columns: I) -> SqlResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stmt.require("select", &[Phase::Initial])?;
        let columns: Vec<String> = columns.into_iter().map(|c| c.as_ref().to_string()).collect();
        if columns.is_empty() {
            return Ok(self);
        }
        for column in &columns {
            require_name("column", column)?;
        }

        self.stmt.push(" ");
        self.stmt.push_identifiers(&columns);
        self.stmt.set_phase(Phase::Projected);
        Ok(self)
    }

    // ==================== Aggregates ====================

    fn aggregate(mut self, function: Aggregate, column: &str, alias: &str) -> SqlResult<Self> {
        require_name("column", column)?;
        require_name("alias", alias)?;
        self.stmt.require(function.operation(), &[Phase::Initial, Phase::Projected])?;

        let column = self.stmt.escape(column).into_owned();
        let separator = if self.stmt.phase() == Phase::Projected { "," } else { " " };
        self.stmt.push(separator);
        self.stmt.push(function.as_sql());
        self.stmt.push("(");
        self.stmt.push(&column);
        self.stmt.push(") AS ");
        self.stmt.push(alias);
        self.stmt.set_phase(Phase::Projected);
        Ok(self)
    }

    /// Append `COUNT(column) AS alias` to the projection.
    pub fn count(self, column: &str, alias: &str) -> SqlResult<Self> {
        self.aggregate(Aggregate::Count, column, alias)
    }

    /// Append `SUM(column) AS alias` to the projection.
    pub fn sum(self, column: &str, alias: &str) -> SqlResult<Self> {
        self.aggregate(Aggregate::Sum, column, alias)
    }

    /// Append `AVG(column) AS alias` to the projection.
    pub fn avg(self, column: &str, alias: &str) -> SqlResult<Self> {
        self.aggregate(Aggregate::Avg, column, alias)
    }

    /// Append `MIN(column) AS alias` to the projection.
    pub fn min(self, column: &str, alias: &str) -> SqlResult<Self> {
        self.aggregate(Aggregate::Min, column, alias)
    }

    /// Append `MAX(column) AS alias` to the projection.
    pub fn max(self, column: &str, alias: &str) -> SqlResult<Self> {
        self.aggregate(Aggregate::Max, column, alias)
    }

    // ==================== Source ====================

    fn push_wildcard(&mut self) {
        let wildcard = format!(" {}", self.stmt.profile().wildcard);
        self.stmt.push(&wildcard);
    }

    /// ` FROM table`. Legal after the projection (or with none, meaning `*`).
    pub fn from(mut self, table: &str) -> SqlResult<Self> {
        require_name("table", table)?;
        self.stmt.require("from", &[Phase::Initial, Phase::Projected])?;

        if self.stmt.phase() == Phase::Initial {
            self.push_wildcard();
        }
        self.stmt.push(" FROM ");
        self.stmt.push_identifier(table);
        self.stmt.set_phase(Phase::Sourced);
        Ok(self)
    }

    /// ` FROM` the table mapped by `T`.
    pub fn from_entity<T: EntityMeta>(self) -> SqlResult<Self> {
        self.from(&T::TABLE.qualified_name())
    }

    // ==================== Filter ====================

    impl_where_methods!(open: [Phase::Sourced]);

    // ==================== Grouping ====================

    /// ` GROUP BY c1,c2`. Repeated calls extend the list until `having` is
    /// called.
    pub fn group_by<I, S>(mut self, columns: I) -> SqlResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stmt
            .require("group_by", &[Phase::Sourced, Phase::Filtered, Phase::Grouped])?;
        if self.having_open {
            return Err(SqlError::invalid_phase("group_by", self.stmt.phase()));
        }
        let columns: Vec<String> = columns.into_iter().map(|c| c.as_ref().to_string()).collect();
        if columns.is_empty() {
            return Err(SqlError::invalid_argument("columns", "at least one column is required"));
        }
        for column in &columns {
            require_name("column", column)?;
        }

        let separator = if self.stmt.phase() == Phase::Grouped { "," } else { " GROUP BY " };
        self.stmt.push(separator);
        self.stmt.push_identifiers(&columns);
        self.stmt.set_phase(Phase::Grouped);
        Ok(self)
    }

    /// ` HAVING (predicate)`; later calls append ` AND (predicate)`.
    ///
    /// Only legal directly after `group_by`.
    pub fn having(mut self, predicate: &str, values: impl IntoIterator<Item = SqlValue>) -> SqlResult<Self> {
        self.stmt.require("having", &[Phase::Grouped])?;
        let join = if self.having_open { Join::And } else { Join::Having };
        super::predicate::raw(&mut self.stmt, join, predicate, values)?;
        self.having_open = true;
        Ok(self)
    }

    // ==================== Ordering ====================

    fn order_by<I, S>(mut self, operation: &'static str, direction: &str, columns: I) -> SqlResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stmt.require(
            operation,
            &[Phase::Sourced, Phase::Filtered, Phase::Grouped, Phase::Ordered],
        )?;
        let columns: Vec<String> = columns.into_iter().map(|c| c.as_ref().to_string()).collect();
        if columns.is_empty() {
            return Err(SqlError::invalid_argument("columns", "at least one column is required"));
        }
        for column in &columns {
            require_name("column", column)?;
        }

        let mut separator = if self.stmt.phase() == Phase::Ordered { "," } else { " ORDER BY " };
        for column in &columns {
            self.stmt.push(separator);
            self.stmt.push_identifier(column);
            self.stmt.push(direction);
            separator = ",";
        }
        self.stmt.set_phase(Phase::Ordered);
        Ok(self)
    }

    /// ` ORDER BY c ASC`. Repeated calls (either direction) accumulate.
    pub fn order_by_ascending<I, S>(self, columns: I) -> SqlResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.order_by("order_by_ascending", " ASC", columns)
    }

    /// ` ORDER BY c DESC`. Repeated calls (either direction) accumulate.
    pub fn order_by_descending<I, S>(self, columns: I) -> SqlResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.order_by("order_by_descending", " DESC", columns)
    }

    // ==================== Build ====================

    pub fn phase(&self) -> Phase {
        self.stmt.phase()
    }

    /// Finish the statement.
    ///
    /// Legal once a table has been given, or from `Initial` for a bare
    /// `SELECT *`.
    pub fn to_sql_query(mut self) -> SqlResult<SqlQuery> {
        self.stmt.require(
            "to_sql_query",
            &[
                Phase::Initial,
                Phase::Sourced,
                Phase::Filtered,
                Phase::Grouped,
                Phase::Ordered,
            ],
        )?;
        if self.stmt.phase() == Phase::Initial {
            self.push_wildcard();
        }
        Ok(self.stmt.finish())
    }
}
