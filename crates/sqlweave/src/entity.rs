//! Table metadata consumed by type-based builder calls.
//!
//! Resolving metadata from a Rust type (conventions, attributes, reflection) is
//! the mapping layer's job. The builders only need the result: a table name, an
//! optional schema, and the ordered columns with their insert/update flags.
//!
//! # Example
//!
//! ```
//! use sqlweave::{ColumnInfo, EntityMeta, TableInfo};
//!
//! struct Customer;
//!
//! const CUSTOMER_COLUMNS: &[ColumnInfo] = &[
//!     ColumnInfo::new("Id").generated(),
//!     ColumnInfo::new("Name"),
//!     ColumnInfo::new("Created").read_only_after_insert(),
//! ];
//!
//! impl EntityMeta for Customer {
//!     const TABLE: TableInfo = TableInfo::new("Customers")
//!         .with_schema("Sales")
//!         .with_columns(CUSTOMER_COLUMNS);
//! }
//!
//! assert_eq!(Customer::TABLE.qualified_name(), "Sales.Customers");
//! ```

/// A mapped column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: &'static str,
    pub insertable: bool,
    pub updatable: bool,
}

impl ColumnInfo {
    /// A column that is both insertable and updatable.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            insertable: true,
            updatable: true,
        }
    }

    /// Database-generated column (identity, computed): never written.
    pub const fn generated(mut self) -> Self {
        self.insertable = false;
        self.updatable = false;
        self
    }

    /// Written on insert only.
    pub const fn read_only_after_insert(mut self) -> Self {
        self.updatable = false;
        self
    }

    pub const fn with_insertable(mut self, insertable: bool) -> Self {
        self.insertable = insertable;
        self
    }

    pub const fn with_updatable(mut self, updatable: bool) -> Self {
        self.updatable = updatable;
        self
    }
}

/// A mapped table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableInfo {
    pub name: &'static str,
    pub schema: Option<&'static str>,
    pub columns: &'static [ColumnInfo],
}

impl TableInfo {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            schema: None,
            columns: &[],
        }
    }

    pub const fn with_schema(mut self, schema: &'static str) -> Self {
        self.schema = Some(schema);
        self
    }

    pub const fn with_columns(mut self, columns: &'static [ColumnInfo]) -> Self {
        self.columns = columns;
        self
    }

    /// `schema.table`, or just `table` without a schema.
    pub fn qualified_name(&self) -> String {
        match self.schema {
            Some(schema) if !schema.is_empty() => format!("{}.{}", schema, self.name),
            _ => self.name.to_string(),
        }
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.name)
    }

    pub fn insert_columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().filter(|c| c.insertable).map(|c| c.name)
    }

    pub fn update_columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().filter(|c| c.updatable).map(|c| c.name)
    }
}

/// Types that map to a table.
pub trait EntityMeta {
    const TABLE: TableInfo;
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER_COLUMNS: &[ColumnInfo] = &[
        ColumnInfo::new("Id").generated(),
        ColumnInfo::new("Total"),
        ColumnInfo::new("PlacedOn").read_only_after_insert(),
    ];

    const ORDERS: TableInfo = TableInfo::new("Orders").with_columns(ORDER_COLUMNS);

    #[test]
    fn test_qualified_name() {
        assert_eq!(ORDERS.qualified_name(), "Orders");
        assert_eq!(ORDERS.with_schema("dbo").qualified_name(), "dbo.Orders");
        assert_eq!(ORDERS.with_schema("").qualified_name(), "Orders");
    }

    #[test]
    fn test_column_filters() {
        assert_eq!(ORDERS.column_names().collect::<Vec<_>>(), ["Id", "Total", "PlacedOn"]);
        assert_eq!(ORDERS.insert_columns().collect::<Vec<_>>(), ["Total", "PlacedOn"]);
        assert_eq!(ORDERS.update_columns().collect::<Vec<_>>(), ["Total"]);
    }
}
