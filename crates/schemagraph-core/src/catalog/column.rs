//! Column definitions.

use super::state::{ObjectState, PartialObject};
use super::table::TableName;
use super::types::ColumnDataType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A table column.
///
/// The owning table is held as a name handle, resolved through the
/// [`Catalog`](super::Catalog). It is fixed when the column is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    table: TableName,
    name: String,
    ordinal: usize,
    state: ObjectState,
    /// Column data type.
    pub data_type: ColumnDataType,
    /// Whether the column is computed (generated or virtual).
    pub generated: bool,
    /// Whether the column accepts nulls.
    pub nullable: bool,
    /// Whether the column is auto-incremented.
    pub auto_incremented: bool,
    /// Free-form remarks from the database.
    pub remarks: Option<String>,
}

impl Column {
    /// Create a column owned by the given table.
    ///
    /// The ordinal position is assigned when the column is added to its table.
    pub fn new(table: &TableName, name: impl Into<String>, data_type: ColumnDataType) -> Self {
        Self {
            table: table.clone(),
            name: name.into(),
            ordinal: 0,
            state: ObjectState::Full,
            data_type,
            generated: false,
            nullable: true,
            auto_incremented: false,
            remarks: None,
        }
    }

    /// Create a placeholder column for a partial table.
    pub fn partial(table: &TableName, name: impl Into<String>) -> Self {
        Self {
            state: ObjectState::Partial,
            ..Self::new(table, name, ColumnDataType::unknown())
        }
    }

    /// Mark as generated.
    pub fn with_generated(mut self, generated: bool) -> Self {
        self.generated = generated;
        self
    }

    /// Set nullability.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Mark as auto-incremented.
    pub fn with_auto_incremented(mut self, auto_incremented: bool) -> Self {
        self.auto_incremented = auto_incremented;
        self
    }

    /// Handle of the owning table.
    pub fn table(&self) -> &TableName {
        &self.table
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully-qualified name, `<table full name>.<column name>`.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.table, self.name)
    }

    /// 1-based position within the table; 0 before the column is attached.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Handle that refers to this column.
    pub fn to_ref(&self) -> ColumnRef {
        ColumnRef::new(self.table.clone(), self.name.clone())
    }

    pub(crate) fn attach(&mut self, ordinal: usize, state: ObjectState) {
        if self.ordinal == 0 {
            self.ordinal = ordinal;
        }
        if state == ObjectState::Partial {
            self.state = ObjectState::Partial;
        }
    }
}

impl PartialObject for Column {
    fn object_state(&self) -> ObjectState {
        self.state
    }
}

/// Anything that wraps a table column, such as an index column.
pub trait AsColumn {
    /// The underlying column.
    fn as_column(&self) -> &Column;
}

impl AsColumn for Column {
    fn as_column(&self) -> &Column {
        self
    }
}

/// A handle to a column: owning table name plus column name.
///
/// Serialized as the dotted full name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnRef {
    /// Owning table.
    pub table: TableName,
    /// Column name.
    pub column: String,
}

impl ColumnRef {
    /// Create a column handle.
    pub fn new(table: TableName, column: impl Into<String>) -> Self {
        Self {
            table,
            column: column.into(),
        }
    }

    /// Parse a dotted `schema.table.column` (or `table.column`) name.
    ///
    /// The last segment is the column, the one before it the table, and
    /// anything before that the schema.
    pub fn parse(full_name: &str) -> Option<Self> {
        let (table, column) = full_name.rsplit_once('.')?;
        if column.is_empty() {
            return None;
        }
        Some(Self::new(TableName::parse(table)?, column))
    }

    /// Fully-qualified name, `<table full name>.<column name>`.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.table, self.column)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

impl TryFrom<String> for ColumnRef {
    type Error = String;

    fn try_from(full_name: String) -> Result<Self, Self::Error> {
        Self::parse(&full_name).ok_or_else(|| format!("invalid column name: {:?}", full_name))
    }
}

impl From<ColumnRef> for String {
    fn from(column: ColumnRef) -> Self {
        column.full_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_builder() {
        let table = TableName::new("SALES", "ORDERS");
        let column = Column::new(&table, "TOTAL", ColumnDataType::new("DECIMAL"))
            .with_generated(true)
            .with_nullable(false);

        assert_eq!(column.name(), "TOTAL");
        assert_eq!(column.full_name(), "SALES.ORDERS.TOTAL");
        assert_eq!(column.table(), &table);
        assert!(column.generated);
        assert!(!column.nullable);
        assert!(!column.is_partial());
    }

    #[test]
    fn test_partial_column() {
        let table = TableName::new("OTHER", "CUSTOMERS");
        let column = Column::partial(&table, "ID");

        assert!(column.is_partial());
        assert_eq!(column.to_ref(), ColumnRef::new(table, "ID"));
    }

    #[test]
    fn test_column_ref_parse() {
        let col = ColumnRef::parse("SALES.ORDERS.CUST_ID").unwrap();
        assert_eq!(col.table, TableName::new("SALES", "ORDERS"));
        assert_eq!(col.column, "CUST_ID");
        assert_eq!(col.to_string(), "SALES.ORDERS.CUST_ID");

        let unqualified = ColumnRef::parse("ORDERS.ID").unwrap();
        assert_eq!(unqualified.table, TableName::unqualified("ORDERS"));

        assert!(ColumnRef::parse("ORDERS").is_none());
        assert!(ColumnRef::parse("ORDERS.").is_none());
    }

    #[test]
    fn test_column_ref_json() {
        let col: ColumnRef = serde_json::from_str(r#""PUBLIC.BOOKS.AUTHORS.ID""#).unwrap();
        assert_eq!(col.table, TableName::new("PUBLIC.BOOKS", "AUTHORS"));
        assert_eq!(serde_json::to_string(&col).unwrap(), r#""PUBLIC.BOOKS.AUTHORS.ID""#);

        assert!(serde_json::from_str::<ColumnRef>(r#""ID""#).is_err());
    }
}
