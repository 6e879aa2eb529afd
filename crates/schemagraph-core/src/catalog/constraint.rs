//! Table constraint definitions.

use super::column::{AsColumn, Column};
use super::table::TableName;
use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Kind of a table constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableConstraintType {
    /// Primary key.
    PrimaryKey,
    /// Uniqueness constraint (single or composite).
    Unique,
    /// Check constraint.
    Check,
    /// Reported by the database but not classified.
    Unknown,
}

/// A column participating in a table constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConstraintColumn {
    column: Column,
    key_ordinal: usize,
}

impl TableConstraintColumn {
    /// The table column.
    pub fn column(&self) -> &Column {
        &self.column
    }

    /// 1-based position within the constraint.
    pub fn key_ordinal(&self) -> usize {
        self.key_ordinal
    }
}

impl AsColumn for TableConstraintColumn {
    fn as_column(&self) -> &Column {
        &self.column
    }
}

/// A table constraint other than a foreign key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConstraint {
    table: TableName,
    name: String,
    kind: TableConstraintType,
    columns: Vec<TableConstraintColumn>,
    /// Check expression, when the database reports one.
    pub definition: Option<String>,
}

impl TableConstraint {
    /// Create an empty constraint on the given table.
    pub fn new(table: &TableName, name: impl Into<String>, kind: TableConstraintType) -> Self {
        Self {
            table: table.clone(),
            name: name.into(),
            kind,
            columns: Vec::new(),
            definition: None,
        }
    }

    /// Set the constraint definition.
    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = Some(definition.into());
        self
    }

    /// Append a column. The column must belong to the constrained table.
    pub fn push_column(&mut self, column: &Column) -> Result<(), Error> {
        if column.table() != &self.table {
            return Err(Error::InvalidArgument(format!(
                "column {} does not belong to table {} of constraint {}",
                column.full_name(),
                self.table,
                self.name
            )));
        }

        self.columns.push(TableConstraintColumn {
            column: column.clone(),
            key_ordinal: self.columns.len() + 1,
        });
        Ok(())
    }

    /// Handle of the constrained table.
    pub fn table(&self) -> &TableName {
        &self.table
    }

    /// Constraint name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Constraint kind.
    pub fn kind(&self) -> TableConstraintType {
        self.kind
    }

    /// Constraint columns, in key order.
    pub fn columns(&self) -> &[TableConstraintColumn] {
        &self.columns
    }

    /// Check if this is the primary key.
    pub fn is_primary_key(&self) -> bool {
        self.kind == TableConstraintType::PrimaryKey
    }

    /// Check if this constraint enforces uniqueness.
    pub fn is_unique(&self) -> bool {
        matches!(
            self.kind,
            TableConstraintType::PrimaryKey | TableConstraintType::Unique
        )
    }
}
