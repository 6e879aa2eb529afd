//! Index definitions.

use super::column::{AsColumn, Column};
use super::state::PartialObject;
use super::table::TableName;
use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Sort order of an index column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortSequence {
    /// Ascending order.
    #[default]
    Ascending,
    /// Descending order.
    Descending,
    /// Not reported by the database.
    Unknown,
}

/// Physical index kind as reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexType {
    /// Clustered index.
    Clustered,
    /// Hashed index.
    Hashed,
    /// Any other index kind.
    Other,
    /// Not reported.
    #[default]
    Unknown,
}

/// A column participating in an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexColumn {
    column: Column,
    index_ordinal: usize,
    /// Sort order within the index.
    pub sort_sequence: SortSequence,
}

impl IndexColumn {
    /// The table column.
    pub fn column(&self) -> &Column {
        &self.column
    }

    /// 1-based position within the index.
    pub fn index_ordinal(&self) -> usize {
        self.index_ordinal
    }
}

impl AsColumn for IndexColumn {
    fn as_column(&self) -> &Column {
        &self.column
    }
}

/// An index on a table. Column order is significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    table: TableName,
    name: String,
    columns: Vec<IndexColumn>,
    /// Whether the index enforces uniqueness.
    pub unique: bool,
    /// Physical index kind.
    pub index_type: IndexType,
}

impl Index {
    /// Create an empty index on the given table.
    pub fn new(table: &TableName, name: impl Into<String>, unique: bool) -> Self {
        Self {
            table: table.clone(),
            name: name.into(),
            columns: Vec::new(),
            unique,
            index_type: IndexType::Unknown,
        }
    }

    /// Set the index type.
    pub fn with_index_type(mut self, index_type: IndexType) -> Self {
        self.index_type = index_type;
        self
    }

    /// Append a column.
    ///
    /// The column must belong to the indexed table and must not be partial.
    pub fn push_column(
        &mut self,
        column: &Column,
        sort_sequence: SortSequence,
    ) -> Result<(), Error> {
        if column.table() != &self.table {
            return Err(Error::InvalidArgument(format!(
                "column {} does not belong to table {} of index {}",
                column.full_name(),
                self.table,
                self.name
            )));
        }
        if column.is_partial() {
            return Err(Error::InvalidArgument(format!(
                "cannot index partial column {}",
                column.full_name()
            )));
        }

        self.columns.push(IndexColumn {
            column: column.clone(),
            index_ordinal: self.columns.len() + 1,
            sort_sequence,
        });
        Ok(())
    }

    /// Handle of the indexed table.
    pub fn table(&self) -> &TableName {
        &self.table
    }

    /// Index name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index columns, in index order.
    pub fn columns(&self) -> &[IndexColumn] {
        &self.columns
    }

    /// Iterate the underlying table columns, in index order.
    pub fn iter_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().map(IndexColumn::column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ColumnDataType;

    #[test]
    fn test_index_column_order() {
        let table = TableName::new("HR", "EMP");
        let first = Column::new(&table, "LAST_NAME", ColumnDataType::new("VARCHAR"));
        let second = Column::new(&table, "FIRST_NAME", ColumnDataType::new("VARCHAR"));

        let mut index = Index::new(&table, "IDX_NAME", false);
        index.push_column(&first, SortSequence::Ascending).unwrap();
        index.push_column(&second, SortSequence::Descending).unwrap();

        let names: Vec<_> = index.iter_columns().map(|c| c.name()).collect();
        assert_eq!(names, vec!["LAST_NAME", "FIRST_NAME"]);
        assert_eq!(index.columns()[1].index_ordinal(), 2);
        assert_eq!(index.columns()[1].sort_sequence, SortSequence::Descending);
    }

    #[test]
    fn test_index_rejects_foreign_column() {
        let table = TableName::new("HR", "EMP");
        let other = TableName::new("HR", "DEPT");
        let column = Column::new(&other, "ID", ColumnDataType::new("INTEGER"));

        let mut index = Index::new(&table, "IDX", true);
        assert!(matches!(
            index.push_column(&column, SortSequence::Ascending),
            Err(Error::InvalidArgument(_))
        ));
        assert!(index.columns().is_empty());
    }
}
