//! Table definitions.

use super::column::Column;
use super::constraint::{TableConstraint, TableConstraintType};
use super::index::{Index, SortSequence};
use super::relation::ForeignKey;
use super::state::{ObjectState, PartialObject};
use super::types::ColumnDataType;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fully-qualified table name.
///
/// The schema may itself be dotted (`CATALOG.SCHEMA`). Ordering is by schema,
/// then name, and doubles as the global lock order for concurrent updates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TableName {
    /// Owning schema, if the database has schemas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Table name within the schema.
    pub name: String,
}

impl TableName {
    /// Create a schema-qualified name.
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }

    /// Create a name without a schema.
    pub fn unqualified(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    /// Parse a dotted name. The last segment is the table name.
    pub fn parse(full_name: &str) -> Option<Self> {
        match full_name.rsplit_once('.') {
            Some((schema, name)) if !schema.is_empty() && !name.is_empty() => {
                Some(Self::new(schema, name))
            }
            Some(_) => None,
            None if full_name.is_empty() => None,
            None => Some(Self::unqualified(full_name)),
        }
    }

    /// Fully-qualified name, `schema.name` or just `name`.
    pub fn full_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Kind of relation object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableType {
    /// Base table.
    #[default]
    Table,
    /// View.
    View,
    /// Anything else the database reports.
    Unknown,
}

/// A table in the catalog.
///
/// Owns its columns, indexes and constraints. Foreign keys and weak
/// associations are recorded on both participating tables.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: TableName,
    state: ObjectState,
    columns: Vec<Column>,
    indexes: Vec<Index>,
    constraints: Vec<TableConstraint>,
    foreign_keys: Vec<ForeignKey>,
    weak_associations: Vec<ForeignKey>,
    /// Table or view.
    pub table_type: TableType,
    /// Free-form remarks from the database.
    pub remarks: Option<String>,
}

impl Table {
    /// Create a fully retrieved table.
    pub fn new(name: TableName) -> Self {
        Self {
            name,
            state: ObjectState::Full,
            columns: Vec::new(),
            indexes: Vec::new(),
            constraints: Vec::new(),
            foreign_keys: Vec::new(),
            weak_associations: Vec::new(),
            table_type: TableType::Table,
            remarks: None,
        }
    }

    /// Create a placeholder for a table outside the crawl scope.
    pub fn partial(name: TableName) -> Self {
        Self {
            state: ObjectState::Partial,
            table_type: TableType::Unknown,
            ..Self::new(name)
        }
    }

    /// Add a column with the given name and type.
    pub fn with_column(mut self, name: impl Into<String>, data_type: ColumnDataType) -> Self {
        let column = Column::new(&self.name, name, data_type);
        self.attach_column(column);
        self
    }

    /// Add a generated (computed) column.
    pub fn with_generated_column(
        mut self,
        name: impl Into<String>,
        data_type: ColumnDataType,
    ) -> Self {
        let column = Column::new(&self.name, name, data_type).with_generated(true);
        self.attach_column(column);
        self
    }

    /// Set the table type.
    pub fn with_table_type(mut self, table_type: TableType) -> Self {
        self.table_type = table_type;
        self
    }

    /// Add a column created for this table.
    pub fn add_column(&mut self, column: Column) -> Result<(), Error> {
        if column.table() != &self.name {
            return Err(Error::InvalidArgument(format!(
                "column {} does not belong to table {}",
                column.full_name(),
                self.name
            )));
        }
        if self.column(column.name()).is_some() {
            return Err(Error::InvalidArgument(format!(
                "duplicate column {}",
                column.full_name()
            )));
        }
        self.attach_column(column);
        Ok(())
    }

    /// Add an index over the named columns, in the given order.
    pub fn add_index(
        &mut self,
        name: impl Into<String>,
        unique: bool,
        column_names: &[&str],
    ) -> Result<(), Error> {
        let mut index = Index::new(&self.name, name, unique);
        for column_name in column_names {
            let column = self.require_column(column_name)?;
            index.push_column(column, SortSequence::Ascending)?;
        }
        self.push_index(index)
    }

    /// Add a prebuilt index.
    pub fn push_index(&mut self, index: Index) -> Result<(), Error> {
        if index.table() != &self.name {
            return Err(Error::InvalidArgument(format!(
                "index {} does not belong to table {}",
                index.name(),
                self.name
            )));
        }
        if self.is_partial() {
            return Err(Error::InvalidArgument(format!(
                "partial table {} cannot carry indexes",
                self.name
            )));
        }
        self.indexes.push(index);
        Ok(())
    }

    /// Add a constraint over the named columns.
    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        kind: TableConstraintType,
        column_names: &[&str],
    ) -> Result<(), Error> {
        let mut constraint = TableConstraint::new(&self.name, name, kind);
        for column_name in column_names {
            let column = self.require_column(column_name)?;
            constraint.push_column(column)?;
        }
        self.push_constraint(constraint)
    }

    /// Add a prebuilt constraint.
    pub fn push_constraint(&mut self, constraint: TableConstraint) -> Result<(), Error> {
        if constraint.table() != &self.name {
            return Err(Error::InvalidArgument(format!(
                "constraint {} does not belong to table {}",
                constraint.name(),
                self.name
            )));
        }
        self.constraints.push(constraint);
        Ok(())
    }

    /// Qualified name.
    pub fn name(&self) -> &TableName {
        &self.name
    }

    /// Fully-qualified name as a string.
    pub fn full_name(&self) -> String {
        self.name.full_name()
    }

    /// Columns in ordinal order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// All indexes.
    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    /// Unique indexes only.
    pub fn unique_indexes(&self) -> impl Iterator<Item = &Index> {
        self.indexes.iter().filter(|i| i.unique)
    }

    /// Get an index by name.
    pub fn index(&self, name: &str) -> Option<&Index> {
        self.indexes.iter().find(|i| i.name() == name)
    }

    /// Table constraints, excluding foreign keys.
    pub fn constraints(&self) -> &[TableConstraint] {
        &self.constraints
    }

    /// The primary key constraint, if any.
    pub fn primary_key(&self) -> Option<&TableConstraint> {
        self.constraints.iter().find(|c| c.is_primary_key())
    }

    /// Declared foreign keys in which this table takes part, on either side.
    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    /// Foreign keys in which this table is the referencing side.
    pub fn imported_foreign_keys(&self) -> impl Iterator<Item = &ForeignKey> {
        self.foreign_keys
            .iter()
            .filter(|fk| fk.foreign_key_table() == Some(&self.name))
    }

    /// Foreign keys in which this table is the referenced side.
    pub fn exported_foreign_keys(&self) -> impl Iterator<Item = &ForeignKey> {
        self.foreign_keys
            .iter()
            .filter(|fk| fk.primary_key_table() == Some(&self.name))
    }

    /// Weak associations in which this table takes part, on either side.
    pub fn weak_associations(&self) -> &[ForeignKey] {
        &self.weak_associations
    }

    /// Weak associations in which this table is the referencing side.
    pub fn imported_weak_associations(&self) -> impl Iterator<Item = &ForeignKey> {
        self.weak_associations
            .iter()
            .filter(|wa| wa.foreign_key_table() == Some(&self.name))
    }

    /// Weak associations in which this table is the referenced side.
    pub fn exported_weak_associations(&self) -> impl Iterator<Item = &ForeignKey> {
        self.weak_associations
            .iter()
            .filter(|wa| wa.primary_key_table() == Some(&self.name))
    }

    pub(crate) fn add_foreign_key(&mut self, foreign_key: ForeignKey) {
        if !self.foreign_keys.contains(&foreign_key) {
            self.foreign_keys.push(foreign_key);
        }
    }

    /// Record a weak association. Returns false if an identical one exists.
    pub(crate) fn add_weak_association(&mut self, association: ForeignKey) -> bool {
        if self.weak_associations.contains(&association) {
            return false;
        }
        self.weak_associations.push(association);
        true
    }

    /// Carry relationships recorded on a placeholder over to this table.
    pub(crate) fn absorb_relationships(&mut self, placeholder: Table) {
        for foreign_key in placeholder.foreign_keys {
            self.add_foreign_key(foreign_key);
        }
        for association in placeholder.weak_associations {
            self.add_weak_association(association);
        }
    }

    pub(crate) fn column_or_placeholder(&mut self, name: &str) -> Option<&Column> {
        if self.column(name).is_none() {
            if !self.is_partial() {
                return None;
            }
            let placeholder = Column::partial(&self.name, name);
            self.attach_column(placeholder);
        }
        self.column(name)
    }

    fn attach_column(&mut self, mut column: Column) {
        column.attach(self.columns.len() + 1, self.state);
        self.columns.push(column);
    }

    fn require_column(&self, name: &str) -> Result<&Column, Error> {
        self.column(name).ok_or_else(|| {
            Error::InvalidArgument(format!("no column {} in table {}", name, self.name))
        })
    }
}

impl PartialObject for Table {
    fn object_state(&self) -> ObjectState {
        self.state
    }
}
