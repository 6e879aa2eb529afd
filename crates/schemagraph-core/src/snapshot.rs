//! Serialized catalog snapshots.
//!
//! A snapshot is the JSON form of one crawl: tables with their columns,
//! indexes and constraints, declared foreign keys, and the column pairs
//! proposed as weak associations.

use crate::catalog::{
    Catalog, Column, ColumnDataType, ColumnReference, ForeignKey, ForeignKeyRule, Index,
    IndexType, PartialObject, SortSequence, SqlTypeGroup, Table, TableConstraint,
    TableConstraintType, TableName, TableType,
};
use crate::error::Error;
use crate::metadata::WeakAssociationCandidate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// One crawl, ready to be built into a [`Catalog`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// When the crawl ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crawled_at: Option<DateTime<Utc>>,

    /// Label of the crawled database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Tables, full and partial.
    #[serde(default)]
    pub tables: Vec<TableSnapshot>,

    /// Declared foreign keys.
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeySnapshot>,

    /// Column pairs to turn into weak associations.
    #[serde(default)]
    pub weak_associations: Vec<WeakAssociationCandidate>,
}

/// A table entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub name: String,
    /// Placeholder for a table outside the crawl.
    #[serde(default, skip_serializing_if = "is_false")]
    pub partial: bool,
    #[serde(default)]
    pub table_type: TableType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default)]
    pub columns: Vec<ColumnSnapshot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<IndexSnapshot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<ConstraintSnapshot>,
}

/// A column entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSnapshot {
    pub name: String,
    /// Database type name.
    #[serde(rename = "type", default)]
    pub type_name: String,
    /// Type group; derived from the type name when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_group: Option<SqlTypeGroup>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub generated: bool,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub auto_incremented: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// An index entry. Columns are listed by name, in index order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub name: String,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub index_type: IndexType,
    pub columns: Vec<String>,
    /// Columns sorted descending; all others are ascending.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub descending: Vec<String>,
}

/// A table constraint entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSnapshot {
    pub name: String,
    pub kind: TableConstraintType,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

/// A declared foreign key entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeySnapshot {
    pub name: String,
    pub columns: Vec<ColumnReference>,
    #[serde(default)]
    pub update_rule: ForeignKeyRule,
    #[serde(default)]
    pub delete_rule: ForeignKeyRule,
    #[serde(default, skip_serializing_if = "is_false")]
    pub deferrable: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn default_true() -> bool {
    true
}

impl CatalogSnapshot {
    /// Parse a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build a catalog from the tables and foreign keys.
    ///
    /// A full table listed twice is an [`Error::InvalidArgument`]. Weak
    /// association candidates are left for
    /// [`infer_weak_associations`](crate::metadata::infer_weak_associations).
    pub fn into_catalog(self) -> Result<Catalog, Error> {
        let mut catalog = Catalog::new();
        catalog.database = self.database;
        catalog.crawled_at = self.crawled_at;

        for table in self.tables {
            catalog.add_table(table.into_table()?)?;
        }
        for foreign_key in self.foreign_keys {
            catalog.add_foreign_key(foreign_key.into_foreign_key())?;
        }

        debug!(
            tables = catalog.len(),
            partial = catalog.partial_tables().count(),
            "Built catalog from snapshot"
        );
        Ok(catalog)
    }
}

impl TableSnapshot {
    fn into_table(self) -> Result<Table, Error> {
        let name = match self.schema {
            Some(schema) => TableName::new(schema, self.name),
            None => TableName::unqualified(self.name),
        };
        let mut table = if self.partial {
            Table::partial(name.clone())
        } else {
            Table::new(name.clone()).with_table_type(self.table_type)
        };
        table.remarks = self.remarks;

        for column in self.columns {
            let data_type = match column.type_group {
                Some(group) => ColumnDataType::with_group(column.type_name, group),
                None => ColumnDataType::new(column.type_name),
            };
            let mut built = Column::new(&name, column.name, data_type)
                .with_generated(column.generated)
                .with_nullable(column.nullable)
                .with_auto_incremented(column.auto_incremented);
            built.remarks = column.remarks;
            table.add_column(built)?;
        }

        for index in self.indexes {
            let mut built =
                Index::new(&name, index.name, index.unique).with_index_type(index.index_type);
            for column_name in &index.columns {
                let sort_sequence = if index.descending.contains(column_name) {
                    SortSequence::Descending
                } else {
                    SortSequence::Ascending
                };
                built.push_column(require_column(&table, column_name)?, sort_sequence)?;
            }
            table.push_index(built)?;
        }

        for constraint in self.constraints {
            let mut built = TableConstraint::new(&name, constraint.name, constraint.kind);
            if let Some(definition) = constraint.definition {
                built = built.with_definition(definition);
            }
            for column_name in &constraint.columns {
                built.push_column(require_column(&table, column_name)?)?;
            }
            table.push_constraint(built)?;
        }

        Ok(table)
    }

    fn from_table(table: &Table) -> Self {
        let name = table.name();
        Self {
            schema: name.schema.clone(),
            name: name.name.clone(),
            partial: table.is_partial(),
            table_type: table.table_type,
            remarks: table.remarks.clone(),
            columns: table
                .columns()
                .iter()
                .map(|c| ColumnSnapshot {
                    name: c.name().to_string(),
                    type_name: c.data_type.name.clone(),
                    type_group: Some(c.data_type.group),
                    generated: c.generated,
                    nullable: c.nullable,
                    auto_incremented: c.auto_incremented,
                    remarks: c.remarks.clone(),
                })
                .collect(),
            indexes: table
                .indexes()
                .iter()
                .map(|i| IndexSnapshot {
                    name: i.name().to_string(),
                    unique: i.unique,
                    index_type: i.index_type,
                    columns: i.iter_columns().map(|c| c.name().to_string()).collect(),
                    descending: i
                        .columns()
                        .iter()
                        .filter(|c| c.sort_sequence == SortSequence::Descending)
                        .map(|c| c.column().name().to_string())
                        .collect(),
                })
                .collect(),
            constraints: table
                .constraints()
                .iter()
                .map(|c| ConstraintSnapshot {
                    name: c.name().to_string(),
                    kind: c.kind(),
                    columns: c
                        .columns()
                        .iter()
                        .map(|col| col.column().name().to_string())
                        .collect(),
                    definition: c.definition.clone(),
                })
                .collect(),
        }
    }
}

fn require_column<'a>(table: &'a Table, name: &str) -> Result<&'a Column, Error> {
    table.column(name).ok_or_else(|| {
        Error::InvalidArgument(format!("no column {} in table {}", name, table.name()))
    })
}

impl ForeignKeySnapshot {
    fn into_foreign_key(self) -> ForeignKey {
        let mut foreign_key =
            ForeignKey::new(self.name).with_rules(self.update_rule, self.delete_rule);
        foreign_key.deferrable = self.deferrable;
        for reference in self.columns {
            foreign_key.push_reference(reference.primary_key_column, reference.foreign_key_column);
        }
        foreign_key
    }

    fn from_foreign_key(foreign_key: &ForeignKey) -> Self {
        Self {
            name: foreign_key.name().to_string(),
            columns: foreign_key.column_references().to_vec(),
            update_rule: foreign_key.update_rule,
            delete_rule: foreign_key.delete_rule,
            deferrable: foreign_key.deferrable,
        }
    }
}

impl Catalog {
    /// Capture the catalog as a snapshot.
    ///
    /// Weak associations are written back as candidates, so reloading and
    /// running inference reproduces them.
    pub fn to_snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            crawled_at: self.crawled_at,
            database: self.database.clone(),
            tables: self.tables().map(TableSnapshot::from_table).collect(),
            foreign_keys: self
                .foreign_keys()
                .into_iter()
                .map(ForeignKeySnapshot::from_foreign_key)
                .collect(),
            weak_associations: self
                .weak_associations()
                .into_iter()
                .flat_map(|wa| wa.column_references())
                .map(|r| {
                    WeakAssociationCandidate::new(
                        r.primary_key_column.clone(),
                        r.foreign_key_column.clone(),
                    )
                })
                .collect(),
        }
    }
}

/// Read a named input resource.
///
/// Returns `None` if the file does not exist; other read failures are errors.
pub fn read_resource(path: impl AsRef<Path>) -> Result<Option<String>, Error> {
    match fs::read_to_string(path.as_ref()) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Load a snapshot file. A missing file gives an empty snapshot.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<CatalogSnapshot, Error> {
    let path = path.as_ref();
    match read_resource(path)? {
        Some(json) => CatalogSnapshot::from_json(&json),
        None => {
            warn!(path = %path.display(), "Snapshot not found, using an empty catalog");
            Ok(CatalogSnapshot::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::infer_weak_associations;
    use std::io::Write;

    const SALES: &str = r#"{
        "database": "sales",
        "tables": [
            {
                "schema": "SALES",
                "name": "CUSTOMERS",
                "columns": [
                    {"name": "ID", "type": "INTEGER", "nullable": false},
                    {"name": "NAME", "type": "VARCHAR(100)"},
                    {"name": "PHOTO", "type": "BLOB"}
                ],
                "indexes": [
                    {"name": "PK_CUSTOMERS", "unique": true, "columns": ["ID"]}
                ],
                "constraints": [
                    {"name": "PK_CUSTOMERS", "kind": "primary_key", "columns": ["ID"]}
                ]
            },
            {
                "schema": "SALES",
                "name": "ORDERS",
                "columns": [
                    {"name": "ID", "type": "INTEGER"},
                    {"name": "CUST_ID", "type": "INTEGER"},
                    {"name": "REGION_ID", "type": "INTEGER"}
                ]
            }
        ],
        "foreign_keys": [
            {
                "name": "FK_ORDERS_REGION",
                "columns": [
                    {
                        "primary_key_column": "GEO.REGIONS.ID",
                        "foreign_key_column": "SALES.ORDERS.REGION_ID"
                    }
                ],
                "delete_rule": "cascade"
            }
        ],
        "weak_associations": [
            {
                "primary_key_column": "SALES.CUSTOMERS.ID",
                "foreign_key_column": "SALES.ORDERS.CUST_ID"
            }
        ]
    }"#;

    #[test]
    fn test_into_catalog() {
        let catalog = CatalogSnapshot::from_json(SALES).unwrap().into_catalog().unwrap();

        assert_eq!(catalog.database.as_deref(), Some("sales"));
        assert_eq!(catalog.full_tables().count(), 2);
        assert_eq!(catalog.partial_tables().count(), 1);

        let customers = catalog.table_by_full_name("SALES.CUSTOMERS").unwrap();
        let group = |name: &str| customers.column(name).unwrap().data_type.group;
        assert_eq!(group("PHOTO"), SqlTypeGroup::LargeObject);
        assert_eq!(group("NAME"), SqlTypeGroup::Character);
        assert!(!customers.column("ID").unwrap().nullable);
        assert!(customers.primary_key().is_some());

        let orders = catalog.table_by_full_name("SALES.ORDERS").unwrap();
        let fk = orders.imported_foreign_keys().next().unwrap();
        assert_eq!(fk.delete_rule, ForeignKeyRule::Cascade);
        assert_eq!(fk.column_references()[0].key_sequence, 1);
        assert!(catalog.weak_associations().is_empty());
    }

    #[test]
    fn test_round_trip_with_weak_associations() {
        let snapshot = CatalogSnapshot::from_json(SALES).unwrap();
        let candidates = snapshot.weak_associations.clone();
        let mut catalog = snapshot.into_catalog().unwrap();
        infer_weak_associations(&mut catalog, &candidates);

        let json = catalog.to_snapshot().to_json().unwrap();
        let reloaded = CatalogSnapshot::from_json(&json).unwrap();
        assert_eq!(reloaded.weak_associations, candidates);

        let candidates = reloaded.weak_associations.clone();
        let mut rebuilt = reloaded.into_catalog().unwrap();
        infer_weak_associations(&mut rebuilt, &candidates);
        assert_eq!(rebuilt, catalog);
    }

    #[test]
    fn test_unknown_index_column_fails() {
        let json = r#"{"tables": [{"name": "T", "columns": [{"name": "A"}],
            "indexes": [{"name": "I", "columns": ["B"]}]}]}"#;
        let result = CatalogSnapshot::from_json(json).unwrap().into_catalog();

        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_duplicate_table_fails() {
        let json = r#"{"tables": [
            {"schema": "S", "name": "T", "columns": [{"name": "A"}]},
            {"schema": "S", "name": "T", "columns": [{"name": "B"}]}
        ]}"#;
        let result = CatalogSnapshot::from_json(json).unwrap().into_catalog();

        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            CatalogSnapshot::from_json("{\"tables\": 3}"),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_load_snapshot_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SALES.as_bytes()).unwrap();

        let snapshot = load_snapshot(file.path()).unwrap();
        assert_eq!(snapshot.tables.len(), 2);
    }

    #[test]
    fn test_missing_resource_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        assert_eq!(read_resource(&path).unwrap(), None);
        assert_eq!(load_snapshot(&path).unwrap(), CatalogSnapshot::default());
    }
}
