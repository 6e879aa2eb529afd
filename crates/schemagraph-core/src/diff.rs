//! Catalog diffing.
//!
//! Compares two crawls of the same database and reports what changed.
//! Only fully retrieved tables take part; placeholders are not crawl results.

use crate::catalog::{Catalog, ColumnRef, ForeignKey, Table, TableName};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Differences between two catalogs, ordered by table name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogDiff {
    /// Changes to tables.
    pub table_changes: Vec<TableChange>,
}

impl CatalogDiff {
    /// Compute the diff from one catalog to another.
    pub fn compute(from: &Catalog, to: &Catalog) -> Self {
        let from_tables: BTreeMap<_, _> = from.full_tables().map(|t| (t.name(), t)).collect();
        let to_tables: BTreeMap<_, _> = to.full_tables().map(|t| (t.name(), t)).collect();

        let from_names: BTreeSet<_> = from_tables.keys().copied().collect();
        let to_names: BTreeSet<_> = to_tables.keys().copied().collect();

        let mut table_changes = Vec::new();
        for name in from_names.union(&to_names) {
            match (from_tables.get(name), to_tables.get(name)) {
                (None, Some(_)) => table_changes.push(TableChange::Added(name.full_name())),
                (Some(_), None) => table_changes.push(TableChange::Removed(name.full_name())),
                (Some(from_table), Some(to_table)) => {
                    if let Some(change) = Self::diff_table(name, from_table, to_table) {
                        table_changes.push(change);
                    }
                }
                (None, None) => {}
            }
        }

        CatalogDiff { table_changes }
    }

    /// Check if there are any changes.
    pub fn is_empty(&self) -> bool {
        self.table_changes.is_empty()
    }

    /// Get the total number of changes, counting each nested change.
    pub fn change_count(&self) -> usize {
        self.table_changes
            .iter()
            .map(|change| match change {
                TableChange::Modified {
                    column_changes,
                    index_changes,
                    foreign_key_changes,
                    weak_association_changes,
                    ..
                } => {
                    column_changes.len()
                        + index_changes.len()
                        + foreign_key_changes.len()
                        + weak_association_changes.len()
                }
                _ => 1,
            })
            .sum()
    }

    fn diff_table(name: &TableName, from: &Table, to: &Table) -> Option<TableChange> {
        let column_changes = Self::diff_columns(from, to);
        let index_changes = Self::diff_indexes(from, to);
        let foreign_key_changes = Self::diff_foreign_keys(from, to);
        let weak_association_changes = Self::diff_weak_associations(from, to);

        if column_changes.is_empty()
            && index_changes.is_empty()
            && foreign_key_changes.is_empty()
            && weak_association_changes.is_empty()
        {
            return None;
        }

        Some(TableChange::Modified {
            table_name: name.full_name(),
            column_changes,
            index_changes,
            foreign_key_changes,
            weak_association_changes,
        })
    }

    fn diff_columns(from: &Table, to: &Table) -> Vec<ColumnChange> {
        let mut changes = Vec::new();

        let from_map: BTreeMap<_, _> = from.columns().iter().map(|c| (c.name(), c)).collect();
        let to_map: BTreeMap<_, _> = to.columns().iter().map(|c| (c.name(), c)).collect();

        let from_names: BTreeSet<_> = from_map.keys().copied().collect();
        let to_names: BTreeSet<_> = to_map.keys().copied().collect();

        for name in to_names.difference(&from_names) {
            changes.push(ColumnChange::Added(name.to_string()));
        }

        for name in from_names.difference(&to_names) {
            changes.push(ColumnChange::Removed(name.to_string()));
        }

        for name in from_names.intersection(&to_names) {
            let from_column = from_map[name];
            let to_column = to_map[name];

            if from_column.data_type.name != to_column.data_type.name {
                changes.push(ColumnChange::TypeChanged {
                    column_name: name.to_string(),
                    from_type: from_column.data_type.name.clone(),
                    to_type: to_column.data_type.name.clone(),
                });
            }

            if from_column.nullable != to_column.nullable {
                changes.push(ColumnChange::NullableChanged {
                    column_name: name.to_string(),
                    from_nullable: from_column.nullable,
                    to_nullable: to_column.nullable,
                });
            }
        }

        changes
    }

    fn diff_indexes(from: &Table, to: &Table) -> Vec<IndexChange> {
        let mut changes = Vec::new();

        let from_map: BTreeMap<_, _> = from.indexes().iter().map(|i| (i.name(), i)).collect();
        let to_map: BTreeMap<_, _> = to.indexes().iter().map(|i| (i.name(), i)).collect();

        let from_names: BTreeSet<_> = from_map.keys().copied().collect();
        let to_names: BTreeSet<_> = to_map.keys().copied().collect();

        for name in to_names.difference(&from_names) {
            changes.push(IndexChange::Added(name.to_string()));
        }

        for name in from_names.difference(&to_names) {
            changes.push(IndexChange::Removed(name.to_string()));
        }

        for name in from_names.intersection(&to_names) {
            let from_index = from_map[name];
            let to_index = to_map[name];
            let from_columns: Vec<String> =
                from_index.iter_columns().map(|c| c.name().to_string()).collect();
            let to_columns: Vec<String> =
                to_index.iter_columns().map(|c| c.name().to_string()).collect();

            if from_columns != to_columns || from_index.unique != to_index.unique {
                changes.push(IndexChange::Modified {
                    index_name: name.to_string(),
                    from_columns,
                    to_columns,
                    from_unique: from_index.unique,
                    to_unique: to_index.unique,
                });
            }
        }

        changes
    }

    fn diff_foreign_keys(from: &Table, to: &Table) -> Vec<RelationshipChange> {
        let from_keys: BTreeSet<_> = from.imported_foreign_keys().map(ForeignKey::name).collect();
        let to_keys: BTreeSet<_> = to.imported_foreign_keys().map(ForeignKey::name).collect();

        let mut changes = Vec::new();
        for name in to_keys.difference(&from_keys) {
            changes.push(RelationshipChange::Added {
                name: name.to_string(),
                column_pair: None,
            });
        }
        for name in from_keys.difference(&to_keys) {
            changes.push(RelationshipChange::Removed {
                name: name.to_string(),
                column_pair: None,
            });
        }
        changes
    }

    fn diff_weak_associations(from: &Table, to: &Table) -> Vec<RelationshipChange> {
        let from_pairs = weak_association_pairs(from);
        let to_pairs = weak_association_pairs(to);

        let mut changes = Vec::new();
        for (name, pair) in to_pairs.difference(&from_pairs) {
            changes.push(RelationshipChange::Added {
                name: name.to_string(),
                column_pair: Some(pair.clone()),
            });
        }
        for (name, pair) in from_pairs.difference(&to_pairs) {
            changes.push(RelationshipChange::Removed {
                name: name.to_string(),
                column_pair: Some(pair.clone()),
            });
        }
        changes
    }
}

/// Weak associations imported by a table, keyed by name and column pair.
fn weak_association_pairs(table: &Table) -> BTreeSet<(&str, ColumnPair)> {
    table
        .imported_weak_associations()
        .flat_map(|wa| {
            wa.column_references().iter().map(move |r| {
                (
                    wa.name(),
                    ColumnPair {
                        primary_key_column: r.primary_key_column.clone(),
                        foreign_key_column: r.foreign_key_column.clone(),
                    },
                )
            })
        })
        .collect()
}

/// Change to a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableChange {
    /// Table appeared in the newer crawl.
    Added(String),
    /// Table is gone from the newer crawl.
    Removed(String),
    /// Table exists in both crawls with differences.
    Modified {
        /// Full name of the table.
        table_name: String,
        /// Changes to columns.
        column_changes: Vec<ColumnChange>,
        /// Changes to indexes.
        index_changes: Vec<IndexChange>,
        /// Changes to imported foreign keys.
        foreign_key_changes: Vec<RelationshipChange>,
        /// Changes to imported weak associations.
        weak_association_changes: Vec<RelationshipChange>,
    },
}

impl TableChange {
    /// Get the table name for this change.
    pub fn table_name(&self) -> &str {
        match self {
            TableChange::Added(name) => name,
            TableChange::Removed(name) => name,
            TableChange::Modified { table_name, .. } => table_name,
        }
    }
}

/// Change to a column within a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnChange {
    /// Column was added.
    Added(String),
    /// Column was removed.
    Removed(String),
    /// Column type name changed.
    TypeChanged {
        column_name: String,
        from_type: String,
        to_type: String,
    },
    /// Column nullability changed.
    NullableChanged {
        column_name: String,
        from_nullable: bool,
        to_nullable: bool,
    },
}

/// Change to an index within a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexChange {
    /// Index was added.
    Added(String),
    /// Index was removed.
    Removed(String),
    /// Index columns or uniqueness changed.
    Modified {
        index_name: String,
        from_columns: Vec<String>,
        to_columns: Vec<String>,
        from_unique: bool,
        to_unique: bool,
    },
}

/// Referenced and referencing column of a weak association.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ColumnPair {
    pub primary_key_column: ColumnRef,
    pub foreign_key_column: ColumnRef,
}

/// A foreign key or weak association that appeared or disappeared.
///
/// Weak associations carry their column pair, since several pairs between
/// the same two tables share one name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipChange {
    /// Relationship was added.
    Added {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        column_pair: Option<ColumnPair>,
    },
    /// Relationship was removed.
    Removed {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        column_pair: Option<ColumnPair>,
    },
}
