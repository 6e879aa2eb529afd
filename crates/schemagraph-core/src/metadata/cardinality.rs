//! Foreign key cardinality from the unique indexes of the referencing table.

use super::columns::{column_names, foreign_key_column_names};
use crate::catalog::{Catalog, ForeignKey, ForeignKeyCardinality, PartialObject, Table};

/// Column full-name sequences of every index on a table.
///
/// Partial tables have no known indexes and give an empty list.
pub fn all_index_column_names(table: &Table) -> Vec<Vec<String>> {
    index_column_names(table, false)
}

/// Column full-name sequences of the unique indexes on a table.
pub fn unique_index_column_names(table: &Table) -> Vec<Vec<String>> {
    index_column_names(table, true)
}

fn index_column_names(table: &Table, unique_only: bool) -> Vec<Vec<String>> {
    if table.is_partial() {
        return Vec::new();
    }
    table
        .indexes()
        .iter()
        .filter(|index| !unique_only || index.unique)
        .map(|index| column_names(Some(index)))
        .collect()
}

/// Check if the referencing columns of a foreign key are exactly the columns
/// of some unique index on the referencing table, in the same order.
pub fn is_foreign_key_unique(catalog: &Catalog, foreign_key: Option<&ForeignKey>) -> bool {
    let Some(foreign_key) = foreign_key else {
        return false;
    };
    let Some(table) = foreign_key
        .foreign_key_table()
        .and_then(|name| catalog.table(name))
    else {
        return false;
    };

    let key_columns = foreign_key_column_names(Some(foreign_key));
    unique_index_column_names(table).contains(&key_columns)
}

/// Classify the referencing side of a foreign key.
///
/// A missing or empty key, or one whose first referencing column is unknown
/// or partial, is [`ForeignKeyCardinality::Unknown`]. Otherwise a unique
/// match gives [`ForeignKeyCardinality::ZeroOne`] and anything else
/// [`ForeignKeyCardinality::ZeroMany`].
pub fn find_foreign_key_cardinality(
    catalog: &Catalog,
    foreign_key: Option<&ForeignKey>,
) -> ForeignKeyCardinality {
    let Some(reference) = foreign_key.and_then(|fk| fk.column_references().first()) else {
        return ForeignKeyCardinality::Unknown;
    };

    match catalog.column(&reference.foreign_key_column) {
        Some(column) if !column.is_partial() => {
            if is_foreign_key_unique(catalog, foreign_key) {
                ForeignKeyCardinality::ZeroOne
            } else {
                ForeignKeyCardinality::ZeroMany
            }
        }
        _ => ForeignKeyCardinality::Unknown,
    }
}
