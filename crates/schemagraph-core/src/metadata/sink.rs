//! Concurrent collection of weak associations.

use super::weak::build_weak_association;
use crate::catalog::{Catalog, ColumnRef, ForeignKey, TableName};
use crate::error::Error;
use parking_lot::{Mutex, MutexGuard};
use std::collections::BTreeMap;
use tracing::debug;

/// Collects weak associations from many threads, then merges them into the
/// catalog.
///
/// Each table has its own lock. Recording an association locks both endpoint
/// tables in [`TableName`] order, so concurrent recorders never deadlock.
pub struct WeakAssociationSink {
    tables: BTreeMap<TableName, Mutex<Vec<ForeignKey>>>,
}

impl WeakAssociationSink {
    /// Create a sink with one slot per table in the catalog.
    pub fn new(catalog: &Catalog) -> Self {
        let tables = catalog
            .tables()
            .map(|t| (t.name().clone(), Mutex::new(Vec::new())))
            .collect();
        Self { tables }
    }

    /// Build and record the association from `foreign_key_column` to
    /// `primary_key_column`.
    ///
    /// Returns the association name, or `None` when both columns are partial.
    pub fn record(
        &self,
        catalog: &Catalog,
        primary_key_column: &ColumnRef,
        foreign_key_column: &ColumnRef,
    ) -> Result<Option<String>, Error> {
        let Some(association) =
            build_weak_association(catalog, primary_key_column, foreign_key_column)?
        else {
            return Ok(None);
        };
        let name = association.name().to_string();

        let pk_table = &primary_key_column.table;
        let fk_table = &foreign_key_column.table;
        if pk_table == fk_table {
            let mut slot = self.lock(pk_table)?;
            push_once(&mut slot, association);
            return Ok(Some(name));
        }

        let (first, second) = if pk_table < fk_table {
            (pk_table, fk_table)
        } else {
            (fk_table, pk_table)
        };
        let mut first = self.lock(first)?;
        let mut second = self.lock(second)?;
        push_once(&mut first, association.clone());
        push_once(&mut second, association);

        Ok(Some(name))
    }

    /// Number of distinct associations recorded so far.
    pub fn len(&self) -> usize {
        self.tables
            .iter()
            .map(|(name, slot)| {
                slot.lock()
                    .iter()
                    .filter(|a| a.foreign_key_table() == Some(name))
                    .count()
            })
            .sum()
    }

    /// Check if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record every collected association on its tables.
    ///
    /// Returns the number of associations that were not already present.
    pub fn merge_into(self, catalog: &mut Catalog) -> usize {
        let mut created = 0;
        for (name, slot) in self.tables {
            let Some(table) = catalog.table_mut(&name) else {
                continue;
            };
            for association in slot.into_inner() {
                let imported = association.foreign_key_table() == Some(&name);
                if table.add_weak_association(association) && imported {
                    created += 1;
                }
            }
        }
        debug!(created, "Merged weak associations");
        created
    }

    fn lock(&self, table: &TableName) -> Result<MutexGuard<'_, Vec<ForeignKey>>, Error> {
        self.tables
            .get(table)
            .map(|slot| slot.lock())
            .ok_or_else(|| Error::TableNotFound(table.full_name()))
    }
}

fn push_once(associations: &mut Vec<ForeignKey>, association: ForeignKey) {
    if !associations.contains(&association) {
        associations.push(association);
    }
}
