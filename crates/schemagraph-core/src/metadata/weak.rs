//! Weak associations: relationships inferred outside the database schema.
//!
//! Association names are derived from the two table names with the
//! 31-multiplier string hash over UTF-16 code units, so the same pair of
//! tables always yields the same name across runs and tools.

use crate::catalog::{Catalog, Column, ColumnRef, ForeignKey, PartialObject, TableName};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// 31-multiplier hash of a string's UTF-16 code units, wrapping at 32 bits.
pub fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

fn hex_hash(s: &str) -> String {
    format!("{:x}", string_hash(s) as u32)
}

/// Name of the weak association between two tables.
///
/// `SC_<hash of referenced table>_<hash of referencing table>`, each hash in
/// unpadded hex, all uppercase.
pub fn weak_association_name(
    primary_key_table: &TableName,
    foreign_key_table: &TableName,
) -> String {
    format!(
        "SC_{}_{}",
        hex_hash(&primary_key_table.full_name()),
        hex_hash(&foreign_key_table.full_name())
    )
    .to_uppercase()
}

/// Name of the weak association between the tables of two columns.
pub fn construct_foreign_key_name(
    primary_key_column: &Column,
    foreign_key_column: &Column,
) -> String {
    weak_association_name(primary_key_column.table(), foreign_key_column.table())
}

/// A column pair proposed as a weak association.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeakAssociationCandidate {
    /// Referenced ("one" side) column.
    pub primary_key_column: ColumnRef,
    /// Referencing ("many" side) column.
    pub foreign_key_column: ColumnRef,
}

impl WeakAssociationCandidate {
    /// Create a candidate.
    pub fn new(primary_key_column: ColumnRef, foreign_key_column: ColumnRef) -> Self {
        Self {
            primary_key_column,
            foreign_key_column,
        }
    }
}

/// Result of building one weak association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    Created(ForeignKey),
    Existing(ForeignKey),
    Skipped,
}

/// Resolve both columns and build the association without registering it.
pub(crate) fn build_weak_association(
    catalog: &Catalog,
    primary_key_column: &ColumnRef,
    foreign_key_column: &ColumnRef,
) -> Result<Option<ForeignKey>, Error> {
    let pk = resolve(catalog, primary_key_column)?;
    let fk = resolve(catalog, foreign_key_column)?;

    if pk.is_partial() && fk.is_partial() {
        debug!(
            pk_column = %primary_key_column,
            fk_column = %foreign_key_column,
            "Skipping weak association between partial columns"
        );
        return Ok(None);
    }

    Ok(Some(ForeignKey::weak(
        construct_foreign_key_name(pk, fk),
        primary_key_column.clone(),
        foreign_key_column.clone(),
    )))
}

fn resolve<'a>(catalog: &'a Catalog, column: &ColumnRef) -> Result<&'a Column, Error> {
    catalog
        .column(column)
        .ok_or_else(|| Error::InvalidArgument(format!("no column {} in catalog", column)))
}

/// Register an association on both of its tables, once for a self-reference.
///
/// Returns false if an identical association was already recorded.
pub(crate) fn register_weak_association(catalog: &mut Catalog, association: &ForeignKey) -> bool {
    let (Some(pk_table), Some(fk_table)) = (
        association.primary_key_table().cloned(),
        association.foreign_key_table().cloned(),
    ) else {
        return false;
    };

    let added = catalog
        .table_mut(&fk_table)
        .is_some_and(|table| table.add_weak_association(association.clone()));
    if pk_table != fk_table {
        if let Some(table) = catalog.table_mut(&pk_table) {
            table.add_weak_association(association.clone());
        }
    }
    added
}

pub(crate) fn apply_weak_association(
    catalog: &mut Catalog,
    primary_key_column: &ColumnRef,
    foreign_key_column: &ColumnRef,
) -> Result<Outcome, Error> {
    match build_weak_association(catalog, primary_key_column, foreign_key_column)? {
        Some(association) if register_weak_association(catalog, &association) => {
            Ok(Outcome::Created(association))
        }
        Some(association) => Ok(Outcome::Existing(association)),
        None => Ok(Outcome::Skipped),
    }
}

/// Create a weak association from `foreign_key_column` to
/// `primary_key_column` and record it on both tables.
///
/// Returns the association name, or `None` when both columns are partial.
/// Creating an association that already exists changes nothing.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if either column does not resolve in the
/// catalog.
pub fn create_weak_association(
    catalog: &mut Catalog,
    primary_key_column: &ColumnRef,
    foreign_key_column: &ColumnRef,
) -> Result<Option<String>, Error> {
    let outcome = apply_weak_association(catalog, primary_key_column, foreign_key_column)?;
    Ok(match outcome {
        Outcome::Created(association) | Outcome::Existing(association) => {
            Some(association.name().to_string())
        }
        Outcome::Skipped => None,
    })
}

/// Counts from an inference pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceSummary {
    /// New associations recorded.
    pub created: usize,
    /// Candidates that were partial on both sides, unresolvable, or already
    /// present.
    pub skipped: usize,
}

/// Create weak associations for a batch of candidates.
///
/// Unlike [`create_weak_association`], a candidate whose columns do not
/// resolve is logged and skipped so one bad pair does not abort the pass.
#[instrument(skip_all, fields(candidates = candidates.len()))]
pub fn infer_weak_associations(
    catalog: &mut Catalog,
    candidates: &[WeakAssociationCandidate],
) -> InferenceSummary {
    let mut summary = InferenceSummary::default();

    for candidate in candidates {
        match apply_weak_association(
            catalog,
            &candidate.primary_key_column,
            &candidate.foreign_key_column,
        ) {
            Ok(Outcome::Created(association)) => {
                debug!(name = association.name(), "Created weak association");
                summary.created += 1;
            }
            Ok(Outcome::Existing(_)) | Ok(Outcome::Skipped) => summary.skipped += 1,
            Err(e) => {
                warn!(error = %e, "Skipping weak association candidate");
                summary.skipped += 1;
            }
        }
    }

    info!(
        created = summary.created,
        skipped = summary.skipped,
        "Weak association inference complete"
    );
    summary
}
