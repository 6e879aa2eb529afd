//! schemagraph core - catalog model, identifier quoting and relationship
//! inference.
//!
//! This crate holds the in-memory model of a crawled database schema and the
//! stateless helpers that format and enrich it.

pub mod catalog;
pub mod config;
pub mod diff;
pub mod error;
pub mod identifiers;
pub mod metadata;
pub mod snapshot;

pub use catalog::{
    Catalog, Column, ColumnRef, ForeignKey, ForeignKeyCardinality, Index, PartialObject, Table,
    TableName,
};
pub use config::ReportOptions;
pub use diff::CatalogDiff;
pub use error::Error;
pub use identifiers::{IdentifierQuotingStrategy, Identifiers};
pub use metadata::{
    create_weak_association, find_foreign_key_cardinality, infer_weak_associations, join_columns,
    weak_association_name, InferenceSummary, WeakAssociationCandidate, WeakAssociationSink,
};
pub use snapshot::{load_snapshot, CatalogSnapshot};
