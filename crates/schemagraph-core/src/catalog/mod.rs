//! Catalog model for schemagraph.
//!
//! The catalog stores the tables of one crawl together with their columns,
//! indexes, constraints, foreign keys and weak associations.

mod catalog;
mod column;
mod constraint;
mod index;
mod relation;
mod state;
mod table;
mod types;

pub use catalog::Catalog;
pub use column::{AsColumn, Column, ColumnRef};
pub use constraint::{TableConstraint, TableConstraintColumn, TableConstraintType};
pub use index::{Index, IndexColumn, IndexType, SortSequence};
pub use relation::{
    ColumnReference, ForeignKey, ForeignKeyCardinality, ForeignKeyRule, RelationshipKind,
};
pub use state::{is_partial, ObjectState, PartialObject};
pub use table::{Table, TableName, TableType};
pub use types::{ColumnDataType, SqlTypeGroup};
