//! Stateless helpers over the catalog model.
//!
//! Column list formatting, foreign key cardinality and weak association
//! synthesis. Everything here takes the catalog or entity explicitly.

mod cardinality;
mod columns;
mod sink;
mod weak;

pub use cardinality::{
    all_index_column_names, find_foreign_key_cardinality, is_foreign_key_unique,
    unique_index_column_names,
};
pub use columns::{
    column_names, constraint_columns_list, contains_generated_columns, foreign_key_column_names,
    foreign_key_columns_list, index_columns_list, join_columns, primary_key_columns_list,
    table_columns_list,
};
pub use sink::WeakAssociationSink;
pub use weak::{
    construct_foreign_key_name, create_weak_association, infer_weak_associations, string_hash,
    weak_association_name, InferenceSummary, WeakAssociationCandidate,
};
