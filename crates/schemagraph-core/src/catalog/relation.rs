//! Relationships between tables: declared foreign keys and weak associations.

use super::column::ColumnRef;
use super::table::TableName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Multiplicity of the referencing ("many") side of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeyCardinality {
    /// Not enough information to classify.
    Unknown,
    /// At most one referencing row per key (unique foreign key).
    ZeroOne,
    /// Any number of referencing rows per key.
    ZeroMany,
    /// Exactly one referencing row per key.
    ///
    /// Requires not-null plus unique constraints, which the resolver does not
    /// model, so it is never produced.
    OneOne,
}

impl ForeignKeyCardinality {
    /// Display string used in reports and diagrams.
    pub fn as_str(&self) -> &'static str {
        match self {
            ForeignKeyCardinality::Unknown => "",
            ForeignKeyCardinality::ZeroOne => "(0..1)",
            ForeignKeyCardinality::ZeroMany => "(0..many)",
            ForeignKeyCardinality::OneOne => "(1..1)",
        }
    }
}

impl fmt::Display for ForeignKeyCardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Referential action on update or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeyRule {
    /// No action.
    NoAction,
    /// Cascade to referencing rows.
    Cascade,
    /// Set referencing columns to null.
    SetNull,
    /// Set referencing columns to their default.
    SetDefault,
    /// Reject the change.
    Restrict,
    /// Not reported.
    #[default]
    Unknown,
}

impl fmt::Display for ForeignKeyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ForeignKeyRule::NoAction => "no action",
            ForeignKeyRule::Cascade => "cascade",
            ForeignKeyRule::SetNull => "set null",
            ForeignKeyRule::SetDefault => "set default",
            ForeignKeyRule::Restrict => "restrict",
            ForeignKeyRule::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Where a relationship came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// Declared in the database schema.
    Declared,
    /// Inferred outside the schema and synthesized by the catalog.
    Weak,
}

/// One column pair of a relationship.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColumnReference {
    /// 1-based position within the key.
    #[serde(default)]
    pub key_sequence: usize,
    /// Primary or unique key column on the referenced ("one") side.
    pub primary_key_column: ColumnRef,
    /// Referencing column on the "many" side.
    pub foreign_key_column: ColumnRef,
}

/// A foreign-key-shaped relationship between two tables.
///
/// Weak associations share this shape; they carry
/// [`RelationshipKind::Weak`] and exactly one column reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    name: String,
    kind: RelationshipKind,
    column_references: Vec<ColumnReference>,
    /// Action on update of the referenced key.
    pub update_rule: ForeignKeyRule,
    /// Action on delete of the referenced row.
    pub delete_rule: ForeignKeyRule,
    /// Whether constraint checking can be deferred.
    pub deferrable: bool,
}

impl ForeignKey {
    /// Create a declared foreign key with no columns.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: RelationshipKind::Declared,
            column_references: Vec::new(),
            update_rule: ForeignKeyRule::Unknown,
            delete_rule: ForeignKeyRule::Unknown,
            deferrable: false,
        }
    }

    /// Create a weak association with a single column pair.
    pub fn weak(
        name: impl Into<String>,
        primary_key_column: ColumnRef,
        foreign_key_column: ColumnRef,
    ) -> Self {
        Self {
            kind: RelationshipKind::Weak,
            ..Self::new(name)
        }
        .with_reference(primary_key_column, foreign_key_column)
    }

    /// Append a column pair.
    pub fn with_reference(
        mut self,
        primary_key_column: ColumnRef,
        foreign_key_column: ColumnRef,
    ) -> Self {
        self.push_reference(primary_key_column, foreign_key_column);
        self
    }

    /// Set update and delete rules.
    pub fn with_rules(mut self, update_rule: ForeignKeyRule, delete_rule: ForeignKeyRule) -> Self {
        self.update_rule = update_rule;
        self.delete_rule = delete_rule;
        self
    }

    /// Append a column pair, numbering it after the existing ones.
    pub fn push_reference(
        &mut self,
        primary_key_column: ColumnRef,
        foreign_key_column: ColumnRef,
    ) {
        let key_sequence = self.column_references.len() + 1;
        self.column_references.push(ColumnReference {
            key_sequence,
            primary_key_column,
            foreign_key_column,
        });
    }

    /// Relationship name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared or weak.
    pub fn kind(&self) -> RelationshipKind {
        self.kind
    }

    /// Check if this is a synthesized weak association.
    pub fn is_weak(&self) -> bool {
        self.kind == RelationshipKind::Weak
    }

    /// Column pairs, in key order.
    pub fn column_references(&self) -> &[ColumnReference] {
        &self.column_references
    }

    /// Referenced ("one" side) table, from the first column pair.
    pub fn primary_key_table(&self) -> Option<&TableName> {
        self.column_references
            .first()
            .map(|r| &r.primary_key_column.table)
    }

    /// Referencing ("many" side) table, from the first column pair.
    pub fn foreign_key_table(&self) -> Option<&TableName> {
        self.column_references
            .first()
            .map(|r| &r.foreign_key_column.table)
    }

    /// Check if the relationship references its own table.
    pub fn is_self_referencing(&self) -> bool {
        self.primary_key_table().is_some() && self.primary_key_table() == self.foreign_key_table()
    }
}
