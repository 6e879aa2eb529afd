//! Report configuration.

use crate::identifiers::{IdentifierQuotingStrategy, Identifiers};
use serde::{Deserialize, Serialize};

/// Options controlling how a catalog is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Identifier quoting for column lists.
    pub identifiers: Identifiers,

    /// Leave large-object and object columns out of index column lists.
    pub omit_large_objects: bool,

    /// Run weak association inference over the snapshot's candidates
    /// before reporting.
    pub infer_weak_associations: bool,

    /// Include placeholder tables in the report.
    pub show_partial_tables: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            identifiers: Identifiers::default(),
            omit_large_objects: false,
            infer_weak_associations: true,
            show_partial_tables: false,
        }
    }
}

impl ReportOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identifier quoting rules.
    pub fn with_identifiers(mut self, identifiers: Identifiers) -> Self {
        self.identifiers = identifiers;
        self
    }

    /// Set only the quoting strategy.
    pub fn with_quoting_strategy(mut self, strategy: IdentifierQuotingStrategy) -> Self {
        self.identifiers.quoting_strategy = strategy;
        self
    }

    /// Set whether to omit large-object columns.
    pub fn with_omit_large_objects(mut self, omit: bool) -> Self {
        self.omit_large_objects = omit;
        self
    }

    /// Set whether to infer weak associations.
    pub fn with_infer_weak_associations(mut self, infer: bool) -> Self {
        self.infer_weak_associations = infer;
        self
    }

    /// Set whether to show partial tables.
    pub fn with_show_partial_tables(mut self, show: bool) -> Self {
        self.show_partial_tables = show;
        self
    }
}
