//! Full versus partial catalog objects.

use serde::{Deserialize, Serialize};

/// Whether a catalog object was retrieved or merely referenced.
///
/// A partial object stands in for a table (or one of its columns) that lives
/// in a schema outside the crawl scope. Only its identity is known; it has no
/// indexes or constraints of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectState {
    /// Completely retrieved.
    #[default]
    Full,
    /// Placeholder for an out-of-scope object.
    Partial,
}

/// Classification of catalog objects as full or partial.
pub trait PartialObject {
    /// The state the object was created with.
    fn object_state(&self) -> ObjectState;

    /// Check if this object is a placeholder.
    fn is_partial(&self) -> bool {
        self.object_state() == ObjectState::Partial
    }
}

/// Check if an object is a placeholder.
pub fn is_partial<T: PartialObject + ?Sized>(object: &T) -> bool {
    object.is_partial()
}
