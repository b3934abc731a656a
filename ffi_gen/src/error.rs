//! Error types for binding generation

use thiserror::Error;

/// Fatal conditions raised while turning a declaration set into bindings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenError {
    /// Structures whose layouts wait on each other
    #[error("Detected dependency cycle in structures: {}", .pending.join(", "))]
    DependencyCycle { pending: Vec<String> },

    /// A named reference that no declaration satisfies
    #[error("Type '{name}' referenced by '{referrer}' is not defined")]
    UnresolvedType { name: String, referrer: String },
}
