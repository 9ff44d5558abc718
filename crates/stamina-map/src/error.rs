//! Error types for correspondence building.

use stamina_model::ClassificationVersion;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// One side of the rule names a family the registry does not know.
    #[error("unknown classification family in correspondence: {version}")]
    UnknownFamily { version: ClassificationVersion },

    #[error("unknown correspondence preset: {0}")]
    UnknownPreset(String),

    /// A group-link expansion with no member codes.
    #[error("expansion of {code} lists no member codes")]
    EmptyExpansion { code: String },
}
