//! Data directory path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the data directory.
pub const DATA_ENV_VAR: &str = "STAMINA_DATA_DIR";

/// Get the data root directory.
///
/// Resolution order:
/// 1. `STAMINA_DATA_DIR` environment variable
/// 2. `data/` directory relative to workspace root
pub fn data_root() -> PathBuf {
    if let Ok(root) = std::env::var(DATA_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

/// Resolves `path` against the data root unless it is already absolute.
pub fn resolve_data_path(path: impl Into<PathBuf>) -> PathBuf {
    let path = path.into();
    if path.is_absolute() {
        path
    } else {
        data_root().join(path)
    }
}
