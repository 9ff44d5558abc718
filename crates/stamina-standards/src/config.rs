#![deny(unsafe_code)]

//! TOML configuration for the family registry.
//!
//! ```toml
//! base_uri = "http://stamina-project.org/codes/"
//!
//! [[sections]]
//! name = "ISIC"
//! path = "isic/ISIC4_structure.csv"
//!
//! [policy]
//! strip_section_prefix = ["SKD"]
//! refinement_exact = "never"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use stamina_model::FamilyCode;
use tracing::info;

use crate::error::StandardsError;
use crate::paths::resolve_data_path;
use crate::registry::FamilyRegistry;
use crate::sections::{StructureColumns, load_section_table};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StandardsConfig {
    #[serde(default)]
    pub base_uri: Option<String>,
    #[serde(default)]
    pub sections: Vec<SectionSource>,
    #[serde(default)]
    pub policy: Policy,
}

/// A structure file from which a division table is loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionSource {
    pub name: String,
    pub path: PathBuf,
    #[serde(flatten)]
    pub columns: StructureColumns,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Policy {
    /// Families whose codes carry a leading section letter to remove.
    #[serde(default)]
    pub strip_section_prefix: Vec<String>,
    #[serde(default)]
    pub refinement_exact: RefinementPolicy,
}

/// When a national refinement item counts as an exact match of the
/// item it refines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefinementPolicy {
    /// Always narrower.
    #[default]
    Never,
    /// Exact when both codes are identical.
    SameCode,
}

impl StandardsConfig {
    pub fn load(path: &Path) -> Result<Self, StandardsError> {
        let text = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
        toml::from_str(&text).map_err(|source| StandardsError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds the registry: built-in families, then this configuration.
    ///
    /// Relative structure paths resolve against `base_dir` when given, else
    /// against the data root.
    pub fn build_registry(&self, base_dir: Option<&Path>) -> Result<FamilyRegistry> {
        let mut registry = FamilyRegistry::builtin();
        if let Some(base_uri) = &self.base_uri {
            registry = registry.with_base_uri(base_uri.clone());
        }
        for source in &self.sections {
            let path = match base_dir {
                Some(dir) if source.path.is_relative() => dir.join(&source.path),
                _ => resolve_data_path(&source.path),
            };
            let table = load_section_table(&path, &source.columns)
                .with_context(|| format!("load section table {}", source.name))?;
            info!(
                table = %source.name,
                divisions = table.len(),
                "section table registered"
            );
            registry = registry.with_section_table(source.name.clone(), table);
        }
        for family in &self.policy.strip_section_prefix {
            let family = FamilyCode::new(family.clone()).map_err(StandardsError::from)?;
            registry = registry.with_section_prefix_stripping(&family, true)?;
        }
        Ok(registry)
    }
}
