//! `[build]` section configuration.
//!
//! Contains input/output paths for the indexing pipeline.
//!
//! # Example
//!
//! ```toml
//! [build]
//! content = "content"                           # Content root (relative to site root)
//! table = "public/content/table.json"           # Table artifact
//! index = "public/content/search-index.json"    # Search index artifact
//! index_names = ["page.md", "page.mdx"]         # Files that carry a directory's metadata
//! pretty = false                                # Pretty-print both artifacts
//!
//! [build.assets]
//! url_prefix = "assets"
//! ```
//!
//! See [`assets`] for image options.

pub mod assets;

pub use assets::AssetsConfig;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::ConfigError;
use crate::utils::path::resolve_from;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// Content root directory.
    pub content: PathBuf,

    /// Output path of the table artifact.
    pub table: PathBuf,

    /// Output path of the search index artifact.
    pub index: PathBuf,

    /// File names that mark a directory's index document.
    pub index_names: Vec<String>,

    /// Pretty-print JSON artifacts.
    pub pretty: bool,

    /// Image asset settings.
    pub assets: AssetsConfig,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            content: "content".into(),
            table: "public/content/table.json".into(),
            index: "public/content/search-index.json".into(),
            index_names: vec!["page.md".into(), "page.mdx".into()],
            pretty: false,
            assets: AssetsConfig::default(),
        }
    }
}

impl BuildSectionConfig {
    /// Resolve all paths against the site root.
    pub(crate) fn normalize(&mut self, root: &Path) {
        self.content = resolve_from(root, &self.content);
        self.table = resolve_from(root, &self.table);
        self.index = resolve_from(root, &self.index);
        self.assets.normalize(root);
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.index_names.is_empty() {
            return Err(ConfigError::validation(
                "build.index_names",
                "at least one index file name is required",
            ));
        }
        if self.index_names.iter().any(|n| n.contains(['/', '\\'])) {
            return Err(ConfigError::validation(
                "build.index_names",
                "index names are file names, not paths",
            ));
        }
        if self.table == self.index {
            return Err(ConfigError::validation(
                "build.index",
                "table and index must be written to different files",
            ));
        }
        self.assets.validate()
    }
}
