//! Project configuration management for `folio.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build/     # [build] and [build.assets]
//! │   └── search     # [search]
//! ├── error          # ConfigError
//! ├── util           # Config file discovery
//! └── mod.rs         # FolioConfig (this file)
//! ```
//!
//! The config file is optional: without one, defaults apply and paths are
//! resolved against the current directory.

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{AssetsConfig, BuildSectionConfig, SearchSectionConfig};

use crate::{
    cli::{BuildArgs, Cli, Commands, QueryArgs},
    log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::find_config_file;

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing folio.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolioConfig {
    /// Path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root directory - parent of config file, or cwd (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Build settings
    #[serde(default)]
    pub build: BuildSectionConfig,

    /// Search settings
    #[serde(default)]
    pub search: SearchSectionConfig,
}

impl FolioConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd for the config file. A missing file means
    /// defaults rooted at cwd; an unreadable or invalid one is an error.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cwd, &cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| cwd.clone());
                config.config_path = Some(path);
                config
            }
            None => Self {
                root: cwd.clone(),
                ..Self::default()
            },
        };

        config.apply_command_options(cli, &cwd);
        config.finalize();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} ignored: {}", display_path, fields.join(", "));
    }

    /// Get path relative to the project root, for display.
    pub fn root_relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    ///
    /// CLI paths are relative to cwd, so they are made absolute here,
    /// before config-relative normalization in [`Self::finalize`].
    fn apply_command_options(&mut self, cli: &Cli, cwd: &Path) {
        match &cli.command {
            Commands::Build { build_args } => self.apply_build_args(build_args, cwd),
            Commands::Query { args } => self.apply_query_args(args, cwd),
        }
    }

    /// Apply build arguments from CLI.
    fn apply_build_args(&mut self, args: &BuildArgs, cwd: &Path) {
        crate::logger::set_verbose(args.verbose);

        Self::update_path(&mut self.build.content, args.content.as_ref(), cwd);
        Self::update_path(&mut self.build.table, args.table.as_ref(), cwd);
        Self::update_path(&mut self.build.index, args.index.as_ref(), cwd);
        Self::update_option(&mut self.build.pretty, args.pretty.as_ref());
    }

    /// Apply query arguments from CLI.
    fn apply_query_args(&mut self, args: &QueryArgs, cwd: &Path) {
        crate::logger::set_verbose(args.verbose);

        Self::update_path(&mut self.build.table, args.table.as_ref(), cwd);
        Self::update_path(&mut self.build.index, args.index.as_ref(), cwd);
        Self::update_option(&mut self.search.min_score, args.min_score.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Update a path option from CLI, anchoring relative paths at cwd.
    fn update_path(config_path: &mut PathBuf, cli_path: Option<&PathBuf>, cwd: &Path) {
        if let Some(path) = cli_path {
            *config_path = crate::utils::path::resolve_from(cwd, path);
        }
    }

    // ========================================================================
    // normalization & validation
    // ========================================================================

    /// Resolve every configured path against the project root.
    fn finalize(&mut self) {
        let root = crate::utils::path::normalize_path(&self.root);
        self.build.normalize(&root);
        self.root = root;
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.build.validate()?;
        self.search.validate()
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> FolioConfig {
    let (parsed, ignored) = FolioConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_from_str_invalid_toml() {
        assert!(FolioConfig::from_str("[build\ncontent = \"x\"").is_err());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[build]\ncontent = \"posts\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = FolioConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.build.content, PathBuf::from("posts"));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_finalize_resolves_against_root() {
        let dir = TempDir::new().unwrap();
        let mut config = test_parse_config("[build.assets]\noutput = \"public/media\"\n");
        config.root = dir.path().to_path_buf();
        config.finalize();

        let root = crate::utils::path::normalize_path(dir.path());
        assert_eq!(config.build.content, root.join("content"));
        assert_eq!(config.build.table, root.join("public/content/table.json"));
        assert_eq!(config.build.assets.output, Some(root.join("public/media")));
    }

    #[test]
    fn test_cli_paths_override_config() {
        let cli = Cli::parse_from(["folio", "build", "posts", "--table", "/abs/t.json"]);
        let cwd = Path::new("/work");
        let mut config = FolioConfig::default();
        config.apply_command_options(&cli, cwd);

        assert_eq!(config.build.content, PathBuf::from("/work/posts"));
        assert_eq!(config.build.table, PathBuf::from("/abs/t.json"));
        // Untouched option keeps its default
        assert_eq!(
            config.build.index,
            PathBuf::from("public/content/search-index.json")
        );
    }

    #[test]
    fn test_query_min_score_override() {
        let cli = Cli::parse_from(["folio", "query", "-s", "rust", "-m", "0.5"]);
        let mut config = FolioConfig::default();
        config.apply_command_options(&cli, Path::new("/work"));
        assert_eq!(config.search.min_score, 0.5);
    }
}
