//! `[build.assets]` section configuration.
//!
//! Controls how local images referenced from documents become servable,
//! content-addressed URLs.
//!
//! # Example
//!
//! ```toml
//! [build.assets]
//! url_prefix = "static/media"      # → /static/media/cover.1a2b3c4d.png
//! output = "public/static/media"   # copy hashed files here (optional)
//! extensions = ["png", "jpg", "jpeg", "gif", "webp", "avif", "svg"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// URL path segment(s) placed before the hashed file name.
    pub url_prefix: String,

    /// Directory that receives a copy of every resolved image under its
    /// hashed name. `None` only computes URLs.
    pub output: Option<PathBuf>,

    /// Image extensions accepted for local references (lowercase, no dot).
    pub extensions: Vec<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            url_prefix: "assets".into(),
            output: None,
            extensions: ["png", "jpg", "jpeg", "gif", "webp", "avif", "svg"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl AssetsConfig {
    /// Whether `ext` (any case) is an accepted image extension.
    pub fn is_supported(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// URL prefix without surrounding slashes.
    pub fn prefix(&self) -> &str {
        self.url_prefix.trim_matches('/')
    }

    pub(crate) fn normalize(&mut self, root: &Path) {
        if let Some(output) = self.output.take() {
            self.output = Some(crate::utils::path::resolve_from(root, &output));
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.extensions.is_empty() {
            return Err(ConfigError::validation(
                "build.assets.extensions",
                "at least one image extension is required",
            ));
        }
        if let Some(bad) = self.extensions.iter().find(|e| e.starts_with('.')) {
            return Err(ConfigError::validation(
                "build.assets.extensions",
                format!("'{bad}' must not start with a dot"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported_case_insensitive() {
        let assets = AssetsConfig::default();
        assert!(assets.is_supported("png"));
        assert!(assets.is_supported("JPG"));
        assert!(!assets.is_supported("pdf"));
    }

    #[test]
    fn test_prefix_trims_slashes() {
        let assets = AssetsConfig {
            url_prefix: "/static/media/".into(),
            ..Default::default()
        };
        assert_eq!(assets.prefix(), "static/media");
    }

    #[test]
    fn test_validate_rejects_dotted_extension() {
        let assets = AssetsConfig {
            extensions: vec![".png".into()],
            ..Default::default()
        };
        assert!(assets.validate().is_err());
    }
}
