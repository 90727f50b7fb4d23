//! `[search]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [search]
//! min_token_len = 2     # Shorter tokens are dropped at build and query time
//! min_score = 0.0       # Query hits scoring below this are discarded
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSectionConfig {
    /// Minimum token length (in chars) kept by the text pipeline.
    pub min_token_len: usize,

    /// Default score cutoff for `folio query --search`.
    pub min_score: f64,
}

impl Default for SearchSectionConfig {
    fn default() -> Self {
        Self {
            min_token_len: 2,
            min_score: 0.0,
        }
    }
}

impl SearchSectionConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.min_token_len == 0 {
            return Err(ConfigError::validation(
                "search.min_token_len",
                "must be at least 1",
            ));
        }
        if !self.min_score.is_finite() || self.min_score < 0.0 {
            return Err(ConfigError::validation(
                "search.min_score",
                format!("must be a non-negative number, got {}", self.min_score),
            ));
        }
        Ok(())
    }
}
