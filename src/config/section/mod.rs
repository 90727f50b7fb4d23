//! Configuration section definitions.
//!
//! Each module corresponds to a section in `folio.toml`:
//!
//! | Module     | TOML Section   | Purpose                              |
//! |------------|----------------|--------------------------------------|
//! | `build`    | `[build]`      | Content root, artifact paths, assets |
//! | `search`   | `[search]`     | Tokenizer and scoring thresholds     |

pub mod build;
mod search;

pub use build::{AssetsConfig, BuildSectionConfig};
pub use search::SearchSectionConfig;
