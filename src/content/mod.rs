//! Content ingestion: from a directory of markdown files to the flat table.
//!
//! ```text
//! scan ──▶ extract (frontmatter + markdown + image) ──▶ tree ──▶ table
//! ```

pub mod extract;
pub mod frontmatter;
pub mod image;
pub mod markdown;
pub mod scan;
pub mod table;
pub mod tree;

pub use extract::{DocumentMeta, Extractor};
pub use image::AssetResolver;
pub use scan::{ScanDir, ScanError, ScannedFile, scan_files, scan_tree};
pub use table::{Record, Table, TableError, flatten};
pub use tree::{TreeNode, build_tree};
