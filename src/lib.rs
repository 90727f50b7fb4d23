//! Folio - build-time content table and search index for markdown blogs.
//!
//! A build walks a content root of `page.md` / `page.mdx` files and writes
//! two JSON artifacts:
//!
//! - a flat **table** of records (route, title, tags, dates, children)
//! - a **search index** (inverted index plus per-field vectors)
//!
//! [`snapshot::Snapshot`] loads both back for route lookups, tag filters
//! and ranked free-text search.

pub mod cli;
pub mod config;
pub mod content;
pub mod logger;
pub mod pipeline;
pub mod search;
pub mod snapshot;
pub mod utils;
