//! Full-text search: text pipeline, stemmer, and the inverted index.

pub mod index;
pub mod pipeline;

pub use index::{Field, IndexError, SearchHit, SearchIndex};
pub use pipeline::TextPipeline;
