//! Inverted search index over the table's text fields.
//!
//! # Artifact layout
//!
//! ```text
//! {
//!   "version": 1,
//!   "fields": ["title", "description", "content"],
//!   "pipeline": ["trimmer", "stopWordFilter", "stemmer"],
//!   "minTokenLength": 2,
//!   "documentCount": 3,
//!   "averageFieldLength": { "title": 1.0, ... },
//!   "invertedIndex": { "rust": [{ "route": "/a", "weight": 0.47 }, ...] },
//!   "documentVectors": { "/a": { "title": { "length": 1, "terms": { "rust": 0.47 } } } }
//! }
//! ```
//!
//! Weights are BM25 (`k1 = 1.2`, `b = 0.75`) per field, summed over fields
//! for the postings. All maps are ordered so equal input gives equal bytes.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use super::pipeline::TextPipeline;
use crate::content::Record;

/// Artifact format version.
pub const INDEX_VERSION: u32 = 1;

const K1: f64 = 1.2;
const B: f64 = 0.75;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("invalid search index JSON")]
    Json(#[from] serde_json::Error),

    #[error("search index version {found} is not supported (expected {expected})")]
    Version { found: u32, expected: u32 },

    #[error("search index was built with pipeline [{}], expected [{}]", found.join(", "), expected.join(", "))]
    Pipeline {
        found: Vec<String>,
        expected: Vec<String>,
    },

    #[error("search index min token length must be at least 1")]
    MinTokenLength,
}

/// An indexed record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Description,
    Content,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Title, Field::Description, Field::Content];

    fn text(self, record: &Record) -> &str {
        match self {
            Field::Title => &record.title,
            Field::Description => &record.description,
            Field::Content => &record.content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub route: String,
    pub weight: f64,
}

/// Token weights of one field of one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldVector {
    /// Token count after the pipeline.
    pub length: usize,
    pub terms: BTreeMap<String, f64>,
}

/// One ranked query result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub route: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIndex {
    pub version: u32,
    pub fields: Vec<Field>,
    pub pipeline: Vec<String>,
    pub min_token_length: usize,
    pub document_count: usize,
    pub average_field_length: BTreeMap<Field, f64>,
    /// Postings per token, in table order.
    pub inverted_index: BTreeMap<String, Vec<Posting>>,
    pub document_vectors: BTreeMap<String, BTreeMap<Field, FieldVector>>,
}

/// Smallest weight a matching token can carry after rounding.
const MIN_WEIGHT: f64 = 0.001;

/// Round to three decimals so artifacts stay compact and stable.
fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Like [`round3`], but a positive weight never rounds down to zero.
fn round_weight(x: f64) -> f64 {
    if x > 0.0 { round3(x).max(MIN_WEIGHT) } else { round3(x) }
}

impl SearchIndex {
    /// Index the text fields of `records`.
    pub fn build(records: &[Record], pipeline: &TextPipeline) -> Self {
        let n = records.len();

        // Token lists per document and field
        let tokenized: Vec<[Vec<String>; 3]> = records
            .iter()
            .map(|r| Field::ALL.map(|f| pipeline.tokens(f.text(r))))
            .collect();

        let mut average_field_length = BTreeMap::new();
        for (i, field) in Field::ALL.into_iter().enumerate() {
            let total: usize = tokenized.iter().map(|doc| doc[i].len()).sum();
            let avg = if n == 0 { 0.0 } else { total as f64 / n as f64 };
            average_field_length.insert(field, avg);
        }

        // Document frequency across all fields
        let mut df: FxHashMap<&str, usize> = FxHashMap::default();
        for doc in &tokenized {
            let mut seen: Vec<&str> = doc.iter().flatten().map(String::as_str).collect();
            seen.sort_unstable();
            seen.dedup();
            for token in seen {
                *df.entry(token).or_default() += 1;
            }
        }
        let idf = |token: &str| {
            let df = df.get(token).copied().unwrap_or(0) as f64;
            (1.0 + (n as f64 - df + 0.5) / (df + 0.5)).ln()
        };

        let mut inverted_index: BTreeMap<String, Vec<Posting>> = BTreeMap::new();
        let mut document_vectors = BTreeMap::new();

        for (record, doc) in records.iter().zip(&tokenized) {
            let mut vectors = BTreeMap::new();
            let mut doc_weights: BTreeMap<&str, f64> = BTreeMap::new();

            for (i, field) in Field::ALL.into_iter().enumerate() {
                let tokens = &doc[i];
                let mut tf: BTreeMap<&str, usize> = BTreeMap::new();
                for token in tokens {
                    *tf.entry(token.as_str()).or_default() += 1;
                }

                let avg = average_field_length[&field];
                let norm = if avg > 0.0 {
                    tokens.len() as f64 / avg
                } else {
                    1.0
                };

                let mut terms = BTreeMap::new();
                for (token, count) in tf {
                    let tf = count as f64;
                    let weight = idf(token) * tf * (K1 + 1.0) / (tf + K1 * (1.0 - B + B * norm));
                    *doc_weights.entry(token).or_default() += weight;
                    terms.insert(token.to_owned(), round_weight(weight));
                }
                vectors.insert(
                    field,
                    FieldVector {
                        length: tokens.len(),
                        terms,
                    },
                );
            }

            for (token, weight) in doc_weights {
                inverted_index
                    .entry(token.to_owned())
                    .or_default()
                    .push(Posting {
                        route: record.route.clone(),
                        weight: round_weight(weight),
                    });
            }
            document_vectors.insert(record.route.clone(), vectors);
        }

        Self {
            version: INDEX_VERSION,
            fields: Field::ALL.to_vec(),
            pipeline: TextPipeline::names(),
            min_token_length: pipeline.min_token_len,
            document_count: n,
            average_field_length: average_field_length
                .into_iter()
                .map(|(f, avg)| (f, round3(avg)))
                .collect(),
            inverted_index,
            document_vectors,
        }
    }

    /// The pipeline queries must go through.
    pub fn pipeline(&self) -> TextPipeline {
        TextPipeline::new(self.min_token_length)
    }

    /// Routes of all indexed documents.
    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.document_vectors.keys().map(String::as_str)
    }

    /// Rank routes for `query`, best first, dropping scores below `min_score`.
    ///
    /// Each distinct query token adds its posting weights to the route's
    /// score. Equal scores keep the order in which routes were first hit.
    pub fn search(&self, query: &str, min_score: f64) -> Vec<SearchHit> {
        let mut tokens = self.pipeline().tokens(query);
        let mut seen = FxHashSet::default();
        tokens.retain(|t| seen.insert(t.clone()));

        let mut hits: Vec<SearchHit> = Vec::new();
        let mut position: FxHashMap<&str, usize> = FxHashMap::default();

        for token in &tokens {
            let Some(postings) = self.inverted_index.get(token) else {
                continue;
            };
            for posting in postings {
                let i = *position.entry(posting.route.as_str()).or_insert_with(|| {
                    hits.push(SearchHit {
                        route: posting.route.clone(),
                        score: 0.0,
                    });
                    hits.len() - 1
                });
                hits[i].score += posting.weight;
            }
        }

        for hit in &mut hits {
            hit.score = round_weight(hit.score);
        }
        hits.retain(|hit| hit.score > 0.0 && hit.score >= min_score);
        // Stable: ties keep first-hit order
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits
    }

    /// Check that this index was produced by the built-in pipeline.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.version != INDEX_VERSION {
            return Err(IndexError::Version {
                found: self.version,
                expected: INDEX_VERSION,
            });
        }
        let expected = TextPipeline::names();
        if self.pipeline != expected {
            return Err(IndexError::Pipeline {
                found: self.pipeline.clone(),
                expected,
            });
        }
        if self.min_token_length == 0 {
            return Err(IndexError::MinTokenLength);
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, IndexError> {
        let index: Self = serde_json::from_str(json)?;
        index.validate()?;
        Ok(index)
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
