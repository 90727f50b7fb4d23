//! Read-only view over a matching table + search index pair.
//!
//! A [`Snapshot`] is loaded once and handed to whatever needs to answer
//! route lookups, free-text search or tag filtering. Reloading after a new
//! build means loading a new snapshot; nothing here is global.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::content::{Record, Table, TableError};
use crate::search::{IndexError, SearchHit, SearchIndex};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid table {}", path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    #[error("invalid search index {}", path.display())]
    Index {
        path: PathBuf,
        #[source]
        source: IndexError,
    },

    #[error("search index references route {0} missing from the table")]
    UnknownRoute(String),
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    table: Table,
    index: SearchIndex,
}

impl Snapshot {
    /// Load both artifacts from disk.
    pub fn load(table_path: &Path, index_path: &Path) -> Result<Self, SnapshotError> {
        let read = |path: &Path| {
            fs::read_to_string(path).map_err(|source| SnapshotError::Io {
                path: path.to_path_buf(),
                source,
            })
        };

        let table = Table::from_json(&read(table_path)?).map_err(|source| SnapshotError::Table {
            path: table_path.to_path_buf(),
            source,
        })?;
        let index =
            SearchIndex::from_json(&read(index_path)?).map_err(|source| SnapshotError::Index {
                path: index_path.to_path_buf(),
                source,
            })?;

        Self::from_parts(table, index)
    }

    /// Pair an in-memory table and index, checking that every indexed
    /// route exists in the table.
    pub fn from_parts(table: Table, index: SearchIndex) -> Result<Self, SnapshotError> {
        if let Some(route) = index.routes().find(|r| !table.contains(r)) {
            return Err(SnapshotError::UnknownRoute(route.to_owned()));
        }
        Ok(Self { table, index })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    /// Record at `route`, or `None`.
    pub fn get(&self, route: &str) -> Option<&Record> {
        self.table.get(route)
    }

    /// Resolved children of `route`; dangling child routes are skipped.
    pub fn children(&self, route: &str) -> Vec<&Record> {
        self.table.children(route)
    }

    /// Ranked routes for `query` scoring at least `min_score`.
    pub fn search(&self, query: &str, min_score: f64) -> Vec<SearchHit> {
        self.index.search(query, min_score)
    }

    /// Like [`Self::search`], resolved to records.
    pub fn search_records(&self, query: &str, min_score: f64) -> Vec<&Record> {
        self.search(query, min_score)
            .iter()
            .filter_map(|hit| self.get(&hit.route))
            .collect()
    }

    /// Records tagged `tag` (case-insensitive exact match), in table order.
    pub fn filter_by_tag(&self, tag: &str) -> Vec<&Record> {
        self.table.filter_by_tag(tag)
    }
}

/// Window of `items` starting at `offset`, at most `limit` long.
pub fn paginate<T>(items: &[T], offset: usize, limit: Option<usize>) -> &[T] {
    let start = offset.min(items.len());
    let end = limit.map_or(items.len(), |l| start.saturating_add(l).min(items.len()));
    &items[start..end]
}
