//! The flat document table.
//!
//! [`flatten`] turns the tree into records in depth-first pre-order, each
//! carrying only the routes of its direct children. [`Table`] adds route
//! lookup on top and is what the table artifact deserializes into.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tree::TreeNode;
use crate::utils::date::DateTimeUtc;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("invalid table JSON")]
    Json(#[from] serde_json::Error),

    #[error("route {0} appears more than once")]
    DuplicateRoute(String),
}

/// One table row. Field order is the serialized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub route: String,
    pub title: String,
    pub image: String,
    pub tags: Vec<String>,
    pub description: String,
    pub content: String,
    pub date: DateTimeUtc,
    pub children: Vec<String>,
}

impl Record {
    fn from_node(node: &TreeNode) -> Self {
        Self {
            route: node.route.clone(),
            title: node.title.clone(),
            image: node.image.clone(),
            tags: node.tags.clone(),
            description: node.description.clone(),
            content: node.content.clone(),
            date: node.date,
            children: node.children.iter().map(|c| c.route.clone()).collect(),
        }
    }

    /// Case-insensitive exact tag match.
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }
}

/// Flatten a tree into records, parent before children.
pub fn flatten(root: &TreeNode) -> Vec<Record> {
    let mut records = Vec::with_capacity(root.node_count());
    push_preorder(root, &mut records);
    records
}

fn push_preorder(node: &TreeNode, out: &mut Vec<Record>) {
    out.push(Record::from_node(node));
    for child in &node.children {
        push_preorder(child, out);
    }
}

/// Records plus a route index.
#[derive(Debug, Clone, Default)]
pub struct Table {
    records: Vec<Record>,
    by_route: FxHashMap<String, usize>,
}

impl Table {
    /// Index `records`, rejecting duplicate routes.
    pub fn new(records: Vec<Record>) -> Result<Self, TableError> {
        let mut by_route = FxHashMap::default();
        by_route.reserve(records.len());
        for (i, record) in records.iter().enumerate() {
            if by_route.insert(record.route.clone(), i).is_some() {
                return Err(TableError::DuplicateRoute(record.route.clone()));
            }
        }
        Ok(Self { records, by_route })
    }

    /// Table of a freshly built tree. Routes are unique by construction.
    pub fn from_tree(root: &TreeNode) -> Result<Self, TableError> {
        Self::new(flatten(root))
    }

    pub fn from_json(json: &str) -> Result<Self, TableError> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(&self.records)
        } else {
            serde_json::to_string(&self.records)
        }
    }

    /// All records in table order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, route: &str) -> bool {
        self.by_route.contains_key(route)
    }

    pub fn get(&self, route: &str) -> Option<&Record> {
        self.by_route.get(route).map(|&i| &self.records[i])
    }

    /// Resolved children of `route`; dangling child routes are skipped.
    ///
    /// Unknown `route` yields an empty list.
    pub fn children(&self, route: &str) -> Vec<&Record> {
        self.get(route)
            .map(|record| {
                record
                    .children
                    .iter()
                    .filter_map(|child| self.get(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Records carrying `tag` (case-insensitive), in table order.
    pub fn filter_by_tag(&self, tag: &str) -> Vec<&Record> {
        let tag = tag.trim();
        self.records.iter().filter(|r| r.has_tag(tag)).collect()
    }

    /// `(parent, child)` pairs whose child route has no record.
    pub fn dangling_children(&self) -> Vec<(&str, &str)> {
        self.records
            .iter()
            .flat_map(|r| {
                r.children
                    .iter()
                    .filter(|c| !self.contains(c))
                    .map(move |c| (r.route.as_str(), c.as_str()))
            })
            .collect()
    }
}
