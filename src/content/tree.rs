//! Document tree assembly.
//!
//! Every scanned directory becomes a [`TreeNode`]; its index file supplies
//! the node's own metadata and its subdirectories become children.
//! Siblings are ordered newest first, then by title descending.

use std::cmp::Ordering;
use std::path::Path;

use super::extract::DocumentMeta;
use super::scan::ScanDir;
use crate::utils::date::DateTimeUtc;
use crate::utils::path::route::{ROOT_ROUTE, join_route};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub route: String,
    pub title: String,
    pub image: String,
    pub tags: Vec<String>,
    pub description: String,
    pub content: String,
    pub date: DateTimeUtc,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn new(route: String, meta: DocumentMeta, children: Vec<TreeNode>) -> Self {
        let DocumentMeta {
            title,
            description,
            content,
            image,
            tags,
            date,
        } = meta;
        Self {
            route,
            title,
            image,
            tags,
            description,
            content,
            date,
            children,
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }
}

/// Sibling order: date descending, then title descending.
pub fn sibling_order(a: &TreeNode, b: &TreeNode) -> Ordering {
    b.date.cmp(&a.date).then_with(|| b.title.cmp(&a.title))
}

/// Build the document tree rooted at `root` (route `/`).
///
/// `extract` is called once per index file, in directory order. Directories
/// without an index file get empty metadata dated `now`.
pub fn build_tree<F>(root: &ScanDir, now: DateTimeUtc, extract: &mut F) -> TreeNode
where
    F: FnMut(&Path) -> DocumentMeta,
{
    build_node(root, ROOT_ROUTE.to_owned(), now, extract)
}

fn build_node<F>(dir: &ScanDir, route: String, now: DateTimeUtc, extract: &mut F) -> TreeNode
where
    F: FnMut(&Path) -> DocumentMeta,
{
    let meta = match &dir.index_file {
        Some(path) => extract(path),
        None => DocumentMeta::empty(now),
    };

    let mut children: Vec<TreeNode> = dir
        .dirs
        .iter()
        .map(|child| build_node(child, join_route(&route, &child.name), now, extract))
        .collect();
    // Stable: full ties keep directory-name order
    children.sort_by(sibling_order);

    TreeNode::new(route, meta, children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const NOW: DateTimeUtc = DateTimeUtc::new(2030, 1, 1, 0, 0, 0);

    fn dir(name: &str, index: bool, dirs: Vec<ScanDir>) -> ScanDir {
        let path = PathBuf::from("/c").join(name);
        ScanDir {
            index_file: index.then(|| path.join("page.md")),
            path,
            name: name.to_owned(),
            dirs,
        }
    }

    /// Metadata keyed by the directory name of the index file.
    fn fake_extract(path: &Path) -> DocumentMeta {
        let name = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let (date, title) = match name {
            "old" => (DateTimeUtc::from_ymd(2020, 1, 1), "Old"),
            "alpha" => (DateTimeUtc::from_ymd(2024, 1, 1), "Alpha"),
            "beta" => (DateTimeUtc::from_ymd(2024, 1, 1), "Beta"),
            "new" => (DateTimeUtc::from_ymd(2025, 6, 1), "New"),
            _ => (DateTimeUtc::from_ymd(2000, 1, 1), name),
        };
        DocumentMeta {
            title: title.to_owned(),
            date,
            ..DocumentMeta::empty(NOW)
        }
    }

    fn assert_sorted(node: &TreeNode) {
        for pair in node.children.windows(2) {
            assert_ne!(
                sibling_order(&pair[0], &pair[1]),
                Ordering::Greater,
                "{} before {}",
                pair[0].route,
                pair[1].route
            );
        }
        node.children.iter().for_each(assert_sorted);
    }

    #[test]
    fn test_routes_and_order() {
        let root = dir(
            "content",
            true,
            vec![dir(
                "blog",
                true,
                vec![
                    dir("alpha", true, vec![]),
                    dir("beta", true, vec![]),
                    dir("new", true, vec![]),
                    dir("old", true, vec![]),
                ],
            )],
        );
        let tree = build_tree(&root, NOW, &mut fake_extract);

        assert_eq!(tree.route, "/");
        let blog = &tree.children[0];
        assert_eq!(blog.route, "/blog");
        let routes: Vec<_> = blog.children.iter().map(|c| c.route.as_str()).collect();
        // Newest first; same date ordered by title descending
        assert_eq!(
            routes,
            vec!["/blog/new", "/blog/beta", "/blog/alpha", "/blog/old"]
        );
        assert_sorted(&tree);
        assert_eq!(tree.node_count(), 6);
    }

    #[test]
    fn test_missing_index_defaults() {
        let root = dir(
            "content",
            false,
            vec![dir("section", false, vec![dir("old", true, vec![])])],
        );
        let tree = build_tree(&root, NOW, &mut fake_extract);

        let section = &tree.children[0];
        assert_eq!(section.title, "");
        assert!(section.tags.is_empty());
        assert_eq!(section.date, NOW);
        assert_eq!(section.children[0].route, "/section/old");
    }

    #[test]
    fn test_sort_applies_at_every_level() {
        let root = dir(
            "content",
            false,
            vec![
                dir("old", true, vec![dir("alpha", true, vec![]), dir("new", true, vec![])]),
                dir("new", true, vec![dir("old", true, vec![]), dir("beta", true, vec![])]),
            ],
        );
        let tree = build_tree(&root, NOW, &mut fake_extract);
        assert_eq!(tree.children[0].route, "/new");
        assert_eq!(tree.children[0].children[0].route, "/new/beta");
        assert_eq!(tree.children[1].children[0].route, "/old/new");
        assert_sorted(&tree);
    }

    #[test]
    fn test_extract_called_once_per_index() {
        let root = dir("content", true, vec![dir("a", false, vec![]), dir("b", true, vec![])]);
        let mut calls = Vec::new();
        build_tree(&root, NOW, &mut |path: &Path| {
            calls.push(path.to_path_buf());
            DocumentMeta::empty(NOW)
        });
        assert_eq!(
            calls,
            vec![PathBuf::from("/c/content/page.md"), PathBuf::from("/c/b/page.md")]
        );
    }
}
