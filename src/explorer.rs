//! explorer.rs
//!
//! Lazily-populated repository tree with expand/collapse and
//! multi-select state. One instance per wizard session; the UI is the
//! only caller, so all mutation goes through `load_root`,
//! `toggle_expand` and `toggle_select`.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::github::{FetchError, FileNode};

/// A flattened row for rendering: the node plus its indent depth.
pub struct TreeRow<'a> {
    pub depth: usize,
    pub node: &'a FileNode,
}

#[derive(Default)]
pub struct ExplorerState {
    root_nodes: Vec<FileNode>,

    /// Children of every directory expanded at least once, keyed by the
    /// directory path. Session-lifetime cache: entries are never evicted,
    /// and it is consulted before any fetch.
    children_by_path: HashMap<String, Vec<FileNode>>,

    expanded_paths: HashSet<String>,

    /// Selected file paths. BTreeSet keeps `current_selection` in a
    /// stable (lexicographic) order independent of click order.
    selected_paths: BTreeSet<String>,
}

impl ExplorerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch and store the root listing. On failure the roots stay
    /// empty and the error is handed back for the caller to surface.
    pub fn load_root(
        &mut self,
        fetch: impl FnOnce() -> Result<Vec<FileNode>, FetchError>,
    ) -> Result<(), FetchError> {
        self.root_nodes = fetch()?;
        Ok(())
    }

    /// Expand or collapse a directory. The first expansion fetches the
    /// children exactly once; every later toggle only flips display
    /// state. A failed first-time fetch leaves the path collapsed and
    /// uncached, so the next toggle retries.
    pub fn toggle_expand(
        &mut self,
        path: &str,
        fetch: impl FnOnce(&str) -> Result<Vec<FileNode>, FetchError>,
    ) -> Result<(), FetchError> {
        if !self.find_node(path).map(FileNode::is_dir).unwrap_or(false) {
            return Ok(());
        }

        if self.expanded_paths.remove(path) {
            // collapsed; cached children are kept
            return Ok(());
        }

        if !self.children_by_path.contains_key(path) {
            let children = fetch(path)?;
            self.children_by_path.insert(path.to_string(), children);
        }

        self.expanded_paths.insert(path.to_string());
        Ok(())
    }

    /// Flip selection membership. Directories are inert: only loaded
    /// file nodes can be selected.
    pub fn toggle_select(&mut self, path: &str) {
        let selectable = matches!(self.find_node(path), Some(n) if !n.is_dir());
        if !selectable {
            return;
        }

        if !self.selected_paths.remove(path) {
            self.selected_paths.insert(path.to_string());
        }
    }

    /// Every selected `FileNode`, in stable order. Resolution looks at
    /// the roots first, then the children cache, so a selection inside
    /// a since-collapsed directory still resolves.
    pub fn current_selection(&self) -> Vec<&FileNode> {
        self.selected_paths
            .iter()
            .filter_map(|p| self.find_node(p))
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selected_paths.len()
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded_paths.contains(path)
    }

    pub fn is_selected(&self, path: &str) -> bool {
        self.selected_paths.contains(path)
    }

    pub fn has_roots(&self) -> bool {
        !self.root_nodes.is_empty()
    }

    /// Depth-first flattening of the visible tree, mirroring the render
    /// order: roots, then cached children of each expanded directory.
    pub fn visible_rows(&self) -> Vec<TreeRow<'_>> {
        let mut rows = Vec::new();
        self.flatten(&self.root_nodes, 0, &mut rows);
        rows
    }

    fn flatten<'a>(&'a self, nodes: &'a [FileNode], depth: usize, out: &mut Vec<TreeRow<'a>>) {
        for node in nodes {
            out.push(TreeRow { depth, node });

            if node.is_dir() && self.is_expanded(&node.path) {
                if let Some(children) = self.children_by_path.get(&node.path) {
                    self.flatten(children, depth + 1, out);
                }
            }
        }
    }

    fn find_node(&self, path: &str) -> Option<&FileNode> {
        self.root_nodes
            .iter()
            .find(|n| n.path == path)
            .or_else(|| {
                self.children_by_path
                    .values()
                    .flatten()
                    .find(|n| n.path == path)
            })
    }
}

/* ============================================================
   Tests
   ============================================================ */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::NodeKind;

    fn dir(path: &str) -> FileNode {
        node(path, NodeKind::Directory)
    }

    fn file(path: &str) -> FileNode {
        node(path, NodeKind::File)
    }

    fn node(path: &str, kind: NodeKind) -> FileNode {
        FileNode {
            name: path.rsplit('/').next().unwrap().to_string(),
            path: path.to_string(),
            kind,
            size: 0,
            identity: format!("sha-{path}"),
            content: None,
        }
    }

    fn seeded() -> ExplorerState {
        let mut ex = ExplorerState::new();
        ex.load_root(|| Ok(vec![dir("src"), file("README.md")]))
            .unwrap();
        ex
    }

    #[test]
    fn expand_fetches_each_directory_at_most_once() {
        let mut ex = seeded();
        let mut fetches = 0;

        let mut fetch = |_: &str| {
            fetches += 1;
            Ok(vec![file("src/a.js")])
        };

        ex.toggle_expand("src", &mut fetch).unwrap(); // fetch #1
        assert!(ex.is_expanded("src"));

        ex.toggle_expand("src", &mut fetch).unwrap(); // collapse
        assert!(!ex.is_expanded("src"));

        ex.toggle_expand("src", &mut fetch).unwrap(); // re-expand, cached
        assert!(ex.is_expanded("src"));

        assert_eq!(fetches, 1);
    }

    #[test]
    fn select_twice_is_identity() {
        let mut ex = seeded();
        ex.toggle_select("README.md");
        assert!(ex.is_selected("README.md"));
        ex.toggle_select("README.md");
        assert!(!ex.is_selected("README.md"));
        assert_eq!(ex.selected_count(), 0);
    }

    #[test]
    fn selecting_a_directory_is_a_no_op() {
        let mut ex = seeded();
        ex.toggle_select("src");
        assert_eq!(ex.selected_count(), 0);
    }

    #[test]
    fn selection_survives_collapsing_the_ancestor() {
        let mut ex = seeded();
        ex.toggle_expand("src", |_| Ok(vec![file("src/a.js")])).unwrap();
        ex.toggle_select("src/a.js");

        ex.toggle_expand("src", |_| panic!("must not refetch")).unwrap();
        assert!(!ex.is_expanded("src"));

        let selection = ex.current_selection();
        assert_eq!(selection.len(), 1);
        assert_eq!(selection[0].path, "src/a.js");
    }

    #[test]
    fn selection_order_is_stable_by_path() {
        let mut ex = ExplorerState::new();
        ex.load_root(|| Ok(vec![file("z.js"), file("a.js"), file("m.js")]))
            .unwrap();

        ex.toggle_select("m.js");
        ex.toggle_select("z.js");
        ex.toggle_select("a.js");

        let paths: Vec<_> = ex.current_selection().iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, ["a.js", "m.js", "z.js"]);
    }

    #[test]
    fn failed_expand_stays_collapsed_and_retries() {
        let mut ex = seeded();

        let err = ex.toggle_expand("src", |_| {
            Err(FetchError::Parse("boom".into()))
        });
        assert!(err.is_err());
        assert!(!ex.is_expanded("src"));

        // the failure did not poison the cache: the retry fetches again
        ex.toggle_expand("src", |_| Ok(vec![file("src/a.js")])).unwrap();
        assert!(ex.is_expanded("src"));
        assert_eq!(ex.visible_rows().len(), 3);
    }

    #[test]
    fn failed_root_load_leaves_roots_empty() {
        let mut ex = ExplorerState::new();
        let res = ex.load_root(|| Err(FetchError::Parse("down".into())));
        assert!(res.is_err());
        assert!(!ex.has_roots());
        assert!(ex.visible_rows().is_empty());
    }

    #[test]
    fn empty_directory_still_toggles() {
        let mut ex = seeded();
        ex.toggle_expand("src", |_| Ok(vec![])).unwrap();
        assert!(ex.is_expanded("src"));
        assert_eq!(ex.visible_rows().len(), 2); // no children rendered

        ex.toggle_expand("src", |_| panic!("cached")).unwrap();
        assert!(!ex.is_expanded("src"));
    }

    #[test]
    fn rows_flatten_expanded_directories_in_place() {
        let mut ex = seeded();
        ex.toggle_expand("src", |_| Ok(vec![dir("src/lib"), file("src/a.js")]))
            .unwrap();
        ex.toggle_expand("src/lib", |_| Ok(vec![file("src/lib/b.js")]))
            .unwrap();

        let paths: Vec<_> = ex
            .visible_rows()
            .iter()
            .map(|r| (r.depth, r.node.path.clone()))
            .collect();

        assert_eq!(
            paths,
            vec![
                (0, "src".to_string()),
                (1, "src/lib".to_string()),
                (2, "src/lib/b.js".to_string()),
                (1, "src/a.js".to_string()),
                (0, "README.md".to_string()),
            ]
        );
    }
}
