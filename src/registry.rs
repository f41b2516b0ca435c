//! Page registry construction.
//!
//! Stage 2 of the docmd pipeline. Consumes the scanner's output and builds
//! the **page registry**: an ordered forest of page nodes that is the single
//! source of truth for every rendered page. Built once per run, read-only
//! afterwards.
//!
//! ## Structure
//!
//! ```text
//! index.html                       Home (synthetic, site-wide)
//! src1/index.html                  project root
//! ├── src1/module1/index.html      synthetic folder index
//! │   └── src1/module1/doc.html    leaf page
//! └── src1/readme.html             leaf page
//! src2/index.html
//! └── src2/extra.html
//! ```
//!
//! A folder node exists iff its directory contains at least one Markdown
//! file at any depth — empty or Markdown-free directories produce no node.
//! The scanner already guarantees this by only recording directories on the
//! ancestor chain of a qualifying file.
//!
//! ## Ordering
//!
//! Folder nodes are inserted in lexicographic order of their relative path.
//! A directory's path is a string prefix of its descendants' paths, so a
//! parent always sorts (and is inserted) before its children; attachment
//! never misses. Every child list is then sorted by canonical path, which
//! makes the registry deterministic for an unchanged source tree.
//!
//! The registry is a true forest: each node is owned exactly once by its
//! parent's child list. No parent pointers, no cycles.

use crate::config::Project;
use crate::scan::ScanResult;
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Duplicate canonical path in registry: {0}")]
    DuplicatePath(String),
    #[error("No parent node found for {child} (expected {parent})")]
    MissingParent { child: String, parent: String },
}

/// One page in the registry: a leaf (Markdown file), a synthetic folder
/// index, or the site home.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageNode {
    /// Display title: file stem, folder name, project name, or "Home".
    pub title: String,
    /// Canonical path, unique across the whole registry.
    pub path: String,
    /// True for synthetic folder-index nodes and project roots.
    pub is_folder: bool,
    /// Owning project; `None` for the site-wide home node.
    pub project: Option<String>,
    /// Sorted by canonical path.
    pub children: Vec<PageNode>,
}

impl PageNode {
    fn leaf(title: String, path: String, project: String) -> Self {
        Self {
            title,
            path,
            is_folder: false,
            project: Some(project),
            children: Vec::new(),
        }
    }

    fn folder(title: String, path: String, project: String) -> Self {
        Self {
            title,
            path,
            is_folder: true,
            project: Some(project),
            children: Vec::new(),
        }
    }

    /// Attach `child` under the node whose canonical path is `parent_path`,
    /// searching this subtree. Returns the child back if no node matches.
    fn attach(&mut self, parent_path: &str, child: PageNode) -> Option<PageNode> {
        if self.path == parent_path {
            self.children.push(child);
            return None;
        }
        let mut child = child;
        for node in &mut self.children {
            match node.attach(parent_path, child) {
                None => return None,
                Some(back) => child = back,
            }
        }
        Some(child)
    }

    fn sort_recursive(&mut self) {
        self.children.sort_by(|a, b| a.path.cmp(&b.path));
        for child in &mut self.children {
            child.sort_recursive();
        }
    }
}

/// The full page forest: the Home node first, then one root per project in
/// config order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRegistry {
    pub roots: Vec<PageNode>,
}

impl PageRegistry {
    /// Every node in the registry, depth-first.
    pub fn walk(&self) -> Vec<&PageNode> {
        let mut nodes = Vec::new();
        for root in &self.roots {
            walk_into(root, &mut nodes);
        }
        nodes
    }

    /// Find a node by canonical path.
    pub fn find(&self, path: &str) -> Option<&PageNode> {
        self.walk().into_iter().find(|n| n.path == path)
    }

    /// Number of pages that will be rendered (every node is a page).
    pub fn page_count(&self) -> usize {
        self.walk().len()
    }
}

fn walk_into<'a>(node: &'a PageNode, out: &mut Vec<&'a PageNode>) {
    out.push(node);
    for child in &node.children {
        walk_into(child, out);
    }
}

/// Build the page registry from a scan result.
///
/// Projects appear in config order. Fails if any canonical path would be
/// duplicated; the registry is all-or-nothing.
pub fn build(projects: &[Project], scan: &ScanResult) -> Result<PageRegistry, RegistryError> {
    let mut roots = vec![PageNode {
        title: "Home".to_string(),
        path: "index.html".to_string(),
        is_folder: false,
        project: None,
        children: Vec::new(),
    }];

    for project in projects {
        let mut root = PageNode::folder(
            project.name.clone(),
            format!("{}/index.html", project.name),
            project.name.clone(),
        );

        // Lexicographic order guarantees parents are inserted before their
        // descendants (a directory string-prefixes everything beneath it).
        let mut folders = scan
            .folders
            .get(&project.name)
            .cloned()
            .unwrap_or_default();
        folders.sort_unstable();

        for folder in &folders {
            let title = folder.rsplit('/').next().unwrap_or(folder).to_string();
            let path = format!("{}/{}/index.html", project.name, folder);
            let parent_path = match folder.rsplit_once('/') {
                Some((parent_rel, _)) => format!("{}/{}/index.html", project.name, parent_rel),
                None => root.path.clone(),
            };
            let node = PageNode::folder(title, path, project.name.clone());
            if let Some(orphan) = root.attach(&parent_path, node) {
                return Err(RegistryError::MissingParent {
                    child: orphan.path,
                    parent: parent_path,
                });
            }
        }

        for file in scan.files.iter().filter(|f| f.project == project.name) {
            let parent_path = match &file.parent {
                Some(dir) => format!("{}/index.html", dir),
                None => root.path.clone(),
            };
            // A file named index.md would share its folder's canonical path;
            // the folder node already represents it, so the leaf is dropped.
            if file.path == parent_path {
                continue;
            }
            let leaf = PageNode::leaf(file.title.clone(), file.path.clone(), project.name.clone());
            if let Some(orphan) = root.attach(&parent_path, leaf) {
                return Err(RegistryError::MissingParent {
                    child: orphan.path,
                    parent: parent_path,
                });
            }
        }

        root.sort_recursive();
        roots.push(root);
    }

    let registry = PageRegistry { roots };

    let mut seen = HashSet::new();
    for node in registry.walk() {
        if !seen.insert(node.path.as_str()) {
            return Err(RegistryError::DuplicatePath(node.path.clone()));
        }
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scan;
    use crate::test_helpers::write_source_tree;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn reference_registry(tmp: &TempDir) -> PageRegistry {
        let projects = write_source_tree(tmp.path());
        let result = scan(&projects, &[]).unwrap();
        build(&projects, &result).unwrap()
    }

    #[test]
    fn registry_contains_exactly_expected_nodes() {
        let tmp = TempDir::new().unwrap();
        let registry = reference_registry(&tmp);

        let mut paths: Vec<&str> = registry.walk().iter().map(|n| n.path.as_str()).collect();
        paths.sort_unstable();
        assert_eq!(
            paths,
            vec![
                "index.html",
                "src1/index.html",
                "src1/module1/doc.html",
                "src1/module1/index.html",
                "src1/module2/Sujet/Sous-sujet/deep.html",
                "src1/module2/Sujet/Sous-sujet/index.html",
                "src1/module2/Sujet/index.html",
                "src1/module2/index.html",
                "src1/module4/Special d.html",
                "src1/module4/index.html",
                "src1/readme.html",
                "src2/extra.html",
                "src2/index.html",
            ]
        );
    }

    #[test]
    fn empty_directory_has_no_node() {
        let tmp = TempDir::new().unwrap();
        let registry = reference_registry(&tmp);
        assert!(registry.find("src1/module3/index.html").is_none());
    }

    #[test]
    fn home_node_is_first_root() {
        let tmp = TempDir::new().unwrap();
        let registry = reference_registry(&tmp);

        assert_eq!(registry.roots[0].title, "Home");
        assert_eq!(registry.roots[0].path, "index.html");
        assert_eq!(registry.roots[0].project, None);
        assert!(registry.roots[0].children.is_empty());
    }

    #[test]
    fn one_root_per_project_in_config_order() {
        let tmp = TempDir::new().unwrap();
        let registry = reference_registry(&tmp);

        let titles: Vec<&str> = registry.roots.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Home", "src1", "src2"]);
        assert!(registry.roots[1].is_folder);
        assert_eq!(registry.roots[1].project.as_deref(), Some("src1"));
    }

    #[test]
    fn folder_titles_are_last_path_segment() {
        let tmp = TempDir::new().unwrap();
        let registry = reference_registry(&tmp);

        let sous = registry
            .find("src1/module2/Sujet/Sous-sujet/index.html")
            .unwrap();
        assert_eq!(sous.title, "Sous-sujet");
        assert!(sous.is_folder);
    }

    #[test]
    fn nested_folders_form_chain() {
        let tmp = TempDir::new().unwrap();
        let registry = reference_registry(&tmp);

        let module2 = registry.find("src1/module2/index.html").unwrap();
        assert_eq!(module2.children.len(), 1);
        let sujet = &module2.children[0];
        assert_eq!(sujet.path, "src1/module2/Sujet/index.html");
        assert_eq!(sujet.children.len(), 1);
        let sous = &sujet.children[0];
        assert_eq!(sous.path, "src1/module2/Sujet/Sous-sujet/index.html");
        // deep.md is the only page down there
        assert_eq!(sous.children.len(), 1);
        assert_eq!(sous.children[0].path, "src1/module2/Sujet/Sous-sujet/deep.html");
        assert!(!sous.children[0].is_folder);
    }

    #[test]
    fn root_files_attach_to_project_root() {
        let tmp = TempDir::new().unwrap();
        let registry = reference_registry(&tmp);

        let src1 = &registry.roots[1];
        assert!(src1.children.iter().any(|c| c.path == "src1/readme.html"));
    }

    #[test]
    fn children_sorted_by_canonical_path() {
        let tmp = TempDir::new().unwrap();
        let registry = reference_registry(&tmp);

        let src1 = &registry.roots[1];
        let paths: Vec<&str> = src1.children.iter().map(|c| c.path.as_str()).collect();
        let mut sorted = paths.clone();
        sorted.sort_unstable();
        assert_eq!(paths, sorted);
    }

    #[test]
    fn rebuild_is_byte_identical() {
        let tmp = TempDir::new().unwrap();
        let projects = write_source_tree(tmp.path());

        let first = build(&projects, &scan(&projects, &[]).unwrap()).unwrap();
        let second = build(&projects, &scan(&projects, &[]).unwrap()).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn root_index_md_folds_into_project_root() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("proj");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("index.md"), "# Index").unwrap();
        std::fs::write(src.join("other.md"), "# Other").unwrap();
        let projects = vec![crate::test_helpers::project_spec(src, "proj")];

        let registry = build(&projects, &scan(&projects, &[]).unwrap()).unwrap();
        // index.md collapses into the synthetic project root instead of
        // colliding with it
        let root = registry.find("proj/index.html").unwrap();
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].path, "proj/other.html");
    }

    #[test]
    fn page_count_covers_all_nodes() {
        let tmp = TempDir::new().unwrap();
        let registry = reference_registry(&tmp);
        assert_eq!(registry.page_count(), 13);
    }
}
