//! Per-page navigation resolution.
//!
//! Stage 3 of the docmd pipeline, invoked once per rendered page. Projects
//! the immutable page registry into a **navigation view**: every node with a
//! relative, percent-encoded href and `is_current`/`is_active` flags computed
//! against the page being rendered.
//!
//! ## Relative hrefs
//!
//! The generated site must work from `file://` and from any mount point, so
//! every link is relative to the directory of the page being written. The
//! href from `src1/module2/Sujet/Sous-sujet/deep.html` back to the site root
//! is `../../../../index.html` — one `..` per directory level crossed.
//!
//! ## Active propagation
//!
//! `is_active` is true for the current page and for every node whose subtree
//! contains the current page, at any depth. The flags are computed bottom-up
//! in a single pass, so an ancestor chain of arbitrary length highlights
//! correctly while unrelated siblings and other projects stay inactive.
//!
//! Resolution is pure and re-entrant: same registry + same current path →
//! byte-identical view. No I/O.

use crate::registry::{PageNode, PageRegistry};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters percent-encoded in hrefs. The on-disk file keeps its literal
/// name; only the hyperlink is encoded.
const HREF_UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'%')
    .add(b'{')
    .add(b'}');

/// A registry node as seen from one specific page. Transient — rebuilt for
/// every render, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NavPage {
    pub title: String,
    /// Canonical path, unchanged from the registry.
    pub path: String,
    /// Relative href from the current page's directory, percent-encoded.
    pub href: String,
    pub is_folder: bool,
    /// This node is the page being rendered.
    pub is_current: bool,
    /// This node is, or contains at any depth, the page being rendered.
    pub is_active: bool,
    pub children: Vec<NavPage>,
}

/// Resolve the navigation view of the whole registry against one page.
pub fn resolve_view(registry: &PageRegistry, current: &str) -> Vec<NavPage> {
    let current_dir = dir_of(current);
    registry
        .roots
        .iter()
        .map(|root| resolve_node(root, current, current_dir))
        .collect()
}

fn resolve_node(node: &PageNode, current: &str, current_dir: &str) -> NavPage {
    let children: Vec<NavPage> = node
        .children
        .iter()
        .map(|child| resolve_node(child, current, current_dir))
        .collect();
    let is_current = node.path == current;
    // Bottom-up: a node is active when it is current or any descendant is.
    let is_active = is_current || children.iter().any(|c| c.is_active);

    NavPage {
        title: node.title.clone(),
        path: node.path.clone(),
        href: encode_href(&relative_href(current_dir, &node.path)),
        is_folder: node.is_folder,
        is_current,
        is_active,
        children,
    }
}

/// Directory portion of a canonical path; empty for root-level pages.
pub fn dir_of(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Relative path from `from_dir` to `target`: strip the longest common
/// segment prefix, emit one `..` per remaining source segment, then append
/// the target's remaining segments. An empty result falls back to the
/// target unchanged.
pub fn relative_href(from_dir: &str, target: &str) -> String {
    let from: Vec<&str> = from_dir.split('/').filter(|s| !s.is_empty()).collect();
    let to: Vec<&str> = target.split('/').filter(|s| !s.is_empty()).collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<&str> = vec![".."; from.len() - common];
    segments.extend(&to[common..]);

    if segments.is_empty() {
        target.to_string()
    } else {
        segments.join("/")
    }
}

/// Encoded relative href from one page to another, for links generated
/// outside the navigation view (folder listings, the home page).
pub fn href_between(current_page: &str, target: &str) -> String {
    encode_href(&relative_href(dir_of(current_page), target))
}

fn encode_href(href: &str) -> String {
    utf8_percent_encode(href, HREF_UNSAFE).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::build;
    use crate::scan::scan;
    use crate::test_helpers::write_source_tree;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn reference_registry(tmp: &TempDir) -> PageRegistry {
        let projects = write_source_tree(tmp.path());
        build(&projects, &scan(&projects, &[]).unwrap()).unwrap()
    }

    fn find<'a>(view: &'a [NavPage], path: &str) -> &'a NavPage {
        fn walk<'a>(pages: &'a [NavPage], path: &str) -> Option<&'a NavPage> {
            for page in pages {
                if page.path == path {
                    return Some(page);
                }
                if let Some(found) = walk(&page.children, path) {
                    return Some(found);
                }
            }
            None
        }
        walk(view, path).unwrap_or_else(|| panic!("no nav page {path}"))
    }

    // ------------------------------------------------------------------
    // relative_href
    // ------------------------------------------------------------------

    #[test]
    fn href_from_root_descends() {
        assert_eq!(
            relative_href("src1", "src1/module1/index.html"),
            "module1/index.html"
        );
    }

    #[test]
    fn href_back_to_root_climbs() {
        assert_eq!(relative_href("src1/module1", "src1/index.html"), "../index.html");
    }

    #[test]
    fn href_one_dotdot_per_level_crossed() {
        assert_eq!(
            relative_href("src1/module2/Sujet/Sous-sujet", "src1/index.html"),
            "../../../index.html"
        );
    }

    #[test]
    fn href_across_siblings() {
        assert_eq!(
            relative_href("src1/module1", "src1/module4/Special d.html"),
            "../module4/Special d.html"
        );
    }

    #[test]
    fn href_from_site_root_keeps_full_path() {
        assert_eq!(relative_href("", "src2/extra.html"), "src2/extra.html");
        assert_eq!(relative_href("", "index.html"), "index.html");
    }

    #[test]
    fn href_within_same_directory() {
        assert_eq!(relative_href("src1", "src1/readme.html"), "readme.html");
    }

    // ------------------------------------------------------------------
    // resolve_view
    // ------------------------------------------------------------------

    #[test]
    fn current_flag_set_only_on_rendered_page() {
        let tmp = TempDir::new().unwrap();
        let registry = reference_registry(&tmp);
        let view = resolve_view(&registry, "src1/module1/doc.html");

        assert!(find(&view, "src1/module1/doc.html").is_current);
        let currents: usize = registry
            .walk()
            .iter()
            .filter(|n| find(&view, &n.path).is_current)
            .count();
        assert_eq!(currents, 1);
    }

    #[test]
    fn active_propagates_through_full_ancestor_chain() {
        let tmp = TempDir::new().unwrap();
        let registry = reference_registry(&tmp);
        let view = resolve_view(&registry, "src1/module2/Sujet/Sous-sujet/deep.html");

        for path in [
            "src1/module2/Sujet/Sous-sujet/deep.html",
            "src1/module2/Sujet/Sous-sujet/index.html",
            "src1/module2/Sujet/index.html",
            "src1/module2/index.html",
            "src1/index.html",
        ] {
            assert!(find(&view, path).is_active, "{path} should be active");
        }
    }

    #[test]
    fn active_false_for_siblings_and_other_projects() {
        let tmp = TempDir::new().unwrap();
        let registry = reference_registry(&tmp);
        let view = resolve_view(&registry, "src1/module2/Sujet/Sous-sujet/deep.html");

        for path in [
            "index.html",
            "src1/readme.html",
            "src1/module1/index.html",
            "src1/module1/doc.html",
            "src1/module4/index.html",
            "src2/index.html",
            "src2/extra.html",
        ] {
            assert!(!find(&view, path).is_active, "{path} should not be active");
        }
    }

    #[test]
    fn leaf_page_is_current_and_active() {
        let tmp = TempDir::new().unwrap();
        let registry = reference_registry(&tmp);
        let view = resolve_view(&registry, "src2/extra.html");

        let extra = find(&view, "src2/extra.html");
        assert!(extra.is_current && extra.is_active);
        assert!(find(&view, "src2/index.html").is_active);
        assert!(!find(&view, "src1/index.html").is_active);
    }

    #[test]
    fn hrefs_relative_to_current_page_directory() {
        let tmp = TempDir::new().unwrap();
        let registry = reference_registry(&tmp);

        let from_home = resolve_view(&registry, "index.html");
        assert_eq!(find(&from_home, "src1/module1/index.html").href, "src1/module1/index.html");

        let from_module1 = resolve_view(&registry, "src1/module1/index.html");
        assert_eq!(find(&from_module1, "index.html").href, "../../index.html");
        assert_eq!(find(&from_module1, "src1/module1/doc.html").href, "doc.html");
    }

    #[test]
    fn spaces_percent_encoded_in_href_only() {
        let tmp = TempDir::new().unwrap();
        let registry = reference_registry(&tmp);
        let view = resolve_view(&registry, "index.html");

        let special = find(&view, "src1/module4/Special d.html");
        assert_eq!(special.href, "src1/module4/Special%20d.html");
        // Canonical path keeps the literal name
        assert_eq!(special.path, "src1/module4/Special d.html");
    }

    #[test]
    fn resolve_is_pure_and_repeatable() {
        let tmp = TempDir::new().unwrap();
        let registry = reference_registry(&tmp);

        let first = resolve_view(&registry, "src1/readme.html");
        let second = resolve_view(&registry, "src1/readme.html");
        assert_eq!(first, second);
    }

    #[test]
    fn dir_of_strips_last_segment() {
        assert_eq!(dir_of("src1/module1/doc.html"), "src1/module1");
        assert_eq!(dir_of("index.html"), "");
    }
}
