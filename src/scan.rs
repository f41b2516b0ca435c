//! Filesystem scanning for Markdown sources.
//!
//! Stage 1 of the docmd pipeline. Walks every configured project root,
//! applies the exclusion rules, and produces a flat list of source-file
//! records plus, per project, the set of directories that contain at least
//! one Markdown file somewhere beneath them. Those directories are the
//! candidates for synthetic folder-index nodes in the page registry.
//!
//! ## Canonical Paths
//!
//! Every page in the generated site is identified by a canonical path: the
//! project name, then the project-relative path with forward slashes and an
//! `.html` suffix:
//!
//! ```text
//! src1/readme.html
//! src1/module2/Sujet/Sous-sujet/deep.html
//! ```
//!
//! Canonical paths are unique across all projects because project names are
//! unique (enforced by config validation).
//!
//! ## Exclusion Rules
//!
//! Exclusions are literal paths, not globs. A rule excludes a file when the
//! rule equals the file's path or is one of the file's ancestor directories.
//! Per-project rules are unioned with the global list. Rules are compared
//! against paths exactly as walked, i.e. rooted at the configured project
//! path.
//!
//! ## Ordering
//!
//! The walk itself guarantees no ordering; sibling ordering in the site is
//! imposed later by the registry's canonical-path sort. Folder sets preserve
//! discovery order and are deduplicated.
//!
//! The scan is a pure read of the filesystem — no writes, no side effects.

use crate::config::Project;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Project root does not exist: {0}")]
    MissingRoot(PathBuf),
}

/// One discovered Markdown file. Created once per scan, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct SourceFile {
    /// Path on disk, as walked (project root joined with the relative path).
    pub source_path: PathBuf,
    /// Canonical page path: `<project>/<rel-path>.html`, forward slashes.
    pub path: String,
    /// Page title: the file stem, verbatim.
    pub title: String,
    /// Canonical path of the containing directory (`<project>/<rel-dir>`),
    /// or `None` when the file sits at the project root.
    pub parent: Option<String>,
    /// Name of the project this file belongs to.
    pub project: String,
}

/// Output of a scan: the flat file list plus per-project folder sets.
#[derive(Debug, Default, Serialize)]
pub struct ScanResult {
    pub files: Vec<SourceFile>,
    /// Project name → project-relative directories (forward slashes) that
    /// contain at least one Markdown file at any depth. Discovery order,
    /// deduplicated.
    pub folders: BTreeMap<String, Vec<String>>,
}

/// Scan every project for Markdown files.
///
/// A missing project root is fatal: the registry must be built from a
/// complete scan or not at all.
pub fn scan(projects: &[Project], global_excludes: &[PathBuf]) -> Result<ScanResult, ScanError> {
    let mut result = ScanResult::default();

    for project in projects {
        if !project.path.is_dir() {
            return Err(ScanError::MissingRoot(project.path.clone()));
        }

        let mut excludes: Vec<PathBuf> = global_excludes.to_vec();
        excludes.extend(project.excludes.iter().cloned());

        let folders = result.folders.entry(project.name.clone()).or_default();

        for entry in WalkDir::new(&project.path) {
            let entry = entry?;
            if !entry.file_type().is_file() || !is_markdown(entry.path()) {
                continue;
            }
            if should_exclude(entry.path(), &excludes) {
                continue;
            }

            // strip_prefix cannot fail: the walk is rooted at project.path
            let rel = entry
                .path()
                .strip_prefix(&project.path)
                .expect("walked path outside project root");
            let rel_dir = rel.parent().filter(|p| !p.as_os_str().is_empty());

            // Record the containing directory and every ancestor up to (not
            // including) the project root, once each, in discovery order.
            if let Some(dir) = rel_dir {
                for ancestor in ancestor_chain(dir) {
                    if !folders.contains(&ancestor) {
                        folders.push(ancestor);
                    }
                }
            }

            let stem = entry
                .path()
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let mut canonical = PathBuf::from(rel);
            canonical.set_extension("html");

            result.files.push(SourceFile {
                source_path: entry.path().to_path_buf(),
                path: format!("{}/{}", project.name, to_slash(&canonical)),
                title: stem,
                parent: rel_dir.map(|d| format!("{}/{}", project.name, to_slash(d))),
                project: project.name.clone(),
            });
        }
    }

    Ok(result)
}

/// Whether a file or directory is excluded by any rule.
///
/// A rule matches when it equals the path or is one of the path's ancestor
/// directories. Literal comparison only — no glob patterns.
pub fn should_exclude(path: &Path, excludes: &[PathBuf]) -> bool {
    excludes
        .iter()
        .any(|rule| path == rule || path.ancestors().skip(1).any(|a| a == rule))
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

/// Path with components joined by `/` regardless of platform separator.
pub(crate) fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// All prefixes of a relative directory, shortest first:
/// `module2/Sujet` → `["module2", "module2/Sujet"]`.
fn ancestor_chain(dir: &Path) -> Vec<String> {
    let mut chain = Vec::new();
    let mut prefix = String::new();
    for component in dir.components() {
        if !prefix.is_empty() {
            prefix.push('/');
        }
        prefix.push_str(&component.as_os_str().to_string_lossy());
        chain.push(prefix.clone());
    }
    chain
}
