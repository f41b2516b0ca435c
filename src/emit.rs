//! Site emission.
//!
//! Final stage of the docmd pipeline. Takes the immutable page registry and
//! writes the static site:
//!
//! 1. Back up and clean the output directory (and the save directory when it
//!    differs). An existing tree is copied to `<dir>.<tag>.bak` first.
//! 2. Archive every scanned Markdown source into the save directory,
//!    preserving the project layout.
//! 3. Render one HTML page per registry node — leaf pages from their
//!    Markdown body, folder indexes and the home page from a generated
//!    table of contents — and write each to its canonical path.
//!
//! Scanning and registry construction complete before any page is written,
//! so rendering only reads shared immutable state. Each page writes to a
//! disjoint output path, which lets the render loop fan out across a rayon
//! worker pool without locks.
//!
//! ## Failure model
//!
//! Directory preparation and I/O failures abort the run. A template that
//! cannot be resolved at render time skips that one page: the failure is
//! recorded in the [`EmitSummary`] and every other page still generates.

use crate::config::SiteConfig;
use crate::nav;
use crate::registry::{PageNode, PageRegistry};
use crate::render::{self, PageContext};
use crate::scan::{ScanResult, SourceFile};
use maud::{Markup, PreEscaped, html};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What happened during emission.
#[derive(Debug, Default)]
pub struct EmitSummary {
    /// Pages written, by canonical path.
    pub written: Vec<String>,
    /// Markdown sources archived into the save directory.
    pub saved_sources: usize,
    /// Pages skipped with the reason (canonical path, reason).
    pub skipped: Vec<(String, String)>,
    /// Backups taken before cleaning, if any.
    pub backups: Vec<PathBuf>,
}

enum PageOutcome {
    Written(String),
    Skipped(String, String),
}

/// Emit the whole site under `work_dir`.
///
/// The output and save directories from the config are resolved relative to
/// `work_dir` (the process working directory in normal runs; a temp dir in
/// tests). An empty scan produces no output at all and touches nothing.
pub fn emit(
    config: &SiteConfig,
    scan: &ScanResult,
    registry: &PageRegistry,
    work_dir: &Path,
) -> Result<EmitSummary, EmitError> {
    let mut summary = EmitSummary::default();

    if scan.files.is_empty() {
        return Ok(summary);
    }

    let output_dir = work_dir.join(config.effective_output_dir());
    let save_dir = work_dir.join(config.effective_save_dir());

    if let Some(backup) = backup_and_clean(&output_dir)? {
        summary.backups.push(backup);
    }
    if save_dir != output_dir {
        if let Some(backup) = backup_and_clean(&save_dir)? {
            summary.backups.push(backup);
        }
        summary.saved_sources = save_sources(scan, &save_dir)?;
    }

    let sources: HashMap<&str, &SourceFile> =
        scan.files.iter().map(|f| (f.path.as_str(), f)).collect();

    // Registry and sources are read-only from here on; every page writes a
    // disjoint path, so the fan-out needs no coordination.
    let outcomes: Vec<Result<PageOutcome, EmitError>> = registry
        .walk()
        .into_par_iter()
        .map(|node| render_page(node, registry, &sources, config, &output_dir))
        .collect();

    for outcome in outcomes {
        match outcome? {
            PageOutcome::Written(path) => summary.written.push(path),
            PageOutcome::Skipped(path, reason) => summary.skipped.push((path, reason)),
        }
    }
    summary.written.sort_unstable();
    summary.skipped.sort_unstable();

    Ok(summary)
}

fn render_page(
    node: &PageNode,
    registry: &PageRegistry,
    sources: &HashMap<&str, &SourceFile>,
    config: &SiteConfig,
    output_dir: &Path,
) -> Result<PageOutcome, EmitError> {
    let Some(template) = render::lookup_template(&config.template) else {
        return Ok(PageOutcome::Skipped(
            node.path.clone(),
            format!("template '{}' not found", config.template),
        ));
    };

    let content = match sources.get(node.path.as_str()) {
        Some(file) => {
            let markdown = fs::read_to_string(&file.source_path)?;
            PreEscaped(render::markdown_to_html(&markdown))
        }
        // Synthetic pages: project/folder indexes and the site home.
        None if node.project.is_none() => home_listing(registry),
        None => folder_listing(node),
    };

    let pages = nav::resolve_view(registry, &node.path);
    let context = PageContext {
        title: &node.title,
        content,
        pages: &pages,
        current_page: &node.path,
        lang: &config.lang,
        theme_mode: &config.theme_mode,
        footer: &config.footer,
        nav_title: &config.nav_title,
    };

    let out_path = canonical_to_fs(output_dir, &node.path);
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&out_path, template(&context).into_string())?;

    Ok(PageOutcome::Written(node.path.clone()))
}

/// Table of contents for a folder-index page: links to direct children.
fn folder_listing(node: &PageNode) -> Markup {
    html! {
        div.toc {
            h2 { "Contents" }
            ul {
                @for child in &node.children {
                    li { a href=(nav::href_between(&node.path, &child.path)) { (child.title) } }
                }
            }
        }
    }
}

/// Site home: every project with its top-level pages.
fn home_listing(registry: &PageRegistry) -> Markup {
    let projects = registry.roots.iter().filter(|r| r.project.is_some());
    html! {
        div.toc {
            h2 { "Table of contents" }
            ul {
                @for project in projects {
                    li {
                        a href=(nav::href_between("index.html", &project.path)) {
                            strong { (project.title) }
                        }
                        @if !project.children.is_empty() {
                            ul {
                                @for child in &project.children {
                                    li {
                                        a href=(nav::href_between("index.html", &child.path)) {
                                            (child.title)
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Copy every scanned Markdown file into the save directory, preserving the
/// `<project>/<rel-path>` layout.
fn save_sources(scan: &ScanResult, save_dir: &Path) -> Result<usize, EmitError> {
    let mut saved = 0;
    for file in &scan.files {
        let mut dest = canonical_to_fs(save_dir, &file.path);
        dest.set_extension("md");
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&file.source_path, &dest)?;
        saved += 1;
    }
    Ok(saved)
}

/// Map a canonical page path onto the filesystem below `base`. Canonical
/// paths keep literal (unencoded) names, so this is a plain segment join.
fn canonical_to_fs(base: &Path, canonical: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    for segment in canonical.split('/') {
        path.push(segment);
    }
    path
}

/// Back up an existing directory to `<dir>.<tag>.bak`, remove it, and
/// recreate it empty. Returns the backup path when one was taken.
fn backup_and_clean(dir: &Path) -> Result<Option<PathBuf>, EmitError> {
    let mut backup = None;
    if dir.exists() {
        let tag = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let bak = PathBuf::from(format!("{}.{}.bak", dir.display(), tag));
        copy_dir_recursive(dir, &bak)?;
        fs::remove_dir_all(dir)?;
        backup = Some(bak);
    }
    fs::create_dir_all(dir)?;
    Ok(backup)
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}
