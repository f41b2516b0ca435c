//! CLI output formatting.
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! ## Scan
//!
//! ```text
//! Projects
//! 001 src1 (4 pages, 5 folders)
//!     Source: /home/me/project/src
//! 002 src2 (1 page)
//!     Source: /home/me/other/src
//! ```
//!
//! ## Registry
//!
//! ```text
//! Home → index.html
//! src1 → src1/index.html
//!     module1 → src1/module1/index.html
//!         doc → src1/module1/doc.html
//!     readme → src1/readme.html
//! ```
//!
//! ## Emit
//!
//! ```text
//! Backed up docs.1724900000.bak
//! Saved 5 markdown sources
//! Generated 13 pages
//! ```

use crate::config::Project;
use crate::emit::EmitSummary;
use crate::registry::{PageNode, PageRegistry};
use crate::scan::ScanResult;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn count_noun(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Format scan output: one entry per project with page and folder counts.
pub fn format_scan_output(projects: &[Project], result: &ScanResult) -> Vec<String> {
    let mut lines = vec!["Projects".to_string()];
    for (i, project) in projects.iter().enumerate() {
        let pages = result
            .files
            .iter()
            .filter(|f| f.project == project.name)
            .count();
        let folders = result
            .folders
            .get(&project.name)
            .map(Vec::len)
            .unwrap_or(0);
        let mut header = format!(
            "{} {} ({}",
            format_index(i + 1),
            project.name,
            count_noun(pages, "page")
        );
        if folders > 0 {
            header.push_str(&format!(", {}", count_noun(folders, "folder")));
        }
        header.push(')');
        lines.push(header);
        lines.push(format!("    Source: {}", project.path.display()));
    }
    lines
}

/// Format the registry as an indented `title → path` tree.
pub fn format_registry_output(registry: &PageRegistry) -> Vec<String> {
    let mut lines = Vec::new();
    for root in &registry.roots {
        format_node(root, 0, &mut lines);
    }
    lines.push(count_noun(registry.page_count(), "page"));
    lines
}

fn format_node(node: &PageNode, depth: usize, lines: &mut Vec<String>) {
    lines.push(format!("{}{} → {}", indent(depth), node.title, node.path));
    for child in &node.children {
        format_node(child, depth + 1, lines);
    }
}

/// Format the emit summary: backups, archive count, written and skipped pages.
pub fn format_emit_output(summary: &EmitSummary) -> Vec<String> {
    let mut lines = Vec::new();
    for backup in &summary.backups {
        lines.push(format!("Backed up {}", backup.display()));
    }
    if summary.saved_sources > 0 {
        lines.push(format!(
            "Saved {}",
            count_noun(summary.saved_sources, "markdown source")
        ));
    }
    lines.push(format!(
        "Generated {}",
        count_noun(summary.written.len(), "page")
    ));
    if !summary.skipped.is_empty() {
        lines.push(format!(
            "Skipped {}:",
            count_noun(summary.skipped.len(), "page")
        ));
        for (path, reason) in &summary.skipped {
            lines.push(format!("    {path}: {reason}"));
        }
    }
    lines
}

pub fn print_scan_output(projects: &[Project], result: &ScanResult) {
    for line in format_scan_output(projects, result) {
        println!("{line}");
    }
}

pub fn print_registry_output(registry: &PageRegistry) {
    for line in format_registry_output(registry) {
        println!("{line}");
    }
}

pub fn print_emit_output(summary: &EmitSummary) {
    for line in format_emit_output(summary) {
        println!("{line}");
    }
}
