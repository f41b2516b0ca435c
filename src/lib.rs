//! # docmd
//!
//! Generate a static documentation website from the Markdown files scattered
//! through one or more source-code trees. Your repositories are the data
//! source: every `.md` file becomes a page, every directory that contains
//! documentation becomes a navigable section, and the whole thing is written
//! out as a self-contained static site with relative links.
//!
//! # Architecture: Four-Stage Pipeline
//!
//! ```text
//! 1. Scan      projects   →  ScanResult     (filesystem → file records + folder sets)
//! 2. Registry  ScanResult →  PageRegistry   (canonical, viewer-independent page forest)
//! 3. Nav       PageRegistry + current page → NavigationView   (per-render projection)
//! 4. Emit      registry   →  docs/          (markdown → HTML, one file per page)
//! ```
//!
//! Stages 1 and 2 run once and must complete before anything renders: the
//! registry is the single source of truth for every page and is immutable
//! from then on. Stage 3 runs once per rendered page and is a pure function
//! of the registry and the page's canonical path, which is what lets stage 4
//! fan the per-page work out across a rayon pool without locks.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1 — walks project roots, applies exclusion rules, records Markdown files and folder sets |
//! | [`registry`] | Stage 2 — builds the page forest: project roots, synthetic folder indexes, site home |
//! | [`nav`] | Stage 3 — per-page navigation view: relative hrefs, percent-encoding, current/active flags |
//! | [`emit`] | Stage 4 — backup/clean output dirs, archive sources, render and write every page |
//! | [`render`] | Markdown→HTML conversion and the named maud page templates |
//! | [`config`] | `docmd.toml` loading, validation, and output-directory safety |
//! | [`output`] | CLI output formatting — per-stage summaries |
//!
//! # Design Decisions
//!
//! ## Canonical Paths
//!
//! Every page has one canonical identity: `<project>/<relative-path>.html`
//! with forward slashes, assigned at scan time and never recomputed. The
//! registry, the navigation resolver, and the emitter all key off it, so a
//! page's on-disk location, its nav entry, and its hyperlinks can never
//! disagree. Names stay literal on disk; percent-encoding happens only when
//! an href is written into HTML.
//!
//! ## Synthetic Folder Indexes
//!
//! A directory gets an `index.html` node iff it contains at least one
//! Markdown file at any depth. This is an invariant, not a heuristic: empty
//! directories and directories with no Markdown descendants are invisible to
//! the site, so the navigation never dead-ends in an empty section.
//!
//! ## Relative Links Everywhere
//!
//! The generated site never assumes a mount point. Every href is computed
//! relative to the page being written, so the output works from `file://`,
//! from a sub-path behind a reverse proxy, or from a bare S3 bucket.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/) compile-time
//! templates: malformed HTML is a build error, interpolation is auto-escaped,
//! and there is no template directory to ship. Templates are still selected
//! by name at render time, so a bad `template` config value degrades to
//! per-page skips instead of a crash.

pub mod config;
pub mod emit;
pub mod nav;
pub mod output;
pub mod registry;
pub mod render;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
