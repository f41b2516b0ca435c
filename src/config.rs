//! Site configuration module.
//!
//! Handles loading and validating `docmd.toml`. A single config file describes
//! the projects to scan, the exclusion rules, the output locations, and the
//! cosmetic fields handed to the page template.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! lang = "en"               # HTML lang attribute
//! output_dir = "docs"       # Where the generated site is written
//! save_dir = "docs"         # Where scanned .md sources are archived
//! template = "default"      # Page template name
//! theme_mode = "light"      # "light" or "dark"
//! nav_title = "Documentation"
//! footer = ""
//!
//! # Paths excluded from every project (literal paths, not globs).
//! exclude_paths = [".git", ".hg"]
//!
//! # One or more source trees to scan.
//! [[projects]]
//! path = "src"              # Project root directory
//! name = "src"              # Display name; first segment of every page path
//! excludes = []             # Per-project exclusions, unioned with the global list
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want. Unknown keys
//! are rejected to catch typos early.
//!
//! ## Output Directory Safety
//!
//! `output_dir` and `save_dir` must be relative, non-empty paths that are not
//! `.`, `..`, or a filesystem root. An unsafe `output_dir` falls back to the
//! default `docs`; an unsafe `save_dir` falls back to the output directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// A source tree to scan for Markdown files.
///
/// The project name becomes the first segment of every page path under it,
/// so names must be unique across the config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    /// Root directory of the source tree.
    pub path: PathBuf,
    /// Display name, also the URL segment for the project's pages.
    pub name: String,
    /// Per-project exclusions, unioned with the global `exclude_paths`.
    #[serde(default)]
    pub excludes: Vec<PathBuf>,
}

/// Site configuration loaded from `docmd.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Source trees to scan.
    pub projects: Vec<Project>,
    /// Paths excluded from every project.
    pub exclude_paths: Vec<PathBuf>,
    /// Where the generated site is written.
    pub output_dir: PathBuf,
    /// Where scanned Markdown sources are archived. When equal to
    /// `output_dir` the archive step is skipped.
    pub save_dir: PathBuf,
    /// Page template name, resolved at render time.
    pub template: String,
    /// HTML `lang` attribute.
    pub lang: String,
    /// Color scheme hint passed to the template ("light" or "dark").
    pub theme_mode: String,
    /// Footer text.
    pub footer: String,
    /// Heading above the navigation sidebar.
    pub nav_title: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            projects: vec![Project {
                path: PathBuf::from("src"),
                name: "src".to_string(),
                excludes: Vec::new(),
            }],
            exclude_paths: vec![PathBuf::from(".git"), PathBuf::from(".hg")],
            output_dir: PathBuf::from("docs"),
            save_dir: PathBuf::from("docs"),
            template: "default".to_string(),
            lang: "en".to_string(),
            theme_mode: "light".to_string(),
            footer: String::new(),
            nav_title: "Documentation".to_string(),
        }
    }
}

impl SiteConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.projects.is_empty() {
            return Err(ConfigError::Validation(
                "at least one [[projects]] entry is required".into(),
            ));
        }
        for project in &self.projects {
            if project.name.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "project {} has an empty name",
                    project.path.display()
                )));
            }
            if project.name.contains('/') {
                return Err(ConfigError::Validation(format!(
                    "project name '{}' must not contain '/'",
                    project.name
                )));
            }
        }
        let mut names: Vec<&str> = self.projects.iter().map(|p| p.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        if names.len() != self.projects.len() {
            return Err(ConfigError::Validation(
                "project names must be unique".into(),
            ));
        }
        if self.template.is_empty() {
            return Err(ConfigError::Validation("template must not be empty".into()));
        }
        Ok(())
    }

    /// The output directory, falling back to the default when the configured
    /// value is unsafe.
    pub fn effective_output_dir(&self) -> PathBuf {
        if is_safe_dir(&self.output_dir) {
            self.output_dir.clone()
        } else {
            PathBuf::from("docs")
        }
    }

    /// The save directory, falling back to the output directory when the
    /// configured value is unsafe.
    pub fn effective_save_dir(&self) -> PathBuf {
        if is_safe_dir(&self.save_dir) {
            self.save_dir.clone()
        } else {
            self.effective_output_dir()
        }
    }
}

/// Whether a directory is acceptable as a write target.
///
/// Rejects empty paths, `.`, `..`, absolute paths, and anything reaching
/// outside the working directory. The generator removes and recreates its
/// output directories, so this guard runs before anything is deleted.
pub fn is_safe_dir(dir: &Path) -> bool {
    if dir.as_os_str().is_empty() || dir.is_absolute() {
        return false;
    }
    let components: Vec<Component> = dir.components().collect();
    if components.is_empty() || components == [Component::CurDir] {
        return false;
    }
    !components.iter().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}

/// Load config from `docmd.toml` at the given path, or defaults if absent.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let config = if path.exists() {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)?
    } else {
        SiteConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Stock `docmd.toml` with all options documented, for `docmd gen-config`.
pub fn stock_config_toml() -> String {
    r##"# docmd configuration. All options are optional - defaults shown.

lang = "en"               # HTML lang attribute
output_dir = "docs"       # Where the generated site is written
save_dir = "docs"         # Where scanned .md sources are archived
template = "default"      # Page template name
theme_mode = "light"      # "light" or "dark"
nav_title = "Documentation"
footer = ""

# Paths excluded from every project (literal paths, not globs). A rule
# excludes a file when it equals the file's path or one of its ancestor
# directories.
exclude_paths = [".git", ".hg"]

# One or more source trees to scan. Each project's pages live under its
# name in the generated site, so names must be unique.
[[projects]]
path = "src"
name = "src"
excludes = []
"##
    .to_string()
}
