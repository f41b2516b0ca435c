//! Shared test fixtures.
//!
//! Builds the reference source tree used across scanner, registry, nav, and
//! emitter tests: two projects, nested folders with accented names, an empty
//! directory, and a filename containing a space.
//!
//! ```text
//! src1/
//! ├── readme.md
//! ├── module1/doc.md
//! ├── module2/Sujet/Sous-sujet/deep.md
//! ├── module3/              (empty — must produce no node)
//! └── module4/Special d.md
//! src2/
//! └── extra.md
//! ```

use crate::config::Project;
use std::fs;
use std::path::{Path, PathBuf};

/// A project spec with no per-project excludes.
pub fn project_spec(path: PathBuf, name: &str) -> Project {
    Project {
        path,
        name: name.to_string(),
        excludes: Vec::new(),
    }
}

/// Create the reference tree under `base` and return the project list.
pub fn write_source_tree(base: &Path) -> Vec<Project> {
    let src1 = base.join("src1");
    fs::create_dir_all(src1.join("module1")).unwrap();
    fs::create_dir_all(src1.join("module2/Sujet/Sous-sujet")).unwrap();
    fs::create_dir_all(src1.join("module3")).unwrap();
    fs::create_dir_all(src1.join("module4")).unwrap();
    fs::write(src1.join("readme.md"), "# README at root").unwrap();
    fs::write(src1.join("module1/doc.md"), "# Doc in module1").unwrap();
    fs::write(
        src1.join("module2/Sujet/Sous-sujet/deep.md"),
        "# Deep doc",
    )
    .unwrap();
    fs::write(src1.join("module4/Special d.md"), "# File with spaces").unwrap();

    let src2 = base.join("src2");
    fs::create_dir_all(&src2).unwrap();
    fs::write(src2.join("extra.md"), "# Extra doc").unwrap();

    vec![project_spec(src1, "src1"), project_spec(src2, "src2")]
}
