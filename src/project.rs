// src/project.rs

//! Node.js project discovery.
//!
//! A project is any directory with a `package.json`; the runner only needs
//! its name, its declared script names, and (when present) the package
//! manager pinned by the `packageManager` field.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::{Result, RunnerError};
use crate::types::PackageManager;

/// What the runner needs to know about a project directory.
#[derive(Debug, Clone)]
pub struct ProjectRecord {
    pub name: String,
    pub path: PathBuf,
    /// Declared script names, sorted.
    pub scripts: Vec<String>,
    pub package_manager: PackageManager,
}

impl ProjectRecord {
    pub fn has_script(&self, script: &str) -> bool {
        self.scripts.iter().any(|s| s == script)
    }
}

#[derive(Debug, Deserialize)]
struct PackageJson {
    name: Option<String>,
    #[serde(default)]
    scripts: BTreeMap<String, String>,
    #[serde(rename = "packageManager")]
    package_manager: Option<String>,
}

/// Read `<dir>/package.json` and build a [`ProjectRecord`].
///
/// The project name falls back to the directory name when the manifest has
/// none; the package manager is detected from the `packageManager` field's
/// `name@version` prefix, defaulting to npm.
pub fn scan_project(dir: &Path) -> Result<ProjectRecord> {
    let manifest = dir.join("package.json");
    if !manifest.exists() {
        return Err(RunnerError::Project(format!(
            "package.json not found in {}",
            dir.display()
        )));
    }

    let content = std::fs::read_to_string(&manifest)?;
    let pkg: PackageJson = serde_json::from_str(&content).map_err(|err| {
        RunnerError::Project(format!("invalid package.json in {}: {err}", dir.display()))
    })?;

    let scripts: Vec<String> = pkg.scripts.into_keys().collect();

    let name = pkg
        .name
        .filter(|n| !n.is_empty())
        .or_else(|| {
            dir.file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "project".to_string());

    // "pnpm@9.1.0" style; unknown managers fall back to npm.
    let package_manager = pkg
        .package_manager
        .as_deref()
        .and_then(|field| field.split('@').next())
        .and_then(|pm| pm.parse().ok())
        .unwrap_or_default();

    Ok(ProjectRecord {
        name,
        path: dir.to_path_buf(),
        scripts,
        package_manager,
    })
}
