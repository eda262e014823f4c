// src/paths.rs

//! Path helpers: runtime-directory resolution, search-path prepending and
//! log-file naming.
//!
//! Everything here is synchronous and side-effect free apart from
//! existence/type checks on the filesystem.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Resolve the directory that should be prepended to the subprocess search
/// path for a given runtime selector.
///
/// - `None` (or an empty path): no modification, returns `None`.
/// - A regular file (the node executable itself): its containing directory.
/// - A directory: the directory, unless a `bin` subdirectory exists under it,
///   in which case that subdirectory (installations shaped `<version>/bin/`).
/// - A path that does not exist: returned unchanged as a best-effort value;
///   the spawn will surface the failure if the binary cannot be found.
pub fn resolve_runtime_dir(runtime_path: Option<&Path>) -> Option<PathBuf> {
    let path = runtime_path?;
    if path.as_os_str().is_empty() {
        return None;
    }

    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Some(
            path.parent()
                .map_or_else(|| path.to_path_buf(), Path::to_path_buf),
        ),
        Ok(_) => {
            let bin = path.join("bin");
            if bin.is_dir() {
                Some(bin)
            } else {
                Some(path.to_path_buf())
            }
        }
        Err(_) => Some(path.to_path_buf()),
    }
}

/// Compute the environment override that puts `dir` first on the search
/// path, based on this process's inherited environment.
pub fn prepend_to_search_path(dir: &Path) -> (OsString, OsString) {
    prepend_to_search_path_in(dir, std::env::vars_os())
}

/// Like [`prepend_to_search_path`], but against an explicit environment
/// snapshot. The search-path variable is matched case-insensitively
/// (`PATH` vs. Windows `Path`) and its original casing is preserved; when
/// no such variable exists, a fresh `PATH` is introduced.
pub fn prepend_to_search_path_in(
    dir: &Path,
    vars: impl IntoIterator<Item = (OsString, OsString)>,
) -> (OsString, OsString) {
    let sep = if cfg!(windows) { ";" } else { ":" };

    for (key, value) in vars {
        if key.to_string_lossy().eq_ignore_ascii_case("PATH") {
            let mut joined = dir.as_os_str().to_os_string();
            if !value.is_empty() {
                joined.push(sep);
                joined.push(&value);
            }
            return (key, joined);
        }
    }

    (OsString::from("PATH"), dir.as_os_str().to_os_string())
}

/// Replace every character outside `[A-Za-z0-9._-]` with `_`, so project and
/// script names are safe as log file name components.
pub fn sanitize_component(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Deterministic log file location for one (project, script) pair.
pub fn log_file_path(log_root: &Path, project: &str, script: &str) -> PathBuf {
    log_root.join(format!(
        "{}_{}.log",
        sanitize_component(project),
        sanitize_component(script)
    ))
}
