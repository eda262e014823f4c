// tests/paths.rs

use std::ffi::OsString;
use std::fs;
use std::path::Path;

use noderun::paths;
use tempfile::TempDir;

#[test]
fn empty_runtime_means_no_search_path_change() {
    assert_eq!(paths::resolve_runtime_dir(None), None);
    assert_eq!(paths::resolve_runtime_dir(Some(Path::new(""))), None);
}

#[test]
fn runtime_file_resolves_to_parent_directory() {
    let dir = TempDir::new().unwrap();
    let node = dir.path().join("node");
    fs::write(&node, "").unwrap();

    let resolved = paths::resolve_runtime_dir(Some(&node));
    assert_eq!(resolved.as_deref(), Some(dir.path()));
}

#[test]
fn runtime_directory_with_bin_resolves_to_bin() {
    let dir = TempDir::new().unwrap();
    let version_dir = dir.path().join("v20.11.0");
    fs::create_dir_all(version_dir.join("bin")).unwrap();

    let resolved = paths::resolve_runtime_dir(Some(&version_dir));
    assert_eq!(resolved, Some(version_dir.join("bin")));
}

#[test]
fn runtime_directory_without_bin_resolves_to_itself() {
    let dir = TempDir::new().unwrap();
    let version_dir = dir.path().join("v20.11.0");
    fs::create_dir_all(&version_dir).unwrap();

    let resolved = paths::resolve_runtime_dir(Some(&version_dir));
    assert_eq!(resolved, Some(version_dir));
}

#[test]
fn missing_runtime_path_is_returned_unchanged() {
    let dir = TempDir::new().unwrap();
    let ghost = dir.path().join("does-not-exist");

    let resolved = paths::resolve_runtime_dir(Some(&ghost));
    assert_eq!(resolved, Some(ghost));
}

#[test]
fn search_path_prepend_preserves_variable_casing() {
    let vars = vec![(OsString::from("Path"), OsString::from("/usr/bin"))];
    let (key, value) = paths::prepend_to_search_path_in(Path::new("/opt/node/bin"), vars);

    assert_eq!(key, OsString::from("Path"));
    let sep = if cfg!(windows) { ';' } else { ':' };
    assert_eq!(
        value.to_string_lossy(),
        format!("/opt/node/bin{sep}/usr/bin")
    );
}

#[test]
fn search_path_prepend_without_existing_variable_introduces_path() {
    let vars = vec![(OsString::from("HOME"), OsString::from("/home/dev"))];
    let (key, value) = paths::prepend_to_search_path_in(Path::new("/opt/node/bin"), vars);

    assert_eq!(key, OsString::from("PATH"));
    assert_eq!(value, OsString::from("/opt/node/bin"));
}

#[test]
fn sanitize_replaces_unsafe_characters() {
    assert_eq!(paths::sanitize_component("my app!"), "my_app_");
    assert_eq!(paths::sanitize_component("build:watch"), "build_watch");
    assert_eq!(paths::sanitize_component("ok-1.2_x"), "ok-1.2_x");
}

#[test]
fn log_file_path_is_deterministic_per_project_and_script() {
    let root = Path::new("/var/log/noderun");
    let path = paths::log_file_path(root, "my app", "build:watch");
    assert_eq!(path, root.join("my_app_build_watch.log"));
}
