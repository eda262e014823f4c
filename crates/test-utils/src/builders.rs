#![allow(dead_code)]

use std::path::{Path, PathBuf};

use noderun::types::{PackageManager, RunRequest};

/// Builder for `RunRequest` to simplify test setup.
///
/// The script name defaults to the suffix of the run id
/// (`"project:script"`), matching the identity convention.
pub struct RunRequestBuilder {
    request: RunRequest,
}

impl RunRequestBuilder {
    pub fn new(run_id: &str) -> Self {
        let script = run_id
            .split_once(':')
            .map_or("build", |(_, script)| script)
            .to_string();
        Self {
            request: RunRequest {
                run_id: run_id.to_string(),
                working_dir: PathBuf::from("."),
                script_name: script,
                package_manager: PackageManager::Npm,
                runtime_path: None,
            },
        }
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.request.working_dir = dir.into();
        self
    }

    pub fn script(mut self, script: &str) -> Self {
        self.request.script_name = script.to_string();
        self
    }

    pub fn package_manager(mut self, pm: PackageManager) -> Self {
        self.request.package_manager = pm;
        self
    }

    pub fn runtime_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.request.runtime_path = Some(path.into());
        self
    }

    pub fn build(self) -> RunRequest {
        self.request
    }
}

/// Write a minimal `package.json` into `dir`, with one `echo` script per
/// given name.
pub fn write_package_json(dir: &Path, name: &str, scripts: &[&str]) {
    let entries: Vec<String> = scripts
        .iter()
        .map(|s| format!("\"{s}\": \"echo {s}\""))
        .collect();
    let content = format!(
        "{{\n  \"name\": \"{name}\",\n  \"scripts\": {{ {} }}\n}}\n",
        entries.join(", ")
    );
    std::fs::write(dir.join("package.json"), content).expect("write package.json");
}
