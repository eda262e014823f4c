use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

/// Canonical run identity type: `"<projectId>:<scriptName>"`.
///
/// The same project can have several scripts running concurrently; the
/// script-name suffix keeps their identities distinct.
pub type RunId = String;

/// Compose the run identity for one (project, script) pair.
pub fn run_id(project_id: &str, script_name: &str) -> RunId {
    format!("{project_id}:{script_name}")
}

/// The project component of a run identity.
pub fn project_of(run_id: &str) -> &str {
    run_id.split_once(':').map_or(run_id, |(project, _)| project)
}

/// Package managers the runner knows how to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
    Cnpm,
}

impl PackageManager {
    /// The executable name, as launched through the platform shell.
    pub fn command(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Cnpm => "cnpm",
        }
    }
}

impl Default for PackageManager {
    fn default() -> Self {
        PackageManager::Npm
    }
}

impl FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "npm" => Ok(PackageManager::Npm),
            "yarn" => Ok(PackageManager::Yarn),
            "pnpm" => Ok(PackageManager::Pnpm),
            "cnpm" => Ok(PackageManager::Cnpm),
            other => Err(format!(
                "invalid package manager: {other} (expected \"npm\", \"yarn\", \"pnpm\" or \"cnpm\")"
            )),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// Everything needed to launch one script run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Unique identity while the run is active; see [`run_id`].
    pub run_id: RunId,
    /// Project directory the subprocess starts in. Must exist.
    pub working_dir: PathBuf,
    /// Key of the project's `scripts` table.
    pub script_name: String,
    pub package_manager: PackageManager,
    /// Node installation to put first on the subprocess search path.
    /// `None` means "whatever the inherited search path finds first".
    pub runtime_path: Option<PathBuf>,
}
