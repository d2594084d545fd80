//! Local project discovery.
//!
//! Every visible subdirectory of the project root is a local project named
//! after the directory. Directories starting with `_` or `.` hold tooling and
//! are skipped. An optional `tasksync.toml` links remote projects:
//!
//! ```toml
//! remote_projects = ["1204567890", "1209876543"]
//! output_file = "Tasks.md"
//! ```

use super::{VaultError, VaultResult};
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Per-project settings file name.
pub const PROJECT_FILE_NAME: &str = "tasksync.toml";
/// Output file name used when the project file does not name one.
pub const DEFAULT_OUTPUT_FILE: &str = "Tasks.md";

/// A project folder in the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalProject {
    /// Directory name; also the tag value that routes tasks here.
    pub name: String,
    pub output_path: PathBuf,
    /// Remote projects rendered as sections of this project's document.
    pub remote_project_ids: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectFile {
    #[serde(default)]
    remote_projects: Vec<String>,
    #[serde(default)]
    output_file: Option<String>,
}

/// Scans `root` and returns local projects sorted by name.
///
/// A missing root yields no projects.
pub fn discover_local_projects(root: &Path) -> VaultResult<Vec<LocalProject>> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(VaultError::io(root, err)),
    };

    let mut projects = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| VaultError::io(root, err))?;
        let file_type = entry
            .file_type()
            .map_err(|err| VaultError::io(entry.path(), err))?;
        if !file_type.is_dir() {
            continue;
        }

        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if name.starts_with('_') || name.starts_with('.') {
            continue;
        }

        let dir = entry.path();
        let settings = read_project_file(&dir.join(PROJECT_FILE_NAME))?;
        let output_file = settings
            .output_file
            .filter(|file| !file.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_OUTPUT_FILE.to_string());
        let remote_project_ids = settings
            .remote_projects
            .into_iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();

        projects.push(LocalProject {
            name,
            output_path: dir.join(output_file),
            remote_project_ids,
        });
    }

    projects.sort_by(|left, right| left.name.cmp(&right.name));
    debug!(
        "event=discover_projects module=vault status=ok root={} projects={}",
        root.display(),
        projects.len()
    );
    Ok(projects)
}

fn read_project_file(path: &Path) -> VaultResult<ProjectFile> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(ProjectFile::default())
        }
        Err(err) => return Err(VaultError::io(path, err)),
    };

    toml::from_str(&text).map_err(|err| VaultError::InvalidProjectFile {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}
