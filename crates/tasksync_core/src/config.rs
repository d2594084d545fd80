//! Configuration file and environment resolution.
//!
//! # Responsibility
//! - Load the optional TOML config file.
//! - Overlay environment variables and apply defaults.
//! - Report missing credentials before any remote call is made.
//!
//! # Invariants
//! - Environment values win over file values; blank values count as unset.
//! - Secrets are never included in `Display` output or log lines.

use chrono::{DateTime, Duration, Local};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Custom field read for the classification tag unless configured otherwise.
pub const DEFAULT_TAG_FIELD: &str = "案件";
pub const DEFAULT_COMPLETED_LOOKBACK_DAYS: u32 = 7;
pub const ENV_TOKEN: &str = "ASANA_TOKEN";
pub const ENV_USER_GID: &str = "ASANA_USER_GID";
pub const ENV_WORKSPACE_GID: &str = "ASANA_WORKSPACE_GID";
pub const ENV_PROJECTS_ROOT: &str = "TASKSYNC_PROJECTS_ROOT";

const CONFIG_DIR_NAME: &str = "tasksync";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_PERSONAL_FILE: &str = "_Personal Tasks.md";
const DEFAULT_SUMMARY_FILE: &str = "_Task Summary.md";
const DEFAULT_VIEW_FILE: &str = "asana-tasks-view.md";

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration failure; always fatal before any side effect.
#[derive(Debug)]
pub enum ConfigError {
    /// A required value is set neither in the file nor in the environment.
    MissingValue {
        key: &'static str,
        env: Option<&'static str>,
    },
    /// No platform config directory and no explicit `--config` path.
    NoConfigDir,
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingValue { key, env: Some(env) } => write!(
                f,
                "missing required setting `{key}`; set it in the config file or via {env}"
            ),
            Self::MissingValue { key, env: None } => {
                write!(f, "missing required setting `{key}` in the config file")
            }
            Self::NoConfigDir => write!(f, "could not determine the user config directory"),
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "failed to parse config `{}`: {message}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Raw config file contents; every key optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub asana_token: Option<String>,
    pub user_gid: Option<String>,
    pub workspace_gid: Option<String>,
    pub projects_root: Option<String>,
    #[serde(default)]
    pub personal_projects: Vec<String>,
    pub tag_field: Option<String>,
    pub personal_file: Option<String>,
    pub summary_file: Option<String>,
    pub view_file: Option<String>,
    pub completed_lookback_days: Option<u32>,
}

/// Returns `<config_dir>/tasksync/config.toml`.
pub fn default_config_path() -> ConfigResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

/// Loads the config file.
///
/// With no explicit path, a missing default file yields defaults. An explicit
/// path must exist.
pub fn load_config_file(explicit: Option<&Path>) -> ConfigResult<ConfigFile> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };

    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && explicit.is_none() => {
            return Ok(ConfigFile::default())
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    parse_config(&text).map_err(|message| ConfigError::Parse { path, message })
}

/// Parses config file text.
pub fn parse_config(text: &str) -> Result<ConfigFile, String> {
    toml::from_str(text).map_err(|err| err.to_string())
}

/// Resolved settings used by the sync and view runs.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub asana_token: String,
    pub user_gid: Option<String>,
    pub workspace_gid: Option<String>,
    pub projects_root: Option<PathBuf>,
    /// Remote projects forming the personal pool routed by tag.
    pub personal_projects: Vec<String>,
    pub tag_field: String,
    pub personal_file: Option<PathBuf>,
    pub summary_file: Option<PathBuf>,
    pub view_file: PathBuf,
    /// `0` restricts fetches to incomplete tasks.
    pub completed_lookback_days: u32,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("asana_token", &"<redacted>")
            .field("user_gid", &self.user_gid)
            .field("workspace_gid", &self.workspace_gid)
            .field("projects_root", &self.projects_root)
            .field("personal_projects", &self.personal_projects)
            .field("tag_field", &self.tag_field)
            .field("personal_file", &self.personal_file)
            .field("summary_file", &self.summary_file)
            .field("view_file", &self.view_file)
            .field("completed_lookback_days", &self.completed_lookback_days)
            .finish()
    }
}

impl Settings {
    /// Overlays `env` on `file` and applies defaults.
    ///
    /// `env` is injected so resolution stays testable without process state.
    pub fn resolve(file: ConfigFile, env: &dyn Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let lookup = |name: &str| env(name).filter(|value| !value.trim().is_empty());

        let asana_token = lookup(ENV_TOKEN)
            .or(non_blank(file.asana_token))
            .ok_or(ConfigError::MissingValue {
                key: "asana_token",
                env: Some(ENV_TOKEN),
            })?;

        let projects_root = lookup(ENV_PROJECTS_ROOT)
            .or(non_blank(file.projects_root))
            .map(|value| expand_home(&value));

        let view_file = non_blank(file.view_file)
            .map(|value| expand_home(&value))
            .unwrap_or_else(default_view_file);

        Ok(Self {
            asana_token,
            user_gid: lookup(ENV_USER_GID).or(non_blank(file.user_gid)),
            workspace_gid: lookup(ENV_WORKSPACE_GID).or(non_blank(file.workspace_gid)),
            projects_root,
            personal_projects: file
                .personal_projects
                .into_iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
            tag_field: non_blank(file.tag_field).unwrap_or_else(|| DEFAULT_TAG_FIELD.to_string()),
            personal_file: non_blank(file.personal_file).map(|value| expand_home(&value)),
            summary_file: non_blank(file.summary_file).map(|value| expand_home(&value)),
            view_file,
            completed_lookback_days: file
                .completed_lookback_days
                .unwrap_or(DEFAULT_COMPLETED_LOOKBACK_DAYS),
        })
    }

    /// Resolves from the real process environment.
    pub fn from_process_env(file: ConfigFile) -> ConfigResult<Self> {
        Self::resolve(file, &|name| std::env::var(name).ok())
    }

    pub fn require_user_gid(&self) -> ConfigResult<&str> {
        self.user_gid.as_deref().ok_or(ConfigError::MissingValue {
            key: "user_gid",
            env: Some(ENV_USER_GID),
        })
    }

    pub fn require_projects_root(&self) -> ConfigResult<&Path> {
        self.projects_root
            .as_deref()
            .ok_or(ConfigError::MissingValue {
                key: "projects_root",
                env: Some(ENV_PROJECTS_ROOT),
            })
    }

    /// Catch-all document path; defaults inside the project root.
    pub fn personal_file_path(&self) -> ConfigResult<PathBuf> {
        match &self.personal_file {
            Some(path) => Ok(path.clone()),
            None => Ok(self.require_projects_root()?.join(DEFAULT_PERSONAL_FILE)),
        }
    }

    /// Summary document path; defaults inside the project root.
    pub fn summary_file_path(&self) -> ConfigResult<PathBuf> {
        match &self.summary_file {
            Some(path) => Ok(path.clone()),
            None => Ok(self.require_projects_root()?.join(DEFAULT_SUMMARY_FILE)),
        }
    }

    /// Lower bound passed to the remote as `completed_since`.
    pub fn completed_since(&self, now: DateTime<Local>) -> String {
        if self.completed_lookback_days == 0 {
            return "now".to_string();
        }
        (now - Duration::days(i64::from(self.completed_lookback_days))).to_rfc3339()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn expand_home(value: &str) -> PathBuf {
    if let Some(rest) = value.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if value == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(value)
}

fn default_view_file() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join("Box").join("Obsidian-Vault").join(DEFAULT_VIEW_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_VIEW_FILE))
}
