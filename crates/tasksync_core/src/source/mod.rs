//! Remote task source contract and boundary helpers.
//!
//! # Responsibility
//! - Define the read-only SPI the sync run pulls tasks through.
//! - Absorb per-project fetch failures so one bad project does not end a run.
//!
//! # Invariants
//! - Sources never mutate remote data.
//! - `fetch_tasks_or_empty` and `project_name_or_id` never return errors.

pub mod asana;

use crate::model::task::Task;
use log::warn;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SourceResult<T> = Result<T, SourceError>;

/// Remote fetch failure.
#[derive(Debug)]
pub enum SourceError {
    /// Transport, TLS, timeout, or body decoding failure.
    Http(reqwest::Error),
    /// Remote answered with a non-success status.
    Status { status: u16, message: String },
    /// Expected remote object is absent.
    NotFound(String),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "remote request failed: {err}"),
            Self::Status { status, message } => {
                write!(f, "remote returned status {status}: {message}")
            }
            Self::NotFound(what) => write!(f, "remote object not found: {what}"),
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Status { .. } => None,
            Self::NotFound(_) => None,
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// Workspace reference returned by workspace discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceRef {
    pub gid: String,
    #[serde(default)]
    pub name: String,
}

/// Read-only access to remote tasks.
pub trait TaskSource {
    /// Returns all tasks of one remote project, completed ones included.
    fn project_tasks(&self, project_id: &str) -> SourceResult<Vec<Task>>;
    /// Returns the display name of one remote project.
    fn project_name(&self, project_id: &str) -> SourceResult<String>;
    /// Returns tasks assigned to the authenticated user in `workspace_id`.
    fn my_tasks(&self, workspace_id: &str) -> SourceResult<Vec<Task>>;
    /// Returns the first workspace visible to the authenticated user.
    fn default_workspace(&self) -> SourceResult<WorkspaceRef>;
}

/// Fetches one remote project's tasks, degrading to an empty list on failure.
pub fn fetch_tasks_or_empty(source: &dyn TaskSource, project_id: &str) -> Vec<Task> {
    match source.project_tasks(project_id) {
        Ok(tasks) => tasks,
        Err(err) => {
            warn!(
                "event=fetch_tasks module=source status=error project_id={} error={}",
                project_id, err
            );
            Vec::new()
        }
    }
}

/// Fetches one remote project's name, falling back to its raw id.
pub fn project_name_or_id(source: &dyn TaskSource, project_id: &str) -> String {
    match source.project_name(project_id) {
        Ok(name) if !name.trim().is_empty() => name.trim().to_string(),
        Ok(_) => project_id.to_string(),
        Err(err) => {
            warn!(
                "event=fetch_project_name module=source status=error project_id={} error={}",
                project_id, err
            );
            project_id.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        fetch_tasks_or_empty, project_name_or_id, SourceError, SourceResult, TaskSource,
        WorkspaceRef,
    };
    use crate::model::task::Task;

    struct FailingSource;

    impl TaskSource for FailingSource {
        fn project_tasks(&self, project_id: &str) -> SourceResult<Vec<Task>> {
            Err(SourceError::NotFound(project_id.to_string()))
        }

        fn project_name(&self, _project_id: &str) -> SourceResult<String> {
            Err(SourceError::Status {
                status: 503,
                message: "unavailable".to_string(),
            })
        }

        fn my_tasks(&self, _workspace_id: &str) -> SourceResult<Vec<Task>> {
            Ok(vec![])
        }

        fn default_workspace(&self) -> SourceResult<WorkspaceRef> {
            Err(SourceError::NotFound("workspace".to_string()))
        }
    }

    #[test]
    fn failed_task_fetch_degrades_to_empty() {
        assert!(fetch_tasks_or_empty(&FailingSource, "123").is_empty());
    }

    #[test]
    fn failed_name_fetch_falls_back_to_id() {
        assert_eq!(project_name_or_id(&FailingSource, "123"), "123");
    }
}
