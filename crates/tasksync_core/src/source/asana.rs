//! Asana REST implementation of `TaskSource`.

use super::{SourceError, SourceResult, TaskSource, WorkspaceRef};
use crate::model::task::Task;
use log::debug;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Default REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://app.asana.com/api/1.0";

const PAGE_LIMIT: &str = "100";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_ERROR_BODY_CHARS: usize = 200;
const TASK_OPT_FIELDS: &str = "name,completed,due_on,assignee,followers,projects,projects.name,\
custom_fields,custom_fields.name,custom_fields.text_value,custom_fields.enum_value,\
custom_fields.enum_value.name,custom_fields.number_value";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
    #[serde(default)]
    next_page: Option<NextPage>,
}

#[derive(Debug, Deserialize)]
struct NextPage {
    offset: String,
}

#[derive(Debug, Deserialize)]
struct NamedResource {
    #[serde(default)]
    name: Option<String>,
}

/// Blocking Asana client authenticated with a personal access token.
pub struct AsanaClient {
    http: Client,
    base_url: String,
    token: String,
    completed_since: Option<String>,
}

impl AsanaClient {
    /// Creates a client for the public API.
    pub fn new(token: impl Into<String>) -> SourceResult<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("tasksync/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            completed_since: None,
        })
    }

    /// Points the client at another endpoint root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Limits completed tasks to those completed after `since` (ISO 8601).
    ///
    /// `None` keeps the remote default of returning every task.
    pub fn with_completed_since(mut self, since: Option<String>) -> Self {
        self.completed_since = since;
        self
    }

    fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> SourceResult<Envelope<T>> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(query)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        Ok(response.json::<Envelope<T>>()?)
    }

    fn get_tasks_paged(&self, path: &str, mut query: Vec<(&str, String)>) -> SourceResult<Vec<Task>> {
        query.push(("opt_fields", TASK_OPT_FIELDS.to_string()));
        query.push(("limit", PAGE_LIMIT.to_string()));
        if let Some(since) = &self.completed_since {
            query.push(("completed_since", since.clone()));
        }

        let mut tasks = Vec::new();
        let mut offset: Option<String> = None;
        loop {
            let mut page_query = query.clone();
            if let Some(offset) = &offset {
                page_query.push(("offset", offset.clone()));
            }

            let page: Envelope<Vec<Task>> = self.get(path, &page_query)?;
            debug!(
                "event=fetch_page module=source status=ok path={} tasks={}",
                path,
                page.data.len()
            );
            tasks.extend(page.data);

            match page.next_page {
                Some(next) => offset = Some(next.offset),
                None => break,
            }
        }
        Ok(tasks)
    }
}

impl TaskSource for AsanaClient {
    fn project_tasks(&self, project_id: &str) -> SourceResult<Vec<Task>> {
        self.get_tasks_paged(&format!("/projects/{project_id}/tasks"), Vec::new())
    }

    fn project_name(&self, project_id: &str) -> SourceResult<String> {
        let envelope: Envelope<NamedResource> = self.get(
            &format!("/projects/{project_id}"),
            &[("opt_fields", "name".to_string())],
        )?;
        envelope
            .data
            .name
            .ok_or_else(|| SourceError::NotFound(format!("name of project {project_id}")))
    }

    fn my_tasks(&self, workspace_id: &str) -> SourceResult<Vec<Task>> {
        self.get_tasks_paged(
            "/tasks",
            vec![
                ("assignee", "me".to_string()),
                ("workspace", workspace_id.to_string()),
            ],
        )
    }

    fn default_workspace(&self) -> SourceResult<WorkspaceRef> {
        let envelope: Envelope<Vec<WorkspaceRef>> = self.get("/workspaces", &[])?;
        envelope
            .data
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::NotFound("workspace for this account".to_string()))
    }
}
