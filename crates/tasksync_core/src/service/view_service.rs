//! Single-file view of the user's own tasks grouped by tag.
//!
//! Unlike the sync run, the one fetch this view depends on is fatal when it
//! fails: an empty view would overwrite the previous one for nothing.

use super::SyncResult;
use crate::model::task::{Role, Task};
use crate::render::{Document, DocumentKind, Section};
use crate::routing::resolver::classification_tag;
use crate::routing::router::group_by_tag;
use crate::source::TaskSource;
use crate::vault::store::{write_document, WrittenDocument};
use chrono::NaiveDateTime;
use log::info;
use std::path::Path;

pub const VIEW_DOCUMENT_TITLE: &str = "Asana Tasks View (My Tasks)";
pub const UNCLASSIFIED_SECTION_TITLE: &str = "(Unclassified)";

/// Inputs of one view run.
#[derive(Debug, Clone)]
pub struct ViewRequest<'a> {
    /// Workspace to read; the first visible workspace when `None`.
    pub workspace_gid: Option<&'a str>,
    pub tag_field: &'a str,
    pub output: &'a Path,
    pub synced_at: NaiveDateTime,
}

/// Fetches the user's tasks and rewrites the view document.
pub fn run_view(source: &dyn TaskSource, request: &ViewRequest<'_>) -> SyncResult<WrittenDocument> {
    let workspace_gid = match request.workspace_gid {
        Some(gid) => gid.to_string(),
        None => {
            let workspace = source.default_workspace()?;
            info!(
                "event=workspace_select module=view status=ok workspace_gid={}",
                workspace.gid
            );
            workspace.gid
        }
    };

    let tasks = source.my_tasks(&workspace_gid)?;
    let groups = group_by_tag(
        tasks,
        |task| classification_tag(task, request.tag_field),
        UNCLASSIFIED_SECTION_TITLE,
    );

    let mut doc = Document::new(VIEW_DOCUMENT_TITLE, DocumentKind::TagView, request.synced_at);
    doc.sections = groups
        .into_iter()
        .map(|(tag, tasks)| Section::new(tag, tasks))
        .collect();

    // Every task here is assigned to the user, so no role prefix is rendered.
    let unranked = |_: &Task| Role::Unrelated;
    Ok(write_document(request.output, &doc, &unranked)?)
}
