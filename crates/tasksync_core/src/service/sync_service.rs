//! Full vault sync run.
//!
//! # Responsibility
//! - Fetch the personal pool and route it into local project buckets.
//! - Write one document per project, one for the unmatched pool, and the
//!   read-only summary, in that order.
//!
//! # Invariants
//! - A task id appears at most once per document (first occurrence kept).
//! - Completed tagged tasks are listed in their project document but only
//!   counted in the summary.
//! - A write failure aborts the remaining writes; earlier files stay as written.
//! - A local project named like the catch-all document is skipped, so the
//!   summary never holds two sections with the same anchor.

use super::SyncResult;
use crate::model::task::Task;
use crate::render::{Document, DocumentKind, Section};
use crate::routing::resolver::{classification_tag, role_of};
use crate::routing::router::{group_by_tag, route_by_tag};
use crate::source::{fetch_tasks_or_empty, project_name_or_id, TaskSource};
use crate::vault::discovery::LocalProject;
use crate::vault::store::{write_document, WrittenDocument};
use chrono::NaiveDateTime;
use log::{info, warn};
use std::collections::HashSet;
use std::path::Path;

pub const PERSONAL_DOCUMENT_TITLE: &str = "Personal Tasks";
pub const SUMMARY_DOCUMENT_TITLE: &str = "Task Summary";
/// Section of a project document holding tag-redirected personal tasks.
pub const REDIRECTED_SECTION_TITLE: &str = "Tagged Personal Tasks";
pub const UNTAGGED_SECTION_TITLE: &str = "(Untagged)";

/// Inputs of one sync run.
#[derive(Debug, Clone)]
pub struct SyncRequest<'a> {
    pub user_gid: &'a str,
    pub tag_field: &'a str,
    /// Remote projects whose tasks are routed by tag.
    pub personal_projects: &'a [String],
    /// Local project registry, in rendering order.
    pub projects: &'a [LocalProject],
    pub personal_file: &'a Path,
    pub summary_file: &'a Path,
    pub synced_at: NaiveDateTime,
}

/// What one run wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub documents: Vec<WrittenDocument>,
    /// Projects with nothing linked, nothing tagged, and no prior document.
    pub skipped_projects: Vec<String>,
    pub routed_tasks: usize,
    pub unmatched_tasks: usize,
}

/// Runs one full sync against `source`.
pub fn run_sync(source: &dyn TaskSource, request: &SyncRequest<'_>) -> SyncResult<SyncReport> {
    info!(
        "event=sync_start module=sync status=ok projects={} personal_projects={}",
        request.projects.len(),
        request.personal_projects.len()
    );

    let tag_of = |task: &Task| classification_tag(task, request.tag_field);
    let role = |task: &Task| role_of(task, request.user_gid);

    let mut pool = Vec::new();
    for project_id in request.personal_projects {
        pool.extend(fetch_tasks_or_empty(source, project_id));
    }
    let pool = dedupe(pool);

    let mut reserved = Vec::new();
    let projects: Vec<&LocalProject> = request
        .projects
        .iter()
        .filter(|project| {
            if project.name == PERSONAL_DOCUMENT_TITLE {
                warn!(
                    "event=project_skip module=sync status=warn project={} reason=reserved_name",
                    project.name
                );
                reserved.push(project.name.clone());
                return false;
            }
            true
        })
        .collect();

    let project_names: Vec<String> = projects
        .iter()
        .map(|project| project.name.clone())
        .collect();
    let routing = route_by_tag(pool, &project_names, tag_of);

    let mut report = SyncReport {
        skipped_projects: reserved,
        routed_tasks: routing.matched_count(),
        unmatched_tasks: routing.unmatched.len(),
        ..SyncReport::default()
    };
    info!(
        "event=route module=sync status=ok routed={} unmatched={}",
        report.routed_tasks, report.unmatched_tasks
    );

    let mut summary = Document::new(SUMMARY_DOCUMENT_TITLE, DocumentKind::Summary, request.synced_at);

    for project in projects {
        let redirected = routing.tasks_for(&project.name);
        if project.remote_project_ids.is_empty()
            && redirected.is_empty()
            && !project.output_path.exists()
        {
            report.skipped_projects.push(project.name.clone());
            continue;
        }

        let mut sections = Vec::new();
        for remote_id in &project.remote_project_ids {
            let title = project_name_or_id(source, remote_id);
            sections.push(Section::new(title, fetch_tasks_or_empty(source, remote_id)));
        }
        sections.push(Section::new(REDIRECTED_SECTION_TITLE, redirected.to_vec()));

        let mut doc = Document::new(&project.name, DocumentKind::Project, request.synced_at);
        doc.sections = dedupe_sections(sections);

        summary.sections.push(Section::new(
            &project.name,
            doc.sections
                .iter()
                .flat_map(|section| section.tasks.iter().cloned())
                .collect(),
        ));
        report
            .documents
            .push(write_document(&project.output_path, &doc, &role)?);
    }

    let personal_tasks = routing.unmatched;
    summary
        .sections
        .push(Section::new(PERSONAL_DOCUMENT_TITLE, personal_tasks.clone()));

    let mut personal = Document::new(PERSONAL_DOCUMENT_TITLE, DocumentKind::Personal, request.synced_at);
    personal.sections = group_by_tag(personal_tasks, tag_of, UNTAGGED_SECTION_TITLE)
        .into_iter()
        .map(|(title, tasks)| Section::new(title, tasks))
        .collect();
    report
        .documents
        .push(write_document(request.personal_file, &personal, &role)?);

    report
        .documents
        .push(write_document(request.summary_file, &summary, &role)?);

    info!(
        "event=sync_done module=sync status=ok documents={} skipped={}",
        report.documents.len(),
        report.skipped_projects.len()
    );
    Ok(report)
}

fn dedupe(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::new();
    tasks
        .into_iter()
        .filter(|task| seen.insert(task.gid.clone()))
        .collect()
}

fn dedupe_sections(sections: Vec<Section>) -> Vec<Section> {
    let mut seen = HashSet::new();
    sections
        .into_iter()
        .map(|section| Section {
            title: section.title,
            tasks: section
                .tasks
                .into_iter()
                .filter(|task| seen.insert(task.gid.clone()))
                .collect(),
        })
        .collect()
}
