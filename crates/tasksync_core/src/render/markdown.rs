//! Markdown emission for output documents.
//!
//! # Invariants
//! - Incomplete tasks render Owner, Collaborator, Unrelated; stable within a tier.
//! - Completed tasks keep fetch order and never carry a memo marker.
//! - Nothing is written between a memo region and the following heading, so
//!   the extractor's `## ` section boundary sees exactly what was re-injected.

use super::document::{Document, RenderPolicy, Section};
use crate::memo::{extract_memos, memo_marker, MemoIndex};
use crate::model::task::{Role, Task};

const TASK_URL_BASE: &str = "https://app.asana.com/0/0";
const TASK_LINK_LABEL: &str = "AsanaLink";
const NO_TASKS_PLACEHOLDER: &str = "(no tasks)";
const TOC_HEADING: &str = "Contents";
const SYNC_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const MEMO_INDENT: &str = "    ";

/// Returns the web link for a task id.
pub fn task_url(task_id: &str) -> String {
    format!("{TASK_URL_BASE}/{task_id}")
}

/// Derives the heading anchor for `title`.
///
/// Spaces become `-` and parentheses are dropped; everything else, case
/// included, is left as the vault's heading anchors keep it.
pub fn anchor_for(title: &str) -> String {
    title.replace(' ', "-").replace(['(', ')'], "")
}

/// Renders `doc` to Markdown, re-injecting memos from `memos`.
pub fn render_document(doc: &Document, role_of: &dyn Fn(&Task) -> Role, memos: &MemoIndex) -> String {
    let policy = doc.policy();
    let mut out = String::new();

    out.push_str(&format!("# {}\n", doc.title));
    out.push_str(&format!(
        "Last Sync: {}\n",
        doc.synced_at.format(SYNC_TIME_FORMAT)
    ));
    for line in doc.kind.disclaimer() {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');

    if doc.sections.is_empty() {
        out.push_str(&format!("{NO_TASKS_PLACEHOLDER}\n"));
        return out;
    }

    if policy.table_of_contents {
        write_table_of_contents(&mut out, &doc.sections);
    }

    let last = doc.sections.len() - 1;
    for (position, section) in doc.sections.iter().enumerate() {
        let ended_in_memo = write_section(&mut out, section, policy, role_of, memos);
        if position < last && !ended_in_memo {
            out.push('\n');
        }
    }

    out
}

/// Computes the next version of a document from its prior text.
///
/// `prior` is `None` when the document has never been written.
pub fn regenerate(prior: Option<&str>, doc: &Document, role_of: &dyn Fn(&Task) -> Role) -> String {
    let memos = extract_memos(prior);
    render_document(doc, role_of, &memos)
}

fn write_table_of_contents(out: &mut String, sections: &[Section]) {
    out.push_str(&format!("## {TOC_HEADING}\n\n"));
    for section in sections {
        out.push_str(&format!(
            "- [{}](#{}) (In progress: {}, Completed: {})\n",
            section.title,
            anchor_for(&section.title),
            section.in_progress_count(),
            section.completed_count()
        ));
    }
    out.push_str("\n---\n\n");
}

/// Writes one section and reports whether it ended inside a memo region.
fn write_section(
    out: &mut String,
    section: &Section,
    policy: RenderPolicy,
    role_of: &dyn Fn(&Task) -> Role,
    memos: &MemoIndex,
) -> bool {
    out.push_str(&format!("## {}\n\n", section.title));

    let mut in_progress: Vec<(&Task, Role)> = section
        .tasks
        .iter()
        .filter(|task| !task.is_completed())
        .map(|task| (task, role_of(task)))
        .collect();
    in_progress.sort_by_key(|(_, role)| role.precedence());

    let completed: Vec<&Task> = if policy.include_completed {
        section.tasks.iter().filter(|task| task.is_completed()).collect()
    } else {
        Vec::new()
    };

    if in_progress.is_empty() && completed.is_empty() {
        out.push_str(&format!("{NO_TASKS_PLACEHOLDER}\n"));
        return false;
    }

    let mut ended_in_memo = false;
    for (task, role) in in_progress {
        out.push_str(&task_line(task, role, policy.show_projects));
        out.push('\n');
        ended_in_memo = policy.memo_markers;
        if policy.memo_markers {
            write_memo_region(out, &task.gid, memos);
        }
    }

    for task in completed {
        out.push_str(&task_line(task, role_of(task), policy.show_projects));
        out.push('\n');
        ended_in_memo = false;
    }

    ended_in_memo
}

fn write_memo_region(out: &mut String, task_id: &str, memos: &MemoIndex) {
    out.push_str(&format!("{MEMO_INDENT}- {}\n", memo_marker(task_id)));
    match memos.preserved(task_id) {
        Some(memo) => {
            out.push_str(memo);
            // A memo cut at end of file has no newline; the next line must not join it.
            if !memo.ends_with('\n') {
                out.push('\n');
            }
        }
        None => out.push('\n'),
    }
}

fn task_line(task: &Task, role: Role, show_projects: bool) -> String {
    let mut line = String::from(if task.is_completed() { "- [x] " } else { "- [ ] " });
    if let Some(tag) = role.tag() {
        line.push_str(tag);
        line.push(' ');
    }
    line.push_str(&task.name.replace(['\r', '\n'], " "));

    if let Some(due) = task.due_on.as_deref().filter(|due| !due.is_empty()) {
        line.push_str(&format!(" (Due: {due})"));
    }

    if show_projects {
        let names = task.project_names();
        if !names.is_empty() {
            line.push_str(&format!(" [{}]", names.join(", ")));
        }
    }

    line.push_str(&format!(" [[{TASK_LINK_LABEL}]({})]", task_url(&task.gid)));
    line
}
