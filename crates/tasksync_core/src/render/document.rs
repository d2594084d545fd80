//! Output document model and per-kind rendering policy.

use crate::model::task::Task;
use chrono::NaiveDateTime;

/// Kind of generated document; selects the rendering policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// One local project: its remote sections plus tag-redirected tasks.
    Project,
    /// Catch-all for personal tasks whose tag matched no project.
    Personal,
    /// Read-only aggregate over every bucket.
    Summary,
    /// Single-file view of the user's own tasks grouped by tag.
    TagView,
}

/// Switches that differ between document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderPolicy {
    /// Emit a memo marker and memo region under each incomplete task.
    pub memo_markers: bool,
    /// List completed tasks; when `false` they only count toward the TOC.
    pub include_completed: bool,
    pub table_of_contents: bool,
    /// Append `[project, ...]` memberships to each task line.
    pub show_projects: bool,
}

impl DocumentKind {
    pub fn policy(self) -> RenderPolicy {
        match self {
            Self::Project | Self::Personal => RenderPolicy {
                memo_markers: true,
                include_completed: true,
                table_of_contents: false,
                show_projects: false,
            },
            // Summary is an aggregate view, not a memo-editing surface.
            Self::Summary => RenderPolicy {
                memo_markers: false,
                include_completed: false,
                table_of_contents: true,
                show_projects: false,
            },
            Self::TagView => RenderPolicy {
                memo_markers: true,
                include_completed: true,
                table_of_contents: true,
                show_projects: true,
            },
        }
    }

    /// Static lines printed under the sync timestamp.
    pub fn disclaimer(self) -> &'static [&'static str] {
        match self {
            Self::Project | Self::Personal | Self::TagView => &[
                "⚠️ This file is regenerated on every sync. Text under each 'Memo area' marker is preserved.",
            ],
            Self::Summary => &[
                "⚠️ This file is regenerated on every sync and is read-only.",
                "Write memos in the project documents instead.",
            ],
        }
    }
}

/// One `##` section of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    /// Tasks in fetch order; completed and incomplete mixed.
    pub tasks: Vec<Task>,
}

impl Section {
    pub fn new(title: impl Into<String>, tasks: Vec<Task>) -> Self {
        Self {
            title: title.into(),
            tasks,
        }
    }

    pub fn in_progress_count(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_completed()).count()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.is_completed()).count()
    }
}

/// Complete description of one output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub kind: DocumentKind,
    /// Local time written on the `Last Sync:` line.
    pub synced_at: NaiveDateTime,
    pub sections: Vec<Section>,
}

impl Document {
    pub fn new(title: impl Into<String>, kind: DocumentKind, synced_at: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            kind,
            synced_at,
            sections: Vec::new(),
        }
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn policy(&self) -> RenderPolicy {
        self.kind.policy()
    }

    /// Total task count across sections.
    pub fn task_count(&self) -> usize {
        self.sections.iter().map(|section| section.tasks.len()).sum()
    }
}
