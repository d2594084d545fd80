//! Tag-based routing of personal-pool tasks into local projects.
//!
//! # Invariants
//! - Every known project name appears in `Routing::matched`, even with no tasks.
//! - A task lands in at most one bucket; untagged tasks are always residual.
//! - Input order is preserved inside every bucket.

use crate::model::task::Task;
use std::collections::BTreeMap;

/// Result of routing a task pool against the project registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Routing {
    /// `(project name, redirected tasks)` in registry order.
    pub matched: Vec<(String, Vec<Task>)>,
    /// Tasks whose tag is empty or names no known project.
    pub unmatched: Vec<Task>,
}

impl Routing {
    /// Returns the tasks redirected into `project_name`.
    pub fn tasks_for(&self, project_name: &str) -> &[Task] {
        self.matched
            .iter()
            .find(|(name, _)| name == project_name)
            .map(|(_, tasks)| tasks.as_slice())
            .unwrap_or(&[])
    }

    /// Number of tasks that matched some project.
    pub fn matched_count(&self) -> usize {
        self.matched.iter().map(|(_, tasks)| tasks.len()).sum()
    }
}

/// Routes `tasks` by exact tag equality against `project_names`.
///
/// Linear scan per task; the registry is small and names are unique, so the
/// first equal name is the only one.
pub fn route_by_tag<F>(tasks: Vec<Task>, project_names: &[String], tag_of: F) -> Routing
where
    F: Fn(&Task) -> Option<String>,
{
    let mut matched: Vec<(String, Vec<Task>)> = project_names
        .iter()
        .map(|name| (name.clone(), Vec::new()))
        .collect();
    let mut unmatched = Vec::new();

    for task in tasks {
        let slot = tag_of(&task)
            .filter(|tag| !tag.is_empty())
            .and_then(|tag| project_names.iter().position(|name| *name == tag));
        match slot {
            Some(index) => matched[index].1.push(task),
            None => unmatched.push(task),
        }
    }

    Routing { matched, unmatched }
}

/// Groups `tasks` by tag: tags ascending, then the untagged group last.
///
/// Groups are only created for tags that occur.
pub fn group_by_tag<F>(tasks: Vec<Task>, tag_of: F, untagged_label: &str) -> Vec<(String, Vec<Task>)>
where
    F: Fn(&Task) -> Option<String>,
{
    let mut tagged: BTreeMap<String, Vec<Task>> = BTreeMap::new();
    let mut untagged = Vec::new();

    for task in tasks {
        match tag_of(&task).filter(|tag| !tag.is_empty()) {
            Some(tag) => tagged.entry(tag).or_default().push(task),
            None => untagged.push(task),
        }
    }

    let mut groups: Vec<(String, Vec<Task>)> = tagged.into_iter().collect();
    if !untagged.is_empty() {
        groups.push((untagged_label.to_string(), untagged));
    }
    groups
}
