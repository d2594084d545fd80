//! Field and role resolution for fetched tasks.

use crate::model::task::{Role, Task};

/// Returns the classification tag stored in the custom field `field_name`.
///
/// The first field with that name carrying a non-empty value wins. Within a
/// field, text is preferred over an enum option name over a number.
pub fn classification_tag(task: &Task, field_name: &str) -> Option<String> {
    task.custom_fields
        .iter()
        .filter(|field| field.name == field_name)
        .find_map(|field| field.value.as_text())
}

/// Returns how `user_id` relates to `task`.
///
/// Assignee beats follower; anything else is `Role::Unrelated`.
pub fn role_of(task: &Task, user_id: &str) -> Role {
    if task.assignee_gid() == Some(user_id) {
        return Role::Owner;
    }
    if task.followers.iter().any(|user| user.gid == user_id) {
        return Role::Collaborator;
    }
    Role::Unrelated
}
