//! Task domain model.
//!
//! # Responsibility
//! - Deserialize task records from the remote JSON shape.
//! - Represent custom field values as a tagged variant instead of sniffing
//!   optional payload keys at lookup time.
//!
//! # Invariants
//! - `gid` is required; every other field tolerates absence or `null`.
//! - A custom field carries exactly one `FieldValue`, picked by priority
//!   text > enum option name > number.

use serde::{Deserialize, Deserializer, Serialize};

/// Stable remote identifier for a task.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = String;

/// Reference to a remote user (assignee or follower).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub gid: String,
}

/// Reference to a remote project the task belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub gid: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Typed value of one custom field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// Free-text field.
    Text(String),
    /// Single-select field; holds the chosen option name.
    Enum(String),
    /// Numeric field, kept in its wire formatting.
    Number(serde_json::Number),
    /// Field exists on the task but carries no value.
    Empty,
}

impl FieldValue {
    /// Returns the value rendered as a string, or `None` when empty.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(value) | Self::Enum(value) if !value.is_empty() => Some(value.clone()),
            Self::Number(value) => Some(value.to_string()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_text().is_none()
    }
}

/// One custom field attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCustomField")]
pub struct CustomField {
    pub name: String,
    pub value: FieldValue,
}

impl CustomField {
    pub fn new(name: impl Into<String>, value: FieldValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Deserialize)]
struct RawCustomField {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    text_value: Option<String>,
    #[serde(default)]
    enum_value: Option<RawEnumOption>,
    #[serde(default)]
    number_value: Option<serde_json::Number>,
}

#[derive(Deserialize)]
struct RawEnumOption {
    #[serde(default)]
    name: Option<String>,
}

impl From<RawCustomField> for CustomField {
    fn from(raw: RawCustomField) -> Self {
        let text = raw.text_value.filter(|value| !value.is_empty());
        let enum_name = raw
            .enum_value
            .and_then(|option| option.name)
            .filter(|value| !value.is_empty());

        let value = if let Some(text) = text {
            FieldValue::Text(text)
        } else if let Some(name) = enum_name {
            FieldValue::Enum(name)
        } else if let Some(number) = raw.number_value {
            FieldValue::Number(number)
        } else {
            FieldValue::Empty
        };

        Self {
            name: raw.name.unwrap_or_default(),
            value,
        }
    }
}

/// Immutable snapshot of one remote task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub gid: TaskId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,
    /// Due date as sent by the remote (`YYYY-MM-DD`), not re-validated.
    #[serde(default)]
    pub due_on: Option<String>,
    #[serde(default)]
    pub assignee: Option<UserRef>,
    /// Watchers of the task.
    #[serde(default, deserialize_with = "null_as_default")]
    pub followers: Vec<UserRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<ProjectRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_fields: Vec<CustomField>,
}

impl Task {
    /// Creates an incomplete task with no optional metadata.
    pub fn new(gid: impl Into<TaskId>, name: impl Into<String>) -> Self {
        Self {
            gid: gid.into(),
            name: name.into(),
            completed: false,
            due_on: None,
            assignee: None,
            followers: Vec::new(),
            projects: Vec::new(),
            custom_fields: Vec::new(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns the assignee gid, if any.
    pub fn assignee_gid(&self) -> Option<&str> {
        self.assignee.as_ref().map(|user| user.gid.as_str())
    }

    /// Returns the named project memberships, skipping unnamed ones.
    pub fn project_names(&self) -> Vec<&str> {
        self.projects
            .iter()
            .filter_map(|project| project.name.as_deref())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Relationship of the current user to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The user is the assignee.
    Owner,
    /// The user follows the task without owning it.
    Collaborator,
    Unrelated,
}

impl Role {
    /// Sort rank used for incomplete-task ordering; lower renders first.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Owner => 0,
            Self::Collaborator => 1,
            Self::Unrelated => 2,
        }
    }

    /// Bracketed prefix rendered before the task name.
    pub fn tag(self) -> Option<&'static str> {
        match self {
            Self::Owner => Some("[Owner]"),
            Self::Collaborator => Some("[Collaborator]"),
            Self::Unrelated => None,
        }
    }
}
