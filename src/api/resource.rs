use fake::Dummy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Defines user data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub organizations: Vec<String>,
}

/// Reference to a user that the API either resolved into an embedded object
/// or left as a bare identifier.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq)]
pub enum UserRef {
    Id(String),
    User(User),
}

impl UserRef {
    /// Identifier of the referenced user regardless of representation.
    ///
    pub fn id(&self) -> &str {
        match self {
            UserRef::Id(id) => id,
            UserRef::User(user) => &user.id,
        }
    }

    /// Display name when the reference was resolved.
    ///
    pub fn name(&self) -> Option<&str> {
        match self {
            UserRef::Id(_) => None,
            UserRef::User(user) => Some(&user.name),
        }
    }
}

/// Defines task priority levels.
///
#[derive(Clone, Copy, Debug, Dummy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Parse a priority case-insensitively, ignoring surrounding whitespace.
    ///
    pub fn parse(value: &str) -> Option<Priority> {
        match value.trim().to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    /// Canonical display label.
    ///
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    /// Next priority in ascending order, wrapping around.
    ///
    pub fn next(&self) -> Priority {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }

    /// Previous priority in ascending order, wrapping around.
    ///
    pub fn previous(&self) -> Priority {
        match self {
            Priority::Low => Priority::High,
            Priority::Medium => Priority::Low,
            Priority::High => Priority::Medium,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::parse(s).ok_or_else(|| format!("unknown priority '{}'", s))
    }
}

/// Defines task data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: String,
    pub assignee: Option<UserRef>,
    pub board_id: Option<String>,
    pub column_id: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub placeholder: bool, // Unresolved reference materialized on load
}

impl Task {
    pub const PLACEHOLDER_TITLE: &'static str = "Loading...";

    /// Stand-in for a task the API referenced by identifier only.
    ///
    pub fn placeholder(id: String, status: &str, column_id: &str) -> Task {
        Task {
            id,
            title: Task::PLACEHOLDER_TITLE.to_string(),
            description: None,
            priority: Priority::Medium,
            status: status.to_string(),
            assignee: None,
            board_id: None,
            column_id: Some(column_id.to_string()),
            created_at: None,
            updated_at: None,
            placeholder: true,
        }
    }

    /// Identifier of the assignee, if any.
    ///
    pub fn assignee_id(&self) -> Option<&str> {
        self.assignee.as_ref().map(|a| a.id())
    }
}

/// Defines column data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq)]
pub struct Column {
    pub id: String,
    pub name: String,
    pub order: i64,
    pub tasks: Vec<Task>,
}

/// Defines board data structure with its embedded columns.
///
#[derive(Clone, Debug, Dummy, PartialEq)]
pub struct Board {
    pub id: String,
    pub name: String,
    pub organization_id: Option<String>,
    pub columns: Vec<Column>,
}

/// Defines board listing row.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq)]
pub struct BoardSummary {
    pub id: String,
    pub name: String,
    pub organization_id: Option<String>,
}

/// Defines organization data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub owner: Option<UserRef>,
    pub members: Vec<UserRef>,
}

/// Defines successful authentication payload.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Defines reset token validation result.
///
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ResetTokenStatus {
    pub valid: bool,
    #[serde(default)]
    pub message: String,
}

/// Task search result enriched with the name of its board.
///
#[derive(Clone, Debug, PartialEq)]
pub struct SearchHit {
    pub task: Task,
    pub board_name: Option<String>,
}
