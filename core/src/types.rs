//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the service schema but are defined independently from
//! the mock-server crate. Integration tests catch any schema drift between
//! the two. `CreateTodo::new` and `UpdateTodo::edit` carry the form-boundary
//! validation so a blank title never reaches the wire through them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Server-assigned todo identifier.
pub type TodoId = i64;

/// Workflow status of a todo. Serialized as the lowercase wire strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Pending,
    Completed,
}

impl Status {
    /// All statuses in display order.
    pub const ALL: [Status; 4] = [
        Status::Todo,
        Status::InProgress,
        Status::Pending,
        Status::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "inprogress",
            Status::Pending => "pending",
            Status::Completed => "completed",
        }
    }

    /// Human-readable label shown next to counters and on cards.
    pub fn label(self) -> &'static str {
        match self {
            Status::Todo => "To Do",
            Status::InProgress => "In Progress",
            Status::Pending => "Pending",
            Status::Completed => "Completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::new("status", &format!("unknown status `{s}`")))
    }
}

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Status,
    /// Server-rendered label for `status`. Not every deployment sends it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_display: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl CreateTodo {
    /// Trim both fields and reject a blank title.
    pub fn new(title: &str, description: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            title: required_title(title)?,
            description: description.trim().to_string(),
        })
    }
}

/// Request payload for updating an existing todo. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTodo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl UpdateTodo {
    /// Status-only change, as sent by the card's status menu.
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Full edit-dialog payload. Applies the same title rule as `CreateTodo::new`.
    pub fn edit(title: &str, description: &str, status: Status) -> Result<Self, ValidationError> {
        Ok(Self {
            title: Some(required_title(title)?),
            description: Some(description.trim().to_string()),
            status: Some(status),
        })
    }
}

fn required_title(title: &str) -> Result<String, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::new("title", "Title is required"));
    }
    Ok(title.to_string())
}
