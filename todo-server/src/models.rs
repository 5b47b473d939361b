//! Todo item model and request bodies

use serde::{Deserialize, Serialize};

/// A todo item as stored and as returned over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: String,
    pub name: String,
    pub completed: bool,
}

/// POST /items body
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    /// Caller-supplied id; a UUID v4 is generated when omitted.
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub completed: bool,
}

impl CreateItemRequest {
    pub fn into_item(self) -> TodoItem {
        TodoItem {
            id: self
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: self.name,
            completed: self.completed,
        }
    }
}

/// PUT /items/{id} body; replaces both fields.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateItemRequest {
    pub name: String,
    #[serde(default)]
    pub completed: bool,
}

/// Raw `completed` column value.
///
/// The column is declared boolean, but rows written by other clients may
/// carry a small integer. Only `true` and `1` read as completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredFlag {
    Bool(bool),
    Int(i64),
}

impl StoredFlag {
    pub fn is_set(self) -> bool {
        match self {
            Self::Bool(value) => value,
            Self::Int(value) => value == 1,
        }
    }
}
