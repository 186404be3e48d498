use std::fmt;

use crate::core::todo::{Priority, Todo};
use crate::sync::{ApiError, ListResponse};

#[derive(Debug)]
pub enum Message {
    // Remote list
    Refresh,
    Loaded(Result<ListResponse, ApiError>),

    // Categories
    AddCategory(String),
    RemoveCategory(String),
    SetFilter(String),

    // Draft
    SetDraftTitle(String),
    SetDraftDescription(String),
    SetDraftCategory(String),
    SetDraftPriority(Priority),
    BeginEdit(String),
    CancelEdit,
    Submit,
    Created(Result<Todo, ApiError>),
    Updated(String, Result<Todo, ApiError>),

    // Deletion
    Delete(String),
    Deleted(String, Result<(), ApiError>),

    // Completion
    Toggle(String, bool),
    ToggleSettled(ToggleOutcome),
}

/// Result of one optimistic completion toggle, tagged with the sequence
/// number it was issued under.
#[derive(Debug)]
pub struct ToggleOutcome {
    pub id: String,
    pub completed: bool,
    pub seq: u64,
    pub result: Result<Todo, ApiError>,
}

/// User-facing notices, queued until the front end drains them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Validation,
    LoadFailed(String),
    SaveFailed(String),
    DeleteFailed(String),
    ToggleFailed,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "Title and category are required"),
            Self::LoadFailed(e) => write!(f, "Could not load tasks: {}", e),
            Self::SaveFailed(e) => write!(f, "Could not save task: {}", e),
            Self::DeleteFailed(e) => write!(f, "Could not delete task: {}", e),
            Self::ToggleFailed => write!(f, "Failed to update status. Please try again."),
        }
    }
}
