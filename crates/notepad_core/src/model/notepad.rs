//! Notepad domain model.
//!
//! # Responsibility
//! - Define the notepad record and its owner reference.
//! - Validate title/owner invariants before persistence.
//!
//! # Invariants
//! - `id` is stable and never reused for another notepad.
//! - `title` is non-empty after trimming whitespace.
//! - `user_id` refers to a user issued by the external user store (> 0).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every notepad.
pub type NotepadId = Uuid;

/// Owner reference issued by the external user/session store.
pub type UserId = i64;

/// Validation errors for notepad invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotepadValidationError {
    /// Title is empty or whitespace only.
    EmptyTitle,
    /// Owner id is not a valid user reference.
    InvalidOwner(UserId),
}

impl Display for NotepadValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Title is required"),
            Self::InvalidOwner(user_id) => write!(f, "invalid notepad owner: {user_id}"),
        }
    }
}

impl Error for NotepadValidationError {}

/// A user-owned note with title and body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notepad {
    pub id: NotepadId,
    pub title: String,
    /// Free text; an absent body is stored as the empty string.
    pub body: String,
    pub user_id: UserId,
}

impl Notepad {
    /// Creates a new notepad with a generated stable ID.
    pub fn new(user_id: UserId, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), user_id, title, body)
    }

    /// Creates a notepad with a caller-provided ID.
    ///
    /// Does not validate; call [`Notepad::validate`] before persisting.
    pub fn with_id(
        id: NotepadId,
        user_id: UserId,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
            user_id,
        }
    }

    /// Checks title and owner invariants.
    pub fn validate(&self) -> Result<(), NotepadValidationError> {
        validate_title(&self.title)?;
        if self.user_id <= 0 {
            return Err(NotepadValidationError::InvalidOwner(self.user_id));
        }
        Ok(())
    }
}

/// Untrusted create/edit input as decoded from a request.
///
/// Both fields are optional so that a missing title can be reported as a
/// validation failure instead of a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotepadDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl NotepadDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: Some(body.into()),
        }
    }

    /// Returns the trimmed title, or `None` when absent or blank.
    pub fn normalized_title(&self) -> Option<String> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// Returns the body, defaulting to the empty string.
    pub fn normalized_body(&self) -> String {
        self.body.clone().unwrap_or_default()
    }
}

fn validate_title(title: &str) -> Result<(), NotepadValidationError> {
    if title.trim().is_empty() {
        return Err(NotepadValidationError::EmptyTitle);
    }
    Ok(())
}
