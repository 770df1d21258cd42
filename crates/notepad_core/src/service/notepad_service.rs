//! Notepad use-case service.
//!
//! # Responsibility
//! - Provide owner-scoped list/create/show/edit/delete APIs.
//! - Turn untrusted drafts into validated writes.
//!
//! # Invariants
//! - A missing or blank title is rejected before any write.
//! - Edit uses full replacement semantics for title and body.
//! - Delete is idempotent: the record is absent afterwards either way.
//! - Log events carry ids and counts only, never notepad text.

use crate::model::notepad::{Notepad, NotepadDraft, NotepadId, NotepadValidationError, UserId};
use crate::repo::notepad_repo::{NotepadRecord, NotepadRepository, RepoError, RepoResult};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for notepad use-cases.
#[derive(Debug)]
pub enum NotepadServiceError {
    /// Title is absent or blank.
    MissingTitle,
    /// Target notepad does not exist or belongs to another user.
    NotepadNotFound(NotepadId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl NotepadServiceError {
    /// Whether the failure was caused by caller input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingTitle
                | Self::NotepadNotFound(_)
                | Self::Repo(RepoError::Validation(_))
        )
    }
}

impl Display for NotepadServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTitle => write!(f, "Title is required"),
            Self::NotepadNotFound(id) => write!(f, "notepad not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent notepad state: {details}"),
        }
    }
}

impl Error for NotepadServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NotepadServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotepadNotFound(id),
            RepoError::Validation(NotepadValidationError::EmptyTitle) => Self::MissingTitle,
            other => Self::Repo(other),
        }
    }
}

/// Notepad service facade over repository implementations.
pub struct NotepadService<R: NotepadRepository> {
    repo: R,
}

impl<R: NotepadRepository> NotepadService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every notepad owned by `owner`. An empty vector means the user
    /// has no notepads.
    pub fn list_notepads(&self, owner: UserId) -> RepoResult<Vec<NotepadRecord>> {
        let items = self.repo.list_notepads(owner)?;
        info!(
            "event=notepad_list module=service status=ok user_id={owner} count={}",
            items.len()
        );
        Ok(items)
    }

    /// Creates one notepad from a draft and returns the persisted record.
    pub fn create_notepad(
        &self,
        owner: UserId,
        draft: &NotepadDraft,
    ) -> Result<NotepadRecord, NotepadServiceError> {
        let Some(title) = draft.normalized_title() else {
            warn!(
                "event=notepad_create module=service status=rejected user_id={} reason=missing_title",
                owner
            );
            return Err(NotepadServiceError::MissingTitle);
        };

        let notepad = Notepad::new(owner, title, draft.normalized_body());
        let id = self.repo.create_notepad(&notepad)?;
        info!("event=notepad_create module=service status=ok user_id={owner} notepad_id={id}");

        self.repo
            .get_notepad(owner, id)?
            .ok_or(NotepadServiceError::InconsistentState(
                "created notepad not found in read-back",
            ))
    }

    /// Gets one notepad if it is owned by `owner`.
    pub fn get_notepad(&self, owner: UserId, id: NotepadId) -> RepoResult<Option<NotepadRecord>> {
        self.repo.get_notepad(owner, id)
    }

    /// Replaces title and body of an owned notepad.
    pub fn update_notepad(
        &self,
        owner: UserId,
        id: NotepadId,
        draft: &NotepadDraft,
    ) -> Result<NotepadRecord, NotepadServiceError> {
        let Some(title) = draft.normalized_title() else {
            warn!(
                "event=notepad_edit module=service status=rejected user_id={} notepad_id={} reason=missing_title",
                owner, id
            );
            return Err(NotepadServiceError::MissingTitle);
        };

        self.repo
            .update_notepad(owner, id, title.as_str(), draft.normalized_body().as_str())?;
        info!("event=notepad_edit module=service status=ok user_id={owner} notepad_id={id}");

        self.repo
            .get_notepad(owner, id)?
            .ok_or(NotepadServiceError::InconsistentState(
                "updated notepad not found in read-back",
            ))
    }

    /// Deletes an owned notepad.
    ///
    /// Returns `true` when a row was removed and `false` when nothing matched;
    /// both leave the record absent.
    pub fn delete_notepad(&self, owner: UserId, id: NotepadId) -> RepoResult<bool> {
        let removed = self.repo.delete_notepad(owner, id)?;
        if removed {
            info!("event=notepad_delete module=service status=ok user_id={owner} notepad_id={id}");
        } else {
            info!("event=notepad_delete module=service status=noop user_id={owner} notepad_id={id}");
        }
        Ok(removed)
    }
}
