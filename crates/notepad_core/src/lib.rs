//! Core domain logic for the notepad feature.
//! This crate is the single source of truth for notepad invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::notepad::{Notepad, NotepadDraft, NotepadId, NotepadValidationError, UserId};
pub use repo::notepad_repo::{
    NotepadRecord, NotepadRepository, RepoError, RepoResult, SqliteNotepadRepository,
};
pub use service::notepad_service::{NotepadService, NotepadServiceError};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
