//! Domain model for user-owned notepads.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own the invariants every persisted notepad must satisfy.
//!
//! # Invariants
//! - Every notepad is identified by a stable `NotepadId`.
//! - Every notepad belongs to exactly one owner.
//! - Deletion is a hard delete; there are no tombstones.

pub mod notepad;
