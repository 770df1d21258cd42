//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Notepad::validate()` before persistence.
//! - Every read and write is scoped to one owner.

pub mod notepad_repo;
