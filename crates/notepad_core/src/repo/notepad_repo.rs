//! Notepad repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide owner-scoped CRUD over the `notepads` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every query filters on `user_id`; a notepad owned by someone else is
//!   indistinguishable from a missing one.
//! - List order is `updated_at DESC, id ASC`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::notepad::{Notepad, NotepadId, NotepadValidationError, UserId};
use rusqlite::{params, Connection, Row};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const NOTEPAD_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    body,
    created_at,
    updated_at
FROM notepads";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for notepad persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(NotepadValidationError),
    Db(DbError),
    NotFound(NotepadId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "notepad not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted notepad data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; run migrations first")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<NotepadValidationError> for RepoError {
    fn from(value: NotepadValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Read model for notepad list/detail use-cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotepadRecord {
    pub id: NotepadId,
    pub user_id: UserId,
    pub title: String,
    pub body: String,
    /// Creation timestamp in epoch milliseconds.
    pub created_at: i64,
    /// Update timestamp in epoch milliseconds.
    pub updated_at: i64,
}

/// Repository interface for owner-scoped notepad operations.
pub trait NotepadRepository {
    /// Inserts one notepad and returns its stable id.
    fn create_notepad(&self, notepad: &Notepad) -> RepoResult<NotepadId>;
    /// Gets one notepad owned by `owner`.
    fn get_notepad(&self, owner: UserId, id: NotepadId) -> RepoResult<Option<NotepadRecord>>;
    /// Lists every notepad owned by `owner`.
    fn list_notepads(&self, owner: UserId) -> RepoResult<Vec<NotepadRecord>>;
    /// Replaces title and body of one owned notepad.
    fn update_notepad(
        &self,
        owner: UserId,
        id: NotepadId,
        title: &str,
        body: &str,
    ) -> RepoResult<()>;
    /// Hard-deletes one owned notepad. Returns whether a row was removed.
    fn delete_notepad(&self, owner: UserId, id: NotepadId) -> RepoResult<bool>;
}

/// SQLite-backed notepad repository.
pub struct SqliteNotepadRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNotepadRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// Fails with `MissingRequiredTable` when the schema was not applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        if !table_exists(conn, "notepads")? {
            return Err(RepoError::MissingRequiredTable("notepads"));
        }
        Ok(Self { conn })
    }
}

impl NotepadRepository for SqliteNotepadRepository<'_> {
    fn create_notepad(&self, notepad: &Notepad) -> RepoResult<NotepadId> {
        notepad.validate()?;

        self.conn.execute(
            "INSERT INTO notepads (id, user_id, title, body) VALUES (?1, ?2, ?3, ?4);",
            params![
                notepad.id.to_string(),
                notepad.user_id,
                notepad.title.as_str(),
                notepad.body.as_str(),
            ],
        )?;

        Ok(notepad.id)
    }

    fn get_notepad(&self, owner: UserId, id: NotepadId) -> RepoResult<Option<NotepadRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTEPAD_SELECT_SQL}
             WHERE id = ?1
               AND user_id = ?2;"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), owner])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_notepad_row(row)?));
        }

        Ok(None)
    }

    fn list_notepads(&self, owner: UserId) -> RepoResult<Vec<NotepadRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTEPAD_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY updated_at DESC, id ASC;"
        ))?;

        let mut rows = stmt.query([owner])?;
        let mut notepads = Vec::new();
        while let Some(row) = rows.next()? {
            notepads.push(parse_notepad_row(row)?);
        }

        Ok(notepads)
    }

    fn update_notepad(
        &self,
        owner: UserId,
        id: NotepadId,
        title: &str,
        body: &str,
    ) -> RepoResult<()> {
        Notepad::with_id(id, owner, title, body).validate()?;

        let changed = self.conn.execute(
            "UPDATE notepads
             SET
                title = ?3,
                body = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1
               AND user_id = ?2;",
            params![id.to_string(), owner, title, body],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_notepad(&self, owner: UserId, id: NotepadId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM notepads WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), owner],
        )?;
        Ok(changed > 0)
    }
}

fn parse_notepad_row(row: &Row<'_>) -> RepoResult<NotepadRecord> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in notepads.id"))
    })?;

    let title: String = row.get("title")?;
    if title.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty title for notepad `{id_text}`"
        )));
    }

    Ok(NotepadRecord {
        id,
        user_id: row.get("user_id")?,
        title,
        body: row.get("body")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
