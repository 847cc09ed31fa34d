//! # notes-store
//!
//! SQLite store for notes.
//!
//! Owns the single `notes` table. Every operation is one SQL statement, so
//! a write is atomic and a read never observes a half-written row. The
//! connection is guarded by a mutex, which makes the store safe to share as
//! `Arc<NoteStore>` between concurrently running tool calls.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDateTime;
use rusqlite::types::FromSql;
use rusqlite::{params, Connection, OptionalExtension, Row};

use notes_core::{Note, NotesError, Result};

/// Escape character used in `LIKE ... ESCAPE` clauses.
const LIKE_ESCAPE: char = '\\';

/// The NoteStore owns the notes database connection.
#[derive(Debug)]
pub struct NoteStore {
    conn: Mutex<Connection>,
}

impl NoteStore {
    /// Open or create a note database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::Storage`] if the database cannot be opened or
    /// the schema cannot be created.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(storage)?;
        tracing::debug!(path = %path.display(), "opened note database");
        Self::from_connection(conn)
    }

    /// Create an in-memory store (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::Storage`] if schema creation fails.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(storage)?;
        Self::from_connection(conn)
    }

    /// Wrap an already opened connection, creating the schema if needed.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::Storage`] if schema creation fails.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create the `notes` table if it does not exist yet. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::Storage`] if the statement fails.
    pub fn ensure_schema(&self) -> Result<()> {
        self.lock()?
            .execute_batch(
                "
            CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT,
                content TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            ",
            )
            .map_err(storage)?;
        Ok(())
    }

    /// Append a note and return its assigned id.
    ///
    /// `created_at` is filled in by the database. Any string is accepted,
    /// including the empty string.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::Storage`] if the insert fails.
    pub fn insert(&self, title: &str, content: &str) -> Result<i64> {
        let id = self
            .lock()?
            .query_row(
                "INSERT INTO notes (title, content) VALUES (?1, ?2) RETURNING id",
                params![title, content],
                |row| row.get(0),
            )
            .map_err(storage)?;
        Ok(id)
    }

    /// Find every note whose title or content contains `keyword`.
    ///
    /// The keyword is matched literally (`%`, `_` and `\` carry no wildcard
    /// meaning). ASCII letters match case-insensitively, all other
    /// characters case-sensitively. An empty keyword matches every note.
    /// Results come back in ascending id order.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::Storage`] if the query fails.
    pub fn search(&self, keyword: &str) -> Result<Vec<Note>> {
        let pattern = like_pattern(keyword);
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, title, content, created_at
                 FROM notes
                 WHERE title LIKE ?1 ESCAPE '\\' OR content LIKE ?1 ESCAPE '\\'
                 ORDER BY id",
            )
            .map_err(storage)?;

        let notes = stmt
            .query_map(params![pattern], note_from_row)
            .map_err(storage)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(storage)?;

        Ok(notes)
    }

    /// Fetch a single note by id.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::Storage`] if the query fails.
    pub fn get(&self, id: i64) -> Result<Option<Note>> {
        self.lock()?
            .query_row(
                "SELECT id, title, content, created_at FROM notes WHERE id = ?1",
                params![id],
                note_from_row,
            )
            .optional()
            .map_err(storage)
    }

    /// Get count of stored notes.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::Storage`] if the query fails.
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .lock()?
            .query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))
            .map_err(storage)?;
        Ok(count as u64)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| NotesError::LockPoisoned)
    }
}

fn storage(e: rusqlite::Error) -> NotesError {
    NotesError::Storage(e.to_string())
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    let id: i64 = row.get(0)?;
    // Rows from other writers may carry NULL or unparseable timestamps.
    let created_at = match Option::<NaiveDateTime>::column_result(row.get_ref(3)?) {
        Ok(at) => at.map(|at| at.and_utc()),
        Err(e) => {
            tracing::warn!(id, error = %e, "unreadable created_at");
            None
        }
    };
    Ok(Note {
        id,
        title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        content: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        created_at,
    })
}

/// Wrap `keyword` in `%...%`, escaping LIKE metacharacters.
fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
