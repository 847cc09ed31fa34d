//! Note type — the single record kept by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display format for `created_at`, matching SQLite's `CURRENT_TIMESTAMP`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A user-submitted title/content pair with its store-assigned identity.
///
/// Notes are create-only: `id` and `created_at` are assigned by the store
/// on insertion and never change afterwards. `created_at` is `None` only for
/// rows written by another client without a readable timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Note {
    /// `created_at` rendered the way SQLite stores it, or `unknown`.
    #[must_use]
    pub fn created_at_display(&self) -> String {
        match self.created_at {
            Some(at) => at.format(TIMESTAMP_FORMAT).to_string(),
            None => "unknown".to_string(),
        }
    }
}
