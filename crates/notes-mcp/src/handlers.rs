//! Tool handlers, independent of the protocol layer.
//!
//! Each handler returns a plain `Result`; the MCP wrappers in
//! [`crate::tools`] decide how a failure is flagged on the wire.

use notes_core::{Note, Result};
use notes_store::NoteStore;

/// Text returned when a search matches nothing.
pub const NO_MATCHES: &str = "No matching notes found.";

const ENTRY_SEPARATOR: &str = "\n---\n";

/// Save a note and describe the outcome.
///
/// # Errors
///
/// Propagates the store's error if the insert fails.
pub fn add_note(store: &NoteStore, title: &str, content: &str) -> Result<String> {
    let id = store.insert(title, content)?;
    tracing::debug!(id, "note saved");
    Ok(format!("Saved note \"{title}\" (id {id})."))
}

/// Search notes by keyword and render the matches as one text block.
///
/// # Errors
///
/// Propagates the store's error if the query fails.
pub fn search_notes(store: &NoteStore, query: &str) -> Result<String> {
    let notes = store.search(query)?;
    tracing::debug!(query, matches = notes.len(), "notes searched");
    Ok(format_matches(&notes))
}

/// Render notes the way `search_notes` reports them.
#[must_use]
pub fn format_matches(notes: &[Note]) -> String {
    if notes.is_empty() {
        return NO_MATCHES.to_string();
    }

    let entries: Vec<String> = notes.iter().map(format_entry).collect();
    format!("Found notes:\n\n{}", entries.join(ENTRY_SEPARATOR))
}

fn format_entry(note: &Note) -> String {
    format!(
        "[ID:{}] {} ({})\n{}",
        note.id,
        note.title,
        note.created_at_display(),
        note.content
    )
}
