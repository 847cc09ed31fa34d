//! MCP tool definitions for the note store.

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData, ServerHandler,
};
use serde::Deserialize;

use notes_store::NoteStore;

use crate::handlers;

/// Notes MCP server exposing `add_note` and `search_notes`.
#[derive(Debug, Clone)]
pub struct NotesMcpService {
    store: Arc<NoteStore>,
    tool_router: ToolRouter<Self>,
}

impl NotesMcpService {
    /// Create a server backed by an already opened store.
    pub fn new(store: Arc<NoteStore>) -> Self {
        Self {
            store,
            tool_router: Self::tool_router(),
        }
    }
}

// === Tool request types ===

/// Request to save a note.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddNoteRequest {
    /// Title of the note
    pub title: String,
    /// Body text of the note
    pub content: String,
}

/// Request to search notes.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchNotesRequest {
    /// Keyword to look for in note titles and contents
    pub query: String,
}

#[tool_router]
impl NotesMcpService {
    /// Save a new note.
    #[tool(description = "Save a note with a title and content")]
    fn add_note(
        &self,
        Parameters(req): Parameters<AddNoteRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        match handlers::add_note(&self.store, &req.title, &req.content) {
            Ok(msg) => Ok(CallToolResult::success(vec![Content::text(msg)])),
            Err(e) => {
                tracing::warn!(error = %e, title = %req.title, "add_note failed");
                Ok(CallToolResult::error(vec![Content::text(format!(
                    "Failed to save note: {e}"
                ))]))
            }
        }
    }

    /// Keyword search over notes.
    #[tool(description = "Search notes whose title or content contains a keyword")]
    fn search_notes(
        &self,
        Parameters(req): Parameters<SearchNotesRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        match handlers::search_notes(&self.store, &req.query) {
            Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Err(e) => {
                tracing::warn!(error = %e, query = %req.query, "search_notes failed");
                Ok(CallToolResult::error(vec![Content::text(format!(
                    "Failed to search notes: {e}"
                ))]))
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for NotesMcpService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Note store. Save notes with add_note and find them again with \
                 search_notes (case-insensitive for ASCII letters)."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use serde_json::Value;

    fn service() -> NotesMcpService {
        NotesMcpService::new(Arc::new(NoteStore::in_memory().unwrap()))
    }

    /// A store whose every insert is rejected by the database.
    fn failing_service() -> NotesMcpService {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT,
                content TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TRIGGER reject_notes BEFORE INSERT ON notes BEGIN
                SELECT RAISE(ABORT, 'disk I/O error simulated');
            END;",
        )
        .unwrap();
        let store = NoteStore::from_connection(conn).unwrap();
        NotesMcpService::new(Arc::new(store))
    }

    fn add(service: &NotesMcpService, title: &str, content: &str) -> Value {
        let result = service
            .add_note(Parameters(AddNoteRequest {
                title: title.to_string(),
                content: content.to_string(),
            }))
            .unwrap();
        serde_json::to_value(result).unwrap()
    }

    fn search(service: &NotesMcpService, query: &str) -> Value {
        let result = service
            .search_notes(Parameters(SearchNotesRequest {
                query: query.to_string(),
            }))
            .unwrap();
        serde_json::to_value(result).unwrap()
    }

    fn is_error(result: &Value) -> bool {
        result.get("isError").and_then(Value::as_bool).unwrap_or(false)
    }

    fn text(result: &Value) -> &str {
        result["content"][0]["text"].as_str().unwrap()
    }

    #[test]
    fn add_then_search_round_trip() {
        let service = service();

        let added = add(&service, "Shopping", "buy milk");
        assert!(!is_error(&added));
        assert!(text(&added).contains("Shopping"));

        let found = search(&service, "milk");
        assert!(!is_error(&found));
        assert!(text(&found).contains("[ID:1] Shopping"));
        assert!(text(&found).contains("buy milk"));
    }

    #[test]
    fn search_without_matches_is_not_an_error() {
        let found = search(&service(), "nonexistent-xyz");
        assert!(!is_error(&found));
        assert_eq!(text(&found), handlers::NO_MATCHES);
    }

    #[test]
    fn empty_note_is_found_by_empty_query() {
        let service = service();
        assert!(!is_error(&add(&service, "", "")));

        let found = search(&service, "");
        assert!(text(&found).contains("[ID:1]"));
    }

    #[test]
    fn failed_insert_is_flagged_with_error_text() {
        let service = failing_service();

        let added = add(&service, "Shopping", "buy milk");
        assert!(is_error(&added));
        assert!(text(&added).starts_with("Failed to save note:"));
        assert!(text(&added).contains("disk I/O error simulated"));

        // The server keeps serving after a failure.
        let found = search(&service, "milk");
        assert!(!is_error(&found));
        assert_eq!(text(&found), handlers::NO_MATCHES);
    }

    #[test]
    fn failed_search_is_flagged_with_error_text() {
        // A legacy table without a content column makes the search statement fail.
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE notes (id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT);")
            .unwrap();
        let service = NotesMcpService::new(Arc::new(NoteStore::from_connection(conn).unwrap()));

        let found = search(&service, "x");
        assert!(is_error(&found));
        assert!(text(&found).starts_with("Failed to search notes:"));
        assert!(text(&found).contains("content"));
    }

    #[test]
    fn registers_both_tools() {
        let service = service();
        let mut names: Vec<String> = service
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["add_note", "search_notes"]);
    }

    #[test]
    fn server_info_enables_tools() {
        let info = service().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("add_note"));
    }
}
