//! # notes-mcp
//!
//! MCP (Model Context Protocol) server for the note store.
//!
//! Exposes two tools:
//! - `add_note`: Save a note with a title and content
//! - `search_notes`: Keyword search over note titles and contents

pub mod handlers;
pub mod tools;

pub use tools::NotesMcpService;
