//! # notes-core
//!
//! Core types shared by the notes crates:
//! - [`Note`] — the single persisted record
//! - Error hierarchy ([`NotesError`]) and the [`Result`] alias

pub mod error;
pub mod note;

pub use error::{NotesError, Result};
pub use note::Note;
