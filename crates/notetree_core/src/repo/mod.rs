//! Notebook tree repository.
//!
//! # Responsibility
//! - Own the in-memory tree and expose lookup, search, rendering and
//!   create/update use-cases over it.
//! - Persist the whole tree through a [`crate::store::NotesStore`] after every
//!   successful mutation.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`InvalidInput`, `NotebookNotFound`,
//!   `NoteNotFound`) in addition to storage errors.
//! - A failed validation never touches memory or storage.

pub mod notes_repo;
