//! Core domain logic for notetree: a notebook/note hierarchy persisted as one
//! JSON document.
//! This crate is the single source of truth for tree invariants.

pub mod logging;
pub mod model;
pub mod render;
pub mod repo;
pub mod store;

pub use logging::{
    default_log_level, init_logging, logging_status, LogConfig, LogLevel, LoggingError,
};
pub use model::note::{EntryId, Note};
pub use model::notebook::{Notebook, Walk, ROOT_NOTEBOOK_ID, ROOT_NOTEBOOK_NAME};
pub use render::{NotebookView, TreeLines, TreeView};
pub use repo::notes_repo::{NotesRepository, RepoError, RepoResult};
pub use store::{JsonFileStore, NotesStore, StoreError, StoreResult, DEFAULT_DATA_FILE_NAME};
