//! Durable storage for the notebook tree.
//!
//! # Responsibility
//! - Define the load/save contract the repository persists through.
//! - Provide the JSON document implementation used by the CLI.
//!
//! # Invariants
//! - `save` always writes the whole tree; there are no partial writes.
//! - `load` returns `Ok(None)` only when no document exists yet.
//! - Read paths reject invalid persisted state instead of masking it.
//!
//! # Known hazard
//! - No inter-process locking. Two processes writing the same document race
//!   and the last writer wins without detection.

use crate::model::notebook::Notebook;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod json_file;

pub use json_file::{JsonFileStore, DEFAULT_DATA_FILE_NAME};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from reading or writing the storage document.
#[derive(Debug)]
pub enum StoreError {
    /// Filesystem failure on `path`.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Document at `path` is not valid JSON of the expected shape.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Tree could not be encoded.
    Serialize(serde_json::Error),
    /// Document parsed but violates tree invariants.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "storage I/O failed at `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "malformed notes document `{}`: {source}", path.display())
            }
            Self::Serialize(err) => write!(f, "failed to encode notes document: {err}"),
            Self::InvalidData(message) => write!(f, "invalid notes document: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

/// Persistence contract for the whole notebook tree.
pub trait NotesStore {
    /// Loads the stored tree, or `None` when nothing has been stored yet.
    fn load(&self) -> StoreResult<Option<Notebook>>;
    /// Overwrites the stored tree with `root` and all descendants.
    fn save(&self, root: &Notebook) -> StoreResult<()>;
}

impl<S: NotesStore + ?Sized> NotesStore for &S {
    fn load(&self) -> StoreResult<Option<Notebook>> {
        (**self).load()
    }

    fn save(&self, root: &Notebook) -> StoreResult<()> {
        (**self).save(root)
    }
}
