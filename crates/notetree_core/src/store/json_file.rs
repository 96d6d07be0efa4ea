//! JSON document store.
//!
//! # Responsibility
//! - Read and write the `{ "rootNotebook": ... }` document.
//! - Revive nested notebooks/notes from their stored records.
//!
//! # Invariants
//! - Writes go to a sibling temp file first and are renamed into place, so the
//!   previous document survives a crash mid-write.
//! - Stored `createdAt`/`updatedAt` survive reload exactly.
//! - Missing or `null` `notes`/`children` lists revive as empty.

use super::{NotesStore, StoreError, StoreResult};
use crate::model::note::Note;
use crate::model::notebook::{Notebook, ROOT_NOTEBOOK_ID};
use log::{error, info};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use time::OffsetDateTime;

/// File name used by [`JsonFileStore::in_dir`].
pub const DEFAULT_DATA_FILE_NAME: &str = "notes.json";
const TEMP_SUFFIX: &str = ".tmp";

/// Store backed by one pretty-printed JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store for an explicit document path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for `notes.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_DATA_FILE_NAME))
    }

    /// Document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from(DEFAULT_DATA_FILE_NAME));
        name.push(TEMP_SUFFIX);
        self.path.with_file_name(name)
    }

    fn ensure_parent_dir(&self) -> StoreResult<()> {
        let Some(parent) = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        else {
            return Ok(());
        };
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })
    }

    fn read_document(&self) -> StoreResult<Option<Notebook>> {
        self.ensure_parent_dir()?;

        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let document: StoredDocument =
            serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        let root = document
            .root_notebook
            .into_notebook(OffsetDateTime::now_utc());
        validate_tree(&root, &self.path)?;
        Ok(Some(root))
    }

    fn write_document(&self, root: &Notebook) -> StoreResult<()> {
        self.ensure_parent_dir()?;

        let payload = serde_json::to_string_pretty(&DocumentRef {
            root_notebook: root,
        })
        .map_err(StoreError::Serialize)?;

        let temp_path = self.temp_path();
        fs::write(&temp_path, payload).map_err(|source| StoreError::Io {
            path: temp_path.clone(),
            source,
        })?;
        fs::rename(&temp_path, &self.path).map_err(|source| {
            let _ = fs::remove_file(&temp_path);
            StoreError::Io {
                path: self.path.clone(),
                source,
            }
        })
    }
}

impl NotesStore for JsonFileStore {
    fn load(&self) -> StoreResult<Option<Notebook>> {
        let started_at = Instant::now();
        match self.read_document() {
            Ok(Some(root)) => {
                info!(
                    "event=store_load module=store status=ok notebooks={} duration_ms={}",
                    root.walk().count(),
                    started_at.elapsed().as_millis()
                );
                Ok(Some(root))
            }
            Ok(None) => {
                info!(
                    "event=store_load module=store status=missing duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(None)
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn save(&self, root: &Notebook) -> StoreResult<()> {
        let started_at = Instant::now();
        match self.write_document(root) {
            Ok(()) => {
                info!(
                    "event=store_save module=store status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentRef<'a> {
    root_notebook: &'a Notebook,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredDocument {
    root_notebook: NotebookRecord,
}

#[derive(Deserialize)]
struct NotebookRecord {
    id: String,
    name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    notes: Vec<NoteRecord>,
    #[serde(default, deserialize_with = "null_as_empty")]
    children: Vec<NotebookRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteRecord {
    id: String,
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    updated_at: Option<OffsetDateTime>,
}

impl NotebookRecord {
    fn into_notebook(self, loaded_at: OffsetDateTime) -> Notebook {
        let mut notebook = Notebook::new(self.id, self.name);
        notebook.notes = self
            .notes
            .into_iter()
            .map(|record| record.into_note(loaded_at))
            .collect();
        notebook.children = self
            .children
            .into_iter()
            .map(|record| record.into_notebook(loaded_at))
            .collect();
        notebook
    }
}

impl NoteRecord {
    fn into_note(self, loaded_at: OffsetDateTime) -> Note {
        let created_at = self.created_at.unwrap_or(loaded_at);
        let updated_at = self.updated_at.unwrap_or(created_at);
        Note::with_timestamps(self.id, self.title, self.content, created_at, updated_at)
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn validate_tree(root: &Notebook, path: &Path) -> StoreResult<()> {
    if !root.is_root() {
        return Err(StoreError::InvalidData(format!(
            "root notebook id must be `{ROOT_NOTEBOOK_ID}`, got `{}`",
            root.id
        )));
    }

    let mut seen = HashSet::new();
    for (_, notebook) in root.walk() {
        register_id(&mut seen, &notebook.id, "notebook", &notebook.name, path)?;
        for note in &notebook.notes {
            register_id(&mut seen, &note.id, "note", &note.title, path)?;
        }
    }
    Ok(())
}

fn register_id<'a>(
    seen: &mut HashSet<&'a str>,
    id: &'a str,
    kind: &'static str,
    label: &str,
    path: &Path,
) -> StoreResult<()> {
    if id.trim().is_empty() {
        return Err(StoreError::InvalidData(format!(
            "{kind} `{label}` has a blank id; give it an id in {}",
            path.display()
        )));
    }
    if !seen.insert(id) {
        return Err(StoreError::InvalidData(format!(
            "duplicate id `{id}` on {kind} `{label}`; rename one of the entries with that id in {} to load it",
            path.display()
        )));
    }
    Ok(())
}
