//! Notes repository over one in-memory notebook tree.
//!
//! # Responsibility
//! - Validate create/update inputs and generate entity ids.
//! - Resolve notebooks and notes by id with deterministic pre-order walks.
//! - Keep durable storage in step with memory after each mutation.
//!
//! # Invariants
//! - Lookups visit notebooks pre-order and, within a notebook, notes in
//!   insertion order before any child notebook.
//! - Generated ids never collide with any id already in the tree.
//! - When a save fails, the in-memory mutation is rolled back before the
//!   error is returned.

use crate::model::note::{EntryId, Note};
use crate::model::notebook::Notebook;
use crate::render::{NotebookView, TreeView};
use crate::store::{NotesStore, StoreError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const NOTEBOOK_ID_PREFIX: &str = "notebook";
const NOTE_ID_PREFIX: &str = "note";

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from notes repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// A required text field is blank after trim.
    InvalidInput(String),
    /// Notebook id does not resolve.
    NotebookNotFound(EntryId),
    /// Note id does not resolve.
    NoteNotFound(EntryId),
    /// Storage read/write failure.
    Store(StoreError),
}

impl RepoError {
    /// Whether this error is an expected outcome of bad user input, as opposed
    /// to a storage failure.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "{message}"),
            Self::NotebookNotFound(id) => write!(f, "Notebook with id {id} not found."),
            Self::NoteNotFound(id) => write!(f, "Note with id {id} not found."),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Repository owning the notebook tree and its store.
#[derive(Debug)]
pub struct NotesRepository<S: NotesStore> {
    root: Notebook,
    store: S,
}

impl<S: NotesStore> NotesRepository<S> {
    /// Loads the tree from `store`.
    ///
    /// When the store holds no document yet, a root-only tree is created and
    /// saved before returning.
    ///
    /// # Errors
    /// - `RepoError::Store` for any read, parse or initial write failure.
    pub fn load(store: S) -> RepoResult<Self> {
        if let Some(root) = store.load()? {
            return Ok(Self { root, store });
        }

        let repo = Self {
            root: Notebook::root(),
            store,
        };
        repo.save()?;
        info!("event=repo_init module=repo status=ok");
        Ok(repo)
    }

    /// Writes the whole tree to the store.
    pub fn save(&self) -> RepoResult<()> {
        self.store.save(&self.root).map_err(Into::into)
    }

    pub fn root_notebook(&self) -> &Notebook {
        &self.root
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Pre-order search from root; first match wins.
    pub fn find_notebook_by_id(&self, notebook_id: &str) -> Option<&Notebook> {
        self.root.find_notebook(notebook_id)
    }

    /// Same walk as [`Self::find_notebook_by_id`], scanning each notebook's
    /// notes before its children.
    pub fn get_note_by_id(&self, note_id: &str) -> Option<&Note> {
        self.root.find_note(note_id)
    }

    /// Creates a notebook as the last child of `parent_id`.
    ///
    /// # Errors
    /// - `InvalidInput` when `name` is blank after trim.
    /// - `NotebookNotFound` when `parent_id` does not resolve.
    /// - `Store` when persistence fails; the tree is left unchanged.
    pub fn create_notebook(&mut self, parent_id: &str, name: &str) -> RepoResult<Notebook> {
        let name = normalize_required(name, "Notebook name cannot be empty.")?;
        self.ensure_notebook_exists(parent_id)?;

        let notebook = Notebook::new(self.generate_id(NOTEBOOK_ID_PREFIX), name);
        self.notebook_mut(parent_id)?.add_child_notebook(notebook.clone());

        self.persist_or_rollback("notebook_create", |root| {
            if let Some(parent) = root.find_notebook_mut(parent_id) {
                parent.children.pop();
            }
        })?;
        info!(
            "event=notebook_create module=repo status=ok notebook_id={} parent_id={}",
            notebook.id, parent_id
        );
        Ok(notebook)
    }

    /// Creates a note as the last note of `notebook_id`.
    ///
    /// # Errors
    /// - `InvalidInput` when `title` is blank after trim.
    /// - `NotebookNotFound` when `notebook_id` does not resolve.
    /// - `Store` when persistence fails; the tree is left unchanged.
    pub fn create_note(
        &mut self,
        notebook_id: &str,
        title: &str,
        content: &str,
    ) -> RepoResult<Note> {
        let title = normalize_required(title, "Note title cannot be empty.")?;
        self.ensure_notebook_exists(notebook_id)?;

        let note = Note::new(self.generate_id(NOTE_ID_PREFIX), title, content);
        self.notebook_mut(notebook_id)?.add_note(note.clone());

        self.persist_or_rollback("note_create", |root| {
            if let Some(notebook) = root.find_notebook_mut(notebook_id) {
                notebook.notes.pop();
            }
        })?;
        info!(
            "event=note_create module=repo status=ok note_id={} notebook_id={} content_len={}",
            note.id,
            notebook_id,
            note.content.len()
        );
        Ok(note)
    }

    /// Replaces the content of one note and refreshes its `updated_at`.
    ///
    /// # Errors
    /// - `NoteNotFound` when `note_id` does not resolve.
    /// - `Store` when persistence fails; the note is restored.
    pub fn update_note(&mut self, note_id: &str, new_content: &str) -> RepoResult<()> {
        let Some(note) = self.root.find_note_mut(note_id) else {
            warn!("event=note_update module=repo status=rejected reason=note_not_found");
            return Err(RepoError::NoteNotFound(note_id.to_string()));
        };
        let previous = (note.content.clone(), note.updated_at);
        note.update_content(new_content);

        self.persist_or_rollback("note_update", |root| {
            if let Some(note) = root.find_note_mut(note_id) {
                (note.content, note.updated_at) = previous;
            }
        })?;
        info!(
            "event=note_update module=repo status=ok note_id={} content_len={}",
            note_id,
            new_content.len()
        );
        Ok(())
    }

    /// Case-insensitive substring search over note titles and contents.
    ///
    /// Results follow the lookup walk order. An empty keyword matches every note.
    pub fn search_notes(&self, keyword: &str) -> Vec<&Note> {
        let lowered = keyword.to_lowercase();
        self.root
            .iter_notes()
            .filter(|note| note.matches_lowered(&lowered))
            .collect()
    }

    /// Lazy indented rendering of the whole tree.
    pub fn notebook_tree(&self) -> TreeView<'_> {
        TreeView::new(&self.root)
    }

    /// Direct notes and child notebooks of one notebook.
    ///
    /// # Errors
    /// - `NotebookNotFound` when `notebook_id` does not resolve.
    pub fn open_notebook(&self, notebook_id: &str) -> RepoResult<NotebookView<'_>> {
        self.find_notebook_by_id(notebook_id)
            .map(NotebookView::new)
            .ok_or_else(|| RepoError::NotebookNotFound(notebook_id.to_string()))
    }

    fn ensure_notebook_exists(&self, notebook_id: &str) -> RepoResult<()> {
        if self.find_notebook_by_id(notebook_id).is_none() {
            warn!("event=notebook_lookup module=repo status=rejected reason=notebook_not_found");
            return Err(RepoError::NotebookNotFound(notebook_id.to_string()));
        }
        Ok(())
    }

    fn notebook_mut(&mut self, notebook_id: &str) -> RepoResult<&mut Notebook> {
        self.root
            .find_notebook_mut(notebook_id)
            .ok_or_else(|| RepoError::NotebookNotFound(notebook_id.to_string()))
    }

    fn generate_id(&self, prefix: &str) -> EntryId {
        loop {
            let candidate = format!("{prefix}-{}", Uuid::new_v4().simple());
            if !self.root.contains_id(&candidate) {
                return candidate;
            }
        }
    }

    fn persist_or_rollback(
        &mut self,
        event: &'static str,
        rollback: impl FnOnce(&mut Notebook),
    ) -> RepoResult<()> {
        match self.store.save(&self.root) {
            Ok(()) => Ok(()),
            Err(err) => {
                rollback(&mut self.root);
                error!(
                    "event={} module=repo status=error error_code=persist_failed error={}",
                    event, err
                );
                Err(err.into())
            }
        }
    }
}

fn normalize_required(value: &str, message: &str) -> RepoResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        warn!("event=input_validation module=repo status=rejected reason=blank_field");
        return Err(RepoError::InvalidInput(message.to_string()));
    }
    Ok(trimmed.to_string())
}
