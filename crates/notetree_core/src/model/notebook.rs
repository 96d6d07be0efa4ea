//! Notebook entity and tree traversal.
//!
//! # Responsibility
//! - Own notes and child notebooks in insertion order.
//! - Provide pre-order traversal used by lookup, search and rendering.
//!
//! # Invariants
//! - Traversal order is pre-order: a notebook, then its children left to right.
//! - Within one notebook, notes are visited in insertion order before any child.

use super::note::{EntryId, Note};
use serde::{Deserialize, Serialize};

/// Fixed id of the root notebook.
pub const ROOT_NOTEBOOK_ID: &str = "root";
/// Display name given to a freshly initialized root notebook.
pub const ROOT_NOTEBOOK_NAME: &str = "Root";

/// Notebook node owning notes and child notebooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notebook {
    /// Unique id across the whole tree.
    pub id: EntryId,
    /// Trimmed, non-blank display name.
    pub name: String,
    /// Owned notes, insertion order.
    pub notes: Vec<Note>,
    /// Owned child notebooks, insertion order.
    pub children: Vec<Notebook>,
}

impl Notebook {
    /// Creates an empty notebook.
    pub fn new(id: impl Into<EntryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            notes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates the empty root notebook.
    pub fn root() -> Self {
        Self::new(ROOT_NOTEBOOK_ID, ROOT_NOTEBOOK_NAME)
    }

    /// Returns whether this is the root notebook.
    pub fn is_root(&self) -> bool {
        self.id == ROOT_NOTEBOOK_ID
    }

    /// Appends a note. No uniqueness check.
    pub fn add_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    /// Appends a child notebook. No uniqueness check.
    pub fn add_child_notebook(&mut self, notebook: Notebook) {
        self.children.push(notebook);
    }

    /// Removes one direct note by id and returns it.
    pub fn remove_note(&mut self, note_id: &str) -> Option<Note> {
        let index = self.notes.iter().position(|note| note.id == note_id)?;
        Some(self.notes.remove(index))
    }

    /// Removes one direct child notebook, with its whole subtree, by id.
    pub fn remove_child_notebook(&mut self, notebook_id: &str) -> Option<Notebook> {
        let index = self
            .children
            .iter()
            .position(|child| child.id == notebook_id)?;
        Some(self.children.remove(index))
    }

    /// Lazy pre-order walk yielding `(depth, notebook)`, starting at depth 0.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }

    /// Every note in the subtree, in walk order.
    pub fn iter_notes(&self) -> impl Iterator<Item = &Note> + '_ {
        self.walk().flat_map(|(_, notebook)| notebook.notes.iter())
    }

    /// First notebook in walk order with the given id.
    pub fn find_notebook(&self, notebook_id: &str) -> Option<&Notebook> {
        self.walk()
            .map(|(_, notebook)| notebook)
            .find(|notebook| notebook.id == notebook_id)
    }

    /// Mutable counterpart of [`Notebook::find_notebook`]; same visit order.
    pub fn find_notebook_mut(&mut self, notebook_id: &str) -> Option<&mut Notebook> {
        if self.id == notebook_id {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_notebook_mut(notebook_id))
    }

    /// First note in walk order with the given id.
    pub fn find_note(&self, note_id: &str) -> Option<&Note> {
        self.iter_notes().find(|note| note.id == note_id)
    }

    /// Mutable counterpart of [`Notebook::find_note`]; same visit order.
    pub fn find_note_mut(&mut self, note_id: &str) -> Option<&mut Note> {
        if let Some(index) = self.notes.iter().position(|note| note.id == note_id) {
            return Some(&mut self.notes[index]);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_note_mut(note_id))
    }

    /// Whether any notebook or note in the subtree carries `id`.
    pub fn contains_id(&self, id: &str) -> bool {
        self.walk().any(|(_, notebook)| {
            notebook.id == id || notebook.notes.iter().any(|note| note.id == id)
        })
    }
}

/// Pre-order iterator returned by [`Notebook::walk`].
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    stack: Vec<(usize, &'a Notebook)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Notebook);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, notebook) = self.stack.pop()?;
        self.stack.extend(
            notebook
                .children
                .iter()
                .rev()
                .map(|child| (depth + 1, child)),
        );
        Some((depth, notebook))
    }
}
