//! Plain-text rendering of the notebook tree.
//!
//! # Responsibility
//! - Render the full tree as indented lines, lazily.
//! - Render one notebook's direct contents.
//!
//! # Invariants
//! - Tree lines follow the repository walk order: a notebook line, its notes,
//!   then its children.
//! - Rendering never mutates the tree.

use crate::model::note::Note;
use crate::model::notebook::{Notebook, Walk};
use std::fmt::{Display, Formatter};
use std::slice;

/// Indentation added per tree level.
pub const INDENT_UNIT: &str = "  ";

/// Lazy iterator over the lines of a tree rendering.
#[derive(Debug, Clone)]
pub struct TreeLines<'a> {
    walk: Walk<'a>,
    pending_notes: Option<(String, slice::Iter<'a, Note>)>,
}

impl<'a> TreeLines<'a> {
    /// Lines for `root` and its whole subtree.
    pub fn new(root: &'a Notebook) -> Self {
        Self {
            walk: root.walk(),
            pending_notes: None,
        }
    }
}

impl Iterator for TreeLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((indent, notes)) = &mut self.pending_notes {
            if let Some(note) = notes.next() {
                return Some(format!(
                    "{indent}{INDENT_UNIT}* [Note] {} ({})",
                    note.title, note.id
                ));
            }
        }

        let (depth, notebook) = self.walk.next()?;
        let indent = INDENT_UNIT.repeat(depth);
        let line = format!("{indent}- [Notebook] {} ({})", notebook.name, notebook.id);
        self.pending_notes = Some((indent, notebook.notes.iter()));
        Some(line)
    }
}

/// Whole-tree view; `Display` writes one line per entry.
#[derive(Debug, Clone, Copy)]
pub struct TreeView<'a> {
    root: &'a Notebook,
}

impl<'a> TreeView<'a> {
    pub fn new(root: &'a Notebook) -> Self {
        Self { root }
    }

    pub fn lines(&self) -> TreeLines<'a> {
        TreeLines::new(self.root)
    }
}

impl Display for TreeView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Direct notes and child notebooks of one notebook (not recursive).
#[derive(Debug, Clone, Copy)]
pub struct NotebookView<'a> {
    notebook: &'a Notebook,
}

impl<'a> NotebookView<'a> {
    pub fn new(notebook: &'a Notebook) -> Self {
        Self { notebook }
    }
}

impl Display for NotebookView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let notebook = self.notebook;
        writeln!(f, "[Notebook] {} ({})", notebook.name, notebook.id)?;

        writeln!(f, "Notes:")?;
        if notebook.notes.is_empty() {
            writeln!(f, "{INDENT_UNIT}(no notes)")?;
        }
        for note in &notebook.notes {
            writeln!(f, "{INDENT_UNIT}* {} ({})", note.title, note.id)?;
        }

        writeln!(f)?;
        writeln!(f, "Child notebooks:")?;
        if notebook.children.is_empty() {
            writeln!(f, "{INDENT_UNIT}(no sub-notebooks)")?;
        }
        for child in &notebook.children {
            writeln!(f, "{INDENT_UNIT}- {} ({})", child.name, child.id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{NotebookView, TreeLines, TreeView};
    use crate::model::note::Note;
    use crate::model::notebook::Notebook;

    fn sample_tree() -> Notebook {
        let mut root = Notebook::root();
        let mut work = Notebook::new("nb-1", "Work");
        work.add_note(Note::new("note-1", "Todo", "buy milk"));
        work.add_child_notebook(Notebook::new("nb-2", "Archive"));
        root.add_note(Note::new("note-0", "Inbox", ""));
        root.add_child_notebook(work);
        root
    }

    #[test]
    fn tree_lines_indent_by_depth_and_list_notes_before_children() {
        let root = sample_tree();
        let lines: Vec<String> = TreeLines::new(&root).collect();
        assert_eq!(
            lines,
            vec![
                "- [Notebook] Root (root)",
                "  * [Note] Inbox (note-0)",
                "  - [Notebook] Work (nb-1)",
                "    * [Note] Todo (note-1)",
                "    - [Notebook] Archive (nb-2)",
            ]
        );
    }

    #[test]
    fn tree_lines_resume_after_partial_consumption() {
        let root = sample_tree();
        let mut lines = TreeView::new(&root).lines();
        assert_eq!(lines.next().as_deref(), Some("- [Notebook] Root (root)"));
        assert_eq!(lines.next().as_deref(), Some("  * [Note] Inbox (note-0)"));
        assert_eq!(lines.count(), 3);
    }

    #[test]
    fn tree_view_display_ends_each_line_with_newline() {
        let root = Notebook::root();
        assert_eq!(TreeView::new(&root).to_string(), "- [Notebook] Root (root)\n");
    }

    #[test]
    fn notebook_view_shows_placeholders_for_empty_lists() {
        let notebook = Notebook::new("nb-2", "Archive");
        let rendered = NotebookView::new(&notebook).to_string();
        assert_eq!(
            rendered,
            "[Notebook] Archive (nb-2)\nNotes:\n  (no notes)\n\nChild notebooks:\n  (no sub-notebooks)\n"
        );
    }

    #[test]
    fn notebook_view_lists_direct_entries_only() {
        let root = sample_tree();
        let rendered = NotebookView::new(&root).to_string();
        assert!(rendered.contains("  * Inbox (note-0)"));
        assert!(rendered.contains("  - Work (nb-1)"));
        assert!(!rendered.contains("Todo"));
        assert!(!rendered.contains("Archive"));
    }
}
