//! Note entity.
//!
//! # Invariants
//! - `created_at` is set once and never changes.
//! - `updated_at` moves strictly forward on every title/content mutation.

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

/// String identifier shared by notes and notebooks.
pub type EntryId = String;

/// One note owned by a notebook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique id across the whole tree.
    pub id: EntryId,
    /// Trimmed, non-blank title.
    pub title: String,
    /// Free text body. May be empty.
    pub content: String,
    /// Serialized as RFC 3339 (`createdAt`).
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Serialized as RFC 3339 (`updatedAt`).
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Note {
    /// Creates a note stamped with the current time.
    pub fn new(id: impl Into<EntryId>, title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = OffsetDateTime::now_utc();
        Self::with_timestamps(id, title, content, now, now)
    }

    /// Creates a note with caller-provided timestamps.
    ///
    /// Used by the persistence layer to revive stored notes.
    pub fn with_timestamps(
        id: impl Into<EntryId>,
        title: impl Into<String>,
        content: impl Into<String>,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            created_at,
            updated_at,
        }
    }

    /// Replaces the body. Empty content is allowed.
    pub fn update_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.touch();
    }

    /// Replaces the title. No validation happens here.
    pub fn update_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    /// Case-insensitive match against title or content.
    ///
    /// `lowered_keyword` must already be lower-cased.
    pub fn matches_lowered(&self, lowered_keyword: &str) -> bool {
        self.title.to_lowercase().contains(lowered_keyword)
            || self.content.to_lowercase().contains(lowered_keyword)
    }

    fn touch(&mut self) {
        self.updated_at = next_timestamp(self.updated_at);
    }
}

// Clock reads can repeat within one tick; never hand out a value that is not
// strictly after `previous`.
fn next_timestamp(previous: OffsetDateTime) -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    if now > previous {
        now
    } else {
        previous + Duration::nanoseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::Note;
    use time::{Duration, OffsetDateTime};

    #[test]
    fn new_note_has_equal_created_and_updated() {
        let note = Note::new("note-1", "Todo", "buy milk");
        assert_eq!(note.created_at, note.updated_at);
        assert_eq!(note.content, "buy milk");
    }

    #[test]
    fn update_content_moves_updated_at_forward_only() {
        let mut note = Note::new("note-1", "Todo", "buy milk");
        let created = note.created_at;
        let before = note.updated_at;

        note.update_content("");
        assert_eq!(note.content, "");
        assert!(note.updated_at > before);
        assert_eq!(note.created_at, created);
    }

    #[test]
    fn update_title_is_monotonic_even_with_future_timestamp() {
        let future = OffsetDateTime::now_utc() + Duration::hours(1);
        let mut note = Note::with_timestamps("note-1", "a", "b", future, future);

        note.update_title("renamed");
        assert_eq!(note.title, "renamed");
        assert!(note.updated_at > future);
        assert_eq!(note.created_at, future);
    }

    #[test]
    fn matches_lowered_checks_title_and_content() {
        let note = Note::new("note-1", "Groceries", "Buy MILK");
        assert!(note.matches_lowered("milk"));
        assert!(note.matches_lowered("groc"));
        assert!(note.matches_lowered(""));
        assert!(!note.matches_lowered("bread"));
    }
}
