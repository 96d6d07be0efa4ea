use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};

use notetree_core::{NotesRepository, NotesStore, RepoError};

use crate::cli::{self, Commands};

pub const MISSING_NOTEBOOK_ID_MESSAGE: &str = "Please provide a notebook id.";
pub const MISSING_NOTE_ID_MESSAGE: &str = "Please provide a note id.";

#[derive(Debug)]
pub enum DispatchError {
    MissingNoteId,
    Repo(RepoError),
    Io(io::Error),
    Encode(serde_json::Error),
}

impl DispatchError {
    /// Expected failures that are reported to the user without aborting.
    pub fn is_user_error(&self) -> bool {
        match self {
            Self::MissingNoteId => true,
            Self::Repo(err) => err.is_user_error(),
            Self::Io(_) | Self::Encode(_) => false,
        }
    }
}

impl Display for DispatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingNoteId => f.write_str(MISSING_NOTE_ID_MESSAGE),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "I/O failure: {err}"),
            Self::Encode(err) => write!(f, "failed to encode output: {err}"),
        }
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MissingNoteId => None,
            Self::Repo(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<RepoError> for DispatchError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<io::Error> for DispatchError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for DispatchError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Whether `command` needs the repository loaded.
pub fn needs_repository(command: Option<&Commands>) -> bool {
    !matches!(command, None | Some(Commands::Help))
}

pub fn write_help(out: &mut impl Write) -> Result<(), DispatchError> {
    write!(out, "{}", cli::help_text())?;
    Ok(())
}

/// Runs one repository command and writes its user-facing output to `out`.
pub fn execute<S: NotesStore>(
    repo: &mut NotesRepository<S>,
    command: Commands,
    out: &mut impl Write,
) -> Result<(), DispatchError> {
    match command {
        Commands::Tree(_) => {
            for line in repo.notebook_tree().lines() {
                writeln!(out, "{line}")?;
            }
        }
        Commands::NewNotebook(args) => {
            let name = args.name.unwrap_or_default();
            let notebook = repo.create_notebook(&args.parent_id, &name)?;
            writeln!(out, "Notebook created:")?;
            writeln!(out, "{}", serde_json::to_string_pretty(&notebook)?)?;
        }
        Commands::NewNote(args) => {
            let title = args.title.unwrap_or_default();
            let content = args.content.join(" ");
            let note = repo.create_note(&args.notebook_id, &title, &content)?;
            writeln!(out, "Note created:")?;
            writeln!(out, "{}", serde_json::to_string_pretty(&note)?)?;
        }
        Commands::OpenNotebook(args) => {
            let Some(notebook_id) = args.notebook_id else {
                writeln!(out, "{MISSING_NOTEBOOK_ID_MESSAGE}")?;
                return Ok(());
            };
            let view = repo.open_notebook(&notebook_id)?;
            writeln!(out)?;
            writeln!(out, "{view}")?;
        }
        Commands::Search(args) => {
            let keyword = args.keyword.unwrap_or_default();
            let results = repo.search_notes(&keyword);
            writeln!(out, "Found {} notes for \"{}\":", results.len(), keyword)?;
            for note in results {
                writeln!(out, "- {} ({})", note.title, note.id)?;
            }
        }
        Commands::UpdateNote(args) => {
            let note_id = args.note_id.ok_or(DispatchError::MissingNoteId)?;
            repo.update_note(&note_id, &args.content.join(" "))?;
            writeln!(out, "Note updated.")?;
        }
        Commands::Help => write_help(out)?,
    }
    Ok(())
}
