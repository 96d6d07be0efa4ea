use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, CommandFactory, Parser, Subcommand};
use notetree_core::{LogLevel, ROOT_NOTEBOOK_ID};

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::BrightCyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::BrightMagenta.on_default())
}

fn parse_log_level(value: &str) -> Result<LogLevel, String> {
    value.parse::<LogLevel>().map_err(|err| err.to_string())
}

#[derive(Debug, Parser)]
#[command(name = "notetree")]
#[command(bin_name = "notetree")]
#[command(version)]
#[command(about = "Notes CLI - manage a tree of notebooks and notes stored in one JSON file")]
#[command(styles = cli_styles())]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    #[arg(
        long,
        env = "NOTETREE_DATA_DIR",
        default_value = "data",
        global = true,
        help = "Directory holding notes.json and the logs/ folder."
    )]
    pub data_dir: PathBuf,

    #[arg(
        long,
        env = "NOTETREE_LOG_LEVEL",
        global = true,
        value_parser = parse_log_level,
        help = "File log level: trace|debug|info|warn|error."
    )]
    pub log_level: Option<LogLevel>,

    #[arg(long, global = true, help = "Disable file logging.")]
    pub no_log: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Print notebook tree.")]
    Tree(TreeArgs),
    #[command(about = "Create a new notebook.")]
    NewNotebook(NewNotebookArgs),
    #[command(about = "Create a new note.")]
    NewNote(NewNoteArgs),
    #[command(about = "Show contents of a notebook.")]
    OpenNotebook(OpenNotebookArgs),
    #[command(about = "Search notes by keyword.")]
    Search(SearchArgs),
    #[command(about = "Update an existing note.")]
    UpdateNote(UpdateNoteArgs),
    #[command(about = "Show this help.")]
    Help,
}

#[derive(Debug, Default, Args)]
pub struct TreeArgs {
    #[arg(trailing_var_arg = true, hide = true)]
    pub extra: Vec<String>,
}

#[derive(Debug, Args)]
pub struct NewNotebookArgs {
    #[arg(default_value = ROOT_NOTEBOOK_ID, help = "Parent notebook id.")]
    pub parent_id: String,

    #[arg(help = "Notebook name.")]
    pub name: Option<String>,

    #[arg(trailing_var_arg = true, hide = true)]
    pub extra: Vec<String>,
}

#[derive(Debug, Args)]
pub struct NewNoteArgs {
    #[arg(default_value = ROOT_NOTEBOOK_ID, help = "Target notebook id.")]
    pub notebook_id: String,

    #[arg(help = "Note title.")]
    pub title: Option<String>,

    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = "Note content; remaining words are joined with spaces."
    )]
    pub content: Vec<String>,
}

#[derive(Debug, Args)]
pub struct OpenNotebookArgs {
    #[arg(help = "Notebook id.")]
    pub notebook_id: Option<String>,

    #[arg(trailing_var_arg = true, hide = true)]
    pub extra: Vec<String>,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(help = "Case-insensitive keyword matched against titles and contents.")]
    pub keyword: Option<String>,

    #[arg(trailing_var_arg = true, hide = true)]
    pub extra: Vec<String>,
}

#[derive(Debug, Args)]
pub struct UpdateNoteArgs {
    #[arg(help = "Note id.")]
    pub note_id: Option<String>,

    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = "New content; remaining words are joined with spaces."
    )]
    pub content: Vec<String>,
}

/// Rendered top-level help, used for `help` and unknown commands.
pub fn help_text() -> String {
    Cli::command().render_long_help().to_string()
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands};
    use clap::{CommandFactory, Parser};
    use notetree_core::LogLevel;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn new_notebook_defaults_parent_to_root() {
        let cli = Cli::try_parse_from(["notetree", "new-notebook"]).unwrap();
        match cli.command {
            Some(Commands::NewNotebook(args)) => {
                assert_eq!(args.parent_id, "root");
                assert!(args.name.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn new_note_collects_trailing_content_words() {
        let cli = Cli::try_parse_from([
            "notetree", "new-note", "nb-1", "Todo", "buy", "-2", "milk",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::NewNote(args)) => {
                assert_eq!(args.notebook_id, "nb-1");
                assert_eq!(args.title.as_deref(), Some("Todo"));
                assert_eq!(args.content, vec!["buy", "-2", "milk"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_options_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "notetree",
            "tree",
            "--data-dir",
            "/tmp/notes",
            "--log-level",
            "WARN",
        ])
        .unwrap();
        assert_eq!(cli.data_dir.to_str(), Some("/tmp/notes"));
        assert_eq!(cli.log_level, Some(LogLevel::Warn));
        assert!(matches!(cli.command, Some(Commands::Tree(_))));
    }

    #[test]
    fn extra_words_after_single_word_arguments_are_collected() {
        let cli = Cli::try_parse_from(["notetree", "new-notebook", "root", "My", "Notebook"])
            .unwrap();
        match cli.command {
            Some(Commands::NewNotebook(args)) => {
                assert_eq!(args.name.as_deref(), Some("My"));
                assert_eq!(args.extra, vec!["Notebook"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["notetree", "search", "buy", "milk"]).unwrap();
        match cli.command {
            Some(Commands::Search(args)) => assert_eq!(args.keyword.as_deref(), Some("buy")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn update_note_id_is_optional() {
        let cli = Cli::try_parse_from(["notetree", "update-note"]).unwrap();
        match cli.command {
            Some(Commands::UpdateNote(args)) => {
                assert!(args.note_id.is_none());
                assert!(args.content.is_empty());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn missing_command_parses_as_none() {
        let cli = Cli::try_parse_from(["notetree"]).unwrap();
        assert!(cli.command.is_none());
    }
}
