//! `notetree` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, set up file logging, and run one repository command.
//! - Report expected user errors without failing the process.
//!
//! # Invariants
//! - Exit code is 0 on success and on user errors (bad input, unknown ids).
//! - Storage failures are logged and exit with code 1.

mod cli;
mod dispatch;

use std::io;
use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::Parser;
use log::{error, info, warn};
use notetree_core::{
    default_log_level, init_logging, JsonFileStore, LogConfig, NotesRepository,
};

use crate::dispatch::DispatchError;

const LOG_DIR_NAME: &str = "logs";

fn main() {
    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(err)
            if matches!(
                err.kind(),
                ErrorKind::InvalidSubcommand | ErrorKind::UnknownArgument
            ) =>
        {
            print!("{}", cli::help_text());
            return;
        }
        Err(err) => err.exit(),
    };

    if let Err(err) = run(cli) {
        error!("event=cli_run module=cli status=error error={}", err);
        eprintln!("Unexpected error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: cli::Cli) -> Result<(), DispatchError> {
    let mut stdout = io::stdout().lock();
    let Some(command) = cli
        .command
        .filter(|command| dispatch::needs_repository(Some(command)))
    else {
        return dispatch::write_help(&mut stdout);
    };

    let data_dir = absolute_dir(&cli.data_dir)?;
    if !cli.no_log {
        let level = cli.log_level.unwrap_or_else(default_log_level);
        let started = LogConfig::new(level, data_dir.join(LOG_DIR_NAME)).and_then(init_logging);
        if let Err(err) = started {
            eprintln!("warning: file logging disabled: {err}");
        }
    }

    let mut repo = NotesRepository::load(JsonFileStore::in_dir(&data_dir))?;
    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&command)
    );

    match dispatch::execute(&mut repo, command, &mut stdout) {
        Ok(()) => Ok(()),
        Err(err) if err.is_user_error() => {
            warn!("event=cli_command module=cli status=rejected error={}", err);
            eprintln!("Error: {err}");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

fn absolute_dir(dir: &Path) -> io::Result<PathBuf> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(dir))
}

fn command_name(command: &cli::Commands) -> &'static str {
    match command {
        cli::Commands::Tree(_) => "tree",
        cli::Commands::NewNotebook(_) => "new-notebook",
        cli::Commands::NewNote(_) => "new-note",
        cli::Commands::OpenNotebook(_) => "open-notebook",
        cli::Commands::Search(_) => "search",
        cli::Commands::UpdateNote(_) => "update-note",
        cli::Commands::Help => "help",
    }
}
