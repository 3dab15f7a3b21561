//! Command-line interface module for sortfolder.
//!
//! This module handles:
//! - Argument parsing
//! - Acquiring and validating the target directory, interactively if needed
//! - Loading the exclusion configuration
//! - Running the organizer and reporting the result

use crate::config::FilterConfig;
use crate::file_category::ExtensionIndex;
use crate::file_organizer::{OrganizeError, Organizer, RunReport};
use crate::output::{ConsoleObserver, OutputFormatter};
use anyhow::Context;
use clap::Parser;
use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;
use log::debug;
use std::io::{self, BufRead, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

/// Input that ends the program from the path prompt.
pub const EXIT_SENTINEL: &str = "EXIT";

const PROMPT: &str = "Enter the full path to your target folder (Type 'EXIT' to close the program)";

#[derive(Debug, Parser)]
#[command(name = "sortfolder")]
#[command(about = "Sort the files of a directory into category folders by extension")]
#[command(version)]
pub struct Args {
    /// Directory to organize. Prompted for when omitted.
    pub path: Option<PathBuf>,

    /// Exclusion rules file (defaults to .sortfolder.toml or ~/.config/sortfolder/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Show debug diagnostics
    #[arg(short, long)]
    pub verbose: bool,
}

/// Reasons a target path is rejected.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input cannot be empty.")]
    Empty,
    #[error("The specified path does not exist: {}", .0.display())]
    NotFound(PathBuf),
    #[error("The specified path exists but is not a directory or folder: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("Could not access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A parsed answer to the path prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAnswer {
    Exit,
    Target(PathBuf),
}

/// Interprets one line typed at the path prompt.
///
/// The line is trimmed. `EXIT` in any case quits; anything else must name an
/// existing directory and is returned canonicalized.
pub fn parse_prompt_input(input: &str) -> Result<PromptAnswer, InputError> {
    let input = input.trim();
    if input.eq_ignore_ascii_case(EXIT_SENTINEL) {
        return Ok(PromptAnswer::Exit);
    }
    if input.is_empty() {
        return Err(InputError::Empty);
    }
    validate_target(Path::new(input)).map(PromptAnswer::Target)
}

/// Resolves `path` to an absolute, existing directory.
///
/// A leading `~` is expanded to the home directory.
pub fn validate_target(path: &Path) -> Result<PathBuf, InputError> {
    let expanded = expand_home(path);
    let resolved = expanded.canonicalize().map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            InputError::NotFound(expanded.clone())
        } else {
            InputError::Io {
                path: expanded.clone(),
                source,
            }
        }
    })?;

    if !resolved.is_dir() {
        return Err(InputError::NotADirectory(resolved));
    }
    Ok(resolved)
}

fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

/// Prompts until the user names a directory or types the exit sentinel.
///
/// Uses an interactive prompt on a terminal and plain line reading when
/// stdin is piped.
pub fn prompt_for_target() -> anyhow::Result<PromptAnswer> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        prompt_interactive()
    } else {
        debug!("stdin is not a terminal, reading the target path line by line");
        read_target_from(stdin.lock())
    }
}

fn prompt_interactive() -> anyhow::Result<PromptAnswer> {
    let theme = ColorfulTheme::default();
    loop {
        let line: String = Input::with_theme(&theme)
            .with_prompt(PROMPT)
            .allow_empty(true)
            .interact_text()
            .context("Failed to read the target path")?;

        match parse_prompt_input(&line) {
            Ok(answer) => return Ok(answer),
            Err(e) => OutputFormatter::error(&format!("{} Please try again.", e)),
        }
    }
}

/// Reads answers from `reader` one line at a time until one is accepted.
///
/// Running out of input before that is an error.
pub fn read_target_from<R: BufRead>(reader: R) -> anyhow::Result<PromptAnswer> {
    let mut lines = reader.lines();
    loop {
        println!("{}:", PROMPT);
        let Some(line) = lines.next() else {
            anyhow::bail!("Input ended before a target folder was given");
        };
        let line = line.context("Failed to read the target path")?;

        match parse_prompt_input(&line) {
            Ok(answer) => return Ok(answer),
            Err(e) => OutputFormatter::error(&format!("{} Please try again.", e)),
        }
    }
}

/// Runs the application for parsed arguments.
///
/// Configuration problems and an invalid `PATH` argument are returned as
/// errors before the filesystem is touched.
pub fn run_cli(args: Args) -> anyhow::Result<ExitCode> {
    let config = FilterConfig::load(args.config.as_deref())?;
    let filters = config.compile()?;

    let target = match args.path {
        Some(path) => validate_target(&path)?,
        None => match prompt_for_target()? {
            PromptAnswer::Exit => {
                println!("Exiting the program.");
                return Ok(ExitCode::SUCCESS);
            }
            PromptAnswer::Target(path) => path,
        },
    };
    debug!("Target directory: {}", target.display());

    let organizer = Organizer::with_filters(ExtensionIndex::default(), filters);
    match organize_directory(&organizer, &target) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) if e.is_precondition() => {
            OutputFormatter::error(&e.to_string());
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

/// Prepares the output folders under `root`, organizes it and prints the
/// per-file lines, a summary and the completion message.
pub fn organize_directory(
    organizer: &Organizer,
    root: &Path,
) -> Result<RunReport, OrganizeError> {
    OutputFormatter::info(&format!("Organizing contents of: {}", root.display()));

    organizer.prepare(root)?;

    let mut observer = ConsoleObserver::new();
    let report = organizer.run_with(root, &mut observer)?;
    observer.finish();

    if !report.moved.is_empty() {
        OutputFormatter::summary_table(&report.counts_by_folder(), report.moved.len());
    }
    if !report.excluded.is_empty() {
        OutputFormatter::info(&format!(
            "{} files left in place by exclusion rules.",
            report.excluded.len()
        ));
    }
    if !report.is_complete_success() {
        OutputFormatter::warning(&format!(
            "{} files could not be organized. Please review errors above.",
            report.failed.len()
        ));
    }

    OutputFormatter::success("Organization complete.");
    Ok(report)
}
