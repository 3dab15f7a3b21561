//! Output formatting and styling module.
//!
//! All console output goes through here: colored status lines, the progress
//! bar shown while files are moved, and the summary table printed at the end
//! of a run.

use crate::file_organizer::{FileOutcome, RunObserver, display_name};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;

/// Prints console messages with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message to stderr in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar for `total` file operations.
    ///
    /// The bar draws to stderr and stays hidden when that is not a terminal.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Prints a table of moved files per destination folder.
    ///
    /// ```no_run
    /// use sortfolder::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("Sorted Documents".to_string(), 15);
    /// counts.insert("Sorted Images".to_string(), 8);
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(folder_counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let max_folder_len = folder_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(6); // "Folder"

        println!(
            "{:<width$} | {}",
            "Folder".bold(),
            "Files".bold(),
            width = max_folder_len
        );
        println!("{}", "-".repeat(max_folder_len + 10));

        for (folder, count) in folder_counts {
            println!(
                "{:<width$} | {} {}",
                folder,
                count.to_string().green(),
                plural_files(*count),
                width = max_folder_len
            );
        }

        println!("{}", "-".repeat(max_folder_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural_files(total_files),
            width = max_folder_len
        );
    }
}

fn plural_files(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

/// Formats the console line for one file outcome.
///
/// Returns `None` for outcomes that are not reported line by line.
pub fn outcome_line(outcome: &FileOutcome) -> Option<String> {
    match outcome {
        FileOutcome::Moved(record) => Some(format!(
            "Moved: {} -> {}",
            record.file_name(),
            record.destination.display()
        )),
        FileOutcome::Failed { path, error } => Some(format!(
            "Error moving file {}: {}",
            display_name(path),
            error
        )),
        FileOutcome::Excluded(_) => None,
    }
}

/// Prints each outcome as it happens and drives a progress bar.
pub struct ConsoleObserver {
    progress: Option<ProgressBar>,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self { progress: None }
    }

    /// Clears the progress bar, if one was started.
    pub fn finish(&mut self) {
        if let Some(pb) = self.progress.take() {
            pb.finish_and_clear();
        }
    }

    fn print(&self, outcome: &FileOutcome, line: &str) {
        let emit = || match outcome {
            FileOutcome::Failed { .. } => eprintln!("{}", line.red()),
            _ => println!("{}", line),
        };
        match &self.progress {
            Some(pb) => pb.suspend(emit),
            None => emit(),
        }
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl RunObserver for ConsoleObserver {
    fn on_start(&mut self, candidates: usize) {
        if candidates == 0 {
            OutputFormatter::info("No files to organize.");
            return;
        }
        OutputFormatter::info(&format!("Organizing {} files...", candidates));
        self.progress = Some(OutputFormatter::create_progress_bar(candidates as u64));
    }

    fn on_outcome(&mut self, outcome: &FileOutcome) {
        if let Some(line) = outcome_line(outcome) {
            self.print(outcome, &line);
        }
        if let Some(pb) = &self.progress {
            pb.inc(1);
        }
    }
}

impl Drop for ConsoleObserver {
    fn drop(&mut self) {
        self.finish();
    }
}
