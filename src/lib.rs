//! sortfolder - sort the files of a directory into category folders
//!
//! This library classifies files by extension, moves them into
//! `Sorted <Category>` folders under a target directory without ever
//! overwriting anything, and leaves already sorted files alone so that runs
//! can be repeated safely. Exclusion rules can be loaded from a TOML file.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod output;

pub use config::{CompiledFilters, ConfigError, FilterConfig};
pub use file_category::{Category, ExtensionIndex};
pub use file_organizer::{FileOutcome, MoveRecord, OrganizeError, Organizer, RunReport};

pub use cli::{Args, run_cli};
