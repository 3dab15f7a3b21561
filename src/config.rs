//! File exclusion configuration.
//!
//! Exclusion rules are loaded from a TOML file and decide which files the
//! organizer leaves where they are. The category table itself is not
//! configurable. Supported rules:
//! - Exact filename matching
//! - Glob pattern matching against the path relative to the target root
//! - File extension matching
//! - Regex pattern matching against the file name
//! - Include (whitelist) rules that override exclude rules
//!
//! # Configuration File Format
//!
//! ```toml
//! [filters]
//! skip_hidden = false
//!
//! [filters.exclude]
//! filenames = ["Thumbs.db"]
//! patterns = ["node_modules/**"]
//! extensions = ["part", "crdownload"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//! ```
//!
//! With no configuration every regular file is organized.

use glob::Pattern;
use log::debug;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".sortfolder.toml";

/// Errors that can occur while loading or compiling configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Invalid configuration in {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
    #[error("Invalid glob pattern '{0}': expected *.ext or dir/**")]
    InvalidGlobPattern(String),
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },
    #[error("IO error reading configuration {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration deserialized from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub filters: FilterRules,
}

/// Root-level filter rules.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterRules {
    /// Leave files whose name starts with "." in place. Defaults to false.
    #[serde(default)]
    pub skip_hidden: bool,

    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Whitelist, overrides exclude rules.
    #[serde(default)]
    pub include: IncludeRules,
}

/// Rules for leaving files out of organization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames (e.g. "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the path relative to the root.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Extensions without the dot (e.g. "part"), case-insensitive.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Rules that force files back in, overriding exclude rules.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncludeRules {
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl FilterConfig {
    /// Load configuration, falling back to defaults.
    ///
    /// Lookup order:
    /// 1. `config_path`, if provided
    /// 2. `.sortfolder.toml` in the current directory
    /// 3. `~/.config/sortfolder/config.toml`
    /// 4. Built-in defaults
    ///
    /// # Errors
    ///
    /// Returns an error if a file is found (or explicitly given) but cannot be
    /// read or parsed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sortfolder")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Loaded configuration from {}", path.display());
        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Invalid { reason, .. } => ConfigError::Invalid {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Invalid {
            path: PathBuf::new(),
            reason: e.to_string(),
        })
    }

    /// Compile into matchers.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob pattern is invalid.
    pub fn compile(self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(self.filters)
    }
}

/// Pre-compiled filter rules.
#[derive(Debug, Default)]
pub struct CompiledFilters {
    skip_hidden: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl CompiledFilters {
    fn new(rules: FilterRules) -> Result<Self, ConfigError> {
        let exclude_patterns = compile_globs(&rules.exclude.patterns)?;
        let include_patterns = compile_globs(&rules.include.patterns)?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            skip_hidden: rules.skip_hidden,
            exclude_filenames: rules.exclude.filenames.into_iter().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
            include_patterns,
        })
    }

    /// Decide whether a file should be organized.
    ///
    /// `rel_path` is the file's path relative to the target root. Checks run in
    /// order with early exit: include patterns, hidden files, exact filename,
    /// extension, glob patterns, regex patterns. Anything left is included.
    pub fn should_include(&self, rel_path: &Path) -> bool {
        let file_name = rel_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.matches_any(&self.include_patterns, rel_path) {
            return true;
        }

        if self.skip_hidden && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name.as_ref()) {
            return false;
        }

        if let Some(ext) = rel_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self.matches_any(&self.exclude_patterns, rel_path) {
            return false;
        }

        !self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(&file_name))
    }

    fn matches_any(&self, patterns: &[Pattern], rel_path: &Path) -> bool {
        patterns.iter().any(|pattern| pattern.matches_path(rel_path))
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
        })
        .collect()
}
