use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use recast_core::{apply_edits, Edit, SourceFile};

use crate::error::{ConfigError, EngineError};
use crate::output::{AnyOutput, OutputSink, StandardOutput};

/// A single configured transformation or check.
///
/// Modifiers are pure configuration: they inspect parsed files and either
/// rewrite them on disk or report violations. They hold no state between
/// invocations and never mutate the shared `SourceFile` values.
pub trait Modifier {
    /// Validate the configuration. Called once, before any file is touched.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Apply the modifier to every file in the set.
    ///
    /// Returns true iff at least one file was rewritten or at least one
    /// violation was reported. Every file is always processed to completion;
    /// results are accumulated, never short-circuited.
    fn modify(&self, files: &[SourceFile]) -> Result<bool, EngineError>;
}

/// Configuration shared by every modifier: the inline-suppression pattern,
/// the output sink chain, and the mutually exclusive path filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierOptions {
    /// Regex matched (case-insensitively) against inline comments that
    /// suppress this modifier.
    pub ignore_pattern: String,

    /// Output channels for reporting modifications or violations.
    pub outputs: Vec<AnyOutput>,

    /// Glob patterns for paths to exclude from checking (e.g. `tests/*`).
    pub excluded_paths: Vec<String>,

    /// Glob patterns for paths to include. If set, only matching paths are
    /// checked.
    pub included_paths: Vec<String>,
}

impl Default for ModifierOptions {
    fn default() -> Self {
        Self {
            ignore_pattern: default_ignore_pattern(),
            outputs: vec![AnyOutput::Stdout(StandardOutput::default())],
            excluded_paths: Vec::new(),
            included_paths: Vec::new(),
        }
    }
}

pub(crate) fn default_ignore_pattern() -> String {
    r"#\s*ignore".to_string()
}

impl ModifierOptions {
    /// Eager validation of the shared configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.excluded_paths.is_empty() && !self.included_paths.is_empty() {
            return Err(ConfigError::ConflictingPathFilters);
        }
        self.ignore_regex()?;
        for pattern in self.excluded_paths.iter().chain(&self.included_paths) {
            Pattern::new(pattern).map_err(|source| ConfigError::InvalidPathPattern {
                pattern: pattern.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Compile the suppression pattern. Compiled once per rule invocation.
    pub fn ignore_regex(&self) -> Result<Regex, ConfigError> {
        Ok(RegexBuilder::new(&self.ignore_pattern)
            .case_insensitive(true)
            .build()?)
    }

    /// Path prefilter: include-globs win if set, else exclude-globs, else
    /// every file qualifies. Patterns match against the full path or any
    /// trailing run of its components.
    pub fn should_process(&self, path: &Path) -> bool {
        if !self.included_paths.is_empty() {
            return self
                .included_paths
                .iter()
                .any(|pattern| matches_path(pattern, path));
        }
        if !self.excluded_paths.is_empty() {
            return !self
                .excluded_paths
                .iter()
                .any(|pattern| matches_path(pattern, path));
        }
        true
    }

    /// Feed a message through the sink chain.
    pub fn emit(&self, text: &str) {
        let mut current = text.to_string();
        for output in &self.outputs {
            current = output.process(&current);
        }
    }

    /// Report a violation through the sink chain.
    pub fn report(&self, violation: &Violation) {
        self.emit(&format!(
            "{}: {}",
            violation.path.display(),
            violation.message
        ));
    }

    /// Apply `edits` to `file` and write the result back iff it differs
    /// byte-for-byte from the original content. Returns whether a write
    /// happened.
    pub fn write_if_changed(
        &self,
        file: &SourceFile,
        edits: &[Edit],
    ) -> Result<bool, EngineError> {
        if edits.is_empty() {
            return Ok(false);
        }
        let new_content = apply_edits(&file.content, edits);
        if new_content == file.content {
            return Ok(false);
        }
        fs::write(&file.path, &new_content).map_err(|source| EngineError::Write {
            path: file.path.clone(),
            source,
        })?;
        self.emit(&format!("File {} was modified", file.path.display()));
        Ok(true)
    }
}

/// Matches like `pathlib.Path.match`: the pattern may anchor at any
/// component boundary from the right.
fn matches_path(pattern: &str, path: &Path) -> bool {
    let Ok(compiled) = Pattern::new(pattern) else {
        return false;
    };
    if compiled.matches_path(path) {
        return true;
    }
    let components: Vec<_> = path.components().collect();
    for start in 1..components.len() {
        let suffix: PathBuf = components[start..].iter().collect();
        if compiled.matches_path(&suffix) {
            return true;
        }
    }
    false
}

/// An ephemeral (path, message) pair produced by checking modifiers; only
/// ever routed to output sinks, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: PathBuf,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}
