use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors, raised at modifier construction before any file is
/// touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot specify both excluded_paths and included_paths")]
    ConflictingPathFilters,

    #[error("invalid ignore pattern: {0}")]
    InvalidIgnorePattern(#[from] regex::Error),

    #[error("invalid path pattern {pattern:?}: {source}")]
    InvalidPathPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("at least one modifier must be configured")]
    NoModifiers,
}

/// Top-level error type exposed by the engine.
///
/// This is what bubbles out to the CLI.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] recast_core::ParseError),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("workflow file {} does not exist", .0.display())]
    MissingWorkflowFile(PathBuf),

    #[error("failed to parse workflow {}: {source}", .path.display())]
    Workflow {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
