use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading and parsing source files.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: syntax error at line {line}", .path.display())]
    Syntax { path: PathBuf, line: usize },

    #[error("parser initialization failed: {0}")]
    Language(#[from] tree_sitter::LanguageError),
}
