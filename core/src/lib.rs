//! recast-core: parsing and text-edit primitives
//!
//! This crate provides the low-level pieces the recast engine is built on:
//! - tree-sitter based Python parsing
//! - the immutable `SourceFile` triple (path, content, syntax tree)
//! - byte-precise text edits with right-to-left application
//!
//! # Example
//!
//! ```ignore
//! use recast_core::{SourceFile, Edit, apply_edits};
//!
//! let file = SourceFile::parse("demo.py", "x = 1\n".to_string())?;
//! let edits = vec![Edit::replace(0..1, "y")];
//! assert_eq!(apply_edits(&file.content, &edits), "y = 1\n");
//! ```

pub mod error;
pub mod files;
pub mod parse;
pub mod patch;

pub use error::ParseError;
pub use files::SourceFile;
pub use parse::{parse_python, python_language};
pub use patch::{apply_edits, unified_diff, Edit, EditRange};
