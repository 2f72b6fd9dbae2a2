//! recast-modifiers: the modifier execution engine
//!
//! A modifier is a configured transformation or check over parsed Python
//! files. Transforming modifiers rewrite files in place when the result
//! differs byte-for-byte from the original; checking modifiers only report
//! violations. Both report through a configurable chain of output sinks.
//!
//! The crate provides:
//! - the `Modifier` trait and shared `ModifierOptions`
//! - the suppression-aware tree walker (`suppression`)
//! - the import synchronizer (`imports`)
//! - the built-in modifier catalogue (`modifiers`)
//! - the `ModifierPipeline` that composes modifiers over a file set
//!
//! # Example
//!
//! ```ignore
//! use recast_modifiers::{AnyModifier, ModifierPipeline};
//!
//! let modifiers: Vec<AnyModifier> = serde_json::from_str(config_json)?;
//! let pipeline = ModifierPipeline::new(modifiers)?;
//! let mut files = ModifierPipeline::load_files(&paths)?;
//! let dirty = pipeline.run(&mut files)?;
//! ```

pub mod error;
pub mod imports;
pub mod modifier;
pub mod modifiers;
pub mod output;
pub mod pipeline;
pub mod suppression;

pub use error::{ConfigError, EngineError};
pub use modifier::{Modifier, ModifierOptions, Violation};
pub use modifiers::AnyModifier;
pub use output::{AnyOutput, OutputSink, StandardOutput};
pub use pipeline::ModifierPipeline;
