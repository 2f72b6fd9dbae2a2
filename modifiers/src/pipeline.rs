//! The modifier pipeline: an ordered list of modifiers run against the full
//! file set, aggregated into a single dirty flag.

use std::fs;
use std::path::PathBuf;

use log::{debug, info};

use recast_core::{unified_diff, SourceFile};

use crate::error::{ConfigError, EngineError};
use crate::modifier::Modifier;
use crate::modifiers::AnyModifier;

/// Runs modifiers in configured order over a set of parsed files.
///
/// Later modifiers observe earlier modifiers' output: after any modifier
/// reports changes, every file whose on-disk bytes differ from the cached
/// content is re-read and re-parsed before the next modifier runs.
pub struct ModifierPipeline {
    modifiers: Vec<AnyModifier>,
    show_diff: bool,
}

impl ModifierPipeline {
    /// Build a pipeline, validating every modifier eagerly. A modifier with
    /// conflicting path filters or a malformed pattern fails here, before
    /// any file is read.
    pub fn new(modifiers: Vec<AnyModifier>) -> Result<Self, ConfigError> {
        if modifiers.is_empty() {
            return Err(ConfigError::NoModifiers);
        }
        for modifier in &modifiers {
            modifier.validate()?;
        }
        Ok(Self {
            modifiers,
            show_diff: false,
        })
    }

    /// Print a unified diff for every rewritten file.
    pub fn with_show_diff(mut self, show_diff: bool) -> Self {
        self.show_diff = show_diff;
        self
    }

    /// Read and parse every input path. Parse failures are fatal.
    pub fn load_files(paths: &[PathBuf]) -> Result<Vec<SourceFile>, EngineError> {
        paths
            .iter()
            .map(|path| SourceFile::load(path).map_err(EngineError::from))
            .collect()
    }

    /// Run every modifier over the file set.
    ///
    /// Returns true iff any modifier rewrote a file or reported a violation.
    pub fn run(&self, files: &mut Vec<SourceFile>) -> Result<bool, EngineError> {
        let mut dirty = false;
        for modifier in &self.modifiers {
            debug!("running modifier over {} file(s)", files.len());
            let changed = modifier.modify(files)?;
            dirty |= changed;
            if changed {
                self.refresh(files)?;
            }
        }
        info!("pipeline finished, dirty = {dirty}");
        Ok(dirty)
    }

    /// Re-read every file whose on-disk content no longer matches the cached
    /// content, so the next modifier sees the rewritten state.
    fn refresh(&self, files: &mut Vec<SourceFile>) -> Result<(), EngineError> {
        for file in files.iter_mut() {
            let on_disk = fs::read_to_string(&file.path).map_err(|source| EngineError::Read {
                path: file.path.clone(),
                source,
            })?;
            if on_disk == file.content {
                continue;
            }
            if self.show_diff {
                print!(
                    "{}",
                    unified_diff(&file.path.display().to_string(), &file.content, &on_disk)
                );
            }
            debug!("re-parsing {} after rewrite", file.path.display());
            *file = SourceFile::parse(file.path.clone(), on_disk)?;
        }
        Ok(())
    }
}
