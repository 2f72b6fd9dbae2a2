//! Flags import statements nested inside function or class bodies.
//!
//! Module-level imports never flag; anything at nesting depth one or more
//! does, unless suppressed. The violation carries the import statement's
//! exact source text.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use recast_core::SourceFile;

use crate::error::{ConfigError, EngineError};
use crate::modifier::{Modifier, ModifierOptions, Violation};
use crate::suppression::SuppressionWalker;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalImports {
    #[serde(flatten)]
    pub options: ModifierOptions,
}

impl Modifier for LocalImports {
    fn validate(&self) -> Result<(), ConfigError> {
        self.options.validate()
    }

    fn modify(&self, files: &[SourceFile]) -> Result<bool, EngineError> {
        let ignore = self.options.ignore_regex()?;
        let mut dirty = false;
        for file in files {
            if !self.options.should_process(&file.path) {
                continue;
            }
            let violations = collect_violations(file, &ignore);
            for violation in &violations {
                self.options.report(violation);
            }
            dirty |= !violations.is_empty();
        }
        Ok(dirty)
    }
}

fn collect_violations(file: &SourceFile, ignore: &Regex) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut walker = SuppressionWalker::new(file, ignore);
    walker.walk(&mut |node, suppressed| {
        if !matches!(node.kind(), "import_statement" | "import_from_statement") {
            return true;
        }
        if suppressed || nesting_depth(node) == 0 {
            return true;
        }
        violations.push(Violation::new(
            file.path.clone(),
            format!("Local import detected: {}", file.node_text(node)),
        ));
        true
    });
    violations
}

/// Number of function and class scopes enclosing the node.
fn nesting_depth(node: Node) -> usize {
    let mut depth = 0;
    let mut current = node.parent();
    while let Some(parent) = current {
        if matches!(parent.kind(), "function_definition" | "class_definition") {
            depth += 1;
        }
        current = parent.parent();
    }
    depth
}
