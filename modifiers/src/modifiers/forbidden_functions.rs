//! Flags direct calls to a configured denylist of function names.
//!
//! Only unqualified identifier calls are considered; method calls and
//! attribute-qualified calls are deliberately out of scope. Each violation
//! carries the offending name and the exact call-site text.

use regex::Regex;
use serde::{Deserialize, Serialize};

use recast_core::SourceFile;

use crate::error::{ConfigError, EngineError};
use crate::modifier::{Modifier, ModifierOptions, Violation};
use crate::suppression::SuppressionWalker;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForbiddenFunctions {
    #[serde(flatten)]
    pub options: ModifierOptions,

    /// Names whose direct calls are flagged.
    pub forbidden_functions: Vec<String>,
}

impl Modifier for ForbiddenFunctions {
    fn validate(&self) -> Result<(), ConfigError> {
        self.options.validate()
    }

    fn modify(&self, files: &[SourceFile]) -> Result<bool, EngineError> {
        if self.forbidden_functions.is_empty() {
            return Ok(false);
        }
        let ignore = self.options.ignore_regex()?;
        let mut dirty = false;
        for file in files {
            if !self.options.should_process(&file.path) {
                continue;
            }
            dirty |= self.check_file(file, &ignore);
        }
        Ok(dirty)
    }
}

impl ForbiddenFunctions {
    fn check_file(&self, file: &SourceFile, ignore: &Regex) -> bool {
        let violations = collect_violations(file, ignore, &self.forbidden_functions);
        for violation in &violations {
            self.options.report(violation);
        }
        !violations.is_empty()
    }
}

fn collect_violations(
    file: &SourceFile,
    ignore: &Regex,
    forbidden: &[String],
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut walker = SuppressionWalker::new(file, ignore);
    walker.walk(&mut |node, suppressed| {
        if node.kind() != "call" || suppressed {
            return true;
        }
        let Some(function) = node.child_by_field_name("function") else {
            return true;
        };
        if function.kind() != "identifier" {
            return true;
        }
        let name = file.node_text(function);
        if forbidden.iter().any(|forbidden_name| forbidden_name == name) {
            violations.push(Violation::new(
                file.path.clone(),
                format!("{} usage detected: {}", name, file.node_text(node)),
            ));
        }
        true
    });
    violations
}
