//! Flags misused pydantic `@field_validator` decorators.
//!
//! A validator is reported when its body never references `cls` and `"*"`
//! is not among the validated field names; either condition suggests the
//! validator can be simplified or restructured. A trailing comment on the
//! decorator line suppresses the check.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use recast_core::SourceFile;

use crate::error::{ConfigError, EngineError};
use crate::modifier::{Modifier, ModifierOptions, Violation};
use crate::suppression::{matching_comment_rows, SuppressionWalker};

const FIELD_VALIDATOR: &str = "field_validator";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldValidatorCheck {
    #[serde(flatten)]
    pub options: ModifierOptions,
}

impl Modifier for FieldValidatorCheck {
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
            if !file.content.contains(FIELD_VALIDATOR) {
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
    let suppressed_rows = matching_comment_rows(file, ignore);
    let mut violations = Vec::new();
    let mut walker = SuppressionWalker::new(file, ignore);
    walker.walk(&mut |node, suppressed| {
        if node.kind() != "decorated_definition" || suppressed {
            return true;
        }
        let Some(decorator) = field_validator_decorator(file, node) else {
            return true;
        };
        if suppressed_rows.contains(&decorator.start_position().row) {
            return true;
        }
        let Some(function) = node.child_by_field_name("definition") else {
            return true;
        };
        if function.kind() != "function_definition" {
            return true;
        }
        let fields = validated_fields(file, decorator);
        if fields.iter().any(|field| field == "*") || cls_is_used(file, function) {
            return true;
        }
        let name = function
            .child_by_field_name("name")
            .map(|n| file.node_text(n))
            .unwrap_or_default();
        let quoted: Vec<String> = fields.iter().map(|field| format!("'{field}'")).collect();
        violations.push(Violation::new(
            file.path.clone(),
            format!(
                "field_validator {}({}): cls is not used or '*' is not among validated fields",
                name,
                quoted.join(", ")
            ),
        ));
        true
    });
    violations
}

/// The `@field_validator(...)` decorator node, if present.
fn field_validator_decorator<'f>(file: &SourceFile, definition: Node<'f>) -> Option<Node<'f>> {
    let mut cursor = definition.walk();
    for child in definition.children(&mut cursor) {
        if child.kind() != "decorator" {
            continue;
        }
        let Some(expression) = child.named_child(0) else {
            continue;
        };
        if expression.kind() != "call" {
            continue;
        }
        let Some(function) = expression.child_by_field_name("function") else {
            continue;
        };
        if function.kind() == "identifier" && file.node_text(function) == FIELD_VALIDATOR {
            return Some(child);
        }
    }
    None
}

/// Positional string arguments of the decorator call.
fn validated_fields(file: &SourceFile, decorator: Node) -> Vec<String> {
    let Some(call) = decorator.named_child(0) else {
        return Vec::new();
    };
    let Some(arguments) = call.child_by_field_name("arguments") else {
        return Vec::new();
    };
    let mut fields = Vec::new();
    let mut cursor = arguments.walk();
    for argument in arguments.named_children(&mut cursor) {
        if argument.kind() != "string" {
            continue;
        }
        if let Some(content) = string_content(file, argument) {
            fields.push(content.to_string());
        }
    }
    fields
}

fn string_content<'f>(file: &'f SourceFile, string: Node) -> Option<&'f str> {
    let mut cursor = string.walk();
    let result = string
        .children(&mut cursor)
        .find(|child| child.kind() == "string_content")
        .map(|content| file.node_text(content));
    result
}

/// Whether any identifier in the function body reads `cls`.
fn cls_is_used(file: &SourceFile, function: Node) -> bool {
    let Some(body) = function.child_by_field_name("body") else {
        return false;
    };
    let mut stack = vec![body];
    while let Some(node) = stack.pop() {
        if node.kind() == "identifier" && file.node_text(node) == "cls" {
            return true;
        }
        for i in 0..node.child_count() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }
    false
}
