//! Simplifies `len(x)` used as a truthiness test down to `x`.
//!
//! Covered positions: bare `len(...)` in `if`/`elif`/`while` conditions,
//! `not len(...)`, and `bool(len(...))`. Length checks in comparisons,
//! arithmetic, or assignments are not truthiness tests and stay untouched.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use recast_core::{Edit, SourceFile};

use crate::error::{ConfigError, EngineError};
use crate::modifier::{Modifier, ModifierOptions};
use crate::suppression::SuppressionWalker;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LenAsBool {
    #[serde(flatten)]
    pub options: ModifierOptions,
}

impl Modifier for LenAsBool {
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
            if !file.content.contains("len(") {
                continue;
            }
            let edits = collect_edits(file, &ignore);
            dirty |= self.options.write_if_changed(file, &edits)?;
        }
        Ok(dirty)
    }
}

fn collect_edits(file: &SourceFile, ignore: &Regex) -> Vec<Edit> {
    let mut edits = Vec::new();
    let mut walker = SuppressionWalker::new(file, ignore);
    walker.walk(&mut |node, suppressed| {
        if suppressed {
            return true;
        }
        match node.kind() {
            "if_statement" | "elif_clause" | "while_statement" => {
                if let Some(condition) = node.child_by_field_name("condition") {
                    if let Some(argument) = len_call_argument(file, condition) {
                        edits.push(Edit::replace(
                            condition.byte_range(),
                            file.node_text(argument),
                        ));
                    }
                }
            }
            "not_operator" => {
                if let Some(operand) = node.child_by_field_name("argument") {
                    if let Some(argument) = len_call_argument(file, operand) {
                        edits.push(Edit::replace(
                            operand.byte_range(),
                            file.node_text(argument),
                        ));
                    }
                }
            }
            "call" => {
                if let Some(inner) = bool_wrapped_len(file, node) {
                    let (len_call, argument) = inner;
                    edits.push(Edit::replace(
                        len_call.byte_range(),
                        file.node_text(argument),
                    ));
                }
            }
            _ => {}
        }
        true
    });
    edits
}

/// For `bool(len(x))`, returns the `len(x)` node and its argument.
fn bool_wrapped_len<'f>(file: &SourceFile, call: Node<'f>) -> Option<(Node<'f>, Node<'f>)> {
    let function = call.child_by_field_name("function")?;
    if function.kind() != "identifier" || file.node_text(function) != "bool" {
        return None;
    }
    let argument = single_plain_argument(call)?;
    let inner = len_call_argument(file, argument)?;
    Some((argument, inner))
}

/// If the node is `len(<one argument>)`, returns that argument.
fn len_call_argument<'f>(file: &SourceFile, node: Node<'f>) -> Option<Node<'f>> {
    if node.kind() != "call" {
        return None;
    }
    let function = node.child_by_field_name("function")?;
    if function.kind() != "identifier" || file.node_text(function) != "len" {
        return None;
    }
    single_plain_argument(node)
}

fn single_plain_argument(call: Node) -> Option<Node> {
    let arguments = call.child_by_field_name("arguments")?;
    let mut cursor = arguments.walk();
    let named: Vec<Node> = arguments
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect();
    if named.len() != 1 || named[0].kind() == "keyword_argument" {
        return None;
    }
    Some(named[0])
}
