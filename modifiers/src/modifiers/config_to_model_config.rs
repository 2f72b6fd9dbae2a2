//! Converts nested pydantic `class Config:` blocks into `model_config`
//! assignments.
//!
//! Within an outermost class body, a nested `Config` class whose body is a
//! flat list of `name = value` assignments (plus `pass` and docstrings)
//! becomes `model_config = ConfigDict(name=value, ...)`. Classes that
//! already define `model_config` are skipped, as are `Config` classes
//! containing function or class definitions. Only one nesting level is
//! considered; a `Config` inside a nested class stays untouched.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use recast_core::{Edit, SourceFile};

use crate::error::{ConfigError, EngineError};
use crate::imports;
use crate::modifier::{Modifier, ModifierOptions};
use crate::suppression::SuppressionWalker;

const CONFIG_CLASS: &str = "Config";
const MODEL_CONFIG: &str = "model_config";
const CONFIG_DICT: &str = "ConfigDict";
const PYDANTIC_MODULE: &str = "pydantic";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PydanticConfigToModelConfig {
    #[serde(flatten)]
    pub options: ModifierOptions,
}

impl Modifier for PydanticConfigToModelConfig {
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
            if !file.content.contains("class Config") {
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
        if node.kind() != "class_definition" {
            return true;
        }
        if suppressed {
            return true;
        }
        let Some(name) = node.child_by_field_name("name") else {
            return true;
        };
        if file.node_text(name) != CONFIG_CLASS {
            return true;
        }
        let Some(outer) = enclosing_class(node) else {
            return true;
        };
        // One nesting level only: the enclosing class must itself be
        // outermost.
        if enclosing_class(outer).is_some() {
            return true;
        }
        if defines_model_config(file, outer) {
            return true;
        }
        let Some(arguments) = extract_config_arguments(file, node) else {
            return true;
        };
        edits.push(Edit::replace(
            node.byte_range(),
            format!("{MODEL_CONFIG} = {CONFIG_DICT}({})", arguments.join(", ")),
        ));
        false
    });
    if !edits.is_empty() {
        edits.extend(imports::synchronize(
            file,
            PYDANTIC_MODULE,
            &[CONFIG_DICT],
            &[],
        ));
    }
    edits
}

/// The class definition whose body directly contains this node, if any.
/// Decorated definitions are transparent wrappers.
fn enclosing_class(node: Node) -> Option<Node> {
    let mut block = node.parent()?;
    if block.kind() == "decorated_definition" {
        block = block.parent()?;
    }
    if block.kind() != "block" {
        return None;
    }
    let owner = block.parent()?;
    if owner.kind() == "class_definition" {
        Some(owner)
    } else {
        None
    }
}

fn defines_model_config(file: &SourceFile, class: Node) -> bool {
    let Some(body) = class.child_by_field_name("body") else {
        return false;
    };
    let mut cursor = body.walk();
    for statement in body.named_children(&mut cursor) {
        if statement.kind() != "expression_statement" {
            continue;
        }
        let Some(inner) = statement.named_child(0) else {
            continue;
        };
        if inner.kind() != "assignment" {
            continue;
        }
        if inner
            .child_by_field_name("left")
            .is_some_and(|left| left.kind() == "identifier" && file.node_text(left) == MODEL_CONFIG)
        {
            return true;
        }
    }
    false
}

/// Keyword arguments collected from a flat `name = value` Config body.
/// `pass` and docstrings are ignored; nested definitions make the whole
/// class ineligible (None), so nothing is silently dropped.
fn extract_config_arguments(file: &SourceFile, config_class: Node) -> Option<Vec<String>> {
    let body = config_class.child_by_field_name("body")?;
    let mut arguments = Vec::new();
    let mut cursor = body.walk();
    for statement in body.named_children(&mut cursor) {
        match statement.kind() {
            "expression_statement" => {
                let Some(inner) = statement.named_child(0) else {
                    continue;
                };
                if inner.kind() != "assignment" {
                    continue;
                }
                let Some(left) = inner.child_by_field_name("left") else {
                    continue;
                };
                let Some(right) = inner.child_by_field_name("right") else {
                    continue;
                };
                if left.kind() != "identifier" {
                    continue;
                }
                arguments.push(format!(
                    "{}={}",
                    file.node_text(left),
                    file.node_text(right)
                ));
            }
            "pass_statement" | "comment" => {}
            "function_definition" | "class_definition" | "decorated_definition" => {
                return None;
            }
            _ => return None,
        }
    }
    Some(arguments)
}
