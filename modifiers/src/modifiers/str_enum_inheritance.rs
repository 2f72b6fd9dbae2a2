//! Collapses `class X(str, Enum)` dual inheritance into `class X(StrEnum)`.
//!
//! The base pair is matched by name, order-insensitively, and only when it
//! is exactly those two identifiers. With `convert_to_auto`, members whose
//! string literal equals the lowercased member name become `auto()`; with
//! `convert_existing_str_enum`, classes already inheriting `StrEnum` join
//! the auto conversion. The `enum` import is kept in sync: `StrEnum`/`auto`
//! are added as needed, and `Enum` is dropped only when a re-scan of the
//! transformed file finds no remaining reference to it.

use std::ops::Range;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use recast_core::{Edit, SourceFile};

use crate::error::{ConfigError, EngineError};
use crate::imports;
use crate::modifier::{Modifier, ModifierOptions};
use crate::suppression::{matching_comment_rows, SuppressionWalker};

const ENUM_MODULE: &str = "enum";
const ENUM_BASE: &str = "Enum";
const STR_BASE: &str = "str";
const STR_ENUM: &str = "StrEnum";
const AUTO: &str = "auto";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrEnumInheritance {
    #[serde(flatten)]
    pub options: ModifierOptions,

    /// Convert members whose value is their own lowercased name to `auto()`.
    #[serde(default)]
    pub convert_to_auto: bool,

    /// Also convert members of classes that already inherit `StrEnum`.
    #[serde(default)]
    pub convert_existing_str_enum: bool,
}

impl Modifier for StrEnumInheritance {
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
            let has_dual_base = file.content.contains(ENUM_BASE) && file.content.contains(STR_BASE);
            let has_existing = self.convert_existing_str_enum && file.content.contains(STR_ENUM);
            if !has_dual_base && !has_existing {
                continue;
            }
            let edits = collect_edits(file, &ignore, self.convert_to_auto, self.convert_existing_str_enum);
            dirty |= self.options.write_if_changed(file, &edits)?;
        }
        Ok(dirty)
    }
}

fn collect_edits(
    file: &SourceFile,
    ignore: &Regex,
    convert_to_auto: bool,
    convert_existing: bool,
) -> Vec<Edit> {
    let suppressed_rows = matching_comment_rows(file, ignore);
    let mut edits = Vec::new();
    let mut rewritten_base_lists: Vec<Range<usize>> = Vec::new();
    let mut base_rewrites = 0usize;
    let mut auto_conversions = 0usize;

    let mut walker = SuppressionWalker::new(file, ignore);
    walker.walk(&mut |node, suppressed| {
        if node.kind() != "class_definition" || suppressed {
            return true;
        }
        let Some(superclasses) = node.child_by_field_name("superclasses") else {
            return true;
        };
        let mut cursor = superclasses.walk();
        let bases: Vec<Node> = superclasses
            .named_children(&mut cursor)
            .filter(|base| base.kind() != "comment")
            .collect();

        let mut member_host = false;
        if bases.len() == 2 && bases.iter().all(|base| base.kind() == "identifier") {
            let mut names: Vec<&str> = bases.iter().map(|base| file.node_text(*base)).collect();
            names.sort_unstable();
            if names == [ENUM_BASE, STR_BASE] {
                edits.push(Edit::replace(
                    superclasses.byte_range(),
                    format!("({STR_ENUM})"),
                ));
                rewritten_base_lists.push(superclasses.byte_range());
                base_rewrites += 1;
                member_host = true;
            }
        } else if convert_existing
            && bases.len() == 1
            && bases[0].kind() == "identifier"
            && file.node_text(bases[0]) == STR_ENUM
        {
            member_host = true;
        }

        if member_host && convert_to_auto {
            auto_conversions += convert_members(file, node, &suppressed_rows, &mut edits);
        }
        true
    });

    if base_rewrites == 0 && auto_conversions == 0 {
        return edits;
    }

    let mut add: Vec<&str> = Vec::new();
    if base_rewrites > 0 {
        add.push(STR_ENUM);
    }
    if auto_conversions > 0 {
        add.push(AUTO);
    }
    let mut remove: Vec<&str> = Vec::new();
    if base_rewrites > 0 && !enum_still_referenced(file, &rewritten_base_lists) {
        remove.push(ENUM_BASE);
    }
    edits.extend(imports::synchronize(file, ENUM_MODULE, &add, &remove));
    edits
}

/// Rewrite `NAME = "name"` members (plain or annotated) to `NAME = auto()`
/// when the literal equals the lowercased member name. Returns the number of
/// conversions.
fn convert_members(
    file: &SourceFile,
    class_node: Node,
    suppressed_rows: &std::collections::HashSet<usize>,
    edits: &mut Vec<Edit>,
) -> usize {
    let Some(body) = class_node.child_by_field_name("body") else {
        return 0;
    };
    let mut conversions = 0;
    let mut cursor = body.walk();
    for statement in body.named_children(&mut cursor) {
        if statement.kind() != "expression_statement" {
            continue;
        }
        if suppressed_rows.contains(&statement.start_position().row) {
            continue;
        }
        let Some(assignment) = statement.named_child(0) else {
            continue;
        };
        if assignment.kind() != "assignment" {
            continue;
        }
        let Some(left) = assignment.child_by_field_name("left") else {
            continue;
        };
        let Some(right) = assignment.child_by_field_name("right") else {
            continue;
        };
        if left.kind() != "identifier" || right.kind() != "string" {
            continue;
        }
        let Some(value) = plain_string_value(file, right) else {
            continue;
        };
        if value == file.node_text(left).to_lowercase() {
            edits.push(Edit::replace(right.byte_range(), format!("{AUTO}()")));
            conversions += 1;
        }
    }
    conversions
}

/// The literal content of a plain (non-interpolated) string.
fn plain_string_value<'f>(file: &'f SourceFile, string: Node) -> Option<&'f str> {
    let mut cursor = string.walk();
    let mut content = None;
    for child in string.children(&mut cursor) {
        match child.kind() {
            "string_content" => {
                if content.is_some() {
                    return None;
                }
                content = Some(file.node_text(child));
            }
            "string_start" | "string_end" => {}
            _ => return None,
        }
    }
    content
}

/// Whether `Enum` is referenced anywhere outside import statements and the
/// rewritten base lists.
fn enum_still_referenced(file: &SourceFile, rewritten: &[Range<usize>]) -> bool {
    let mut stack = vec![file.root()];
    while let Some(node) = stack.pop() {
        if matches!(node.kind(), "import_statement" | "import_from_statement") {
            continue;
        }
        if node.kind() == "identifier" && file.node_text(node) == ENUM_BASE {
            let start = node.start_byte();
            if !rewritten.iter().any(|range| range.contains(&start)) {
                return true;
            }
            continue;
        }
        for i in 0..node.child_count() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }
    false
}
