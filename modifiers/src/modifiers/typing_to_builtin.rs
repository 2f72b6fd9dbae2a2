//! Modernizes capitalized `typing` aliases to their builtin equivalents.
//!
//! `Dict`/`List`/`Set`/`FrozenSet`/`Tuple`/`Type` imported from `typing`
//! become `dict`/`list`/`set`/`frozenset`/`tuple`/`type` in annotation
//! positions. A name kept alive by a suppression comment, or referenced
//! anywhere outside annotations, keeps its import; names with no remaining
//! use are removed from the `typing` import (dropping the statement when it
//! empties out).

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use recast_core::{Edit, SourceFile};

use crate::error::{ConfigError, EngineError};
use crate::imports;
use crate::modifier::{Modifier, ModifierOptions};
use crate::suppression::SuppressionWalker;

const TYPING_MODULE: &str = "typing";

static TYPING_TO_BUILTIN: &[(&str, &str)] = &[
    ("Dict", "dict"),
    ("List", "list"),
    ("Set", "set"),
    ("FrozenSet", "frozenset"),
    ("Tuple", "tuple"),
    ("Type", "type"),
];

fn builtin_for(name: &str) -> Option<&'static str> {
    TYPING_TO_BUILTIN
        .iter()
        .find(|(typing_name, _)| *typing_name == name)
        .map(|(_, builtin)| *builtin)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypingToBuiltin {
    #[serde(flatten)]
    pub options: ModifierOptions,
}

impl Modifier for TypingToBuiltin {
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
            if !TYPING_TO_BUILTIN
                .iter()
                .any(|(name, _)| file.content.contains(name))
            {
                continue;
            }
            let edits = collect_edits(file, &ignore);
            dirty |= self.options.write_if_changed(file, &edits)?;
        }
        Ok(dirty)
    }
}

fn collect_edits(file: &SourceFile, ignore: &Regex) -> Vec<Edit> {
    let imported = imported_typing_names(file);
    if imported.is_empty() {
        return Vec::new();
    }

    let mut edits = Vec::new();
    let mut transformed: HashSet<String> = HashSet::new();
    let mut still_needed: HashSet<String> = HashSet::new();

    let mut walker = SuppressionWalker::new(file, ignore);
    walker.walk(&mut |node, suppressed| {
        if node.kind() != "identifier" {
            return true;
        }
        let name = file.node_text(node);
        let Some(builtin) = builtin_for(name) else {
            return true;
        };
        if !imported.contains(name) {
            return true;
        }
        if in_import_statement(node) || is_attribute_member(node) {
            return true;
        }
        if in_annotation(node) && !suppressed {
            edits.push(Edit::replace(node.byte_range(), builtin));
            transformed.insert(name.to_string());
        } else {
            still_needed.insert(name.to_string());
        }
        true
    });

    if edits.is_empty() {
        return edits;
    }

    let mut removals: Vec<&str> = transformed
        .iter()
        .filter(|name| !still_needed.contains(*name))
        .map(String::as_str)
        .collect();
    removals.sort_unstable();
    edits.extend(imports::synchronize(file, TYPING_MODULE, &[], &removals));
    edits
}

/// Mapped names actually imported from `typing`; a star import counts as
/// importing all of them (the import itself is never rewritten then).
fn imported_typing_names(file: &SourceFile) -> HashSet<String> {
    let mut imported = HashSet::new();
    let root = file.root();
    let mut cursor = root.walk();
    for statement in root.children(&mut cursor) {
        if statement.kind() != "import_from_statement" {
            continue;
        }
        let Some(module) = statement.child_by_field_name("module_name") else {
            continue;
        };
        if file.node_text(module) != TYPING_MODULE {
            continue;
        }
        let mut names = statement.walk();
        for child in statement.children(&mut names) {
            if child.id() == module.id() {
                continue;
            }
            match child.kind() {
                "wildcard_import" => {
                    for (name, _) in TYPING_TO_BUILTIN {
                        imported.insert(name.to_string());
                    }
                }
                "dotted_name" => {
                    let name = file.node_text(child);
                    if builtin_for(name).is_some() {
                        imported.insert(name.to_string());
                    }
                }
                // `Dict as D` is used through the alias, not the bare name.
                "aliased_import" => {}
                _ => {}
            }
        }
    }
    imported
}

fn in_import_statement(node: Node) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if matches!(parent.kind(), "import_statement" | "import_from_statement") {
            return true;
        }
        current = parent.parent();
    }
    false
}

fn in_annotation(node: Node) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.kind() == "type" {
            return true;
        }
        current = parent.parent();
    }
    false
}

fn is_attribute_member(node: Node) -> bool {
    node.parent().is_some_and(|parent| {
        parent.kind() == "attribute"
            && parent
                .child_by_field_name("attribute")
                .is_some_and(|attr| attr.id() == node.id())
    })
}
