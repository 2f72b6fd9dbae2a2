//! Import synchronization.
//!
//! Adds and/or removes named imports on a specific `from MODULE import ...`
//! statement, creating the statement when absent, without disturbing
//! unrelated imports, ordering, or formatting. Only the first qualifying
//! statement is ever merged into; a module can legally keep several disjoint
//! import statements. A wildcard import of the module satisfies every name
//! and is never rewritten.

use tree_sitter::Node;

use recast_core::{Edit, SourceFile};

/// Compute the edits that bring the module's import of `module` in sync:
/// aliases named in `remove` go away, names in `add` are appended unless
/// already present (existing order preserved, additions in given order).
///
/// Returns an empty vector when there is nothing to do, which also makes the
/// operation idempotent: a second call with the same `add` set finds every
/// name already present.
pub fn synchronize(
    file: &SourceFile,
    module: &str,
    add: &[&str],
    remove: &[&str],
) -> Vec<Edit> {
    if add.is_empty() && remove.is_empty() {
        return Vec::new();
    }

    let root = file.root();
    let mut wildcard_seen = false;
    let mut cursor = root.walk();
    for statement in root.children(&mut cursor) {
        if statement.kind() != "import_from_statement" {
            continue;
        }
        let Some(module_node) = statement.child_by_field_name("module_name") else {
            continue;
        };
        if file.node_text(module_node) != module {
            continue;
        }

        let aliases = import_aliases(file, statement, module_node);
        if aliases.is_empty() {
            // `from module import *` already satisfies any name.
            wildcard_seen = true;
            continue;
        }

        return merge_into(file, &aliases, statement, add, remove);
    }

    if wildcard_seen || add.is_empty() {
        return Vec::new();
    }

    vec![Edit::insert(
        0,
        format!("from {} import {}\n", module, add.join(", ")),
    )]
}

/// One imported alias: the node covering its full source text (including an
/// `as` rename) plus the bare imported name.
struct ImportAlias<'f> {
    node: Node<'f>,
    bare_name: String,
}

fn import_aliases<'f>(
    file: &SourceFile,
    statement: Node<'f>,
    module_node: Node<'f>,
) -> Vec<ImportAlias<'f>> {
    let mut aliases = Vec::new();
    let mut cursor = statement.walk();
    for child in statement.children(&mut cursor) {
        if child.id() == module_node.id() {
            continue;
        }
        match child.kind() {
            "dotted_name" => aliases.push(ImportAlias {
                node: child,
                bare_name: file.node_text(child).to_string(),
            }),
            "aliased_import" => {
                let bare = child
                    .child_by_field_name("name")
                    .map(|name| file.node_text(name).to_string())
                    .unwrap_or_default();
                aliases.push(ImportAlias {
                    node: child,
                    bare_name: bare,
                });
            }
            _ => {}
        }
    }
    aliases
}

fn merge_into(
    file: &SourceFile,
    aliases: &[ImportAlias<'_>],
    statement: Node<'_>,
    add: &[&str],
    remove: &[&str],
) -> Vec<Edit> {
    let kept: Vec<&ImportAlias> = aliases
        .iter()
        .filter(|alias| !remove.contains(&alias.bare_name.as_str()))
        .collect();
    let additions: Vec<&str> = add
        .iter()
        .copied()
        .filter(|name| !aliases.iter().any(|alias| alias.bare_name == *name))
        .collect();

    if kept.len() == aliases.len() && additions.is_empty() {
        return Vec::new();
    }

    if kept.is_empty() && additions.is_empty() {
        return vec![Edit::replace(statement_line_range(file, statement), "")];
    }

    let mut parts: Vec<String> = kept
        .iter()
        .map(|alias| file.node_text(alias.node).to_string())
        .collect();
    parts.extend(additions.iter().map(|name| name.to_string()));
    let replacement = parts.join(", ");

    let start = aliases.first().map(|a| a.node.start_byte()).unwrap_or(0);
    let end = aliases.last().map(|a| a.node.end_byte()).unwrap_or(start);
    if &file.content[start..end] == replacement {
        return Vec::new();
    }
    vec![Edit::replace(start..end, replacement)]
}

/// The statement's byte range extended over its whole line, so dropping it
/// leaves no blank hole behind. The trailing newline (and anything between
/// the statement and it, such as a trailing comment) is consumed only when
/// the remainder of the line carries no code.
fn statement_line_range(file: &SourceFile, statement: Node<'_>) -> std::ops::Range<usize> {
    let start = statement.start_byte();
    let mut end = statement.end_byte();
    let rest = &file.content[end..];
    if let Some(newline) = rest.find('\n') {
        let tail = &rest[..newline];
        if tail.trim_start().is_empty() || tail.trim_start().starts_with('#') {
            end += newline + 1;
        }
    } else if rest.trim_start().is_empty() {
        end = file.content.len();
    }
    start..end
}
