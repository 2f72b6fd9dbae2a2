use std::path::Path;

use tree_sitter::{Language, Parser, Tree};

use crate::error::ParseError;

/// The tree-sitter grammar for Python.
pub fn python_language() -> Language {
    tree_sitter_python::LANGUAGE.into()
}

/// Parse Python source text into a tree-sitter tree.
///
/// tree-sitter itself is error-tolerant, but a tree with error or missing
/// nodes cannot be rewritten faithfully, so any syntax error is fatal here.
pub fn parse_python(path: &Path, source: &str) -> Result<Tree, ParseError> {
    let mut parser = Parser::new();
    parser.set_language(&python_language())?;

    let tree = parser.parse(source, None).ok_or_else(|| ParseError::Syntax {
        path: path.to_path_buf(),
        line: 1,
    })?;

    if tree.root_node().has_error() {
        return Err(ParseError::Syntax {
            path: path.to_path_buf(),
            line: first_error_line(&tree),
        });
    }

    Ok(tree)
}

/// 1-based line of the first error or missing node in the tree.
fn first_error_line(tree: &Tree) -> usize {
    let mut stack = vec![tree.root_node()];
    let mut line = 1;
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return node.start_position().row + 1;
        }
        if node.has_error() {
            for i in (0..node.child_count()).rev() {
                if let Some(child) = node.child(i) {
                    stack.push(child);
                }
            }
        }
        line = node.start_position().row + 1;
    }
    line
}
