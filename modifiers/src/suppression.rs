//! Suppression-aware tree traversal.
//!
//! Every concrete modifier asks the same question at every node: "is this
//! location opted out of transformation?" The walker answers it by tracking
//! two pieces of state while driving a pre-order traversal:
//!
//! - whether the current simple statement line carries a trailing comment
//!   matching the suppression pattern, and
//! - a stack of flags, one per enclosing compound-statement scope, set from
//!   the comment trailing the scope's header line.
//!
//! A scope flag inherits the enclosing scope's flag, so suppression on an
//! outer block silently cascades to everything inside it; there is no way to
//! re-enable inside a suppressed block.

use std::collections::HashMap;

use regex::Regex;
use tree_sitter::Node;

use recast_core::SourceFile;

/// Drives a pre-order walk of one file's tree for one rule invocation,
/// reporting the suppression state at every node.
pub struct SuppressionWalker<'f> {
    file: &'f SourceFile,
    pattern: &'f Regex,
    comments_by_row: HashMap<usize, String>,
    simple_line_ignored: bool,
    compound_stack: Vec<bool>,
}

impl<'f> SuppressionWalker<'f> {
    pub fn new(file: &'f SourceFile, pattern: &'f Regex) -> Self {
        Self {
            file,
            pattern,
            comments_by_row: collect_comments(file),
            simple_line_ignored: false,
            compound_stack: Vec::new(),
        }
    }

    /// Walk the whole file. The callback receives every node together with
    /// its suppression state and returns whether to descend into children.
    pub fn walk<F>(&mut self, callback: &mut F)
    where
        F: FnMut(Node<'f>, bool) -> bool,
    {
        self.walk_node(self.file.root(), callback);
    }

    /// True iff a comment on this row matches the suppression pattern.
    ///
    /// A Python comment always runs to the end of its line, so any comment
    /// sharing a row with code is that row's trailing comment.
    pub fn line_matches(&self, row: usize) -> bool {
        self.comments_by_row
            .get(&row)
            .is_some_and(|comment| self.pattern.is_match(comment))
    }

    fn is_suppressed(&self) -> bool {
        self.simple_line_ignored || self.compound_stack.last().copied().unwrap_or(false)
    }

    fn walk_node<F>(&mut self, node: Node<'f>, callback: &mut F)
    where
        F: FnMut(Node<'f>, bool) -> bool,
    {
        let compound = is_compound(node);
        let simple = !compound && is_statement_line(node);

        if compound {
            let inherited = self.compound_stack.last().copied().unwrap_or(false);
            let header = header_row(node).is_some_and(|row| self.line_matches(row));
            self.compound_stack.push(inherited || header);
        } else if simple {
            self.simple_line_ignored = self.line_matches(node.start_position().row);
        }

        if callback(node, self.is_suppressed()) {
            let mut cursor = node.walk();
            let children: Vec<Node<'f>> = node.children(&mut cursor).collect();
            for child in children {
                self.walk_node(child, callback);
            }
        }

        if compound {
            self.compound_stack.pop();
        } else if simple {
            self.simple_line_ignored = false;
        }
    }
}

/// A compound statement is anything carrying an indented block of its own:
/// function and class bodies, if/elif/else, loops, try/except, with, match
/// arms. Decorated definitions are transparent wrappers, not scopes.
fn is_compound(node: Node) -> bool {
    if node.kind() == "module" || node.kind() == "decorated_definition" {
        return false;
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|child| child.kind() == "block");
    found
}

/// A statement line is a named direct child of the module or of a block.
fn is_statement_line(node: Node) -> bool {
    if !node.is_named() || node.kind() == "comment" || node.kind() == "decorated_definition" {
        return false;
    }
    node.parent()
        .is_some_and(|parent| parent.kind() == "module" || parent.kind() == "block")
}

/// Row of the line that opens the node's block: the line carrying the colon.
fn header_row(node: Node) -> Option<usize> {
    let mut cursor = node.walk();
    let row = node
        .children(&mut cursor)
        .find(|child| child.kind() == ":")
        .map(|colon| colon.start_position().row);
    row
}

/// Rows whose comment matches the suppression pattern. For rules that need
/// row checks outside a walk (enum members, decorator lines).
pub fn matching_comment_rows(file: &SourceFile, pattern: &Regex) -> std::collections::HashSet<usize> {
    collect_comments(file)
        .into_iter()
        .filter(|(_, comment)| pattern.is_match(comment))
        .map(|(row, _)| row)
        .collect()
}

fn collect_comments(file: &SourceFile) -> HashMap<usize, String> {
    let mut comments = HashMap::new();
    let mut stack = vec![file.root()];
    while let Some(node) = stack.pop() {
        if node.kind() == "comment" {
            comments.insert(
                node.start_position().row,
                file.node_text(node).to_string(),
            );
            continue;
        }
        for i in 0..node.child_count() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }
    comments
}
