use std::fs;
use std::path::PathBuf;

use tree_sitter::{Node, Tree};

use crate::error::ParseError;
use crate::parse::parse_python;

/// A fully parsed source file: path + original text + syntax tree.
///
/// Created once per input path at pipeline start and never mutated. A
/// modifier produces new text through edits; it does not touch this value.
#[derive(Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
    pub tree: Tree,
}

impl SourceFile {
    /// Read and parse the file at `path`.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ParseError> {
        let path = path.into();
        let content = fs::read_to_string(&path).map_err(|source| ParseError::Io {
            path: path.clone(),
            source,
        })?;
        Self::parse(path, content)
    }

    /// Parse already-read source text.
    pub fn parse(path: impl Into<PathBuf>, content: String) -> Result<Self, ParseError> {
        let path = path.into();
        let tree = parse_python(&path, &content)?;
        Ok(Self {
            path,
            content,
            tree,
        })
    }

    /// The exact source text for a node.
    pub fn node_text(&self, node: Node) -> &str {
        &self.content[node.byte_range()]
    }

    /// The root node of the syntax tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> SourceFile {
        SourceFile::parse("test.py", source.to_string()).expect("parsing should succeed")
    }

    #[test]
    fn content_preserved() {
        let code = "x = 42\ny = 'hello'\n";
        let file = parse(code);
        assert_eq!(file.content, code);
    }

    #[test]
    fn path_preserved() {
        let file = SourceFile::parse("some/deep/module.py", "pass\n".to_string()).unwrap();
        assert_eq!(file.path, PathBuf::from("some/deep/module.py"));
    }

    #[test]
    fn node_text_returns_exact_span() {
        let file = parse("value = compute(1, 2)\n");
        let root = file.root();
        let stmt = root.child(0).unwrap();
        assert_eq!(file.node_text(stmt), "value = compute(1, 2)");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let result = SourceFile::load("definitely/not/a/real/file.py");
        assert!(matches!(result, Err(ParseError::Io { .. })));
    }

    #[test]
    fn parse_rejects_invalid_source() {
        let result = SourceFile::parse("bad.py", "def broken(\n".to_string());
        assert!(matches!(result, Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn root_is_module() {
        let file = parse("x = 1\n");
        assert_eq!(file.root().kind(), "module");
    }
}
