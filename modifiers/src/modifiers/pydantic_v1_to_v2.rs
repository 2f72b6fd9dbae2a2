//! Flattens the `pydantic.v1` compatibility namespace to plain `pydantic`.
//!
//! Handles `from pydantic.v1... import ...` (including star and aliased
//! forms), `import pydantic.v1...`, and `pydantic.v1.<attr>` attribute
//! chains, recursively for arbitrarily deep dotted paths.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use recast_core::{Edit, SourceFile};

use crate::error::{ConfigError, EngineError};
use crate::modifier::{Modifier, ModifierOptions};
use crate::suppression::SuppressionWalker;

const PACKAGE: &str = "pydantic";
const LEGACY_SEGMENT: &str = "v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PydanticV1ToV2 {
    #[serde(flatten)]
    pub options: ModifierOptions,
}

impl Modifier for PydanticV1ToV2 {
    fn validate(&self) -> Result<(), ConfigError> {
        self.options.validate()
    }

    fn modify(&self, files: &[SourceFile]) -> Result<bool, EngineError> {
        let ignore = self.options.ignore_regex()?;
        let needle = format!("{PACKAGE}.{LEGACY_SEGMENT}");
        let mut dirty = false;
        for file in files {
            if !self.options.should_process(&file.path) {
                continue;
            }
            if !file.content.contains(&needle) {
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
            "import_from_statement" => {
                if let Some(module) = node.child_by_field_name("module_name") {
                    if let Some(flattened) = flatten_dotted(file.node_text(module)) {
                        edits.push(Edit::replace(module.byte_range(), flattened));
                    }
                }
            }
            "import_statement" => {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    let dotted = match child.kind() {
                        "dotted_name" => Some(child),
                        "aliased_import" => child.child_by_field_name("name"),
                        _ => None,
                    };
                    if let Some(dotted) = dotted {
                        if let Some(flattened) = flatten_dotted(file.node_text(dotted)) {
                            edits.push(Edit::replace(dotted.byte_range(), flattened));
                        }
                    }
                }
            }
            "attribute" => {
                if is_legacy_attribute(file, node) {
                    edits.push(Edit::replace(node.byte_range(), PACKAGE));
                    return false;
                }
            }
            _ => {}
        }
        true
    });
    edits
}

/// `pydantic.v1[.rest...]` → `pydantic[.rest...]`; None when not a match.
fn flatten_dotted(dotted: &str) -> Option<String> {
    let parts: Vec<&str> = dotted.split('.').collect();
    if parts.len() < 2 || parts[0] != PACKAGE || parts[1] != LEGACY_SEGMENT {
        return None;
    }
    let mut flattened = vec![PACKAGE];
    flattened.extend(&parts[2..]);
    Some(flattened.join("."))
}

/// The innermost `pydantic.v1` attribute node; deeper chains flatten by
/// collapsing it.
fn is_legacy_attribute(file: &SourceFile, node: Node) -> bool {
    let Some(object) = node.child_by_field_name("object") else {
        return false;
    };
    let Some(attribute) = node.child_by_field_name("attribute") else {
        return false;
    };
    object.kind() == "identifier"
        && file.node_text(object) == PACKAGE
        && file.node_text(attribute) == LEGACY_SEGMENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use recast_core::apply_edits;

    fn transform(source: &str) -> String {
        let file = SourceFile::parse("test.py", source.to_string()).unwrap();
        let ignore = ModifierOptions::default().ignore_regex().unwrap();
        apply_edits(source, &collect_edits(&file, &ignore))
    }

    fn assert_unchanged(source: &str) {
        assert_eq!(transform(source), source);
    }

    // ==================== From-Import Tests ====================

    #[test]
    fn simple_import_from() {
        assert_eq!(
            transform("from pydantic.v1 import BaseModel"),
            "from pydantic import BaseModel"
        );
    }

    #[test]
    fn multiple_names() {
        assert_eq!(
            transform("from pydantic.v1 import BaseModel, Field, validator"),
            "from pydantic import BaseModel, Field, validator"
        );
    }

    #[test]
    fn aliased_name() {
        assert_eq!(
            transform("from pydantic.v1 import BaseModel as BM"),
            "from pydantic import BaseModel as BM"
        );
    }

    #[test]
    fn nested_module() {
        assert_eq!(
            transform("from pydantic.v1.fields import Field"),
            "from pydantic.fields import Field"
        );
    }

    #[test]
    fn deeply_nested_module() {
        assert_eq!(
            transform("from pydantic.v1.config.extra import Extra"),
            "from pydantic.config.extra import Extra"
        );
    }

    #[test]
    fn star_import() {
        assert_eq!(
            transform("from pydantic.v1 import *"),
            "from pydantic import *"
        );
    }

    #[test]
    fn multiline_parenthesized_import() {
        let code = "from pydantic.v1 import (\n    BaseModel,\n    Field,\n)\n";
        let expected = "from pydantic import (\n    BaseModel,\n    Field,\n)\n";
        assert_eq!(transform(code), expected);
    }

    // ==================== Plain Import Tests ====================

    #[test]
    fn simple_import() {
        assert_eq!(transform("import pydantic.v1"), "import pydantic");
    }

    #[test]
    fn import_with_alias() {
        assert_eq!(
            transform("import pydantic.v1 as pyd"),
            "import pydantic as pyd"
        );
    }

    #[test]
    fn nested_import() {
        assert_eq!(
            transform("import pydantic.v1.fields"),
            "import pydantic.fields"
        );
    }

    #[test]
    fn import_among_other_modules() {
        assert_eq!(
            transform("import pydantic.v1, os, sys"),
            "import pydantic, os, sys"
        );
    }

    // ==================== Attribute Tests ====================

    #[test]
    fn attribute_base_class() {
        let code = "import pydantic\nclass Foo(pydantic.v1.BaseModel):\n    pass\n";
        let expected = "import pydantic\nclass Foo(pydantic.BaseModel):\n    pass\n";
        assert_eq!(transform(code), expected);
    }

    #[test]
    fn attribute_chain_in_expression() {
        assert_eq!(
            transform("import pydantic\nx = pydantic.v1.BaseModel\n"),
            "import pydantic\nx = pydantic.BaseModel\n"
        );
    }

    // ==================== Conservation Tests ====================

    #[test]
    fn plain_pydantic_imports_untouched() {
        assert_unchanged("from pydantic import BaseModel\nclass Foo(BaseModel):\n    x: str\n");
    }

    #[test]
    fn other_v1_namespaces_untouched() {
        assert_unchanged("from mylib.v1 import Something");
    }

    #[test]
    fn mixed_imports_only_legacy_rewritten() {
        let code = "from pydantic import ConfigDict\nfrom pydantic.v1 import BaseModel, Field\n";
        let expected = "from pydantic import ConfigDict\nfrom pydantic import BaseModel, Field\n";
        assert_eq!(transform(code), expected);
    }

    // ==================== Suppression Tests ====================

    #[test]
    fn ignore_comment_suppresses_import_line() {
        assert_unchanged("from pydantic.v1 import BaseModel  # ignore\n");
    }

    // ==================== Idempotence Tests ====================

    #[test]
    fn applying_twice_changes_nothing_further() {
        let once = transform("from pydantic.v1 import BaseModel\nimport pydantic.v1.fields\n");
        assert_eq!(transform(&once), once);
    }
}
