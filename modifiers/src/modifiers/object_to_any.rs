//! Rewrites the catch-all `object` annotation to `Any`.
//!
//! Only type-annotation positions are touched: parameter and return
//! annotations, variable annotations, and any subscript nesting inside
//! them. Base-class lists, constructor calls, isinstance checks, and
//! attribute access keep their `object`. The `Any` import is added only
//! when at least one rewrite actually happened.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use recast_core::{Edit, SourceFile};

use crate::error::{ConfigError, EngineError};
use crate::imports;
use crate::modifier::{Modifier, ModifierOptions};
use crate::suppression::SuppressionWalker;

const BROAD_TYPE: &str = "object";
const ANY_TYPE: &str = "Any";
const TYPING_MODULE: &str = "typing";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectToAny {
    #[serde(flatten)]
    pub options: ModifierOptions,
}

impl Modifier for ObjectToAny {
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
            if !file.content.contains(BROAD_TYPE) {
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
        if node.kind() == "identifier"
            && file.node_text(node) == BROAD_TYPE
            && !is_attribute_member(node)
            && in_annotation(node)
        {
            edits.push(Edit::replace(node.byte_range(), ANY_TYPE));
        }
        true
    });
    if !edits.is_empty() {
        edits.extend(imports::synchronize(file, TYPING_MODULE, &[ANY_TYPE], &[]));
    }
    edits
}

/// Annotation positions are wrapped in a `type` node by the grammar.
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
