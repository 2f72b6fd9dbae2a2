//! Migrates deprecated `datetime.utcnow()` to timezone-aware
//! `datetime.now(UTC)`.
//!
//! Both call styles are handled: the imported-class style
//! (`from datetime import datetime`; `datetime.utcnow()` →
//! `datetime.now(UTC)`) and the qualified-module style (`import datetime`;
//! `datetime.datetime.utcnow()` → `datetime.datetime.now(datetime.UTC)`).
//! Bare references become `lambda:` equivalents, since the replacement needs
//! an argument. The `UTC` import is managed only for the class style; the
//! module style qualifies `UTC` through the module.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use recast_core::{Edit, SourceFile};

use crate::error::{ConfigError, EngineError};
use crate::imports;
use crate::modifier::{Modifier, ModifierOptions};
use crate::suppression::SuppressionWalker;

const DATETIME_MODULE: &str = "datetime";
const UTC: &str = "UTC";
const UTCNOW: &str = "utcnow";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtcNowToDatetimeNow {
    #[serde(flatten)]
    pub options: ModifierOptions,
}

impl Modifier for UtcNowToDatetimeNow {
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
            if !file.content.contains(UTCNOW) {
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
    let mut needs_utc_import = false;

    let mut walker = SuppressionWalker::new(file, ignore);
    walker.walk(&mut |node, suppressed| {
        if suppressed {
            return true;
        }
        match node.kind() {
            "call" => {
                let Some(function) = node.child_by_field_name("function") else {
                    return true;
                };
                if is_class_utcnow(file, function) {
                    edits.push(Edit::replace(node.byte_range(), "datetime.now(UTC)"));
                    needs_utc_import = true;
                    return false;
                }
                if is_module_utcnow(file, function) {
                    edits.push(Edit::replace(
                        node.byte_range(),
                        "datetime.datetime.now(datetime.UTC)",
                    ));
                    return false;
                }
            }
            "attribute" => {
                if is_class_utcnow(file, node) {
                    edits.push(Edit::replace(
                        node.byte_range(),
                        "lambda: datetime.now(UTC)",
                    ));
                    needs_utc_import = true;
                    return false;
                }
                if is_module_utcnow(file, node) {
                    edits.push(Edit::replace(
                        node.byte_range(),
                        "lambda: datetime.datetime.now(datetime.UTC)",
                    ));
                    return false;
                }
            }
            _ => {}
        }
        true
    });

    if needs_utc_import {
        edits.extend(imports::synchronize(file, DATETIME_MODULE, &[UTC], &[]));
    }
    edits
}

/// `datetime.utcnow`: the class imported from the datetime module.
fn is_class_utcnow(file: &SourceFile, node: Node) -> bool {
    if node.kind() != "attribute" {
        return false;
    }
    let Some(object) = node.child_by_field_name("object") else {
        return false;
    };
    let Some(attribute) = node.child_by_field_name("attribute") else {
        return false;
    };
    object.kind() == "identifier"
        && file.node_text(object) == DATETIME_MODULE
        && file.node_text(attribute) == UTCNOW
}

/// `datetime.datetime.utcnow`: the class qualified through the module.
fn is_module_utcnow(file: &SourceFile, node: Node) -> bool {
    if node.kind() != "attribute" {
        return false;
    }
    let Some(object) = node.child_by_field_name("object") else {
        return false;
    };
    let Some(attribute) = node.child_by_field_name("attribute") else {
        return false;
    };
    if file.node_text(attribute) != UTCNOW || object.kind() != "attribute" {
        return false;
    }
    let Some(inner_object) = object.child_by_field_name("object") else {
        return false;
    };
    let Some(inner_attribute) = object.child_by_field_name("attribute") else {
        return false;
    };
    inner_object.kind() == "identifier"
        && file.node_text(inner_object) == DATETIME_MODULE
        && file.node_text(inner_attribute) == DATETIME_MODULE
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

    // ==================== Class Style Tests ====================

    #[test]
    fn simple_call() {
        assert_eq!(
            transform("from datetime import datetime\nnow = datetime.utcnow()\n"),
            "from datetime import datetime, UTC\nnow = datetime.now(UTC)\n"
        );
    }

    #[test]
    fn bare_reference_becomes_lambda() {
        assert_eq!(
            transform("from datetime import datetime\ndefault_factory = datetime.utcnow\n"),
            "from datetime import datetime, UTC\ndefault_factory = lambda: datetime.now(UTC)\n"
        );
    }

    #[test]
    fn bare_reference_as_keyword_argument() {
        let code = "\
from datetime import datetime
from pydantic import Field
class Model:
    created_at: datetime = Field(default_factory=datetime.utcnow)
";
        let expected = "\
from datetime import datetime, UTC
from pydantic import Field
class Model:
    created_at: datetime = Field(default_factory=lambda: datetime.now(UTC))
";
        assert_eq!(transform(code), expected);
    }

    #[test]
    fn call_in_function_body() {
        assert_eq!(
            transform("from datetime import datetime\ndef get_now():\n    return datetime.utcnow()\n"),
            "from datetime import datetime, UTC\ndef get_now():\n    return datetime.now(UTC)\n"
        );
    }

    #[test]
    fn call_in_condition() {
        assert_eq!(
            transform("from datetime import datetime\nif datetime.utcnow() > deadline:\n    pass\n"),
            "from datetime import datetime, UTC\nif datetime.now(UTC) > deadline:\n    pass\n"
        );
    }

    #[test]
    fn call_as_function_argument() {
        assert_eq!(
            transform("from datetime import datetime\nresult = foo(datetime.utcnow())\n"),
            "from datetime import datetime, UTC\nresult = foo(datetime.now(UTC))\n"
        );
    }

    #[test]
    fn multiple_occurrences() {
        let code = "\
from datetime import datetime
start = datetime.utcnow()
end = datetime.utcnow()
";
        let expected = "\
from datetime import datetime, UTC
start = datetime.now(UTC)
end = datetime.now(UTC)
";
        assert_eq!(transform(code), expected);
    }

    #[test]
    fn mixed_call_and_bare_reference() {
        let code = "\
from datetime import datetime
now = datetime.utcnow()
factory = datetime.utcnow
";
        let expected = "\
from datetime import datetime, UTC
now = datetime.now(UTC)
factory = lambda: datetime.now(UTC)
";
        assert_eq!(transform(code), expected);
    }

    // ==================== Import Management Tests ====================

    #[test]
    fn utc_added_to_existing_import() {
        assert_eq!(
            transform("from datetime import datetime, timedelta\nnow = datetime.utcnow()\n"),
            "from datetime import datetime, timedelta, UTC\nnow = datetime.now(UTC)\n"
        );
    }

    #[test]
    fn utc_not_duplicated() {
        assert_eq!(
            transform("from datetime import datetime, UTC\nnow = datetime.utcnow()\n"),
            "from datetime import datetime, UTC\nnow = datetime.now(UTC)\n"
        );
    }

    #[test]
    fn star_import_satisfies_utc() {
        assert_eq!(
            transform("from datetime import *\nnow = datetime.utcnow()\n"),
            "from datetime import *\nnow = datetime.now(UTC)\n"
        );
    }

    #[test]
    fn import_created_when_missing() {
        assert_eq!(
            transform("now = datetime.utcnow()\n"),
            "from datetime import UTC\nnow = datetime.now(UTC)\n"
        );
    }

    #[test]
    fn utc_added_to_first_datetime_import_only() {
        let code = "\
from datetime import datetime
from datetime import timedelta
now = datetime.utcnow()
";
        let expected = "\
from datetime import datetime, UTC
from datetime import timedelta
now = datetime.now(UTC)
";
        assert_eq!(transform(code), expected);
    }

    // ==================== Module Style Tests ====================

    #[test]
    fn module_style_call() {
        assert_eq!(
            transform("import datetime\nnow = datetime.datetime.utcnow()\n"),
            "import datetime\nnow = datetime.datetime.now(datetime.UTC)\n"
        );
    }

    #[test]
    fn module_style_bare_reference() {
        assert_eq!(
            transform("import datetime\nfactory = datetime.datetime.utcnow\n"),
            "import datetime\nfactory = lambda: datetime.datetime.now(datetime.UTC)\n"
        );
    }

    #[test]
    fn module_style_needs_no_import_change() {
        let result = transform("import datetime\nnow = datetime.datetime.utcnow()\n");
        assert!(!result.contains("from datetime import"));
    }

    #[test]
    fn module_style_multiple_occurrences() {
        let code = "\
import datetime
start = datetime.datetime.utcnow()
end = datetime.datetime.utcnow()
";
        let expected = "\
import datetime
start = datetime.datetime.now(datetime.UTC)
end = datetime.datetime.now(datetime.UTC)
";
        assert_eq!(transform(code), expected);
    }

    // ==================== Conservation Tests ====================

    #[test]
    fn plain_now_untouched() {
        assert_unchanged("from datetime import datetime\nnow = datetime.now()\n");
    }

    #[test]
    fn method_on_other_object_untouched() {
        assert_unchanged("result = obj.utcnow()\n");
    }

    // ==================== Suppression Tests ====================

    #[test]
    fn ignore_comment_suppresses_statement() {
        assert_unchanged("from datetime import datetime\nnow = datetime.utcnow()  # ignore\n");
    }

    #[test]
    fn suppressed_block_keeps_calls() {
        assert_unchanged(
            "\
from datetime import datetime
def stamp():  # ignore
    return datetime.utcnow()
",
        );
    }

    // ==================== Idempotence Tests ====================

    #[test]
    fn applying_twice_changes_nothing_further() {
        let once = transform("from datetime import datetime\nnow = datetime.utcnow()\n");
        assert_eq!(transform(&once), once);
    }
}
