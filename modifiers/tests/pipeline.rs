//! End-to-end pipeline tests: configuration in, rewritten files and dirty
//! flags out.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use recast_modifiers::{AnyModifier, ModifierPipeline};

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn pipeline_from_json(config: &str) -> ModifierPipeline {
    let modifiers: Vec<AnyModifier> = serde_json::from_str(config).unwrap();
    ModifierPipeline::new(modifiers).unwrap()
}

fn run(pipeline: &ModifierPipeline, paths: &[PathBuf]) -> bool {
    let mut files = ModifierPipeline::load_files(paths).unwrap();
    pipeline.run(&mut files).unwrap()
}

#[test]
fn size_check_rule_rewrites_truthiness_test() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "a.py", "if len(x):\n    pass\n");

    let pipeline = pipeline_from_json(r#"[{"type": "len-as-bool"}]"#);
    assert!(run(&pipeline, &[path.clone()]));
    assert_eq!(fs::read_to_string(&path).unwrap(), "if x:\n    pass\n");
}

#[test]
fn any_type_rule_rewrites_annotations_and_adds_import() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "b.py",
        "def f(x: object) -> object:\n    return x or object()\n",
    );

    let pipeline = pipeline_from_json(r#"[{"type": "object-to-any"}]"#);
    assert!(run(&pipeline, &[path.clone()]));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "from typing import Any\ndef f(x: Any) -> Any:\n    return x or object()\n"
    );
}

#[test]
fn namespace_flattening_rewrites_legacy_import() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "c.py", "from pydantic.v1 import BaseModel\n");

    let pipeline = pipeline_from_json(r#"[{"type": "pydantic-v1-to-v2"}]"#);
    assert!(run(&pipeline, &[path.clone()]));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "from pydantic import BaseModel\n"
    );
}

#[test]
fn config_block_rule_rewrites_nested_config() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "d.py",
        "\
from pydantic import BaseModel
class User(BaseModel):
    name: str
    class Config:
        frozen = True
",
    );

    let pipeline = pipeline_from_json(r#"[{"type": "pydantic-config-to-model-config"}]"#);
    assert!(run(&pipeline, &[path.clone()]));
    let rewritten = fs::read_to_string(&path).unwrap();
    assert!(rewritten.contains("model_config = ConfigDict(frozen=True)"));
    assert!(rewritten.contains("from pydantic import BaseModel, ConfigDict"));
    assert!(!rewritten.contains("class Config"));
}

#[test]
fn nested_import_check_flags_only_the_offending_file() {
    let dir = TempDir::new().unwrap();
    let nested = write_file(&dir, "nested.py", "def f():\n    import os\n    return os\n");
    let clean = write_file(&dir, "clean.py", "import os\n\ndef f():\n    return os\n");

    let pipeline = pipeline_from_json(r#"[{"type": "local-imports"}]"#);
    assert!(run(&pipeline, &[nested.clone(), clean.clone()]));
    // Checking rules never write.
    assert_eq!(
        fs::read_to_string(&nested).unwrap(),
        "def f():\n    import os\n    return os\n"
    );

    let pipeline = pipeline_from_json(r#"[{"type": "local-imports"}]"#);
    assert!(!run(&pipeline, &[clean]));
}

#[test]
fn clean_file_set_returns_false_and_leaves_bytes_alone() {
    let dir = TempDir::new().unwrap();
    let source = "import os\n\n\ndef f(x: int) -> int:\n    return x + len([1])\n";
    let path = write_file(&dir, "clean.py", source);

    let pipeline = pipeline_from_json(
        r#"[
            {"type": "object-to-any"},
            {"type": "len-as-bool"},
            {"type": "pydantic-v1-to-v2"},
            {"type": "local-imports"}
        ]"#,
    );
    assert!(!run(&pipeline, &[path.clone()]));
    assert_eq!(fs::read_to_string(&path).unwrap(), source);
}

#[test]
fn later_rules_see_earlier_rules_output() {
    let dir = TempDir::new().unwrap();
    // Rule 1 flattens pydantic.v1; rule 2 then converts the Config block of
    // the same class, merging ConfigDict into the already-flattened import.
    let path = write_file(
        &dir,
        "model.py",
        "\
from pydantic.v1 import BaseModel
class User(BaseModel):
    name: str
    class Config:
        frozen = True
",
    );

    let pipeline = pipeline_from_json(
        r#"[
            {"type": "pydantic-v1-to-v2"},
            {"type": "pydantic-config-to-model-config"}
        ]"#,
    );
    assert!(run(&pipeline, &[path.clone()]));
    let rewritten = fs::read_to_string(&path).unwrap();
    assert!(rewritten.contains("from pydantic import BaseModel, ConfigDict"));
    assert!(rewritten.contains("model_config = ConfigDict(frozen=True)"));
}

#[test]
fn rerunning_the_whole_pipeline_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "all.py",
        "\
from datetime import datetime
from enum import Enum

class Status(str, Enum):
    ACTIVE = \"active\"

def f(x: object):
    if len(x):
        return datetime.utcnow()
",
    );

    let config = r#"[
        {"type": "object-to-any"},
        {"type": "len-as-bool"},
        {"type": "str-enum-inheritance"},
        {"type": "utcnow-to-datetime-now"}
    ]"#;

    let pipeline = pipeline_from_json(config);
    assert!(run(&pipeline, &[path.clone()]));
    let first = fs::read_to_string(&path).unwrap();

    let pipeline = pipeline_from_json(config);
    assert!(!run(&pipeline, &[path.clone()]));
    assert_eq!(fs::read_to_string(&path).unwrap(), first);
}

#[test]
fn suppressed_file_regions_survive_the_whole_pipeline() {
    let dir = TempDir::new().unwrap();
    let source = "\
def keep():  # ignore
    if len(x):
        return x
";
    let path = write_file(&dir, "suppressed.py", source);

    let pipeline = pipeline_from_json(r#"[{"type": "len-as-bool"}]"#);
    assert!(!run(&pipeline, &[path.clone()]));
    assert_eq!(fs::read_to_string(&path).unwrap(), source);
}

#[test]
fn path_filters_skip_excluded_files() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "test_skip.py", "if len(x):\n    pass\n");

    let pipeline = pipeline_from_json(r#"[{"type": "len-as-bool", "excluded_paths": ["test_*.py"]}]"#);
    assert!(!run(&pipeline, &[path.clone()]));
    assert_eq!(fs::read_to_string(&path).unwrap(), "if len(x):\n    pass\n");
}

#[test]
fn forbidden_functions_pipeline_reports_dirty() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "calls.py", "value = hasattr(obj, \"x\")\n");

    let pipeline = pipeline_from_json(
        r#"[{"type": "forbidden-functions", "forbidden_functions": ["hasattr"]}]"#,
    );
    assert!(run(&pipeline, &[path]));
}

#[test]
fn conflicting_filters_fail_before_any_file_io() {
    let modifiers: Vec<AnyModifier> = serde_json::from_str(
        r#"[{"type": "len-as-bool", "included_paths": ["a/*"], "excluded_paths": ["b/*"]}]"#,
    )
    .unwrap();
    assert!(ModifierPipeline::new(modifiers).is_err());
}
