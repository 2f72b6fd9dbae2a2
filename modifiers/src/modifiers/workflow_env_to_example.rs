//! Keeps a `.env.example` file in sync with workflow-defined environment
//! variables.
//!
//! Every configured workflow YAML file is scanned recursively for `env:`
//! mappings. Variables not yet present in the output file are appended:
//! into the existing `# From: <source>` section when one exists, otherwise
//! under a new section at the end. Templated values (`${{ ... }}`) are
//! blanked. A missing workflow file is a fatal configuration problem, not a
//! skip.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use recast_core::SourceFile;

use crate::error::{ConfigError, EngineError};
use crate::modifier::{Modifier, ModifierOptions};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowEnvToExample {
    #[serde(flatten)]
    pub options: ModifierOptions,

    /// Workflow files to extract env variables from.
    pub workflow_paths: Vec<PathBuf>,

    /// File the variables are written to.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Prefix of the per-source section comments in the output file.
    #[serde(default = "default_source_comment_prefix")]
    pub source_comment_prefix: String,
}

fn default_output_path() -> PathBuf {
    PathBuf::from(".env.example")
}

fn default_source_comment_prefix() -> String {
    "# From: ".to_string()
}

impl Modifier for WorkflowEnvToExample {
    fn validate(&self) -> Result<(), ConfigError> {
        self.options.validate()
    }

    fn modify(&self, _files: &[SourceFile]) -> Result<bool, EngineError> {
        let env_vars = self.collect_env_vars_from_workflows()?;
        if env_vars.is_empty() {
            return Ok(false);
        }

        let existing_content = if self.output_path.exists() {
            fs::read_to_string(&self.output_path).map_err(|source| EngineError::Read {
                path: self.output_path.clone(),
                source,
            })?
        } else {
            String::new()
        };

        let mut existing_vars: HashSet<String> = HashSet::new();
        let mut source_sections: HashMap<String, usize> = HashMap::new();
        for (idx, line) in existing_content.lines().enumerate() {
            let stripped = line.trim();
            if let Some(source) = stripped.strip_prefix(&self.source_comment_prefix) {
                source_sections.insert(source.to_string(), idx);
            } else if line.contains('=') && !stripped.starts_with('#') {
                if let Some(name) = line.split('=').next() {
                    existing_vars.insert(name.trim().to_string());
                }
            }
        }

        let mut added: HashSet<String> = HashSet::new();
        let mut existing_source_vars: Vec<(String, Vec<String>)> = Vec::new();
        let mut new_source_sections: Vec<(String, Vec<String>)> = Vec::new();
        for (source, vars) in &env_vars {
            let mut section_vars = Vec::new();
            for (name, value) in vars {
                if existing_vars.contains(name) || added.contains(name) {
                    continue;
                }
                section_vars.push(format!("{name}={value}"));
                added.insert(name.clone());
            }
            if section_vars.is_empty() {
                continue;
            }
            if source_sections.contains_key(source) {
                existing_source_vars.push((source.clone(), section_vars));
            } else {
                new_source_sections.push((source.clone(), section_vars));
            }
        }

        if existing_source_vars.is_empty() && new_source_sections.is_empty() {
            return Ok(false);
        }

        let content = self.render(
            &existing_content,
            &source_sections,
            &existing_source_vars,
            &new_source_sections,
        );
        fs::write(&self.output_path, content).map_err(|source| EngineError::Write {
            path: self.output_path.clone(),
            source,
        })?;
        self.options.emit(&format!(
            "Updated {} with {} new environment variable(s)",
            self.output_path.display(),
            added.len()
        ));
        Ok(true)
    }
}

impl WorkflowEnvToExample {
    fn collect_env_vars_from_workflows(
        &self,
    ) -> Result<Vec<(String, Vec<(String, String)>)>, EngineError> {
        let mut env_vars = Vec::new();
        for workflow_path in &self.workflow_paths {
            if !workflow_path.exists() {
                return Err(EngineError::MissingWorkflowFile(workflow_path.clone()));
            }
            let text = fs::read_to_string(workflow_path).map_err(|source| EngineError::Read {
                path: workflow_path.clone(),
                source,
            })?;
            let data: Value =
                serde_yaml::from_str(&text).map_err(|source| EngineError::Workflow {
                    path: workflow_path.clone(),
                    source,
                })?;
            let mut vars = Vec::new();
            let mut seen = HashSet::new();
            extract_env_vars(&data, &mut vars, &mut seen);
            if !vars.is_empty() {
                env_vars.push((workflow_path.display().to_string(), vars));
            }
        }
        Ok(env_vars)
    }

    fn render(
        &self,
        existing_content: &str,
        source_sections: &HashMap<String, usize>,
        existing_source_vars: &[(String, Vec<String>)],
        new_source_sections: &[(String, Vec<String>)],
    ) -> String {
        let mut content = existing_content.to_string();
        if !existing_source_vars.is_empty() {
            let mut lines: Vec<String> = content.lines().map(String::from).collect();
            for (source, vars_to_add) in existing_source_vars {
                let section_idx = source_sections[source];
                let mut insert_idx = section_idx + 1;
                while insert_idx < lines.len()
                    && !lines[insert_idx].trim().is_empty()
                    && !lines[insert_idx].trim().starts_with('#')
                {
                    insert_idx += 1;
                }
                for var_line in vars_to_add.iter().rev() {
                    lines.insert(insert_idx, var_line.clone());
                }
            }
            content = lines.join("\n");
        }

        let mut final_content = content.trim_end().to_string();
        if !new_source_sections.is_empty() {
            if !final_content.is_empty() {
                final_content.push_str("\n\n");
            }
            let mut section_lines: Vec<String> = Vec::new();
            for (source, vars) in new_source_sections {
                section_lines.push(format!("{}{}", self.source_comment_prefix, source));
                section_lines.extend(vars.iter().cloned());
                section_lines.push(String::new());
            }
            final_content.push_str(&section_lines.join("\n"));
        }
        final_content
    }
}

/// Recursively collect `env:` mapping entries, in document order.
fn extract_env_vars(
    value: &Value,
    out: &mut Vec<(String, String)>,
    seen: &mut HashSet<String>,
) {
    match value {
        Value::Mapping(mapping) => {
            let env_entry = mapping
                .iter()
                .find(|(key, _)| key.as_str() == Some("env"))
                .map(|(_, value)| value);
            if let Some(Value::Mapping(env)) = env_entry {
                for (key, value) in env {
                    let Some(name) = key.as_str() else { continue };
                    if seen.contains(name) {
                        continue;
                    }
                    seen.insert(name.to_string());
                    out.push((name.to_string(), scalar_to_string(value)));
                }
            }
            for nested in mapping.values() {
                extract_env_vars(nested, out, seen);
            }
        }
        Value::Sequence(items) => {
            for item in items {
                extract_env_vars(item, out, seen);
            }
        }
        _ => {}
    }
}

/// Templated values are blanked; everything else keeps its scalar text.
fn scalar_to_string(value: &Value) -> String {
    let text = match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    };
    if text.contains("${{") {
        String::new()
    } else {
        text
    }
}
