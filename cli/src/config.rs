//! Run configuration: the ordered modifier list, loaded from a JSON file.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use recast_modifiers::AnyModifier;

/// Top-level configuration file shape:
/// `{ "modifiers": [ { "type": "<tag>", ... }, ... ] }`.
#[derive(Debug, Deserialize)]
pub struct RunConfig {
    pub modifiers: Vec<AnyModifier>,
}

impl RunConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: RunConfig = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_a_minimal_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recast.json");
        fs::write(&path, r#"{"modifiers": [{"type": "len-as-bool"}]}"#).unwrap();

        let config = RunConfig::load(&path).unwrap();
        assert_eq!(config.modifiers.len(), 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = RunConfig::load(Path::new("no/such/config.json"));
        assert!(result.is_err());
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recast.json");
        fs::write(&path, "{not json").unwrap();
        assert!(RunConfig::load(&path).is_err());
    }

    #[test]
    fn unknown_modifier_type_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recast.json");
        fs::write(&path, r#"{"modifiers": [{"type": "bogus"}]}"#).unwrap();
        assert!(RunConfig::load(&path).is_err());
    }
}
