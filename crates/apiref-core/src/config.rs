use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Parser configuration, loadable from `.apiref.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum nesting depth the reference resolver will produce.
    pub max_ref_depth: usize,
    /// What to do when two endpoints map to the same navigable path.
    pub collision_policy: CollisionPolicy,
    pub navigation: NavigationConfig,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_ref_depth: DEFAULT_MAX_REF_DEPTH,
            collision_policy: CollisionPolicy::default(),
            navigation: NavigationConfig::default(),
        }
    }
}

pub const DEFAULT_MAX_REF_DEPTH: usize = 128;

/// Handling of endpoints whose navigable paths collide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Append `_2`, `_3`, ... to the later slug until it is unique.
    #[default]
    Suffix,
    /// Keep the duplicate path; lookups return the last endpoint registered.
    LastWins,
    /// Fail the parse.
    Error,
}

/// Navigation tree settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Prefix of every navigable path, without trailing slash.
    pub route_prefix: String,
    /// Tag given to operations that declare none.
    pub default_tag: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            route_prefix: "/api_reference".to_string(),
            default_tag: "default".to_string(),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".apiref.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<ParserConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config: ParserConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# apiref configuration
max_ref_depth: 128

# suffix | last_wins | error
collision_policy: suffix

navigation:
  route_prefix: /api_reference
  default_tag: default
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParserConfig::default();
        assert_eq!(config.max_ref_depth, 128);
        assert_eq!(config.collision_policy, CollisionPolicy::Suffix);
        assert_eq!(config.navigation.route_prefix, "/api_reference");
        assert_eq!(config.navigation.default_tag, "default");
    }

    #[test]
    fn test_default_content_matches_defaults() {
        let config: ParserConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config, ParserConfig::default());
    }

    #[test]
    fn test_parse_partial_config() {
        let yaml = r#"
collision_policy: last_wins
navigation:
  route_prefix: /docs/api
"#;
        let config: ParserConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.collision_policy, CollisionPolicy::LastWins);
        assert_eq!(config.navigation.route_prefix, "/docs/api");
        // Defaults applied
        assert_eq!(config.navigation.default_tag, "default");
        assert_eq!(config.max_ref_depth, DEFAULT_MAX_REF_DEPTH);
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "max_ref_depth: 16\ncollision_policy: error\n").unwrap();
        let config = load_config(&path).unwrap().expect("config should load");
        assert_eq!(config.max_ref_depth, 16);
        assert_eq!(config.collision_policy, CollisionPolicy::Error);
    }

    #[test]
    fn test_load_config_invalid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "collision_policy: sometimes\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
    }
}
