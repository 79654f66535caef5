//! Configuration loading.

use camino::{Utf8Path, Utf8PathBuf};
use playground_parser::{AttributeMode, ParseOptions, StaticRegistry, DEFAULT_MAX_DEPTH};
use serde::Deserialize;
use std::fs;
use thiserror::Error;

/// Name of the config file looked up next to the snippets.
pub const CONFIG_FILE: &str = "indo-playground.json";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for a config.
    #[error("invalid config {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Playground configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaygroundConfig {
    /// Component names registered in addition to the built-ins.
    pub components: Vec<String>,

    /// Register the built-in IndoUI components.
    pub include_builtins: bool,

    /// Fail on malformed attributes.
    pub strict_attributes: bool,

    /// Maximum element nesting depth.
    pub max_depth: Option<usize>,

    /// File extensions treated as snippets.
    pub extensions: Vec<String>,

    /// Glob patterns to exclude.
    pub exclude: Vec<String>,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            components: Vec::new(),
            include_builtins: true,
            strict_attributes: false,
            max_depth: None,
            extensions: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl PlaygroundConfig {
    /// Loads `indo-playground.json` from `dir` if there is one.
    ///
    /// A missing file means defaults. A file that cannot be read or parsed
    /// is reported as a warning and defaults are used.
    pub fn load(dir: &Utf8Path) -> Self {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Self::default();
        }

        match Self::load_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{e}; using default configuration");
                Self::default()
            }
        }
    }

    /// Loads a config file, failing on any error.
    pub fn load_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;

        let config = Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        tracing::debug!(%path, "loaded configuration");
        Ok(config)
    }

    /// Parses config JSON. `//` and `/* */` comments are allowed.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(&remove_json_comments(content))
    }

    /// Returns the snippet file extensions.
    pub fn file_extensions(&self) -> Vec<&str> {
        if self.extensions.is_empty() {
            vec![".jsx"]
        } else {
            self.extensions.iter().map(|s| s.as_str()).collect()
        }
    }

    /// Builds the component registry this config describes.
    pub fn registry(&self) -> StaticRegistry {
        let mut registry = if self.include_builtins {
            StaticRegistry::indo_ui()
        } else {
            StaticRegistry::new()
        };
        registry.extend(self.components.iter().map(String::as_str));
        registry
    }

    /// Parse options this config describes.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            attribute_mode: if self.strict_attributes {
                AttributeMode::Strict
            } else {
                AttributeMode::Lenient
            },
            max_depth: self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
        }
    }
}

/// Removes single-line and multi-line comments from JSON.
fn remove_json_comments(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if c == '"' {
                in_string = false;
            } else if c == '\\' {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                result.push(c);
                in_string = true;
            }
            ('/', Some('/')) => {
                while chars.next_if(|next| *next != '\n').is_some() {}
            }
            ('/', Some('*')) => {
                chars.next();
                while let Some(next) = chars.next() {
                    if next == '*' && chars.next_if_eq(&'/').is_some() {
                        break;
                    }
                }
            }
            _ => result.push(c),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_parser::ComponentRegistry;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_remove_comments() {
        let json = r#"{
            // components for the docs site
            "components": ["Chart"], /* inline */
            "exclude": ["**/drafts/**"]
        }"#;

        let cleaned = remove_json_comments(json);
        assert!(!cleaned.contains("//"));
        assert!(!cleaned.contains("/*"));
        assert!(cleaned.contains("\"**/drafts/**\""));
    }

    #[test]
    fn test_comment_markers_inside_strings_are_kept() {
        let cleaned = remove_json_comments(r#"{"a": "http://x/*y*/"}"#);
        assert_eq!(cleaned, r#"{"a": "http://x/*y*/"}"#);
    }

    #[test]
    fn test_defaults() {
        let config = PlaygroundConfig::default();
        assert!(config.include_builtins);
        assert_eq!(config.file_extensions(), vec![".jsx"]);
        assert_eq!(config.parse_options(), ParseOptions::default());
    }

    #[test]
    fn test_from_json() {
        let config = PlaygroundConfig::from_json(
            r#"{
                "components": ["Chart"],
                "includeBuiltins": false,
                "strictAttributes": true,
                "maxDepth": 16,
                "extensions": [".jsx", ".indo"]
            }"#,
        )
        .unwrap();

        assert_eq!(config.file_extensions(), vec![".jsx", ".indo"]);
        assert_eq!(
            config.parse_options(),
            ParseOptions {
                attribute_mode: AttributeMode::Strict,
                max_depth: 16,
            }
        );

        let registry = config.registry();
        assert_eq!(registry.len(), 1);
        assert!(registry.resolve("Chart").is_some());
        assert!(registry.resolve("Button").is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PlaygroundConfig::from_json(r#"{"components": ["Chart"]}"#).unwrap();
        let registry = config.registry();
        assert!(registry.resolve("Chart").is_some());
        assert!(registry.resolve("Button").is_some());
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8Path::from_path(dir.path()).unwrap();
        assert_eq!(PlaygroundConfig::load(path), PlaygroundConfig::default());
    }

    #[test]
    fn test_load_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8Path::from_path(dir.path()).unwrap();
        fs::write(path.join(CONFIG_FILE), "{ not json").unwrap();

        assert_eq!(PlaygroundConfig::load(path), PlaygroundConfig::default());
        assert!(matches!(
            PlaygroundConfig::load_file(&path.join(CONFIG_FILE)),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_file_missing_is_error() {
        let err = PlaygroundConfig::load_file(Utf8Path::new("/nonexistent/indo-playground.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
