//! Theme configuration document.
//!
//! The configuration is a YAML document describing every theme type, the
//! theme that is active for it, and the themes it declares:
//!
//! ```yaml
//! default_type: frontend
//! base_path: resources/themes
//! types:
//!   frontend:
//!     active: default
//!     path: frontend
//!     themes:
//!       default: { name: Default Theme, description: Default frontend theme }
//!       modern: { name: Modern Theme, description: Modern frontend theme }
//!   admin:
//!     active: classic
//!     path: admin
//!     themes:
//!       classic: { name: Classic Admin }
//! ```
//!
//! Every field has a default, so an empty document is valid and yields a
//! configuration without any types.
//!
//! # Environment Overrides
//!
//! [`ThemeConfig::apply_env_overrides`] lets deployment environments pick the
//! active theme without editing the document:
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `<TYPE>_THEME` | Active theme for `<type>` (e.g. `FRONTEND_THEME`) |
//! | `THEME_DEFAULT` | Fallback theme for types with no active theme |
//!
//! Overrides are read once, when the configuration is loaded.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Theme used when a type has no active theme configured.
pub const DEFAULT_THEME: &str = "default";

/// Type selected when a request does not name one.
pub const DEFAULT_TYPE: &str = "frontend";

/// Conventional location of the themes directory.
pub const DEFAULT_BASE_PATH: &str = "resources/themes";

/// Environment variable overriding [`ThemeConfig::default_theme`].
pub const DEFAULT_THEME_ENV: &str = "THEME_DEFAULT";

/// Display metadata for a declared theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeMeta {
    pub name: String,
    pub description: String,
}

impl ThemeMeta {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Settings for one theme type (e.g. `frontend` or `admin`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeTypeConfig {
    /// Identifier of the active theme. `None` falls back to the global default.
    pub active: Option<String>,
    /// Directory segment below the base path. May be empty.
    pub path: String,
    /// Declared themes keyed by identifier.
    pub themes: BTreeMap<String, ThemeMeta>,
}

impl ThemeTypeConfig {
    /// Creates a type stored under `path` with no declared themes.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Declares a theme, returning the updated type for chaining.
    pub fn theme(mut self, id: impl Into<String>, meta: ThemeMeta) -> Self {
        self.themes.insert(id.into(), meta);
        self
    }

    /// Sets the active theme, returning the updated type for chaining.
    pub fn active(mut self, id: impl Into<String>) -> Self {
        self.active = Some(id.into());
        self
    }
}

/// The complete theme configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Type used when a request or lookup does not name one.
    pub default_type: String,
    /// Theme used for types without an active theme.
    pub default_theme: String,
    /// Root directory of all theme directories.
    pub base_path: PathBuf,
    /// Optional public URL prefix for theme assets.
    pub asset_url: Option<String>,
    /// Theme types keyed by identifier.
    pub types: BTreeMap<String, ThemeTypeConfig>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            default_type: DEFAULT_TYPE.to_string(),
            default_theme: DEFAULT_THEME.to_string(),
            base_path: PathBuf::from(DEFAULT_BASE_PATH),
            asset_url: None,
            types: BTreeMap::new(),
        }
    }
}

impl ThemeConfig {
    /// Creates an empty configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the single-theme layout: one type with an empty path segment,
    /// so views live directly at `<base>/<theme>/views`.
    pub fn flat(theme: impl Into<String>, base_path: impl Into<PathBuf>) -> Self {
        let theme = theme.into();
        let mut config = Self {
            base_path: base_path.into(),
            default_theme: theme.clone(),
            ..Self::default()
        };
        let flat = ThemeTypeConfig::new("")
            .theme(theme.clone(), ThemeMeta::default())
            .active(theme);
        config.types.insert(config.default_type.clone(), flat);
        config
    }

    /// Parses a configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yaml rejects an empty document for a struct
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&content)?;
        log::debug!(
            "loaded theme config from {} ({} types)",
            path.display(),
            config.types.len()
        );
        Ok(config)
    }

    /// Adds a theme type, returning the updated configuration for chaining.
    pub fn with_type(mut self, id: impl Into<String>, theme_type: ThemeTypeConfig) -> Self {
        self.types.insert(id.into(), theme_type);
        self
    }

    /// Replaces the base path, returning the updated configuration.
    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Applies `<TYPE>_THEME` and `THEME_DEFAULT` overrides.
    ///
    /// `lookup` returns the value of an environment variable; empty values
    /// are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(theme) = non_empty(DEFAULT_THEME_ENV) {
            self.default_theme = theme.trim().to_string();
        }

        for (id, theme_type) in self.types.iter_mut() {
            if let Some(theme) = non_empty(&env_key(id)) {
                log::debug!("theme type [{}] active theme overridden by environment", id);
                theme_type.active = Some(theme.trim().to_string());
            }
        }
    }

    /// Applies overrides from the process environment.
    pub fn apply_process_env(&mut self) {
        self.apply_env_overrides(|key| std::env::var(key).ok());
    }
}

/// Returns the environment variable naming the active theme of a type.
///
/// ```rust
/// assert_eq!(multitheme::env_key("frontend"), "FRONTEND_THEME");
/// assert_eq!(multitheme::env_key("back-office"), "BACK_OFFICE_THEME");
/// ```
pub fn env_key(theme_type: &str) -> String {
    let mut key: String = theme_type
        .chars()
        .map(|c| match c {
            '-' | '.' | ' ' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect();
    key.push_str("_THEME");
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    const SAMPLE: &str = r#"
base_path: /srv/app/resources/themes
types:
  frontend:
    active: default
    path: frontend
    themes:
      default: { name: Default Theme, description: Default frontend theme }
      modern: { name: Modern Theme, description: Modern frontend theme }
  admin:
    path: admin
    themes:
      classic: { name: Classic Admin }
"#;

    // =========================================================================
    // Parsing
    // =========================================================================

    #[test]
    fn test_parse_sample() {
        let config = ThemeConfig::from_yaml_str(SAMPLE).unwrap();

        assert_eq!(config.base_path, PathBuf::from("/srv/app/resources/themes"));
        assert_eq!(config.default_type, DEFAULT_TYPE);
        assert_eq!(config.types.len(), 2);

        let frontend = &config.types["frontend"];
        assert_eq!(frontend.active.as_deref(), Some("default"));
        assert_eq!(frontend.path, "frontend");
        assert_eq!(frontend.themes["modern"].name, "Modern Theme");

        let admin = &config.types["admin"];
        assert_eq!(admin.active, None);
        assert_eq!(admin.themes["classic"].description, "");
    }

    #[test]
    fn test_parse_empty_document() {
        let config = ThemeConfig::from_yaml_str("  \n").unwrap();
        assert_eq!(config, ThemeConfig::default());
        assert_eq!(config.base_path, PathBuf::from(DEFAULT_BASE_PATH));
    }

    #[test]
    fn test_parse_invalid_document() {
        let result = ThemeConfig::from_yaml_str("types: [1, 2");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ThemeConfig::load("/definitely/not/here/themes.yaml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("themes.yaml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = ThemeConfig::load(&path).unwrap();
        assert!(config.types.contains_key("admin"));
    }

    // =========================================================================
    // Builders
    // =========================================================================

    #[test]
    fn test_flat_layout() {
        let config = ThemeConfig::flat("dark", "/themes");

        assert_eq!(config.default_theme, "dark");
        let only = &config.types[DEFAULT_TYPE];
        assert_eq!(only.path, "");
        assert_eq!(only.active.as_deref(), Some("dark"));
        assert!(only.themes.contains_key("dark"));
    }

    #[test]
    fn test_builder_chain() {
        let config = ThemeConfig::new().with_base_path("/t").with_type(
            "admin",
            ThemeTypeConfig::new("admin")
                .theme("classic", ThemeMeta::new("Classic", "Classic admin"))
                .active("classic"),
        );

        assert_eq!(config.base_path, PathBuf::from("/t"));
        assert_eq!(config.types["admin"].active.as_deref(), Some("classic"));
    }

    // =========================================================================
    // Environment overrides
    // =========================================================================

    #[test]
    fn test_env_key() {
        assert_eq!(env_key("frontend"), "FRONTEND_THEME");
        assert_eq!(env_key("admin"), "ADMIN_THEME");
        assert_eq!(env_key("back-office"), "BACK_OFFICE_THEME");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ThemeConfig::from_yaml_str(SAMPLE).unwrap();
        let env: HashMap<&str, &str> = [
            ("FRONTEND_THEME", "modern"),
            ("ADMIN_THEME", "  "),
            ("THEME_DEFAULT", "fallback"),
        ]
        .into_iter()
        .collect();

        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.types["frontend"].active.as_deref(), Some("modern"));
        // Blank values do not override
        assert_eq!(config.types["admin"].active, None);
        assert_eq!(config.default_theme, "fallback");
    }

    #[test]
    #[serial]
    fn test_process_env_overrides() {
        std::env::set_var("FRONTEND_THEME", "modern");
        let mut config = ThemeConfig::from_yaml_str(SAMPLE).unwrap();
        config.apply_process_env();
        std::env::remove_var("FRONTEND_THEME");

        assert_eq!(config.types["frontend"].active.as_deref(), Some("modern"));
    }
}
