//! Theme registry backed by a [`ThemeConfig`].
//!
//! [`ThemeRegistry`] answers the questions the resolver and the CLI ask about
//! themes: which types exist, which themes a type declares, and which theme
//! is currently active for a type.
//!
//! # Lookup Rules
//!
//! - Unknown types are not an error for read operations: [`list_themes`]
//!   returns an empty map and [`active_theme`] returns the default theme.
//!   Callers that care use [`type_exists`] first.
//! - A type without an `active` entry uses the configuration's
//!   `default_theme` (`"default"` unless overridden).
//! - [`set_active_theme`] is the only mutation. It refuses undeclared themes
//!   and reports that as `false` rather than an error.
//!
//! The registry is shared between requests behind an `Arc`; the active-theme
//! map is guarded by an `RwLock` so activation can happen through `&self`.
//!
//! [`list_themes`]: ThemeRegistry::list_themes
//! [`active_theme`]: ThemeRegistry::active_theme
//! [`type_exists`]: ThemeRegistry::type_exists
//! [`set_active_theme`]: ThemeRegistry::set_active_theme

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use crate::config::{ThemeConfig, ThemeMeta};
use crate::error::ThemeError;

/// Name of the directory inside a theme that holds its templates.
pub const VIEWS_DIR: &str = "views";

/// Registry of theme types and their active themes.
#[derive(Debug)]
pub struct ThemeRegistry {
    config: RwLock<ThemeConfig>,
}

impl ThemeRegistry {
    /// Creates a registry from a loaded configuration.
    ///
    /// Types whose active theme is not declared are accepted (the resolver
    /// will simply not find their directory) but logged as warnings.
    pub fn new(config: ThemeConfig) -> Self {
        let registry = Self {
            config: RwLock::new(config),
        };
        for theme_type in registry.undeclared_active_types() {
            log::warn!(
                "active theme [{}] of type [{}] is not declared",
                registry.active_theme(&theme_type),
                theme_type
            );
        }
        registry
    }

    fn read(&self) -> RwLockReadGuard<'_, ThemeConfig> {
        self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// Returns all declared type identifiers, sorted.
    pub fn list_types(&self) -> Vec<String> {
        self.read().types.keys().cloned().collect()
    }

    /// Returns true if the type is declared.
    pub fn type_exists(&self, theme_type: &str) -> bool {
        self.read().types.contains_key(theme_type)
    }

    /// Returns the type used when none is given.
    pub fn default_type(&self) -> String {
        self.read().default_type.clone()
    }

    /// Returns the directory segment of a type, or `None` if it is unknown.
    pub fn type_path(&self, theme_type: &str) -> Option<String> {
        self.read().types.get(theme_type).map(|t| t.path.clone())
    }

    // =========================================================================
    // Themes
    // =========================================================================

    /// Returns the active theme of a type.
    ///
    /// Falls back to the configured default theme when the type has no
    /// active theme or is not declared at all.
    pub fn active_theme(&self, theme_type: &str) -> String {
        let config = self.read();
        config
            .types
            .get(theme_type)
            .and_then(|t| t.active.clone())
            .unwrap_or_else(|| config.default_theme.clone())
    }

    /// Returns the declared themes of a type, or an empty map if the type
    /// is unknown.
    pub fn list_themes(&self, theme_type: &str) -> BTreeMap<String, ThemeMeta> {
        self.read()
            .types
            .get(theme_type)
            .map(|t| t.themes.clone())
            .unwrap_or_default()
    }

    /// Returns true if `theme` is declared under `theme_type`.
    pub fn theme_exists(&self, theme_type: &str, theme: &str) -> bool {
        self.read()
            .types
            .get(theme_type)
            .is_some_and(|t| t.themes.contains_key(theme))
    }

    /// Makes `theme` the active theme of `theme_type`.
    ///
    /// Returns `false` and changes nothing if the theme is not declared
    /// under the type. The change lives in memory only.
    pub fn set_active_theme(&self, theme_type: &str, theme: &str) -> bool {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let Some(entry) = config.types.get_mut(theme_type) else {
            log::debug!("cannot activate [{}]: unknown type [{}]", theme, theme_type);
            return false;
        };
        if !entry.themes.contains_key(theme) {
            log::debug!(
                "cannot activate [{}]: not declared for type [{}]",
                theme,
                theme_type
            );
            return false;
        }
        entry.active = Some(theme.to_string());
        log::info!("active theme for [{}] set to [{}]", theme_type, theme);
        true
    }

    /// Validates a type/theme pair, describing the alternatives on failure.
    pub fn check(&self, theme_type: &str, theme: &str) -> Result<(), ThemeError> {
        self.check_type(theme_type)?;
        if self.theme_exists(theme_type, theme) {
            Ok(())
        } else {
            Err(ThemeError::UnknownTheme {
                theme_type: theme_type.to_string(),
                theme: theme.to_string(),
                available: self.list_themes(theme_type).into_keys().collect(),
            })
        }
    }

    /// Validates that a type is declared.
    pub fn check_type(&self, theme_type: &str) -> Result<(), ThemeError> {
        if self.type_exists(theme_type) {
            Ok(())
        } else {
            Err(ThemeError::UnknownThemeType {
                theme_type: theme_type.to_string(),
                available: self.list_types(),
            })
        }
    }

    /// Returns the types whose active theme is not among their declared
    /// themes.
    pub fn undeclared_active_types(&self) -> Vec<String> {
        let config = self.read();
        config
            .types
            .iter()
            .filter(|(_, t)| {
                let active = t.active.as_deref().unwrap_or(&config.default_theme);
                !t.themes.contains_key(active)
            })
            .map(|(id, _)| id.clone())
            .collect()
    }

    // =========================================================================
    // Paths
    // =========================================================================

    /// Returns the root directory of all themes.
    pub fn base_path(&self) -> PathBuf {
        self.read().base_path.clone()
    }

    /// Returns the public URL prefix for assets, if configured.
    pub fn asset_url(&self) -> Option<String> {
        self.read().asset_url.clone()
    }

    /// Lists the themes of a type that exist on disk.
    ///
    /// A theme is installed when `<base>/<segment>/<theme>/views` is a
    /// directory. Declared and installed themes are independent: a theme can
    /// be declared but missing on disk, or present on disk but undeclared.
    pub fn installed_themes(&self, theme_type: &str) -> Vec<String> {
        let Some(segment) = self.type_path(theme_type) else {
            return Vec::new();
        };
        let root = self.base_path().join(segment);
        let mut themes = scan_theme_dirs(&root);
        themes.sort();
        themes
    }
}

/// Collects the names of subdirectories of `root` that contain a views
/// directory. Unreadable roots yield nothing.
fn scan_theme_dirs(root: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(root) else {
        return Vec::new();
    };
    entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.join(VIEWS_DIR).is_dir())
        .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect()
}
