//! Request-scoped theme resolution.
//!
//! A [`ThemeResolver`] is created for one unit of work (typically a request),
//! selects a theme type once, and makes sure the active theme's view
//! directory is searched before the application's own views.
//!
//! # Search Path Registration
//!
//! Selecting a type computes `<base>/<segment>/<active>/views`. If that
//! directory exists it is pushed to the front of the engine's search paths,
//! and every other path under the base directory is removed in the same
//! critical section. At most one theme directory is therefore searched at a
//! time, and it always takes priority over non-theme directories.
//!
//! Selecting the same type again is a no-op while the resolver's last
//! `(type, active theme)` is unchanged and its directory still leads the
//! engine's search paths. Otherwise the directory is pushed again, so a
//! resolver that shares its engine with others restores its own theme.
//!
//! A missing directory is not an error: theme directories are still evicted,
//! nothing is pushed, and views fall back to the application's default
//! location.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::error::ThemeError;
use crate::registry::{ThemeRegistry, VIEWS_DIR};
use crate::view::SearchPaths;

/// Public path prefix of theme assets.
pub const ASSET_PREFIX: &str = "themes";

/// Theme values exposed to views rendered for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeContext {
    #[serde(rename = "themeType")]
    pub theme_type: String,
    #[serde(rename = "themeName")]
    pub theme_name: String,
}

/// Resolves theme directories and registers them with a view engine.
pub struct ThemeResolver {
    registry: Arc<ThemeRegistry>,
    engine: Arc<dyn SearchPaths>,
    current_type: Option<String>,
    /// `(type, active theme)` of the last directory this resolver pushed.
    registered: Option<(String, String)>,
}

impl ThemeResolver {
    /// Creates an unselected resolver.
    pub fn new(registry: Arc<ThemeRegistry>, engine: Arc<dyn SearchPaths>) -> Self {
        Self {
            registry,
            engine,
            current_type: None,
            registered: None,
        }
    }

    /// Selects the theme type for this unit of work and registers its view
    /// directory with the engine.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::UnknownThemeType`] if the type is not declared.
    /// The resolver is left exactly as it was.
    pub fn select_type(&mut self, theme_type: &str) -> Result<&mut Self, ThemeError> {
        self.registry.check_type(theme_type)?;
        self.current_type = Some(theme_type.to_string());
        self.register_search_path();
        Ok(self)
    }

    /// Returns the selected type, if any.
    pub fn current_type(&self) -> Option<&str> {
        self.current_type.as_deref()
    }

    /// Resolves an optional type argument: explicit, then selected, then the
    /// registry's default.
    fn effective_type(&self, theme_type: Option<&str>) -> String {
        theme_type
            .or(self.current_type.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| self.registry.default_type())
    }

    /// Returns the active theme of a type (the selected type if `None`).
    pub fn active_theme(&self, theme_type: Option<&str>) -> String {
        self.registry.active_theme(&self.effective_type(theme_type))
    }

    /// Computes `<base>/<segment>/<active>/views` for a type.
    ///
    /// The path is not checked for existence; see
    /// [`directory_exists`](Self::directory_exists).
    pub fn resolve_view_directory(&self, theme_type: Option<&str>) -> PathBuf {
        let theme_type = self.effective_type(theme_type);
        let segment = self.registry.type_path(&theme_type).unwrap_or_default();
        let theme = self.registry.active_theme(&theme_type);
        view_directory(&self.registry.base_path(), &segment, &theme)
    }

    /// Returns true if `path` is an existing directory.
    pub fn directory_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    /// Builds the public path of an asset inside the active theme:
    /// `themes/<segment>/<active>/<relative>`.
    ///
    /// A leading `/` on `relative` is dropped and empty parts are skipped, so
    /// an empty `relative` yields `themes/<segment>/<active>` with no
    /// trailing slash.
    pub fn asset_path(&self, relative: &str, theme_type: Option<&str>) -> String {
        let theme_type = self.effective_type(theme_type);
        let segment = self.registry.type_path(&theme_type).unwrap_or_default();
        let theme = self.registry.active_theme(&theme_type);
        compose_asset_path(&segment, &theme, relative)
    }

    /// Returns the values views need to know which theme they render in.
    pub fn context(&self) -> ThemeContext {
        let theme_type = self.effective_type(None);
        ThemeContext {
            theme_name: self.registry.active_theme(&theme_type),
            theme_type,
        }
    }

    fn register_search_path(&mut self) {
        let Some(theme_type) = self.current_type.clone() else {
            return;
        };
        let theme = self.registry.active_theme(&theme_type);
        let key = (theme_type, theme);
        let directory = self.resolve_view_directory(Some(&key.0));
        if self.registered.as_ref() == Some(&key)
            && self.engine.search_paths().first() == Some(&directory)
        {
            log::debug!("theme [{}/{}] already registered", key.0, key.1);
            return;
        }

        let base = self.registry.base_path();
        if !self.directory_exists(&directory) {
            log::debug!(
                "theme directory {} does not exist; falling back to default views",
                directory.display()
            );
            self.engine.update_search_paths(&mut |paths: &mut Vec<PathBuf>| {
                paths.retain(|p| !p.starts_with(&base));
            });
            self.registered = None;
            return;
        }

        let pushed = directory.clone();
        self.engine.update_search_paths(&mut |paths: &mut Vec<PathBuf>| {
            paths.retain(|p| !p.starts_with(&base));
            paths.insert(0, pushed.clone());
        });
        log::info!("registered theme views {}", directory.display());
        self.registered = Some(key);
    }
}

impl std::fmt::Debug for ThemeResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeResolver")
            .field("current_type", &self.current_type)
            .field("registered", &self.registered)
            .finish_non_exhaustive()
    }
}

/// Joins the view directory of a theme. Empty segments are skipped.
pub fn view_directory(base: &Path, segment: &str, theme: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    for part in [segment, theme, VIEWS_DIR] {
        if !part.is_empty() {
            path.push(part);
        }
    }
    path
}

/// Joins the public path of a theme asset. Empty segments are skipped.
pub(crate) fn compose_asset_path(segment: &str, theme: &str, relative: &str) -> String {
    [ASSET_PREFIX, segment, theme, relative.trim_start_matches('/')]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
