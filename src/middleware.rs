//! Per-request theme selection.
//!
//! [`ThemeMiddleware`] is the glue a web framework calls once per request.
//! It hands out a fresh [`ThemeResolver`] for every request instead of
//! sharing one, so the selected type never leaks between concurrent
//! requests. The only state shared across requests is the registry and the
//! engine's search paths, both of which synchronize internally.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use multitheme::{ThemeConfig, ThemeMiddleware, ThemeRegistry, ViewEngine};
//! use serde_json::json;
//!
//! let registry = Arc::new(ThemeRegistry::new(ThemeConfig::load("config/themes.yaml")?));
//! let engine = Arc::new(ViewEngine::with_paths(vec!["resources/views".into()]));
//! let themes = ThemeMiddleware::new(registry, engine.clone());
//!
//! // In a request handler for an admin route:
//! let resolver = themes.begin_request(Some("admin"))?;
//! let html = engine.render_with_context("dashboard", &json!({}), &resolver.context())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::sync::Arc;

use crate::error::ThemeError;
use crate::registry::ThemeRegistry;
use crate::resolver::ThemeResolver;
use crate::view::SearchPaths;

/// Creates and primes a resolver for each request.
#[derive(Clone)]
pub struct ThemeMiddleware {
    registry: Arc<ThemeRegistry>,
    engine: Arc<dyn SearchPaths>,
}

impl ThemeMiddleware {
    pub fn new(registry: Arc<ThemeRegistry>, engine: Arc<dyn SearchPaths>) -> Self {
        Self { registry, engine }
    }

    /// Returns the shared registry.
    pub fn registry(&self) -> &Arc<ThemeRegistry> {
        &self.registry
    }

    /// Starts a request: creates a resolver and selects `theme_type`, or the
    /// configured default type when the route does not name one.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::UnknownThemeType`] if the type is not declared.
    pub fn begin_request(&self, theme_type: Option<&str>) -> Result<ThemeResolver, ThemeError> {
        let theme_type = theme_type
            .map(str::to_string)
            .unwrap_or_else(|| self.registry.default_type());
        let mut resolver = ThemeResolver::new(self.registry.clone(), self.engine.clone());
        resolver.select_type(&theme_type)?;
        Ok(resolver)
    }
}

impl std::fmt::Debug for ThemeMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeMiddleware")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
