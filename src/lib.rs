//! # Multitheme - per-request view theme switching
//!
//! `multitheme` lets a web application choose, per request, which directory
//! of view templates is searched first. Themes are grouped by *type* (for
//! example `frontend` and `admin`), each type has one active theme, and the
//! active theme's `views` directory is pushed to the front of the rendering
//! engine's search paths.
//!
//! ## Layout
//!
//! ```text
//! resources/themes/
//!   frontend/
//!     default/views/home.html
//!     modern/views/home.html
//!   admin/
//!     classic/views/dashboard.html
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use multitheme::{ThemeConfig, ThemeMeta, ThemeMiddleware, ThemeRegistry, ThemeTypeConfig, ViewEngine};
//!
//! let config = ThemeConfig::new().with_type(
//!     "frontend",
//!     ThemeTypeConfig::new("frontend")
//!         .theme("default", ThemeMeta::new("Default Theme", ""))
//!         .theme("modern", ThemeMeta::new("Modern Theme", ""))
//!         .active("default"),
//! );
//! let registry = Arc::new(ThemeRegistry::new(config));
//! let engine = Arc::new(ViewEngine::with_paths(vec!["resources/views".into()]));
//! let themes = ThemeMiddleware::new(registry.clone(), engine.clone());
//!
//! let resolver = themes.begin_request(Some("frontend")).unwrap();
//! assert_eq!(
//!     resolver.resolve_view_directory(None),
//!     std::path::Path::new("resources/themes/frontend/default/views"),
//! );
//!
//! assert!(registry.set_active_theme("frontend", "modern"));
//! assert!(!registry.set_active_theme("frontend", "nonexistent"));
//! assert_eq!(resolver.active_theme(None), "modern");
//! ```
//!
//! ## Modules
//!
//! - [`config`]: YAML configuration and environment overrides
//! - [`registry`]: declared types, themes and activation
//! - [`resolver`]: request-scoped directory resolution and search-path registration
//! - [`middleware`]: per-request resolver creation
//! - [`view`]: search paths and the minijinja view engine
//! - [`cli`]: the `theme-switch` command

pub mod cli;
pub mod config;
mod error;
pub mod middleware;
pub mod registry;
pub mod resolver;
pub mod view;

pub use config::{env_key, ThemeConfig, ThemeMeta, ThemeTypeConfig, DEFAULT_THEME, DEFAULT_TYPE};
pub use error::{ConfigError, RenderError, ThemeError};
pub use middleware::ThemeMiddleware;
pub use registry::ThemeRegistry;
pub use resolver::{ThemeContext, ThemeResolver};
pub use view::{register_helpers, SearchPathList, SearchPaths, ViewEngine};
