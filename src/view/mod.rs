//! View rendering with theme-aware template lookup.
//!
//! This module provides:
//!
//! - [`SearchPaths`]: the ordered directory list a rendering engine consults
//! - [`SearchPathList`]: a shareable, lock-guarded implementation
//! - [`ViewEngine`]: a minijinja environment that loads views through its
//!   search paths
//! - [`register_helpers`]: template functions for theme assets

mod engine;
mod helpers;
pub mod loader;
mod search_paths;

pub use engine::ViewEngine;
pub use helpers::register_helpers;
pub use loader::TEMPLATE_EXTENSIONS;
pub use search_paths::{SearchPathList, SearchPaths};
