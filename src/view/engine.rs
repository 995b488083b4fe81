//! MiniJinja-backed view engine with swappable search paths.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use minijinja::Environment;
use serde::Serialize;

use super::loader::{load_template, resolve_template};
use super::search_paths::{SearchPathList, SearchPaths};
use crate::error::RenderError;

/// Renders named views found through an ordered list of search paths.
///
/// The engine owns a minijinja [`Environment`] whose loader consults the
/// search paths on every cache miss. Whenever the list changes, compiled
/// templates are dropped so the next render picks up the new lookup order.
///
/// # Example
///
/// ```rust,no_run
/// use multitheme::view::ViewEngine;
/// use serde_json::json;
///
/// let engine = ViewEngine::with_paths(vec!["resources/views".into()]);
/// engine.share("app_name", "Shop").unwrap();
///
/// let html = engine.render("home", &json!({ "title": "Welcome" })).unwrap();
/// ```
pub struct ViewEngine {
    paths: SearchPathList,
    env: RwLock<Environment<'static>>,
    shared: RwLock<BTreeMap<String, serde_json::Value>>,
}

impl ViewEngine {
    /// Creates an engine with no search paths.
    pub fn new() -> Self {
        Self::with_paths(Vec::new())
    }

    /// Creates an engine searching `paths` in order.
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        let paths = SearchPathList::from_paths(paths);
        let mut env = Environment::new();
        let loader_paths = paths.clone();
        env.set_loader(move |name: &str| loader_paths.with_paths(|paths| load_template(paths, name)));
        Self {
            paths,
            env: RwLock::new(env),
            shared: RwLock::new(BTreeMap::new()),
        }
    }

    /// Gives mutable access to the environment, e.g. to register filters or
    /// [`register_helpers`](super::register_helpers).
    pub fn configure<F>(&self, f: F)
    where
        F: FnOnce(&mut Environment<'static>),
    {
        let mut env = self.env.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut env);
    }

    /// Makes a value available to every view rendered by this engine.
    pub fn share<V: Serialize>(&self, key: impl Into<String>, value: V) -> Result<(), RenderError> {
        let value = serde_json::to_value(value)?;
        self.shared
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value);
        Ok(())
    }

    /// Returns the file a view name currently resolves to.
    pub fn view_path(&self, name: &str) -> Option<PathBuf> {
        self.paths.with_paths(|paths| resolve_template(paths, name))
    }

    /// Returns true if the view can be found in any search path.
    pub fn exists(&self, name: &str) -> bool {
        self.view_path(name).is_some()
    }

    /// Renders a view with the given data.
    ///
    /// # Errors
    ///
    /// Returns an error if the view is not found, fails to compile, or fails
    /// to render.
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, RenderError> {
        self.render_with_context(name, data, &())
    }

    /// Renders a view with additional per-request context.
    ///
    /// Values are merged in increasing precedence: shared values, then
    /// `context`, then `data`.
    pub fn render_with_context<T, C>(
        &self,
        name: &str,
        data: &T,
        context: &C,
    ) -> Result<String, RenderError>
    where
        T: Serialize,
        C: Serialize,
    {
        let mut combined = self
            .shared
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        merge_object(&mut combined, serde_json::to_value(context)?);
        merge_object(&mut combined, serde_json::to_value(data)?);

        let env = self.env.read().unwrap_or_else(PoisonError::into_inner);
        let tmpl = env.get_template(name)?;
        Ok(tmpl.render(&combined)?)
    }

    fn clear_cache(&self) {
        self.env
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear_templates();
    }
}

impl Default for ViewEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ViewEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewEngine")
            .field("paths", &self.paths.search_paths())
            .finish_non_exhaustive()
    }
}

impl SearchPaths for ViewEngine {
    fn add_search_path(&self, path: PathBuf) {
        self.paths.add_search_path(path);
        self.clear_cache();
    }

    fn search_paths(&self) -> Vec<PathBuf> {
        self.paths.search_paths()
    }

    fn set_search_paths(&self, paths: Vec<PathBuf>) {
        self.paths.set_search_paths(paths);
        self.clear_cache();
    }

    fn update_search_paths(&self, update: &mut dyn FnMut(&mut Vec<PathBuf>)) {
        self.paths.update_search_paths(update);
        self.clear_cache();
    }
}

/// Copies the fields of a JSON object into `target`. Non-object values
/// (unit, scalars, arrays) carry no named fields and are ignored.
fn merge_object(target: &mut BTreeMap<String, serde_json::Value>, value: serde_json::Value) {
    if let serde_json::Value::Object(map) = value {
        target.extend(map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::path::Path;

    fn write(root: &Path, name: &str, content: &str) {
        let path = root.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_render_from_search_path() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "greeting.j2", "Hello, {{ name }}!");

        let engine = ViewEngine::with_paths(vec![dir.path().to_path_buf()]);
        let output = engine.render("greeting", &json!({ "name": "World" })).unwrap();
        assert_eq!(output, "Hello, World!");
    }

    #[test]
    fn test_render_missing_view_errors() {
        let engine = ViewEngine::new();
        let result = engine.render("nope", &());
        assert!(matches!(result, Err(RenderError::Template(_))));
    }

    #[test]
    fn test_includes_resolve_through_search_paths() {
        let theme = tempfile::tempdir().unwrap();
        let app = tempfile::tempdir().unwrap();
        write(app.path(), "page.j2", "[{% include 'partials/nav.j2' %}]");
        write(app.path(), "partials/nav.j2", "app nav");
        write(theme.path(), "partials/nav.j2", "theme nav");

        let engine = ViewEngine::with_paths(vec![
            theme.path().to_path_buf(),
            app.path().to_path_buf(),
        ]);
        assert_eq!(engine.render("page", &()).unwrap(), "[theme nav]");
    }

    #[test]
    fn test_changing_paths_clears_cache() {
        let theme = tempfile::tempdir().unwrap();
        let app = tempfile::tempdir().unwrap();
        write(theme.path(), "home.j2", "theme");
        write(app.path(), "home.j2", "app");

        let engine = ViewEngine::with_paths(vec![app.path().to_path_buf()]);
        assert_eq!(engine.render("home", &()).unwrap(), "app");

        engine.update_search_paths(&mut |paths: &mut Vec<PathBuf>| paths.insert(0, theme.path().to_path_buf()));
        assert_eq!(engine.render("home", &()).unwrap(), "theme");

        engine.set_search_paths(vec![app.path().to_path_buf()]);
        assert_eq!(engine.render("home", &()).unwrap(), "app");
    }

    #[test]
    fn test_merge_precedence() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "vars.j2", "{{ a }}-{{ b }}-{{ c }}");

        let engine = ViewEngine::with_paths(vec![dir.path().to_path_buf()]);
        engine.share("a", "shared").unwrap();
        engine.share("b", "shared").unwrap();
        engine.share("c", "shared").unwrap();

        let output = engine
            .render_with_context("vars", &json!({ "c": "data" }), &json!({ "b": "ctx", "c": "ctx" }))
            .unwrap();
        assert_eq!(output, "shared-ctx-data");
    }

    #[test]
    fn test_view_path_and_exists() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "home.html", "<p>home</p>");

        let engine = ViewEngine::new();
        assert!(!engine.exists("home"));

        engine.add_search_path(dir.path().to_path_buf());
        assert!(engine.exists("home"));
        assert!(engine.view_path("home").unwrap().ends_with("home.html"));
    }

    #[test]
    fn test_configure_registers_filters() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "shout.j2", "{{ word | shout }}");

        let engine = ViewEngine::with_paths(vec![dir.path().to_path_buf()]);
        engine.configure(|env| {
            env.add_filter("shout", |value: String| value.to_uppercase());
        });
        assert_eq!(engine.render("shout", &json!({ "word": "hi" })).unwrap(), "HI");
    }
}
