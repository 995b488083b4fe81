//! Template resolution against an ordered list of search paths.
//!
//! # Resolution Rules
//!
//! A template name is looked up in every search path, in order; the first
//! directory that contains a matching file wins. Within one directory, names
//! can be given with or without extension: `"home"` resolves to
//! `home.html`, `home.jinja` or `home.j2` (in that priority), while
//! `"home.html"` resolves to exactly that file.
//!
//! | Priority | Extension |
//! |----------|-----------|
//! | 1 (highest) | `.html` |
//! | 2 | `.jinja` |
//! | 3 (lowest) | `.j2` |
//!
//! Because priority across directories beats priority across extensions, a
//! theme's `home.j2` shadows the application's `home.html` when the theme
//! directory is searched first.
//!
//! # Safety
//!
//! Names are split on `/` and must stay inside the search root: absolute
//! names and `..` segments never resolve.

use std::path::{Path, PathBuf};

use minijinja::{Error, ErrorKind};

/// Recognized template file extensions in priority order.
pub const TEMPLATE_EXTENSIONS: &[&str] = &[".html", ".jinja", ".j2"];

/// Joins a template name onto a search root, rejecting names that would
/// escape it.
pub fn safe_join(root: &Path, name: &str) -> Option<PathBuf> {
    if name.starts_with('/') || name.starts_with('\\') {
        return None;
    }
    let mut path = root.to_path_buf();
    for segment in name.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s if s.contains('\\') => return None,
            s => path.push(s),
        }
    }
    Some(path)
}

/// Returns the file names tried for `name` in one directory, in priority
/// order.
fn candidates(name: &str) -> Vec<String> {
    let mut names = vec![name.to_string()];
    if !TEMPLATE_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
        names.extend(TEMPLATE_EXTENSIONS.iter().map(|ext| format!("{}{}", name, ext)));
    }
    names
}

/// Finds the file a template name resolves to.
///
/// Returns `None` if no search path contains the template.
pub fn resolve_template(paths: &[PathBuf], name: &str) -> Option<PathBuf> {
    let names = candidates(name);
    paths.iter().find_map(|root| {
        names
            .iter()
            .filter_map(|candidate| safe_join(root, candidate))
            .find(|path| path.is_file())
    })
}

/// Loads a template's source, in the shape minijinja's loader expects.
///
/// A missing template is `Ok(None)`; an unreadable file is an error.
pub fn load_template(paths: &[PathBuf], name: &str) -> Result<Option<String>, Error> {
    let Some(path) = resolve_template(paths, name) else {
        log::debug!("template [{}] not found in {} search paths", name, paths.len());
        return Ok(None);
    };
    std::fs::read_to_string(&path).map(Some).map_err(|e| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("failed to read template \"{}\"", path.display()),
        )
        .with_source(e)
    })
}
