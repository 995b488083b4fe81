//! Ordered template search paths.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

/// An ordered list of directories a rendering engine searches for templates.
///
/// Order is lookup priority: the first directory containing a template wins.
/// Implementations use interior mutability because the list is shared by
/// every request that renders through the same engine.
pub trait SearchPaths: Send + Sync {
    /// Appends a directory with the lowest priority.
    fn add_search_path(&self, path: PathBuf);

    /// Returns a copy of the current list.
    fn search_paths(&self) -> Vec<PathBuf>;

    /// Replaces the whole list.
    fn set_search_paths(&self, paths: Vec<PathBuf>);

    /// Runs a read-modify-write of the list as one critical section.
    ///
    /// The default implementation is a separate read and write and is only
    /// atomic if the implementor has no other writers.
    fn update_search_paths(&self, update: &mut dyn FnMut(&mut Vec<PathBuf>)) {
        let mut paths = self.search_paths();
        update(&mut paths);
        self.set_search_paths(paths);
    }
}

/// A shareable, lock-guarded [`SearchPaths`] list.
///
/// Clones share the same underlying list.
#[derive(Debug, Clone, Default)]
pub struct SearchPathList {
    inner: Arc<RwLock<Vec<PathBuf>>>,
}

impl SearchPathList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a list with the given directories in priority order.
    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(paths)),
        }
    }

    /// Calls `f` with the current list without copying it.
    pub fn with_paths<R>(&self, f: impl FnOnce(&[PathBuf]) -> R) -> R {
        let paths = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&paths)
    }
}

impl SearchPaths for SearchPathList {
    fn add_search_path(&self, path: PathBuf) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path);
    }

    fn search_paths(&self) -> Vec<PathBuf> {
        self.with_paths(|paths| paths.to_vec())
    }

    fn set_search_paths(&self, paths: Vec<PathBuf>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = paths;
    }

    fn update_search_paths(&self, update: &mut dyn FnMut(&mut Vec<PathBuf>)) {
        let mut paths = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        update(&mut paths);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_appends_lowest_priority() {
        let list = SearchPathList::from_paths(vec![PathBuf::from("/app/views")]);
        list.add_search_path(PathBuf::from("/vendor/views"));

        assert_eq!(
            list.search_paths(),
            vec![PathBuf::from("/app/views"), PathBuf::from("/vendor/views")]
        );
    }

    #[test]
    fn test_clones_share_state() {
        let list = SearchPathList::new();
        let other = list.clone();
        other.set_search_paths(vec![PathBuf::from("/a")]);

        assert_eq!(list.search_paths(), vec![PathBuf::from("/a")]);
    }

    #[test]
    fn test_update_in_place() {
        let list = SearchPathList::from_paths(vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        list.update_search_paths(&mut |paths: &mut Vec<PathBuf>| {
            paths.retain(|p| p != &PathBuf::from("/a"));
            paths.insert(0, PathBuf::from("/c"));
        });

        assert_eq!(
            list.search_paths(),
            vec![PathBuf::from("/c"), PathBuf::from("/b")]
        );
    }

    #[test]
    fn test_concurrent_updates_do_not_lose_writes() {
        let list = SearchPathList::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let list = list.clone();
                std::thread::spawn(move || {
                    for j in 0..50 {
                        list.update_search_paths(&mut |paths: &mut Vec<PathBuf>| {
                            paths.push(PathBuf::from(format!("/{}/{}", i, j)));
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(list.search_paths().len(), 400);
    }
}
