//! In-place editing of `KEY=value` environment files.

use std::io;
use std::path::Path;

/// What [`set_env_var`] did to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvUpdate {
    /// The file did not exist and was created with the key.
    Created,
    /// The key was missing and was appended.
    Appended,
    /// Every existing line for the key was rewritten.
    Replaced,
}

/// Sets `key=value` in the environment file at `path`.
///
/// Lines starting with `key=` are replaced in place; other lines, comments
/// and line endings are kept byte for byte. A missing key is appended on a
/// new line and a missing file is created.
pub fn set_env_var(path: &Path, key: &str, value: &str) -> io::Result<EnvUpdate> {
    let existing = match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(e),
    };

    let (content, update) = match existing {
        None => (format!("{}={}\n", key, value), EnvUpdate::Created),
        Some(content) => upsert(&content, key, value),
    };
    std::fs::write(path, content)?;
    Ok(update)
}

/// Returns `content` with `key` set to `value`.
fn upsert(content: &str, key: &str, value: &str) -> (String, EnvUpdate) {
    let prefix = format!("{}=", key);
    let mut replaced = false;
    let mut out = String::with_capacity(content.len() + prefix.len() + value.len() + 1);

    for line in content.split_inclusive('\n') {
        if line.starts_with(&prefix) {
            let ending = if line.ends_with("\r\n") {
                "\r\n"
            } else if line.ends_with('\n') {
                "\n"
            } else {
                ""
            };
            out.push_str(&prefix);
            out.push_str(value);
            out.push_str(ending);
            replaced = true;
        } else {
            out.push_str(line);
        }
    }

    if replaced {
        return (out, EnvUpdate::Replaced);
    }
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&prefix);
    out.push_str(value);
    out.push('\n');
    (out, EnvUpdate::Appended)
}

/// Reads the value of `key` from an environment file, if present.
pub fn read_env_var(path: &Path, key: &str) -> io::Result<Option<String>> {
    let content = std::fs::read_to_string(path)?;
    let prefix = format!("{}=", key);
    Ok(content
        .lines()
        .filter_map(|line| line.strip_prefix(&prefix))
        .last()
        .map(|v| v.trim().to_string()))
}
