//! Error types for theme configuration and resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving or switching themes.
///
/// Only an unknown theme type is a hard failure for the resolver. Activating
/// an undeclared theme through [`ThemeRegistry::set_active_theme`] returns
/// `false` instead; [`ThemeError::UnknownTheme`] exists for callers (such as
/// the CLI) that want to turn that into a reportable error.
///
/// [`ThemeRegistry::set_active_theme`]: crate::ThemeRegistry::set_active_theme
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThemeError {
    /// The theme type is not declared in the configuration.
    #[error("theme type [{theme_type}] is not defined in config")]
    UnknownThemeType {
        theme_type: String,
        /// Declared types, sorted.
        available: Vec<String>,
    },

    /// The theme is not declared under the given type.
    #[error("theme [{theme}] does not exist for type [{theme_type}]")]
    UnknownTheme {
        theme_type: String,
        theme: String,
        /// Declared themes for the type, sorted.
        available: Vec<String>,
    },
}

impl ThemeError {
    /// Returns the identifiers the caller could have used instead.
    pub fn available(&self) -> &[String] {
        match self {
            ThemeError::UnknownThemeType { available, .. } => available,
            ThemeError::UnknownTheme { available, .. } => available,
        }
    }
}

/// Errors raised while loading a theme configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read theme config \"{}\": {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML or does not match the schema.
    #[error("invalid theme config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Errors raised while rendering a view.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template lookup, compilation or evaluation failed.
    #[error(transparent)]
    Template(#[from] minijinja::Error),

    /// The view data could not be converted into a template context.
    #[error("failed to serialize view data: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_display() {
        let err = ThemeError::UnknownThemeType {
            theme_type: "mobile".to_string(),
            available: vec!["frontend".to_string(), "admin".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("[mobile]"));
        assert_eq!(err.available(), ["frontend", "admin"]);
    }

    #[test]
    fn test_unknown_theme_display() {
        let err = ThemeError::UnknownTheme {
            theme_type: "frontend".to_string(),
            theme: "retro".to_string(),
            available: vec!["default".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("[retro]"));
        assert!(msg.contains("[frontend]"));
    }

    #[test]
    fn test_config_read_error_mentions_path() {
        let err = ConfigError::Read {
            path: PathBuf::from("/etc/themes.yaml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/etc/themes.yaml"));
    }
}
