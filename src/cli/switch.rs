//! The `theme-switch` command.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use console::style;
use thiserror::Error;

use super::env_file::{set_env_var, EnvUpdate};
use crate::config::env_key;
use crate::error::ThemeError;
use crate::registry::ThemeRegistry;

/// Exit code for a successful switch.
pub const SUCCESS: u8 = 0;

/// Exit code for an invalid type or theme, or an unwritable env file.
pub const FAILURE: u8 = 1;

/// Switch the active theme for a given type.
#[derive(Debug, Clone, Parser)]
#[command(name = "theme-switch", version)]
pub struct SwitchArgs {
    /// The theme type (frontend, admin, etc.)
    #[arg(value_name = "TYPE")]
    pub theme_type: String,

    /// The theme name to switch to
    pub theme: String,

    /// Theme configuration file
    #[arg(long, value_name = "PATH", default_value = "config/themes.yaml")]
    pub config: PathBuf,

    /// Environment file receiving the `<TYPE>_THEME` entry
    #[arg(long, value_name = "PATH", default_value = ".env")]
    pub env_file: PathBuf,
}

/// Errors that stop a switch.
#[derive(Debug, Error)]
pub enum SwitchError {
    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error("failed to update \"{}\": {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Validates the pair, persists it to the env file, and activates it in the
/// registry.
///
/// Nothing is written when the type or theme is not declared.
pub fn switch_theme(
    registry: &ThemeRegistry,
    theme_type: &str,
    theme: &str,
    env_file: &Path,
) -> Result<EnvUpdate, SwitchError> {
    registry.check(theme_type, theme)?;

    let update = set_env_var(env_file, &env_key(theme_type), theme).map_err(|source| {
        SwitchError::EnvFile {
            path: env_file.to_path_buf(),
            source,
        }
    })?;
    registry.set_active_theme(theme_type, theme);
    Ok(update)
}

/// Runs the command, reporting to `out`, and returns the process exit code.
pub fn run(args: &SwitchArgs, registry: &ThemeRegistry, out: &mut dyn Write) -> io::Result<u8> {
    match switch_theme(registry, &args.theme_type, &args.theme, &args.env_file) {
        Ok(_) => {
            writeln!(
                out,
                "{}",
                style(format!(
                    "Theme switched to [{}] for type [{}]",
                    args.theme, args.theme_type
                ))
                .green()
            )?;
            writeln!(
                out,
                "{}",
                style("Restart the application to load the new theme.").yellow()
            )?;
            Ok(SUCCESS)
        }
        Err(SwitchError::Theme(err)) => {
            let label = match err {
                ThemeError::UnknownThemeType { .. } => "Available types",
                ThemeError::UnknownTheme { .. } => "Available themes",
            };
            writeln!(out, "{}", style(capitalize(&err.to_string())).red())?;
            writeln!(out, "{}: {}", label, err.available().join(", "))?;
            Ok(FAILURE)
        }
        Err(err) => {
            writeln!(out, "{}", style(err.to_string()).red())?;
            Ok(FAILURE)
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
