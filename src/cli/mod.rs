//! Command-line theme switching.
//!
//! The `theme-switch` binary persists a theme choice by rewriting the
//! `<TYPE>_THEME` entry of the application's environment file. The running
//! application picks the new value up the next time it loads its
//! configuration (see [`ThemeConfig::apply_process_env`]).
//!
//! [`ThemeConfig::apply_process_env`]: crate::ThemeConfig::apply_process_env

pub mod env_file;
mod switch;

pub use env_file::{read_env_var, set_env_var, EnvUpdate};
pub use switch::{run, switch_theme, SwitchArgs, SwitchError, FAILURE, SUCCESS};
