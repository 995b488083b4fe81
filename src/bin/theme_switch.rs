use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use multitheme::cli::{run, SwitchArgs};
use multitheme::{ThemeConfig, ThemeRegistry};

fn main() -> anyhow::Result<ExitCode> {
    let args = SwitchArgs::parse();

    let config = ThemeConfig::load(&args.config)
        .with_context(|| format!("cannot load themes from {}", args.config.display()))?;
    let registry = ThemeRegistry::new(config);

    let code = run(&args, &registry, &mut std::io::stdout().lock())?;
    Ok(ExitCode::from(code))
}
