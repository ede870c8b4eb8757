//! Stitch - a static site pipeline that folds ordered pages into one page per language.

mod build;
mod cli;
mod config;
mod files;
mod init;
mod logger;
mod metadata;
mod pipeline;
mod plugins;
mod utils;

use anyhow::{Result, bail};
use build::{BuildOptions, build_site};
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use init::new_site;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { name } => {
            let root = cli.root.as_deref().unwrap_or(Path::new("./"));
            match name {
                Some(name) => new_site(&root.join(name), true),
                None => new_site(root, false),
            }
        }
        Commands::Build { env, clean, dump } => {
            let config = load_config(&cli)?;
            let options = BuildOptions {
                env: env.clone(),
                clean: *clean,
                dump: *dump,
            };
            build_site(&config, &options).map(|_| ())
        }
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    if !config_path.exists() {
        bail!("Config file not found: {}", config_path.display());
    }

    let mut config = SiteConfig::from_path(&config_path)?;
    config.update_with_cli(cli);
    config.validate()?;

    Ok(config)
}
