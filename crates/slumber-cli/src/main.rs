use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use slumber_cli::commands::{edit, read_entry, summary};
use slumber_cli::{Cli, Commands, Config};

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // try_init: tests may have installed a subscriber already
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Edit {
            input,
            script,
            json,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            let entry = read_entry(input)?;
            let gestures = match script {
                Some(path) => edit::read_script(path)?,
                None => Vec::new(),
            };
            let mut stdout = std::io::stdout().lock();
            edit::run(&mut stdout, entry, &gestures, &config, *json)?;
        }
        Some(Commands::Summary { input, json }) => {
            let entry = read_entry(input)?;
            let mut stdout = std::io::stdout().lock();
            summary::run(&mut stdout, entry, *json)?;
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
