//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Sleep-stage timeline editor.
///
/// Replays painting and clearing gestures over a night's sleep stages and
/// prints the saved result.
#[derive(Debug, Parser)]
#[command(name = "slumber", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open a sleep entry, replay gestures on it and print the saved night.
    Edit {
        /// Sleep entry JSON file, or `-` for stdin.
        #[arg(short, long)]
        input: PathBuf,

        /// JSON array of gestures to replay before saving.
        #[arg(short, long)]
        script: Option<PathBuf>,

        /// Output the saved entry as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print per-stage totals for a sleep entry.
    Summary {
        /// Sleep entry JSON file, or `-` for stdin.
        #[arg(short, long)]
        input: PathBuf,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_edit_with_script() {
        let cli = Cli::try_parse_from([
            "slumber", "edit", "--input", "night.json", "--script", "g.json", "--json",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Edit {
                input,
                script,
                json,
            }) => {
                assert_eq!(input, PathBuf::from("night.json"));
                assert_eq!(script, Some(PathBuf::from("g.json")));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn summary_requires_input() {
        assert!(Cli::try_parse_from(["slumber", "summary"]).is_err());
    }
}
