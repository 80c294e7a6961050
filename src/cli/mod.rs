//! CLI module for Electronics Universe
//!
//! Without a subcommand the binary opens the window. Subcommands inspect the
//! configuration and the scoring rules, or drive a session from a shell.

mod commands;
mod output;
mod shell;

use clap::{Parser, Subcommand};

pub use output::OutputFormat;

/// Electronics Universe - a guided tour of four electronic components
#[derive(Parser, Debug)]
#[command(name = "electronics-universe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[command(flatten)]
    pub output: OutputOptions,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output formatting options
#[derive(Parser, Debug, Clone)]
pub struct OutputOptions {
    /// Output in JSON format (for machine parsing)
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl OutputOptions {
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: commands::config::ConfigCommands,
    },

    /// Evaluate the star and rank rules
    Score {
        #[command(subcommand)]
        command: commands::score::ScoreCommands,
    },

    /// List the four stages
    Stages,

    /// Interactive shell that plays through a session
    Shell,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let format = cli.output.format();
    let quiet = cli.output.quiet;

    match cli.command {
        Some(Commands::Config { command }) => commands::config::run(command, format, quiet),
        Some(Commands::Score { command }) => commands::score::run(command, format),
        Some(Commands::Stages) => commands::stages::run(format),
        Some(Commands::Shell) => shell::run(format),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_gui() {
        let cli = Cli::try_parse_from(["electronics-universe"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.output.format(), OutputFormat::Text);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["electronics-universe", "score", "rank", "9", "--json"])
            .unwrap();
        assert_eq!(cli.output.format(), OutputFormat::Json);
        assert!(matches!(cli.command, Some(Commands::Score { .. })));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
