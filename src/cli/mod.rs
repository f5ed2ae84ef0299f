pub mod commands;
pub mod config;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use crate::task::{SystemDate, TaskKey};

/// Fetch an Advent of Code puzzle description and cache it locally
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Puzzle year (defaults to the current year)
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Puzzle day (defaults to the current day of the month)
    #[arg(short, long)]
    pub day: Option<u32>,

    /// Configuration file to use instead of the default one
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Parse command line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Process the command
pub async fn process_command(cli: Cli) -> Result<()> {
    let config = config::ScraperConfig::load(cli.config.as_deref())?;
    let key = TaskKey::resolve(cli.year, cli.day, &SystemDate);

    info!("Fetching task for {}", key);
    commands::scrape(key, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert()
    }

    #[test]
    fn test_flags_are_optional() {
        let cli = Cli::try_parse_from(["scrape-task"]).unwrap();
        assert_eq!(cli.year, None);
        assert_eq!(cli.day, None);
        assert!(!cli.verbose);

        let cli = Cli::try_parse_from(["scrape-task", "--year", "2023", "--day", "1"]).unwrap();
        assert_eq!(cli.year, Some(2023));
        assert_eq!(cli.day, Some(1));

        assert!(Cli::try_parse_from(["scrape-task", "--day", "first"]).is_err());
    }
}
