//! Command-line interface definition.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use innerscan_provider::DateRange;

/// innerscan - Fetch and export Health Planet body-composition data
#[derive(Debug, Parser)]
#[command(name = "innerscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    // --- Period flags (pre-seed the interactive session) ---
    /// Fetch the trailing N days (skips the period prompt)
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub days: Option<u32>,

    /// Start of an explicit date range (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,

    /// End of an explicit date range (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,

    // --- Export flags ---
    /// Output file name (defaults to health_data_<timestamp>.csv)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Append the user-profile section to the output file
    #[arg(long)]
    pub with_profile: bool,

    /// Directory that relative output files are written into
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Returns the date range pre-selected via flags, if any.
    pub fn date_range(&self) -> Option<DateRange> {
        if let Some(days) = self.days {
            return Some(DateRange::TrailingDays(days));
        }
        if let (Some(from), Some(to)) = (self.from, self.to) {
            return Some(DateRange::Explicit { from, to });
        }
        None
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the authorization URL and exit (no network call)
    AuthUrl,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Check that credentials can be resolved
    Validate,
    /// Show the credential sources that are consulted
    Sources,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_period_flags() {
        let cli = Cli::parse_from(["innerscan"]);
        assert!(cli.date_range().is_none());
    }

    #[test]
    fn trailing_days_flag() {
        let cli = Cli::parse_from(["innerscan", "--days", "30"]);
        assert_eq!(cli.date_range(), Some(DateRange::TrailingDays(30)));
    }

    #[test]
    fn explicit_range_flags() {
        let cli = Cli::parse_from(["innerscan", "--from", "2025-08-01", "--to", "2025-08-05"]);
        assert_eq!(
            cli.date_range(),
            Some(DateRange::Explicit {
                from: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
                to: NaiveDate::from_ymd_opt(2025, 8, 5).unwrap(),
            })
        );
    }

    #[test]
    fn days_conflicts_with_range() {
        let result = Cli::try_parse_from([
            "innerscan",
            "--days",
            "7",
            "--from",
            "2025-08-01",
            "--to",
            "2025-08-05",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn from_requires_to() {
        let result = Cli::try_parse_from(["innerscan", "--from", "2025-08-01"]);
        assert!(result.is_err());
    }

    #[test]
    fn default_data_dir() {
        let cli = Cli::parse_from(["innerscan"]);
        assert_eq!(cli.data_dir, PathBuf::from("data"));
    }
}
