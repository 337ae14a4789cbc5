//! Command-line arguments. With no subcommand fintrack opens the TUI.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// fintrack - track expenses kept by a remote expense service
#[derive(Parser)]
#[command(name = "fintrack")]
#[command(about = "Terminal personal finance tracker", long_about = None)]
#[command(version)]
pub(crate) struct Cli {
    /// Base URL of the expense service (overrides config and FINTRACK_API_URL)
    #[arg(long, global = true)]
    pub(crate) api_url: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub(crate) config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List expenses, newest first (defaults to the current month)
    List {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Print totals and the category breakdown
    Summary {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Add an expense
    Add {
        /// Date (YYYY-MM-DD)
        date: String,

        /// Amount, e.g. 250 or 1,250.50
        amount: String,

        /// Description; the first word is the category
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },

    /// Replace an existing expense
    Update {
        id: i64,

        /// Date (YYYY-MM-DD)
        date: String,

        amount: String,

        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },

    /// Delete an expense
    Delete { id: i64 },

    /// Server-side total for a date range, checked against the local sum
    Total {
        #[arg(long)]
        from: NaiveDate,

        #[arg(long)]
        to: NaiveDate,
    },

    /// Check that the expense service is reachable
    Status,
}

#[derive(clap::Args, Debug, Clone, Copy)]
pub(crate) struct RangeArgs {
    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) to: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("fintrack").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_subcommand_means_tui() {
        let cli = parse(&[]);
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_list_with_range() {
        let cli = parse(&["list", "--from", "2024-01-01", "--to", "2024-01-31"]);
        match cli.command {
            Some(Commands::List { range }) => {
                assert_eq!(range.from, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert_eq!(range.to, NaiveDate::from_ymd_opt(2024, 1, 31));
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_add_joins_description_words() {
        let cli = parse(&["add", "2024-01-05", "12.50", "food", "lunch"]);
        match cli.command {
            Some(Commands::Add {
                date,
                amount,
                description,
            }) => {
                assert_eq!(date, "2024-01-05");
                assert_eq!(amount, "12.50");
                assert_eq!(description.join(" "), "food lunch");
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["status", "--api-url", "http://example:9000", "-v"]);
        assert_eq!(cli.api_url.as_deref(), Some("http://example:9000"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_total_requires_both_bounds() {
        let args = ["fintrack", "total", "--from", "2024-01-01"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_bad_date_rejected() {
        let args = ["fintrack", "list", "--from", "2024-02-30"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
