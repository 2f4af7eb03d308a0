//! Command-line interface definitions.
//!
//! Every path option can also come from the environment, so scheduled
//! jobs can be configured without flags.

use clap::{Args, Parser, Subcommand};
use contest_harvest::context::ContextOptions;

/// Scrape contest listings into normalized contest records.
///
/// # Examples
///
/// ```sh
/// # Debug run: human-readable dump on stdout
/// contest_harvest run codeforces --rid -1
///
/// # Backfill one site into ./reports/atcoder.json
/// contest_harvest run atcoder --full-list -o ./reports
///
/// # Every site, per-site settings from a config file
/// contest_harvest --config harvest.yaml all -o ./reports
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, global = true, env = "CONTEST_HARVEST_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the available adapters
    List,

    /// Run one adapter
    Run {
        /// Adapter name, as printed by `list`
        adapter: String,

        #[command(flatten)]
        context: ContextArgs,

        /// Directory for the JSON report
        #[arg(short, long, env = "CONTEST_HARVEST_OUTPUT")]
        output: Option<String>,
    },

    /// Run every adapter with its configured context
    All {
        /// Directory for the JSON reports
        #[arg(short, long, env = "CONTEST_HARVEST_OUTPUT")]
        output: Option<String>,

        /// How many adapters run at once
        #[arg(long, default_value_t = 4)]
        parallel: usize,

        /// Backfill history on every site
        #[arg(long)]
        full_list: bool,
    },
}

/// Run context overrides.
#[derive(Args, Debug, Default)]
pub struct ContextArgs {
    /// Listing URL to start from
    #[arg(long)]
    pub url: Option<String>,

    /// Host the records are attributed to
    #[arg(long)]
    pub host: Option<String>,

    /// Resource id; -1 turns on the debug dump
    #[arg(long, allow_hyphen_values = true)]
    pub rid: Option<i64>,

    /// Preferred page language
    #[arg(long = "lang")]
    pub language: Option<String>,

    /// Zone for times without an explicit offset
    #[arg(long)]
    pub timezone: Option<String>,

    /// Backfill history instead of a routine refresh
    #[arg(long)]
    pub full_list: bool,
}

impl From<ContextArgs> for ContextOptions {
    fn from(args: ContextArgs) -> Self {
        ContextOptions {
            url: args.url,
            host: args.host,
            rid: args.rid,
            language: args.language,
            timezone: args.timezone,
            full_list: args.full_list,
            today: None,
        }
    }
}
