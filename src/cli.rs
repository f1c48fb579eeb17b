//! CLI arguments and subcommands for herakles-thread-inspector.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::net::IpAddr;
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Name as written in config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "herakles-thread-inspector",
    about = "Groups and filters worker thread snapshots",
    long_about = "Groups and filters worker thread snapshots.\n\n\
                  Fetches a thread snapshot from a worker's /v1/worker/{nodeId}/thread endpoint \
                  (or a saved JSON file), groups threads into running queries, worker pools and \
                  singletons by name, and shows the selected group filtered by thread state.",
    author = "Michael Moll <exporter@herakles.now> - Herakles",
    version = "0.1.0",
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// HTTP listen port
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Bind to specific interface/IP
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Log level (overrides the config file; default: info)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Read the snapshot from a JSON file ("-" for stdin)
    #[arg(short = 'f', long, conflicts_with = "worker_url")]
    pub snapshot_file: Option<PathBuf>,

    /// Base URL of the server exposing /v1/worker/{nodeId}/thread
    #[arg(short = 'u', long)]
    pub worker_url: Option<String>,

    /// Worker node id used with --worker-url
    #[arg(short = 'n', long)]
    pub node_id: Option<String>,

    /// Timeout for fetching a snapshot, in seconds
    #[arg(long)]
    pub fetch_timeout_secs: Option<u64>,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one snapshot and print the selected group
    Show {
        /// Group to show (default: Running Queries if any, else All Threads)
        #[arg(short = 'g', long)]
        group: Option<String>,

        /// Thread state filter (ALL, RUNNABLE, BLOCKED, WAITING, TIMED_WAITING, NEW, TERMINATED)
        #[arg(short = 's', long)]
        state: Option<String>,
    },

    /// Fetch one snapshot and list its groups with thread counts
    Groups {
        /// Count only threads in this state
        #[arg(short = 's', long)]
        state: Option<String>,
    },

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },

    /// Generate a synthetic thread snapshot JSON file
    GenerateTestdata {
        /// Output file path
        #[arg(short = 'o', long, default_value = "threads.json")]
        output: PathBuf,

        /// Number of running query threads
        #[arg(long, default_value_t = 8)]
        query_threads: usize,

        /// Number of worker pools
        #[arg(long, default_value_t = 4)]
        pools: usize,

        /// Threads per worker pool
        #[arg(long, default_value_t = 6)]
        pool_size: usize,

        /// Number of threads without an instance number
        #[arg(long, default_value_t = 5)]
        singletons: usize,
    },
}
