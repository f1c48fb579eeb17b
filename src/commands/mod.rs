//! CLI command implementations for herakles-thread-inspector.
//!
//! This module provides implementations for all CLI subcommands:
//! - `show`: Print the selected group of one snapshot
//! - `groups`: List groups with thread counts
//! - `config`: Configuration file generation
//! - `generate`: Synthetic snapshot generation

pub mod config;
pub mod generate;
pub mod groups;
pub mod show;

// Re-export command functions
pub use config::command_config;
pub use generate::{command_generate_testdata, SnapshotShape};
pub use groups::command_groups;
pub use show::command_show;
