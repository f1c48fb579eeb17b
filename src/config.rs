//! Configuration management for herakles-thread-inspector.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use herakles_thread_inspector::snapshot::DEFAULT_FETCH_TIMEOUT_SECS;
use herakles_thread_inspector::SnapshotSource;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use crate::cli::{Args, ConfigFormat};

// Default configuration constants
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 9216;

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Effective configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub port: Option<u16>,
    pub bind: Option<String>,

    // Snapshot source
    #[serde(alias = "snapshot-file")]
    pub snapshot_file: Option<PathBuf>,
    #[serde(alias = "worker-url")]
    pub worker_url: Option<String>,
    #[serde(alias = "node-id")]
    pub node_id: Option<String>,
    #[serde(alias = "fetch-timeout-secs")]
    pub fetch_timeout_secs: Option<u64>,

    // Logging
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: Some(DEFAULT_BIND_ADDR.to_string()),
            port: Some(DEFAULT_PORT),
            snapshot_file: None,
            worker_url: None,
            node_id: None,
            fetch_timeout_secs: Some(DEFAULT_FETCH_TIMEOUT_SECS),
            log_level: Some("info".into()),
        }
    }
}

impl Config {
    /// Snapshot source described by this config, if one is fully configured.
    pub fn snapshot_source(&self) -> Option<SnapshotSource> {
        if let Some(path) = &self.snapshot_file {
            return Some(SnapshotSource::File(path.clone()));
        }
        match (&self.worker_url, &self.node_id) {
            (Some(base_url), Some(node_id)) => Some(SnapshotSource::Worker {
                base_url: base_url.clone(),
                node_id: node_id.clone(),
            }),
            _ => None,
        }
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if cfg.snapshot_file.is_some() && cfg.worker_url.is_some() {
        return Err("Both snapshot_file and worker_url are set, choose one source".into());
    }

    if let Some(url) = cfg.worker_url.as_deref() {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(
                format!("Invalid worker_url '{}', expected http:// or https://", url).into(),
            );
        }
        if cfg.node_id.as_deref().map_or(true, |n| n.trim().is_empty()) {
            return Err("worker_url is set but node_id is missing".into());
        }
    }

    if cfg.fetch_timeout_secs == Some(0) {
        return Err("fetch_timeout_secs must be greater than 0".into());
    }

    if let Some(level) = cfg.log_level.as_deref() {
        if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level '{}', expected one of {}",
                level,
                LOG_LEVELS.join(", ")
            )
            .into());
        }
    }

    Ok(())
}

/// Returns the configured snapshot source or an error describing what is missing.
pub fn require_snapshot_source(
    cfg: &Config,
) -> Result<SnapshotSource, Box<dyn std::error::Error>> {
    cfg.snapshot_source().ok_or_else(|| {
        "No snapshot source configured: set --snapshot-file, or --worker-url and --node-id".into()
    })
}

/// Snapshot source for server mode. Every request refetches, so stdin is refused.
pub fn require_server_source(cfg: &Config) -> Result<SnapshotSource, Box<dyn std::error::Error>> {
    let source = require_snapshot_source(cfg)?;
    if source.is_stdin() {
        return Err(
            "Server mode cannot read snapshots from stdin; use a snapshot file or --worker-url"
                .into(),
        );
    }
    Ok(source)
}

/// Maximum tracing level for the configured log level; `None` disables logging.
pub fn tracing_level(cfg: &Config) -> Option<Level> {
    let level = cfg.log_level.as_deref().unwrap_or("info");
    match level.to_ascii_lowercase().as_str() {
        "off" => None,
        "error" => Some(Level::ERROR),
        "warn" => Some(Level::WARN),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => Some(Level::INFO),
    }
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(bind_ip) = args.bind {
        config.bind = Some(bind_ip.to_string());
    }
    if let Some(cli_port) = args.port {
        config.port = Some(cli_port);
    }

    // Picking one source on the CLI replaces whatever the file configured.
    if let Some(path) = &args.snapshot_file {
        config.snapshot_file = Some(path.clone());
        config.worker_url = None;
    }
    if let Some(url) = &args.worker_url {
        config.worker_url = Some(url.clone());
        config.snapshot_file = None;
    }
    if let Some(node_id) = &args.node_id {
        config.node_id = Some(node_id.clone());
    }
    if let Some(timeout) = args.fetch_timeout_secs {
        config.fetch_timeout_secs = Some(timeout);
    }

    if let Some(level) = args.log_level {
        config.log_level = Some(level.as_str().to_string());
    }

    Ok(config)
}

/// Configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let defaults = [
                "/etc/herakles/thread-inspector.yaml",
                "/etc/herakles/thread-inspector.yml",
                "/etc/herakles/thread-inspector.json",
                "./herakles-thread-inspector.yaml",
                "./herakles-thread-inspector.yml",
                "./herakles-thread-inspector.json",
            ];

            match defaults.iter().find(|p| Path::new(p).exists()) {
                Some(p) => PathBuf::from(p),
                None => return Ok(Config::default()),
            }
        }
    };

    if !path.exists() {
        return Err(format!("Config file not found: {}", path.display()).into());
    }

    let content = fs::read_to_string(&path)?;
    let config = parse_config(&content, path.extension().and_then(|s| s.to_str()))?;
    info!("Loaded configuration from: {}", path.display());
    Ok(config)
}

/// Parses config content; the extension picks the format, YAML by default.
pub fn parse_config(
    content: &str,
    extension: Option<&str>,
) -> Result<Config, Box<dyn std::error::Error>> {
    let config: Config = match extension {
        Some("json") => serde_json::from_str(content)?,
        Some("toml") => toml::from_str(content)?,
        _ => serde_yaml::from_str(content)?,
    };
    Ok(config)
}

/// Renders configuration in the requested format
pub fn format_config(
    config: &Config,
    format: &ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(output)
}

/// Shows configuration in requested format
pub fn show_config(
    config: &Config,
    format: ConfigFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", format_config(config, &format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(validate_effective_config(&config).is_ok());
        assert!(config.snapshot_source().is_none());
    }

    #[test]
    fn test_worker_url_requires_node_id() {
        let config = Config {
            worker_url: Some("http://coordinator:8080".into()),
            ..Config::default()
        };
        assert!(validate_effective_config(&config).is_err());
    }

    #[test]
    fn test_rejects_non_http_worker_url() {
        let config = Config {
            worker_url: Some("ftp://coordinator".into()),
            node_id: Some("node-1".into()),
            ..Config::default()
        };
        assert!(validate_effective_config(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config = Config {
            fetch_timeout_secs: Some(0),
            ..Config::default()
        };
        assert!(validate_effective_config(&config).is_err());
    }

    #[test]
    fn test_parse_yaml_with_dashed_keys() {
        let config = parse_config(
            "worker-url: http://coordinator:8080\nnode-id: node-7\nport: 9300\n",
            Some("yaml"),
        )
        .unwrap();
        assert_eq!(config.port, Some(9300));
        assert_eq!(
            config.snapshot_source(),
            Some(SnapshotSource::Worker {
                base_url: "http://coordinator:8080".into(),
                node_id: "node-7".into(),
            })
        );
    }

    #[test]
    fn test_parse_toml_snapshot_file() {
        let config = parse_config("snapshot_file = \"dump.json\"\n", Some("toml")).unwrap();
        assert_eq!(
            config.snapshot_source(),
            Some(SnapshotSource::File(PathBuf::from("dump.json")))
        );
    }

    #[test]
    fn test_format_config_round_trips_through_json() {
        let text = format_config(&Config::default(), &ConfigFormat::Json).unwrap();
        let parsed = parse_config(&text, Some("json")).unwrap();
        assert_eq!(parsed.port, Some(DEFAULT_PORT));
    }

    #[test]
    fn test_file_log_level_survives_without_cli_flag() {
        let file = config_file("log_level: debug\n");
        let path = file.path().to_str().unwrap();

        let args = Args::parse_from(["herakles-thread-inspector", "-c", path]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(tracing_level(&config), Some(Level::DEBUG));

        let args =
            Args::parse_from(["herakles-thread-inspector", "-c", path, "--log-level", "warn"]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("warn"));
        assert_eq!(tracing_level(&config), Some(Level::WARN));
    }

    #[test]
    fn test_log_level_off_disables_logging() {
        let config = Config {
            log_level: Some("OFF".into()),
            ..Config::default()
        };
        assert_eq!(tracing_level(&config), None);
        assert_eq!(tracing_level(&Config::default()), Some(Level::INFO));
    }

    #[test]
    fn test_server_mode_refuses_stdin() {
        let stdin = Config {
            snapshot_file: Some(PathBuf::from("-")),
            ..Config::default()
        };
        assert!(require_snapshot_source(&stdin).is_ok());
        assert!(require_server_source(&stdin).is_err());

        let file = Config {
            snapshot_file: Some(PathBuf::from("threads.json")),
            ..Config::default()
        };
        assert_eq!(
            require_server_source(&file).unwrap(),
            SnapshotSource::File(PathBuf::from("threads.json"))
        );
    }
}
