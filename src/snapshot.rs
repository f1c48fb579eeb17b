//! Snapshot sources.
//!
//! A snapshot is the JSON array served by a worker's
//! `/v1/worker/{nodeId}/thread` endpoint. It can be fetched from the worker
//! directly or read from a file previously saved from that endpoint.

use chrono::{DateTime, Local};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use crate::threads::ThreadRecord;

/// Default timeout for fetching a snapshot from a worker.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Errors raised while obtaining a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to fetch snapshot from {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("worker returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("failed to parse snapshot JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where thread snapshots come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotSource {
    /// JSON file on disk; `-` reads stdin.
    File(PathBuf),
    /// Live worker thread endpoint.
    Worker { base_url: String, node_id: String },
}

impl SnapshotSource {
    /// True for the `-` file source. Stdin can only be read once.
    pub fn is_stdin(&self) -> bool {
        matches!(self, SnapshotSource::File(path) if path.as_os_str() == "-")
    }

    /// URL of a worker's thread endpoint.
    pub fn worker_endpoint(base_url: &str, node_id: &str) -> String {
        format!(
            "{}/v1/worker/{}/thread",
            base_url.trim_end_matches('/'),
            node_id
        )
    }
}

impl fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotSource::File(_) if self.is_stdin() => f.write_str("stdin"),
            SnapshotSource::File(path) => write!(f, "file {}", path.display()),
            SnapshotSource::Worker { base_url, node_id } => {
                f.write_str(&Self::worker_endpoint(base_url, node_id))
            }
        }
    }
}

/// One fetched snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub threads: Vec<ThreadRecord>,
    pub captured_at: DateTime<Local>,
}

/// Parses the worker's JSON payload.
pub fn parse_snapshot(json: &str) -> Result<Vec<ThreadRecord>, SnapshotError> {
    Ok(serde_json::from_str(json)?)
}

/// Fetches snapshots from a configured source. Holds the HTTP client so
/// connections are reused between refreshes.
#[derive(Debug, Clone)]
pub struct SnapshotFetcher {
    source: SnapshotSource,
    client: reqwest::Client,
}

impl SnapshotFetcher {
    pub fn new(source: SnapshotSource, timeout: Duration) -> Result<Self, SnapshotError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SnapshotError::Client)?;
        Ok(Self { source, client })
    }

    pub fn source(&self) -> &SnapshotSource {
        &self.source
    }

    /// Fetches one snapshot. There is no retry; a failed fetch is reported to
    /// the caller as is.
    pub async fn fetch(&self) -> Result<Snapshot, SnapshotError> {
        debug!("Fetching thread snapshot from {}", self.source);

        let body = match &self.source {
            SnapshotSource::File(path) => read_file(path).await?,
            SnapshotSource::Worker { base_url, node_id } => {
                let url = SnapshotSource::worker_endpoint(base_url, node_id);
                self.get(&url).await?
            }
        };

        let threads = parse_snapshot(&body)?;
        info!(
            "Fetched snapshot with {} threads from {}",
            threads.len(),
            self.source
        );

        Ok(Snapshot {
            threads,
            captured_at: Local::now(),
        })
    }

    async fn get(&self, url: &str) -> Result<String, SnapshotError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| SnapshotError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SnapshotError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| SnapshotError::Http {
            url: url.to_string(),
            source,
        })
    }
}

async fn read_file(path: &Path) -> Result<String, SnapshotError> {
    if path.as_os_str() == "-" {
        let mut body = String::new();
        tokio::io::stdin()
            .read_to_string(&mut body)
            .await
            .map_err(|source| SnapshotError::Io {
                path: "stdin".to_string(),
                source,
            })?;
        return Ok(body);
    }

    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_endpoint_trims_trailing_slash() {
        assert_eq!(
            SnapshotSource::worker_endpoint("http://coordinator:8080/", "node-1"),
            "http://coordinator:8080/v1/worker/node-1/thread"
        );
    }

    #[test]
    fn test_source_display() {
        assert_eq!(SnapshotSource::File(PathBuf::from("-")).to_string(), "stdin");
        assert_eq!(
            SnapshotSource::File(PathBuf::from("dump.json")).to_string(),
            "file dump.json"
        );
    }

    #[test]
    fn test_only_dash_is_stdin() {
        assert!(SnapshotSource::File(PathBuf::from("-")).is_stdin());
        assert!(!SnapshotSource::File(PathBuf::from("threads.json")).is_stdin());
        assert!(!SnapshotSource::Worker {
            base_url: "http://coordinator:8080".into(),
            node_id: "-".into(),
        }
        .is_stdin());
    }

    #[test]
    fn test_parse_snapshot_rejects_unknown_state() {
        let err = parse_snapshot(r#"[{"id": 1, "name": "a", "state": "SLEEPING"}]"#).unwrap_err();
        assert!(matches!(err, SnapshotError::Parse(_)));
    }
}
