//! Application state management for the inspector server.
//!
//! This module defines the shared application state that is passed
//! to HTTP handlers.

use chrono::{DateTime, Local};
use herakles_thread_inspector::{build_view, SnapshotError, SnapshotFetcher, ThreadView};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

use crate::config::Config;
use crate::health_stats::HealthStats;

/// Type alias for shared application state.
pub type SharedState = Arc<AppState>;

/// Global application state shared across requests.
pub struct AppState {
    pub config: Arc<Config>,
    pub fetcher: SnapshotFetcher,
    pub health_stats: Arc<HealthStats>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Fetches a fresh snapshot and builds its default view. Every request
    /// gets its own view; nothing is shared between refreshes.
    pub async fn fresh_view(&self) -> Result<(DateTime<Local>, ThreadView), SnapshotError> {
        let started = Instant::now();
        match self.fetcher.fetch().await {
            Ok(snapshot) => {
                self.health_stats.record_fetch_success(
                    started.elapsed().as_secs_f64(),
                    snapshot.threads.len(),
                );
                Ok((snapshot.captured_at, build_view(snapshot.threads)))
            }
            Err(e) => {
                warn!("Snapshot fetch from {} failed: {}", self.fetcher.source(), e);
                self.health_stats.record_fetch_failure();
                Err(e)
            }
        }
    }
}
