//! Show command implementation.
//!
//! Fetches one snapshot and prints the selected group.

use herakles_thread_inspector::render::{render_view, UNAVAILABLE_TEXT};
use herakles_thread_inspector::snapshot::{Snapshot, SnapshotFetcher, DEFAULT_FETCH_TIMEOUT_SECS};
use herakles_thread_inspector::{build_view, StateFilter, ThreadView};
use std::time::Duration;
use tracing::debug;

use crate::config::{require_snapshot_source, Config};

/// Fetches a snapshot from the configured source.
pub async fn fetch_snapshot(config: &Config) -> Result<Snapshot, Box<dyn std::error::Error>> {
    let source = require_snapshot_source(config)?;
    let timeout = config
        .fetch_timeout_secs
        .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);
    let fetcher = SnapshotFetcher::new(source, Duration::from_secs(timeout))?;

    match fetcher.fetch().await {
        Ok(snapshot) => Ok(snapshot),
        Err(e) => {
            eprintln!("❌ {UNAVAILABLE_TEXT}");
            Err(e.into())
        }
    }
}

/// Applies `--group`/`--state` on top of the default selection.
pub fn apply_selection(
    view: &mut ThreadView,
    group: Option<&str>,
    state: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(state) = state {
        let state: StateFilter = state.parse()?;
        view.select_state(state);
    }
    if let Some(group) = group {
        view.select_group(group)?;
    }
    Ok(())
}

/// Prints the selected group of a freshly fetched snapshot.
pub async fn command_show(
    group: Option<String>,
    state: Option<String>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = fetch_snapshot(config).await?;
    let mut view = build_view(snapshot.threads);

    debug!(
        "Default selection: group='{}' state={}",
        view.selection.group, view.selection.state
    );

    apply_selection(&mut view, group.as_deref(), state.as_deref())?;

    print!("{}", render_view(&view, snapshot.captured_at)?);
    Ok(())
}
