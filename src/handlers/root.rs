//! Root endpoint handler for the landing page.
//!
//! This module provides the `/` endpoint handler that lists
//! all available endpoints.

use axum::{extract::State, response::IntoResponse};
use std::fmt::Write as FmtWrite;
use tracing::{debug, instrument};

use crate::handlers::health::FOOTER_TEXT;
use crate::state::SharedState;

/// Handler for the root `/` endpoint.
#[instrument(skip(state))]
pub async fn root_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing / request");
    state.health_stats.record_http_request();

    let version = env!("CARGO_PKG_VERSION");

    let uptime_secs = state.start_time.elapsed().as_secs();
    let hours = uptime_secs / 3600;
    let minutes = (uptime_secs % 3600) / 60;
    let seconds = uptime_secs % 60;

    let mut out = String::new();
    writeln!(out, "HERAKLES THREAD INSPECTOR {version}").ok();
    writeln!(out, "==================================").ok();
    writeln!(out).ok();
    writeln!(out, "Source: {}", state.fetcher.source()).ok();
    writeln!(
        out,
        "Listening on: {}:{}",
        state.config.bind.as_deref().unwrap_or("-"),
        state.config.port.map(|p| p.to_string()).unwrap_or_default()
    )
    .ok();
    writeln!(out, "Uptime: {hours}h {minutes}m {seconds}s").ok();
    writeln!(out).ok();
    writeln!(out, "ENDPOINTS").ok();
    writeln!(out, "{}", "-".repeat(40)).ok();
    writeln!(
        out,
        "  /threads          New snapshot, grouped (?group=<name>&state=<STATE>)"
    )
    .ok();
    writeln!(
        out,
        "  /threads/groups   Group and state counts as JSON (same parameters)"
    )
    .ok();
    writeln!(out, "  /health           Fetch statistics").ok();
    writeln!(out).ok();
    writeln!(out, "{FOOTER_TEXT}").ok();

    ([("Content-Type", "text/plain; charset=utf-8")], out)
}
