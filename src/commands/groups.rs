//! Groups command implementation.
//!
//! Lists the groups of a freshly fetched snapshot with thread counts.

use herakles_thread_inspector::threads::{group_counts, ALL_THREADS, QUERY_THREADS};
use herakles_thread_inspector::{build_view, GroupedThreads, StateFilter};
use std::fmt::Write as FmtWrite;

use crate::commands::show::fetch_snapshot;
use crate::config::Config;

/// Renders the group listing; reserved groups first, then derived groups.
pub fn render_groups(grouped: &GroupedThreads, state: StateFilter) -> String {
    let counts = group_counts(grouped, state);
    let derived = counts
        .iter()
        .filter(|(name, _)| *name != ALL_THREADS && *name != QUERY_THREADS)
        .count();

    let mut out = String::new();
    writeln!(out, "📊 Thread groups (state: {state})").ok();
    writeln!(out, "{}", "─".repeat(50)).ok();
    for (name, count) in &counts {
        writeln!(out, "   {:<40} {:>6}", name, count).ok();
    }
    writeln!(out).ok();
    writeln!(
        out,
        "📋 Total: {} threads in {} derived groups",
        grouped.all_threads().len(),
        derived
    )
    .ok();
    out
}

/// Lists groups with per-group counts under the given state filter.
pub async fn command_groups(
    state: Option<String>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let state: StateFilter = match state {
        Some(s) => s.parse()?,
        None => StateFilter::All,
    };

    let snapshot = fetch_snapshot(config).await?;
    let view = build_view(snapshot.threads);

    println!(
        "🔍 Snapshot at {}",
        snapshot.captured_at.format("%Y-%m-%d %H:%M:%S")
    );
    print!("{}", render_groups(&view.grouped, state));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use herakles_thread_inspector::{group_threads, ThreadRecord, ThreadState};

    #[test]
    fn test_render_groups_counts_derived_groups() {
        let threads = ["a-1", "a-2", "b"]
            .iter()
            .enumerate()
            .map(|(i, name)| ThreadRecord {
                id: i as i64,
                name: name.to_string(),
                state: ThreadState::Runnable,
                lock_owner_id: None,
                stack_trace: Vec::new(),
            })
            .collect();
        let text = render_groups(&group_threads(threads), StateFilter::All);
        assert!(text.contains("Total: 3 threads in 2 derived groups"));
    }
}
