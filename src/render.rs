//! Plain-text and JSON presentation of a grouped snapshot.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt::Write as FmtWrite;

use crate::threads::{
    group_counts, state_counts, FilterError, StateFilter, ThreadRecord, ThreadView, ALL_THREADS,
};

/// Shown when the snapshot source failed.
pub const UNAVAILABLE_TEXT: &str = "Thread snapshot could not be loaded";

/// Message shown when the current selection matches no threads.
pub fn empty_message(group: &str, state: StateFilter) -> String {
    match state {
        StateFilter::All => format!("No threads in group '{group}'"),
        StateFilter::Only(s) if group == ALL_THREADS => format!("No threads with state {s}"),
        StateFilter::Only(s) => format!("No threads in group '{group}' with state {s}"),
    }
}

/// Writes one thread and its stack trace, followed by a blank line.
pub fn render_thread(out: &mut String, thread: &ThreadRecord) {
    write!(out, "{} {} #{}", thread.name, thread.state, thread.id).ok();
    if let Some(owner) = thread.lock_owner_id {
        write!(out, " {owner}").ok();
    }
    writeln!(out).ok();

    for frame in &thread.stack_trace {
        writeln!(
            out,
            "  at {}.{}({}:{})",
            frame.class_name, frame.method, frame.file, frame.line
        )
        .ok();
    }
    writeln!(out).ok();
}

/// Renders the full page: header, group and state menus with counts, then
/// the visible threads.
pub fn render_view(
    view: &ThreadView,
    captured_at: DateTime<Local>,
) -> Result<String, FilterError> {
    let selection = &view.selection;
    let visible = view.visible()?;
    let states = state_counts(&view.grouped, &selection.group)?;

    let mut out = String::new();
    writeln!(out, "THREAD SNAPSHOT").ok();
    writeln!(out, "===============").ok();
    writeln!(out, "Snapshot at {}", captured_at.format("%H:%M:%S %Z")).ok();
    writeln!(out).ok();

    writeln!(out, "Group: {}", selection.group).ok();
    writeln!(out, "{}", "-".repeat(40)).ok();
    for (name, count) in group_counts(&view.grouped, selection.state) {
        let marker = if name == selection.group { '*' } else { ' ' };
        writeln!(out, "{marker} {name} ({count})").ok();
    }
    writeln!(out).ok();

    writeln!(out, "State: {}", selection.state).ok();
    writeln!(out, "{}", "-".repeat(40)).ok();
    for (state, count) in states {
        let marker = if state == selection.state { '*' } else { ' ' };
        writeln!(out, "{marker} {state} ({count})").ok();
    }
    writeln!(out).ok();
    writeln!(out, "{}", "=".repeat(40)).ok();
    writeln!(out).ok();

    if visible.is_empty() {
        writeln!(out, "{}", empty_message(&selection.group, selection.state)).ok();
    } else {
        for thread in visible {
            render_thread(&mut out, thread);
        }
    }

    Ok(out)
}

/// Name and badge count of one menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry {
    pub name: String,
    pub count: usize,
}

/// JSON summary of a view, without stack traces.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSummary {
    pub captured_at: DateTime<Local>,
    pub selected_group: String,
    pub selected_state: StateFilter,
    pub groups: Vec<CountEntry>,
    pub states: Vec<CountEntry>,
}

pub fn summarize(
    view: &ThreadView,
    captured_at: DateTime<Local>,
) -> Result<ViewSummary, FilterError> {
    let selection = &view.selection;

    let groups = group_counts(&view.grouped, selection.state)
        .into_iter()
        .map(|(name, count)| CountEntry {
            name: name.to_string(),
            count,
        })
        .collect();

    let states = state_counts(&view.grouped, &selection.group)?
        .into_iter()
        .map(|(state, count)| CountEntry {
            name: state.to_string(),
            count,
        })
        .collect();

    Ok(ViewSummary {
        captured_at,
        selected_group: selection.group.clone(),
        selected_state: selection.state,
        groups,
        states,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threads::{build_view, StackFrame, ThreadState};

    fn thread(id: i64, name: &str, state: ThreadState, owner: Option<i64>) -> ThreadRecord {
        ThreadRecord {
            id,
            name: name.to_string(),
            state,
            lock_owner_id: owner,
            stack_trace: vec![StackFrame {
                class_name: "java.lang.Object".to_string(),
                method: "wait".to_string(),
                file: "Object.java".to_string(),
                line: 502,
            }],
        }
    }

    #[test]
    fn test_empty_messages() {
        assert_eq!(
            empty_message("gc", StateFilter::All),
            "No threads in group 'gc'"
        );
        assert_eq!(
            empty_message(ALL_THREADS, StateFilter::Only(ThreadState::Blocked)),
            "No threads with state BLOCKED"
        );
        assert_eq!(
            empty_message("gc", StateFilter::Only(ThreadState::New)),
            "No threads in group 'gc' with state NEW"
        );
    }

    #[test]
    fn test_render_thread_with_lock_owner() {
        let mut out = String::new();
        render_thread(&mut out, &thread(9, "task-1", ThreadState::Blocked, Some(3)));
        assert_eq!(
            out,
            "task-1 BLOCKED #9 3\n  at java.lang.Object.wait(Object.java:502)\n\n"
        );
    }

    #[test]
    fn test_render_view_marks_selection() {
        let view = build_view(vec![
            thread(1, "task-1", ThreadState::Waiting, None),
            thread(2, "task-2", ThreadState::Runnable, None),
        ]);
        let text = render_view(&view, Local::now()).unwrap();
        assert!(text.contains("* All Threads (2)"));
        assert!(text.contains("  task (2)"));
        assert!(text.contains("* ALL (2)"));
        assert!(text.contains("task-2 RUNNABLE #2\n"));
    }

    #[test]
    fn test_summary_counts() {
        let view = build_view(vec![thread(1, "task-1", ThreadState::Waiting, None)]);
        let summary = summarize(&view, Local::now()).unwrap();
        assert_eq!(summary.selected_group, ALL_THREADS);
        assert_eq!(summary.groups.len(), 3);
        assert_eq!(
            summary.states[0],
            CountEntry {
                name: "ALL".to_string(),
                count: 1
            }
        );
    }
}
