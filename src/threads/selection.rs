//! Default selection and the grouped view built from one snapshot.

use serde::{Deserialize, Serialize};

use super::filter::{filter_threads, FilterError};
use super::grouper::{group_threads, GroupedThreads, ALL_THREADS, QUERY_THREADS};
use super::model::{StateFilter, ThreadRecord};

/// Group and state currently being viewed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub group: String,
    pub state: StateFilter,
}

/// Selection applied right after grouping: running queries if there are any,
/// otherwise every thread, with no state filter.
pub fn default_selection(grouped: &GroupedThreads) -> SelectionState {
    let group = if grouped.has_running_queries() {
        QUERY_THREADS
    } else {
        ALL_THREADS
    };

    SelectionState {
        group: group.to_string(),
        state: StateFilter::All,
    }
}

/// A grouped snapshot together with the operator's selection.
#[derive(Debug, Clone)]
pub struct ThreadView {
    pub grouped: GroupedThreads,
    pub selection: SelectionState,
}

impl ThreadView {
    /// Switches the viewed group. The grouping itself is never recomputed.
    pub fn select_group(&mut self, group: &str) -> Result<(), FilterError> {
        if !self.grouped.contains(group) {
            return Err(FilterError::UnknownGroup(group.to_string()));
        }
        self.selection.group = group.to_string();
        Ok(())
    }

    pub fn select_state(&mut self, state: StateFilter) {
        self.selection.state = state;
    }

    /// Threads visible under the current selection.
    pub fn visible(&self) -> Result<Vec<&ThreadRecord>, FilterError> {
        filter_threads(&self.grouped, &self.selection.group, self.selection.state)
    }
}

/// Runs the whole pipeline for a freshly fetched snapshot.
pub fn build_view(threads: Vec<ThreadRecord>) -> ThreadView {
    let grouped = group_threads(threads);
    let selection = default_selection(&grouped);
    ThreadView { grouped, selection }
}
