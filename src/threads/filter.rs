//! State filtering over grouped threads, plus the derived counts shown next
//! to each group and state choice.

use super::grouper::GroupedThreads;
use super::model::{StateFilter, ThreadRecord};

/// Errors raised while filtering a grouped snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// The group is not part of this snapshot, usually a selection carried
    /// over from an older snapshot.
    #[error("unknown thread group '{0}'")]
    UnknownGroup(String),
}

/// Threads of `group` whose state matches `state`, in stored order.
pub fn filter_threads<'a>(
    grouped: &'a GroupedThreads,
    group: &str,
    state: StateFilter,
) -> Result<Vec<&'a ThreadRecord>, FilterError> {
    let threads = grouped
        .get(group)
        .ok_or_else(|| FilterError::UnknownGroup(group.to_string()))?;

    Ok(threads.iter().filter(|t| state.matches(t.state)).collect())
}

/// Same as `filter_threads(..).len()` without collecting.
pub fn count_threads(
    grouped: &GroupedThreads,
    group: &str,
    state: StateFilter,
) -> Result<usize, FilterError> {
    let threads = grouped
        .get(group)
        .ok_or_else(|| FilterError::UnknownGroup(group.to_string()))?;

    Ok(threads.iter().filter(|t| state.matches(t.state)).count())
}

/// Count per group under one state, in group display order.
pub fn group_counts(grouped: &GroupedThreads, state: StateFilter) -> Vec<(&str, usize)> {
    grouped
        .iter()
        .map(|(name, threads)| {
            let count = threads.iter().filter(|t| state.matches(t.state)).count();
            (name, count)
        })
        .collect()
}

/// Count per state choice (`ALL` first) within one group.
pub fn state_counts(
    grouped: &GroupedThreads,
    group: &str,
) -> Result<Vec<(StateFilter, usize)>, FilterError> {
    let threads = grouped
        .get(group)
        .ok_or_else(|| FilterError::UnknownGroup(group.to_string()))?;

    Ok(StateFilter::choices()
        .map(|state| {
            let count = threads.iter().filter(|t| state.matches(t.state)).count();
            (state, count)
        })
        .collect())
}
