//! Integration tests for state filtering and badge counts.

use herakles_thread_inspector::threads::{count_threads, state_counts, ALL_THREADS};
use herakles_thread_inspector::{
    build_view, filter_threads, group_threads, FilterError, GroupedThreads, StateFilter,
    ThreadRecord, ThreadState,
};

fn thread(id: i64, name: &str, state: ThreadState) -> ThreadRecord {
    ThreadRecord {
        id,
        name: name.to_string(),
        state,
        lock_owner_id: None,
        stack_trace: Vec::new(),
    }
}

fn scenario() -> GroupedThreads {
    group_threads(vec![
        thread(1, "20230101_090000_00012_abcd.1.2-3-4", ThreadState::Runnable),
        thread(2, "http-worker-1", ThreadState::Waiting),
        thread(3, "http-worker-2", ThreadState::Waiting),
        thread(4, "gc-thread", ThreadState::Runnable),
    ])
}

#[test]
fn test_no_matching_state_yields_empty() {
    let grouped = scenario();
    let blocked = filter_threads(
        &grouped,
        "http-worker",
        StateFilter::Only(ThreadState::Blocked),
    )
    .unwrap();
    assert!(blocked.is_empty());
}

#[test]
fn test_all_returns_the_whole_group() {
    let grouped = scenario();
    for name in grouped.names() {
        let filtered: Vec<ThreadRecord> = filter_threads(&grouped, name, StateFilter::All)
            .unwrap()
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(filtered.as_slice(), grouped.get(name).unwrap());
    }
}

#[test]
fn test_concrete_state_is_an_ordered_subsequence() {
    let grouped = scenario();
    for state in ThreadState::ALL {
        let filtered = filter_threads(&grouped, ALL_THREADS, StateFilter::Only(state)).unwrap();
        assert!(filtered.iter().all(|t| t.state == state));

        let expected: Vec<i64> = grouped
            .all_threads()
            .iter()
            .filter(|t| t.state == state)
            .map(|t| t.id)
            .collect();
        let actual: Vec<i64> = filtered.iter().map(|t| t.id).collect();
        assert_eq!(actual, expected);
    }
}

#[test]
fn test_stale_group_from_previous_snapshot() {
    let old = scenario();
    assert!(old.contains("http-worker"));

    let new = group_threads(vec![thread(10, "gc-thread", ThreadState::Runnable)]);
    assert_eq!(
        filter_threads(&new, "http-worker", StateFilter::All),
        Err(FilterError::UnknownGroup("http-worker".to_string()))
    );
}

#[test]
fn test_counts_match_filter_lengths() {
    let grouped = scenario();
    for name in grouped.names() {
        for (state, count) in state_counts(&grouped, name).unwrap() {
            let filtered = filter_threads(&grouped, name, state).unwrap();
            assert_eq!(filtered.len(), count);
            assert_eq!(count_threads(&grouped, name, state).unwrap(), count);
        }
    }
}

#[test]
fn test_visible_follows_selection() {
    let mut view = build_view(scenario().all_threads().to_vec());
    assert_eq!(view.visible().unwrap().len(), 1);

    view.select_group("http-worker").unwrap();
    view.select_state(StateFilter::Only(ThreadState::Waiting));
    let ids: Vec<i64> = view.visible().unwrap().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![2, 3]);
}
