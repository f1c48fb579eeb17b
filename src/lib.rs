//! Herakles Thread Inspector Library
//!
//! This library groups a worker's thread snapshot into named buckets by
//! thread naming convention and filters the viewed bucket by thread state.
//! Grouping and filtering are pure; fetching and rendering live in
//! [`snapshot`] and [`render`].
//!
//! # Grouping
//!
//! - **All Threads**: every thread of the snapshot, in original order
//! - **Running Queries**: threads named `<query id>.<stage>.<task>-<pipeline>-<driver>`
//! - **`<prefix>`**: pool workers named `<prefix>-<instance>`
//! - **`<name>`**: any other thread, keyed by its literal name
//!
//! # Usage
//!
//! ```rust
//! use herakles_thread_inspector::threads::{
//!     build_view, filter_threads, StateFilter, ThreadRecord, ThreadState, QUERY_THREADS,
//! };
//!
//! let threads: Vec<ThreadRecord> = serde_json::from_str(r#"[
//!     {"id": 1, "name": "20230101_090000_00012_abcd.1.2-3-4", "state": "RUNNABLE", "stackTrace": []},
//!     {"id": 2, "name": "http-worker-1", "state": "WAITING", "stackTrace": []},
//!     {"id": 3, "name": "http-worker-2", "state": "WAITING", "stackTrace": []}
//! ]"#).unwrap();
//!
//! let view = build_view(threads);
//! assert_eq!(view.selection.group, QUERY_THREADS);
//!
//! let waiting = filter_threads(
//!     &view.grouped,
//!     "http-worker",
//!     StateFilter::Only(ThreadState::Waiting),
//! )
//! .unwrap();
//! assert_eq!(waiting.len(), 2);
//! ```

pub mod render;
pub mod snapshot;
pub mod threads;

// Re-export main types for convenience
pub use snapshot::{Snapshot, SnapshotError, SnapshotFetcher, SnapshotSource};
pub use threads::{
    build_view, filter_threads, group_threads, FilterError, GroupedThreads, SelectionState,
    StackFrame, StateFilter, ThreadRecord, ThreadState, ThreadView,
};
