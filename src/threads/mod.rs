//! Thread grouping and filtering.
//!
//! This module provides:
//! - `model`: Snapshot records and thread states
//! - `grouper`: Naming-convention grouping
//! - `filter`: State filtering and badge counts
//! - `selection`: Default selection and the per-snapshot view

pub mod filter;
pub mod grouper;
pub mod model;
pub mod selection;

// Re-export commonly used types
pub use filter::{count_threads, filter_threads, group_counts, state_counts, FilterError};
pub use grouper::{
    group_key, group_threads, is_query_thread, pool_prefix, GroupedThreads, ALL_THREADS,
    QUERY_THREADS,
};
pub use model::{ParseStateError, StackFrame, StateFilter, ThreadRecord, ThreadState};
pub use selection::{build_view, default_selection, SelectionState, ThreadView};
