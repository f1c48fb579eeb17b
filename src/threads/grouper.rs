//! Thread grouping by naming convention.
//!
//! Threads are bucketed by name: execution-task threads go into the reserved
//! "Running Queries" bucket, pool workers named `<prefix>-<n>` share a bucket
//! keyed by their prefix, and every other thread is keyed by its literal name.
//! The reserved "All Threads" bucket overlays the whole snapshot.

use ahash::AHashMap as HashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use tracing::debug;

use super::model::ThreadRecord;

/// Overlay bucket holding the complete, unfiltered snapshot.
pub const ALL_THREADS: &str = "All Threads";

/// Bucket holding threads that are executing query tasks.
pub const QUERY_THREADS: &str = "Running Queries";

/// Suffix appended to a derived key that would otherwise shadow a reserved one.
const RESERVED_KEY_SUFFIX: &str = " (thread name)";

/// `<query id>.<stage>.<task>-<pipeline>-<driver>`, where the query id is
/// `<date>_<time>_<sequence>_<coordinator>`.
static QUERY_THREAD_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)[0-9]+_[0-9]+_[0-9]+_.*?\.[0-9]+\.[0-9]+-[0-9]+-[0-9]+")
        .expect("query thread pattern is valid")
});

/// `<prefix>-<instance>` with the instance number at the very end of the name.
static POOL_WORKER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(.+)-[0-9]+$").expect("pool worker pattern is valid"));

/// Returns true if the name looks like an execution-task thread.
pub fn is_query_thread(name: &str) -> bool {
    QUERY_THREAD_NAME.is_match(name)
}

/// Returns the pool prefix of a `<prefix>-<digits>` name, if any.
pub fn pool_prefix(name: &str) -> Option<&str> {
    POOL_WORKER_NAME
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Group key for a thread that is not an execution-task thread.
pub fn group_key(name: &str) -> &str {
    pool_prefix(name).unwrap_or(name)
}

/// Ordered mapping from group name to the threads in that group.
///
/// Always contains [`ALL_THREADS`] and [`QUERY_THREADS`], in that order,
/// followed by derived groups in order of first appearance in the snapshot.
#[derive(Debug, Clone)]
pub struct GroupedThreads {
    groups: Vec<(String, Vec<ThreadRecord>)>,
    index: HashMap<String, usize>,
}

// The index is derived from `groups`.
impl PartialEq for GroupedThreads {
    fn eq(&self, other: &Self) -> bool {
        self.groups == other.groups
    }
}

impl Eq for GroupedThreads {}

impl GroupedThreads {
    fn with_overlay(all: Vec<ThreadRecord>) -> Self {
        let mut grouped = Self {
            groups: Vec::new(),
            index: HashMap::new(),
        };
        grouped.push_group(ALL_THREADS.to_string(), all);
        grouped.push_group(QUERY_THREADS.to_string(), Vec::new());
        grouped
    }

    fn push_group(&mut self, name: String, threads: Vec<ThreadRecord>) {
        self.index.insert(name.clone(), self.groups.len());
        self.groups.push((name, threads));
    }

    fn push(&mut self, key: &str, thread: ThreadRecord) {
        match self.index.get(key) {
            Some(&idx) => self.groups[idx].1.push(thread),
            None => self.push_group(key.to_string(), vec![thread]),
        }
    }

    /// Threads stored under `name`, or `None` if no such group exists.
    pub fn get(&self, name: &str) -> Option<&[ThreadRecord]> {
        self.index
            .get(name)
            .map(|&idx| self.groups[idx].1.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Group names in display order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    /// `(name, threads)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ThreadRecord])> {
        self.groups
            .iter()
            .map(|(name, threads)| (name.as_str(), threads.as_slice()))
    }

    /// Every group except the [`ALL_THREADS`] overlay. Together these
    /// partition the snapshot.
    pub fn partition(&self) -> impl Iterator<Item = (&str, &[ThreadRecord])> {
        self.iter().filter(|(name, _)| *name != ALL_THREADS)
    }

    /// The full snapshot in its original order.
    pub fn all_threads(&self) -> &[ThreadRecord] {
        &self.groups[0].1
    }

    pub fn running_queries(&self) -> &[ThreadRecord] {
        &self.groups[1].1
    }

    pub fn has_running_queries(&self) -> bool {
        !self.running_queries().is_empty()
    }

    /// Number of groups, including the two reserved ones.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_threads().is_empty()
    }
}

fn bucket_key(name: &str) -> Cow<'_, str> {
    let key = group_key(name);
    if key == ALL_THREADS || key == QUERY_THREADS {
        Cow::Owned(format!("{key}{RESERVED_KEY_SUFFIX}"))
    } else {
        Cow::Borrowed(key)
    }
}

/// Partitions a snapshot into named groups.
///
/// Execution-task threads are pulled out first. The remaining threads are then
/// walked in input order: the first thread of a not-yet-seen key opens the
/// bucket and every later thread with the same key joins it. Because a
/// thread's key depends only on its own name, the resulting membership does
/// not depend on input order, and regrouping any concatenation of the buckets
/// reproduces them.
pub fn group_threads(threads: Vec<ThreadRecord>) -> GroupedThreads {
    let mut grouped = GroupedThreads::with_overlay(threads);
    let snapshot = grouped.all_threads().to_vec();

    let (queries, remaining): (Vec<_>, Vec<_>) = snapshot
        .into_iter()
        .partition(|thread| is_query_thread(&thread.name));

    grouped.groups[1].1 = queries;

    for thread in remaining {
        let key = bucket_key(&thread.name).into_owned();
        grouped.push(&key, thread);
    }

    debug!(
        "Grouped {} threads into {} groups ({} running query threads)",
        grouped.all_threads().len(),
        grouped.group_count(),
        grouped.running_queries().len()
    );

    grouped
}
