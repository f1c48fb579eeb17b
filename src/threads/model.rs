//! Thread snapshot data model.
//!
//! These types mirror the JSON served by a worker's `/v1/worker/{nodeId}/thread`
//! endpoint. Records are immutable once deserialized.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One call-stack entry, top frame first within a trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    pub class_name: String,
    pub method: String,
    pub file: String,
    pub line: i32,
}

/// A single thread captured in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadRecord {
    pub id: i64,
    pub name: String,
    pub state: ThreadState,
    #[serde(default)]
    pub lock_owner_id: Option<i64>,
    #[serde(default)]
    pub stack_trace: Vec<StackFrame>,
}

/// Execution state of a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreadState {
    Runnable,
    Blocked,
    Waiting,
    TimedWaiting,
    New,
    Terminated,
}

impl ThreadState {
    /// All states in display order.
    pub const ALL: [ThreadState; 6] = [
        ThreadState::Runnable,
        ThreadState::Blocked,
        ThreadState::Waiting,
        ThreadState::TimedWaiting,
        ThreadState::New,
        ThreadState::Terminated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThreadState::Runnable => "RUNNABLE",
            ThreadState::Blocked => "BLOCKED",
            ThreadState::Waiting => "WAITING",
            ThreadState::TimedWaiting => "TIMED_WAITING",
            ThreadState::New => "NEW",
            ThreadState::Terminated => "TERMINATED",
        }
    }
}

impl fmt::Display for ThreadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a state name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown thread state '{0}', expected ALL, RUNNABLE, BLOCKED, WAITING, TIMED_WAITING, NEW or TERMINATED")]
pub struct ParseStateError(pub String);

impl FromStr for ThreadState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThreadState::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStateError(s.to_string()))
    }
}

/// State selector used when filtering a group. `All` is a wildcard and never
/// appears as the state of an actual thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StateFilter {
    #[default]
    All,
    Only(ThreadState),
}

impl StateFilter {
    /// `ALL` followed by every concrete state, in display order.
    pub fn choices() -> impl Iterator<Item = StateFilter> {
        std::iter::once(StateFilter::All).chain(ThreadState::ALL.into_iter().map(StateFilter::Only))
    }

    pub fn matches(&self, state: ThreadState) -> bool {
        match self {
            StateFilter::All => true,
            StateFilter::Only(wanted) => *wanted == state,
        }
    }
}

impl fmt::Display for StateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateFilter::All => f.write_str("ALL"),
            StateFilter::Only(state) => state.fmt(f),
        }
    }
}

impl FromStr for StateFilter {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("ALL") {
            Ok(StateFilter::All)
        } else {
            s.parse().map(StateFilter::Only)
        }
    }
}

impl Serialize for StateFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StateFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
