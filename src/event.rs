use serde::{Deserialize, Serialize};

/// Monotonic timestamp or duration in milliseconds.
pub type Millis = u64;

/// One raw reading taken on a poll tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub level: bool,
    pub at: Millis,
}

impl Sample {
    pub fn new(level: bool, at: Millis) -> Self {
        Self { level, at }
    }
}

/// Committed output of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StableState {
    pub value: bool,
    pub changed_at: Millis,
}

impl StableState {
    pub fn new(value: bool, changed_at: Millis) -> Self {
        Self { value, changed_at }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterKind {
    Time,
    Integrator,
}

/// A stable-value change committed by one of the filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub filter: FilterKind,
    pub level: bool,
    pub pressed: bool,
    pub at_ms: Millis,
    /// Press edge to commit, only reported by the time filter on presses.
    pub latency_ms: Option<Millis>,
}

pub fn level_label(level: bool, pressed_level: bool) -> &'static str {
    if level == pressed_level {
        "PRESSED"
    } else {
        "RELEASED"
    }
}
