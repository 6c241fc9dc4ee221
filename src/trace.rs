//! Scripted raw input for replaying button activity without hardware.
use std::{cell::Cell, rc::Rc};

use serde::{Deserialize, Serialize};

use crate::{source::RawInput, Millis};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    pub at_ms: Millis,
    pub level: bool,
}

/// Raw level over time: `initial` until the first step, then each step's level
/// until the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    pub initial: bool,
    pub end_ms: Millis,
    #[serde(default)]
    pub steps: Vec<TraceStep>,
}

impl Trace {
    pub fn new(initial: bool, end_ms: Millis, mut steps: Vec<TraceStep>) -> Self {
        steps.sort_by_key(|step| step.at_ms);
        Self {
            initial,
            end_ms,
            steps,
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let trace: Self = serde_json::from_str(json)?;
        Ok(Self::new(trace.initial, trace.end_ms, trace.steps))
    }

    pub fn level_at(&self, ms: Millis) -> bool {
        let idx = self.steps.partition_point(|step| step.at_ms <= ms);
        match idx {
            0 => self.initial,
            n => self.steps[n - 1].level,
        }
    }

    /// Clean press, bouncy press, long press to arm the injector, a simulated
    /// press, then a long press to disarm it.
    pub fn demo(pressed_level: bool) -> Self {
        let p = pressed_level;
        let r = !pressed_level;
        let at = |at_ms, level| TraceStep { at_ms, level };

        Self::new(
            r,
            9_500,
            vec![
                at(500, p),
                at(800, r),
                // contact bounce on make and break
                at(1_500, p),
                at(1_502, r),
                at(1_503, p),
                at(1_506, r),
                at(1_507, p),
                at(1_900, r),
                at(1_901, p),
                at(1_903, r),
                // hold past the long press threshold
                at(3_000, p),
                at(4_300, r),
                at(5_000, p),
                at(5_400, r),
                at(6_500, p),
                at(7_800, r),
            ],
        )
    }
}

/// [`RawInput`] reading a [`Trace`] at the time held by a shared clock.
pub struct TracePlayer {
    trace: Trace,
    clock: Rc<Cell<Millis>>,
}

impl TracePlayer {
    pub fn new(trace: Trace) -> (Self, Rc<Cell<Millis>>) {
        let clock = Rc::new(Cell::new(0));
        (
            Self {
                trace,
                clock: clock.clone(),
            },
            clock,
        )
    }
}

impl RawInput for TracePlayer {
    fn read(&mut self) -> bool {
        self.trace.level_at(self.clock.get())
    }
}
