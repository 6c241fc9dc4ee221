use crate::{ConfigError, FilterKind, Millis, Sample, StableState, Transition};

/// Counter based debouncer. Commits a new level after `threshold` consecutive
/// samples disagree with the current one; any agreeing sample cancels the
/// pending change.
///
/// The filter only counts samples, so its settle time depends on how often it
/// is polled: `threshold` ticks at whatever cadence the caller keeps.
pub struct IntegratorFilter {
    threshold: u32,
    pressed_level: bool,
    integrated: StableState,
    mismatches: u32,
}

impl IntegratorFilter {
    pub fn new(threshold: u32, pressed_level: bool) -> Result<Self, ConfigError> {
        if threshold == 0 {
            return Err(ConfigError::ZeroIntegratorThreshold);
        }
        Ok(Self {
            threshold,
            pressed_level,
            integrated: StableState::new(!pressed_level, 0),
            mismatches: 0,
        })
    }

    pub fn prime(&mut self, level: bool, at: Millis) {
        self.integrated = StableState::new(level, at);
        self.mismatches = 0;
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn stable(&self) -> StableState {
        self.integrated
    }

    pub fn pending(&self) -> u32 {
        self.mismatches
    }

    pub fn is_pressed(&self) -> bool {
        self.integrated.value == self.pressed_level
    }

    /// Time a clean edge needs to commit when polled every `tick_interval`.
    pub fn settle_latency(&self, tick_interval: Millis) -> Millis {
        Millis::from(self.threshold) * tick_interval
    }

    pub fn update(&mut self, sample: Sample) -> Option<Transition> {
        if sample.level == self.integrated.value {
            self.mismatches = 0;
            return None;
        }

        self.mismatches += 1;
        if self.mismatches < self.threshold {
            return None;
        }

        self.integrated = StableState::new(sample.level, sample.at);
        self.mismatches = 0;

        let pressed = sample.level == self.pressed_level;
        ::log::info!(
            "Counter-debounced: {}",
            if pressed { "PRESSED" } else { "RELEASED" }
        );
        Some(Transition {
            filter: FilterKind::Integrator,
            level: sample.level,
            pressed,
            at_ms: sample.at,
            latency_ms: None,
        })
    }
}
