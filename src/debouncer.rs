// Time-window debouncer
use crate::{
    event::level_label, metrics::MetricsCollector, ConfigError, FilterKind, Millis, Sample,
    StableState, Transition,
};

/// Trailing-edge debouncer: a level is committed once the raw input has not
/// changed for longer than `debounce_delay`.
pub struct TimeFilter {
    debounce_delay: Millis,
    pressed_level: bool,
    last_raw: bool,
    stable: StableState,
    last_change_at: Millis,
    // earliest raw press edge while the committed state is released
    press_edge_at: Option<Millis>,
}

impl TimeFilter {
    pub fn new(debounce_delay: Millis, pressed_level: bool) -> Result<Self, ConfigError> {
        if debounce_delay == 0 {
            return Err(ConfigError::ZeroDebounceDelay);
        }
        let released = !pressed_level;
        Ok(Self {
            debounce_delay,
            pressed_level,
            last_raw: released,
            stable: StableState::new(released, 0),
            last_change_at: 0,
            press_edge_at: None,
        })
    }

    /// Seeds the committed value from an initial reading. The previous raw
    /// level is left at released.
    pub fn prime(&mut self, level: bool, at: Millis) {
        self.stable = StableState::new(level, at);
    }

    pub fn stable(&self) -> StableState {
        self.stable
    }

    pub fn is_pressed(&self) -> bool {
        self.stable.value == self.pressed_level
    }

    pub fn update(&mut self, sample: Sample, metrics: &mut MetricsCollector) -> Option<Transition> {
        let Sample { level: raw, at: now } = sample;

        if raw != self.last_raw {
            // counted while the previous reading disagreed with the committed value
            if self.last_raw != self.stable.value {
                metrics.record_bounce();
            }
            if raw == self.pressed_level
                && self.stable.value != self.pressed_level
                && self.press_edge_at.is_none()
            {
                self.press_edge_at = Some(now);
            }
            self.last_change_at = now;
            ::log::debug!("Raw: {} at {}ms", level_label(raw, self.pressed_level), now);
        }

        let mut transition = None;
        if now.saturating_sub(self.last_change_at) > self.debounce_delay {
            if raw != self.stable.value {
                self.stable = StableState::new(raw, now);
                self.last_change_at = now;
                transition = Some(self.commit(raw, now, metrics));
            } else {
                self.press_edge_at = None;
            }
        }

        self.last_raw = raw;
        transition
    }

    fn commit(&mut self, raw: bool, now: Millis, metrics: &mut MetricsCollector) -> Transition {
        let pressed = raw == self.pressed_level;
        let latency_ms = if pressed {
            let latency = now.saturating_sub(self.press_edge_at.unwrap_or(now));
            metrics.record_response(latency);
            ::log::info!("Time-debounced: PRESSED (response: {}ms)", latency);
            Some(latency)
        } else {
            ::log::info!("Time-debounced: RELEASED");
            None
        };
        self.press_edge_at = None;

        Transition {
            filter: FilterKind::Time,
            level: raw,
            pressed,
            at_ms: now,
            latency_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRESSED: bool = false;
    const RELEASED: bool = true;

    fn filter() -> (TimeFilter, MetricsCollector) {
        (
            TimeFilter::new(50, PRESSED).unwrap(),
            MetricsCollector::new(3000, 5),
        )
    }

    fn feed(
        filter: &mut TimeFilter,
        metrics: &mut MetricsCollector,
        from: Millis,
        to: Millis,
        level: bool,
    ) -> Vec<Transition> {
        (from..to)
            .filter_map(|ms| filter.update(Sample::new(level, ms), metrics))
            .collect()
    }

    #[test]
    fn rejects_zero_delay() {
        assert!(matches!(
            TimeFilter::new(0, PRESSED),
            Err(ConfigError::ZeroDebounceDelay)
        ));
    }

    #[test]
    fn commits_after_quiet_window() {
        let (mut filter, mut metrics) = filter();
        let transitions = feed(&mut filter, &mut metrics, 0, 50, PRESSED);
        assert!(transitions.is_empty());
        // 50ms since the edge is not enough, the window is exclusive
        assert!(filter
            .update(Sample::new(PRESSED, 50), &mut metrics)
            .is_none());

        let commit = filter
            .update(Sample::new(PRESSED, 51), &mut metrics)
            .unwrap();
        assert!(commit.pressed);
        assert_eq!(commit.filter, FilterKind::Time);
        assert_eq!(commit.latency_ms, Some(51));
        assert_eq!(filter.stable(), StableState::new(PRESSED, 51));
        assert_eq!(metrics.last_latency(), Some(51));
    }

    #[test]
    fn noise_restarts_the_window() {
        let (mut filter, mut metrics) = filter();
        let mut transitions = Vec::new();
        for ms in 0..40 {
            let level = if ms < 30 && ms % 6 < 3 { PRESSED } else { RELEASED };
            transitions.extend(filter.update(Sample::new(level, ms), &mut metrics));
        }
        transitions.extend(feed(&mut filter, &mut metrics, 40, 200, RELEASED));

        assert!(transitions.is_empty());
        assert!(!filter.is_pressed());
    }

    #[test]
    fn constant_input_is_idempotent() {
        let (mut filter, mut metrics) = filter();
        let transitions = feed(&mut filter, &mut metrics, 0, 500, PRESSED);
        assert_eq!(transitions.len(), 1);
        let bounces = metrics.bounce_count();

        let transitions = feed(&mut filter, &mut metrics, 500, 5000, PRESSED);
        assert!(transitions.is_empty());
        assert_eq!(metrics.bounce_count(), bounces);
    }

    #[test]
    fn latency_measured_from_first_press_edge() {
        let (mut filter, mut metrics) = filter();
        filter.update(Sample::new(PRESSED, 10), &mut metrics);
        filter.update(Sample::new(RELEASED, 12), &mut metrics);
        filter.update(Sample::new(PRESSED, 15), &mut metrics);
        let commit = feed(&mut filter, &mut metrics, 16, 100, PRESSED);

        assert_eq!(commit.len(), 1);
        assert_eq!(commit[0].at_ms, 66);
        assert_eq!(commit[0].latency_ms, Some(56));
    }

    #[test]
    fn rejected_noise_does_not_leak_into_next_latency() {
        let (mut filter, mut metrics) = filter();
        filter.update(Sample::new(PRESSED, 10), &mut metrics);
        feed(&mut filter, &mut metrics, 11, 100, RELEASED);
        let commit = feed(&mut filter, &mut metrics, 200, 300, PRESSED);

        assert_eq!(commit.len(), 1);
        assert_eq!(commit[0].latency_ms, Some(51));
    }

    #[test]
    fn release_commit_has_no_latency() {
        let (mut filter, mut metrics) = filter();
        feed(&mut filter, &mut metrics, 0, 100, PRESSED);
        let release = feed(&mut filter, &mut metrics, 100, 200, RELEASED);

        assert_eq!(release.len(), 1);
        assert!(!release[0].pressed);
        assert_eq!(release[0].latency_ms, None);
        assert_eq!(metrics.last_latency(), Some(51));
    }

    #[test]
    fn counts_toggles_away_from_unstable_reading() {
        let (mut filter, mut metrics) = filter();
        // previous reading agrees with the committed value: not a bounce
        filter.update(Sample::new(PRESSED, 0), &mut metrics);
        assert_eq!(metrics.bounce_count(), 0);
        // previous reading was the pending press: bounce
        filter.update(Sample::new(RELEASED, 2), &mut metrics);
        assert_eq!(metrics.bounce_count(), 1);
        filter.update(Sample::new(PRESSED, 4), &mut metrics);
        filter.update(Sample::new(RELEASED, 6), &mut metrics);
        assert_eq!(metrics.bounce_count(), 2);
    }
}
