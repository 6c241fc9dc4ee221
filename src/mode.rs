use crate::{Millis, Sample};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeState {
    Idle,
    Pressed {
        since: Millis,
    },
    /// Simulate mode was just toggled; nothing else runs until the raw input
    /// is released. Polled every `release_poll_interval`.
    AwaitingRelease {
        polled_at: Millis,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeSignal {
    None,
    /// Released to pressed edge on the raw input.
    PressStarted,
    /// Long press detected, flip simulate mode.
    ToggleSimulate,
    /// Still waiting for release.
    Held,
    /// Release seen after a toggle, re-armed.
    Released,
}

/// Long press detector on the raw (undebounced) input.
pub struct ModeController {
    long_press_threshold: Millis,
    release_poll_interval: Millis,
    pressed_level: bool,
    state: ModeState,
}

impl ModeController {
    pub fn new(
        long_press_threshold: Millis,
        release_poll_interval: Millis,
        pressed_level: bool,
    ) -> Self {
        Self {
            long_press_threshold,
            release_poll_interval,
            pressed_level,
            state: ModeState::Idle,
        }
    }

    pub fn state(&self) -> ModeState {
        self.state
    }

    pub fn is_awaiting_release(&self) -> bool {
        matches!(self.state, ModeState::AwaitingRelease { .. })
    }

    /// False between release polls; the tick should be skipped entirely.
    pub fn poll_due(&self, now: Millis) -> bool {
        match self.state {
            ModeState::AwaitingRelease { polled_at } => {
                now.saturating_sub(polled_at) >= self.release_poll_interval
            }
            _ => true,
        }
    }

    pub fn observe(&mut self, sample: Sample) -> ModeSignal {
        let pressed = sample.level == self.pressed_level;
        let now = sample.at;

        let (next, signal) = match self.state {
            ModeState::AwaitingRelease { .. } if pressed => (
                ModeState::AwaitingRelease { polled_at: now },
                ModeSignal::Held,
            ),
            ModeState::AwaitingRelease { .. } => (ModeState::Idle, ModeSignal::Released),
            ModeState::Idle if pressed => (
                ModeState::Pressed { since: now },
                ModeSignal::PressStarted,
            ),
            ModeState::Idle => (ModeState::Idle, ModeSignal::None),
            ModeState::Pressed { .. } if !pressed => (ModeState::Idle, ModeSignal::None),
            ModeState::Pressed { since }
                if now.saturating_sub(since) > self.long_press_threshold =>
            {
                ::log::info!("Long press detected after {}ms", now - since);
                (
                    ModeState::AwaitingRelease { polled_at: now },
                    ModeSignal::ToggleSimulate,
                )
            }
            state @ ModeState::Pressed { .. } => (state, ModeSignal::None),
        };

        self.state = next;
        signal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRESSED: bool = false;
    const RELEASED: bool = true;

    fn controller() -> ModeController {
        ModeController::new(1000, 10, PRESSED)
    }

    #[test]
    fn press_edge_is_reported_once() {
        let mut mode = controller();
        assert_eq!(mode.observe(Sample::new(RELEASED, 0)), ModeSignal::None);
        assert_eq!(mode.observe(Sample::new(PRESSED, 1)), ModeSignal::PressStarted);
        assert_eq!(mode.observe(Sample::new(PRESSED, 2)), ModeSignal::None);
        assert_eq!(mode.state(), ModeState::Pressed { since: 1 });
    }

    #[test]
    fn long_press_is_strictly_longer_than_threshold() {
        let mut mode = controller();
        mode.observe(Sample::new(PRESSED, 0));
        assert_eq!(mode.observe(Sample::new(PRESSED, 1000)), ModeSignal::None);
        assert_eq!(
            mode.observe(Sample::new(PRESSED, 1001)),
            ModeSignal::ToggleSimulate
        );
        assert!(mode.is_awaiting_release());
    }

    #[test]
    fn short_presses_never_toggle() {
        let mut mode = controller();
        for cycle in 0..10 {
            let start = cycle * 1000;
            for ms in start..start + 900 {
                assert_ne!(mode.observe(Sample::new(PRESSED, ms)), ModeSignal::ToggleSimulate);
            }
            mode.observe(Sample::new(RELEASED, start + 900));
        }
    }

    #[test]
    fn lockout_until_release() {
        let mut mode = controller();
        let mut toggles = 0;
        let mut now = 0;
        while now < 5000 {
            if mode.poll_due(now)
                && mode.observe(Sample::new(PRESSED, now)) == ModeSignal::ToggleSimulate
            {
                toggles += 1;
            }
            now += 1;
        }
        assert_eq!(toggles, 1);

        assert_eq!(mode.observe(Sample::new(RELEASED, now)), ModeSignal::Released);
        assert_eq!(mode.state(), ModeState::Idle);
        assert_eq!(mode.observe(Sample::new(PRESSED, now + 1)), ModeSignal::PressStarted);
    }

    #[test]
    fn release_polled_at_interval() {
        let mut mode = controller();
        mode.observe(Sample::new(PRESSED, 0));
        mode.observe(Sample::new(PRESSED, 1001));

        assert!(!mode.poll_due(1005));
        assert!(mode.poll_due(1011));
        assert_eq!(mode.observe(Sample::new(PRESSED, 1011)), ModeSignal::Held);
        assert!(!mode.poll_due(1020));
        assert!(mode.poll_due(1021));
    }
}
