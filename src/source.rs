use crate::{
    injector::{BounceInjector, BouncePattern, Injected},
    Millis, Sample,
};

/// Anything that can be polled for the current raw input level.
pub trait RawInput {
    fn read(&mut self) -> bool;
}

impl<F> RawInput for F
where
    F: FnMut() -> bool,
{
    fn read(&mut self) -> bool {
        self()
    }
}

/// Where the raw sample of a tick comes from.
pub enum RawSource {
    Physical,
    /// Simulate mode armed. The physical input is read whenever no bounce
    /// session is running.
    Simulated(BounceInjector),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSample {
    pub sample: Sample,
    /// Set on the one tick a bounce session settles.
    pub session_complete: bool,
}

pub struct SignalSource<I: RawInput> {
    input: I,
    pattern: BouncePattern,
    raw: RawSource,
}

impl<I: RawInput> SignalSource<I> {
    pub fn new(input: I, pattern: BouncePattern) -> Self {
        Self {
            input,
            pattern,
            raw: RawSource::Physical,
        }
    }

    pub fn simulate_enabled(&self) -> bool {
        matches!(self.raw, RawSource::Simulated(_))
    }

    pub fn session_active(&self) -> bool {
        match &self.raw {
            RawSource::Simulated(injector) => injector.is_active(),
            RawSource::Physical => false,
        }
    }

    /// Switching modes drops any running session.
    pub fn set_simulated(&mut self, enabled: bool) {
        if enabled == self.simulate_enabled() {
            return;
        }
        self.raw = if enabled {
            RawSource::Simulated(BounceInjector::new(self.pattern.clone()))
        } else {
            RawSource::Physical
        };
    }

    /// No-op in physical mode or while a session is running.
    pub fn start_session(&mut self, now: Millis) -> bool {
        match &mut self.raw {
            RawSource::Simulated(injector) => injector.start_session(now),
            RawSource::Physical => false,
        }
    }

    pub fn read_physical(&mut self) -> bool {
        self.input.read()
    }

    pub fn sample(&mut self, now: Millis) -> SourceSample {
        let injected = match &mut self.raw {
            RawSource::Simulated(injector) => injector.sample(now),
            RawSource::Physical => None,
        };

        let (level, session_complete) = match injected {
            Some(Injected::Bouncing(level)) => (level, false),
            Some(Injected::Settled(level)) => (level, true),
            None => (self.input.read(), false),
        };

        SourceSample {
            sample: Sample::new(level, now),
            session_complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, rc::Rc};

    fn pattern() -> BouncePattern {
        BouncePattern::new(vec![true, false, true], 5, 20, false).unwrap()
    }

    fn counting_input(level: bool) -> (impl RawInput, Rc<Cell<u32>>) {
        let reads = Rc::new(Cell::new(0));
        let counter = reads.clone();
        let input = move || {
            counter.set(counter.get() + 1);
            level
        };
        (input, reads)
    }

    #[test]
    fn physical_mode_reads_input() {
        let (input, reads) = counting_input(true);
        let mut source = SignalSource::new(input, pattern());
        let sample = source.sample(3);

        assert_eq!(sample.sample, Sample::new(true, 3));
        assert!(!sample.session_complete);
        assert_eq!(reads.get(), 1);
    }

    #[test]
    fn session_needs_simulate_mode() {
        let (input, _) = counting_input(true);
        let mut source = SignalSource::new(input, pattern());
        assert!(!source.start_session(0));

        source.set_simulated(true);
        assert!(source.start_session(0));
        assert!(source.session_active());
    }

    #[test]
    fn injector_and_input_are_exclusive() {
        let (input, reads) = counting_input(true);
        let mut source = SignalSource::new(input, pattern());
        source.set_simulated(true);
        source.start_session(0);

        let levels: Vec<_> = (0..20).map(|ms| source.sample(ms).sample.level).collect();
        assert_eq!(reads.get(), 0);
        assert!(levels.contains(&false));

        let settled = source.sample(20);
        assert!(settled.session_complete);
        assert!(!settled.sample.level);
        assert_eq!(reads.get(), 0);

        // back on the physical input, still in simulate mode
        let next = source.sample(21);
        assert!(!next.session_complete);
        assert!(next.sample.level);
        assert_eq!(reads.get(), 1);
        assert!(source.simulate_enabled());
    }

    #[test]
    fn disarming_drops_the_session() {
        let (input, _) = counting_input(true);
        let mut source = SignalSource::new(input, pattern());
        source.set_simulated(true);
        source.start_session(0);
        source.set_simulated(false);

        assert!(!source.session_active());
        assert!(source.sample(5).sample.level);
    }
}
