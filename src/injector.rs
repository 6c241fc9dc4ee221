// Synthetic contact bounce
use crate::{event::level_label, ConfigError, Millis};

/// Bounce sequence replayed by [`BounceInjector`], plus its timing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BouncePattern {
    levels: Vec<bool>,
    step_interval: Millis,
    session_duration: Millis,
    settled_level: bool,
}

impl BouncePattern {
    pub fn new(
        levels: Vec<bool>,
        step_interval: Millis,
        session_duration: Millis,
        settled_level: bool,
    ) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::EmptyBouncePattern);
        }
        if step_interval == 0 {
            return Err(ConfigError::ZeroBounceStepInterval);
        }
        if session_duration == 0 {
            return Err(ConfigError::ZeroBounceSessionDuration);
        }
        Ok(Self {
            levels,
            step_interval,
            session_duration,
            settled_level,
        })
    }

    pub fn levels(&self) -> &[bool] {
        &self.levels
    }

    pub fn settled_level(&self) -> bool {
        self.settled_level
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Injected {
    /// Session running, current pattern entry.
    Bouncing(bool),
    /// Session just ended; returned once.
    Settled(bool),
}

#[derive(Debug, Clone, Copy)]
struct Session {
    started_at: Millis,
    step_at: Millis,
    index: usize,
}

pub struct BounceInjector {
    pattern: BouncePattern,
    session: Option<Session>,
}

impl BounceInjector {
    pub fn new(pattern: BouncePattern) -> Self {
        Self {
            pattern,
            session: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Starts a bounce session at `now`. Returns `false` and leaves the running
    /// session untouched if one is already active.
    pub fn start_session(&mut self, now: Millis) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.session = Some(Session {
            started_at: now,
            step_at: now,
            index: 0,
        });
        ::log::info!("Bounce simulation started at {}ms", now);
        true
    }

    /// `None` while idle.
    pub fn sample(&mut self, now: Millis) -> Option<Injected> {
        let session = self.session.as_mut()?;

        if now.saturating_sub(session.started_at) >= self.pattern.session_duration {
            self.session = None;
            ::log::info!("Bounce simulation complete, button settled");
            return Some(Injected::Settled(self.pattern.settled_level));
        }

        if now.saturating_sub(session.step_at) >= self.pattern.step_interval {
            session.index = (session.index + 1) % self.pattern.levels.len();
            session.step_at = now;
            ::log::debug!(
                "Simulated bounce: {}",
                level_label(
                    self.pattern.levels[session.index],
                    self.pattern.settled_level
                )
            );
        }

        Some(Injected::Bouncing(self.pattern.levels[session.index]))
    }
}
