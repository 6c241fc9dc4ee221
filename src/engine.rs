use crate::{
    config::EngineConfig,
    debouncer::TimeFilter,
    event::level_label,
    injector::BouncePattern,
    integrator::IntegratorFilter,
    metrics::{MetricsCollector, MetricsReport},
    mode::{ModeController, ModeSignal, ModeState},
    source::{RawInput, SignalSource, SourceSample},
    ConfigError, Millis, Sample, StableState, Transition,
};

/// Receives committed stable-value changes from both filters.
pub trait ActionSink {
    fn on_transition(&mut self, transition: &Transition);
}

impl<F> ActionSink for F
where
    F: FnMut(&Transition),
{
    fn on_transition(&mut self, transition: &Transition) {
        self(transition)
    }
}

pub trait ReportSink {
    fn on_report(&mut self, report: &MetricsReport);
}

impl<F> ReportSink for F
where
    F: FnMut(&MetricsReport),
{
    fn on_report(&mut self, report: &MetricsReport) {
        self(report)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Both filters consumed `sample`.
    Processed {
        sample: Sample,
        session_complete: bool,
    },
    /// Waiting for release after a mode toggle; filters skipped.
    Suspended,
}

/// Single-threaded polling loop body. Call [`Engine::tick`] once per poll at
/// the configured `tick_interval_ms`.
pub struct Engine<I: RawInput, A: ActionSink, R: ReportSink> {
    source: SignalSource<I>,
    mode: ModeController,
    time_filter: TimeFilter,
    integrator: IntegratorFilter,
    metrics: MetricsCollector,
    actions: A,
    reports: R,
    tick_interval: Millis,
}

impl<I, A, R> Engine<I, A, R>
where
    I: RawInput,
    A: ActionSink,
    R: ReportSink,
{
    pub fn new(
        config: &EngineConfig,
        input: I,
        actions: A,
        reports: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let pattern = BouncePattern::new(
            config.bounce_pattern.clone(),
            config.bounce_step_interval_ms,
            config.bounce_session_duration_ms,
            config.pressed_level,
        )?;
        let time_filter = TimeFilter::new(config.debounce_delay_ms, config.pressed_level)?;
        let integrator = IntegratorFilter::new(config.integrator_threshold, config.pressed_level)?;

        ::log::info!(
            "Engine ready: debounce {}ms, integrator {} samples (~{}ms at {}ms ticks)",
            config.debounce_delay_ms,
            integrator.threshold(),
            integrator.settle_latency(config.tick_interval_ms),
            config.tick_interval_ms
        );
        ::log::info!(
            "Bounce pattern: {} steps of {}ms, settles {} after {}ms",
            pattern.levels().len(),
            config.bounce_step_interval_ms,
            level_label(pattern.settled_level(), config.pressed_level),
            config.bounce_session_duration_ms
        );
        let metrics = MetricsCollector::new(config.report_interval_ms, integrator.threshold());

        Ok(Self {
            source: SignalSource::new(input, pattern),
            mode: ModeController::new(
                config.long_press_threshold_ms,
                config.release_poll_interval_ms,
                config.pressed_level,
            ),
            time_filter,
            integrator,
            metrics,
            actions,
            reports,
            tick_interval: config.tick_interval_ms,
        })
    }

    /// Seeds both filters from the current physical reading and starts the
    /// report cadence at `now`.
    pub fn prime(&mut self, now: Millis) -> bool {
        let level = self.source.read_physical();
        self.time_filter.prime(level, now);
        self.integrator.prime(level, now);
        self.metrics.reset_clock(now);
        level
    }

    pub fn tick(&mut self, now: Millis) -> TickOutcome {
        let mut transitions: [Option<Transition>; 2] = [None, None];
        let outcome = self.step(now, &mut transitions);

        let simulate_enabled = self.source.simulate_enabled();
        if let Some(report) = self.metrics.snapshot_and_reset(now, simulate_enabled) {
            ::log::info!(
                "Metrics: {} bounces, last response {:?}ms, simulation {}",
                report.bounce_count,
                report.last_latency_ms,
                if simulate_enabled { "ENABLED" } else { "DISABLED" }
            );
            self.reports.on_report(&report);
        }

        for transition in transitions.iter().flatten() {
            self.actions.on_transition(transition);
        }
        outcome
    }

    fn step(&mut self, now: Millis, transitions: &mut [Option<Transition>; 2]) -> TickOutcome {
        if !self.mode.poll_due(now) {
            return TickOutcome::Suspended;
        }

        let SourceSample {
            sample,
            session_complete,
        } = self.source.sample(now);

        match self.mode.observe(sample) {
            ModeSignal::ToggleSimulate => {
                let enabled = !self.source.simulate_enabled();
                self.source.set_simulated(enabled);
                ::log::info!(
                    "Bounce simulation {}",
                    if enabled { "ENABLED" } else { "DISABLED" }
                );
                return TickOutcome::Suspended;
            }
            ModeSignal::Held => return TickOutcome::Suspended,
            ModeSignal::PressStarted if !session_complete => {
                self.source.start_session(now);
            }
            ModeSignal::PressStarted | ModeSignal::Released | ModeSignal::None => {}
        }

        transitions[0] = self.time_filter.update(sample, &mut self.metrics);
        transitions[1] = self.integrator.update(sample);

        TickOutcome::Processed {
            sample,
            session_complete,
        }
    }

    pub fn time_stable(&self) -> StableState {
        self.time_filter.stable()
    }

    pub fn integrated(&self) -> StableState {
        self.integrator.stable()
    }

    pub fn simulate_enabled(&self) -> bool {
        self.source.simulate_enabled()
    }

    pub fn session_active(&self) -> bool {
        self.source.session_active()
    }

    pub fn mode_state(&self) -> ModeState {
        self.mode.state()
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    pub fn tick_interval(&self) -> Millis {
        self.tick_interval
    }

    pub fn actions(&self) -> &A {
        &self.actions
    }

    pub fn reports(&self) -> &R {
        &self.reports
    }
}
