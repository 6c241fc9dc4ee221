//! Dual debounce engine: a time-window filter and a sample-count integrator
//! running side by side on the same raw button samples, with a synthetic
//! bounce injector armed by a long press and bounce/latency metrics.

pub mod config;
pub mod debouncer;
pub mod engine;
pub mod event;
pub mod injector;
pub mod integrator;
pub mod metrics;
pub mod mode;
pub mod source;
pub mod trace;

pub use config::{ConfigError, EngineConfig};
pub use debouncer::TimeFilter;
pub use engine::{ActionSink, Engine, ReportSink, TickOutcome};
pub use event::{FilterKind, Millis, Sample, StableState, Transition};
pub use injector::{BounceInjector, BouncePattern, Injected};
pub use integrator::IntegratorFilter;
pub use metrics::{MetricsCollector, MetricsReport};
pub use mode::{ModeController, ModeSignal, ModeState};
pub use source::{RawInput, RawSource, SignalSource, SourceSample};
pub use trace::{Trace, TracePlayer, TraceStep};
