use std::{fs, path::PathBuf, thread, time::Duration};

use anyhow::Context;
use clap::Parser;

use dual_debounce::{
    ActionSink, Engine, EngineConfig, FilterKind, MetricsReport, TickOutcome, Trace, TracePlayer,
    Transition,
};

#[derive(Debug, Parser)]
#[command(name = "dual-debounce")]
#[command(about = "Replays a button trace through the time and counter debouncers")]
struct Args {
    /// Engine config JSON; defaults apply to missing fields.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Scripted raw input; the built-in demo trace is used when omitted.
    #[arg(long)]
    trace: Option<PathBuf>,
    /// Sleep one tick interval between ticks.
    #[arg(long)]
    realtime: bool,
}

/// Stand-ins for the two indicator LEDs: each press committed by a filter
/// toggles that filter's LED.
#[derive(Default)]
struct Indicators {
    time_led: bool,
    counter_led: bool,
}

impl ActionSink for Indicators {
    fn on_transition(&mut self, transition: &Transition) {
        if !transition.pressed {
            return;
        }
        let (name, led) = match transition.filter {
            FilterKind::Time => ("Built-in LED", &mut self.time_led),
            FilterKind::Integrator => ("External LED", &mut self.counter_led),
        };
        *led = !*led;
        ::log::info!("{}: {}", name, if *led { "ON" } else { "OFF" });
    }
}

fn print_report(report: &MetricsReport) {
    match serde_json::to_string(report) {
        Ok(json) => println!("{json}"),
        Err(err) => ::log::warn!("Failed to serialize report: {}", err),
    }
}

fn main() -> anyhow::Result<()> {
    sensible_env_logger::init!();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            EngineConfig::from_json(&json)
                .with_context(|| format!("loading config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    let trace = match &args.trace {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading trace {}", path.display()))?;
            Trace::from_json(&json).with_context(|| format!("parsing trace {}", path.display()))?
        }
        None => Trace::demo(config.pressed_level),
    };

    println!("=== Dual debounce demonstration with bounce simulation ===");
    ::log::info!("Method 1: time-based debouncing (built-in LED)");
    ::log::info!("Method 2: counter-based debouncing (external LED)");
    ::log::info!(
        "Press and hold for >{}ms to toggle bounce simulation",
        config.long_press_threshold_ms
    );

    let (input, clock) = TracePlayer::new(trace.clone());
    let mut engine = Engine::new(
        &config,
        input,
        Indicators::default(),
        print_report,
    )?;
    engine.prime(0);

    let tick_interval = engine.tick_interval();
    let mut suspended_ticks = 0u64;
    let mut sessions = 0u64;

    let mut now = 0;
    while now <= trace.end_ms {
        clock.set(now);
        match engine.tick(now) {
            TickOutcome::Suspended => suspended_ticks += 1,
            TickOutcome::Processed {
                session_complete: true,
                ..
            } => sessions += 1,
            TickOutcome::Processed { .. } => {}
        }

        if args.realtime {
            thread::sleep(Duration::from_millis(tick_interval));
        }
        now += tick_interval;
    }

    ::log::info!(
        "Replayed {}ms: {} simulated sessions, {} ticks waiting for release, simulation {}",
        trace.end_ms,
        sessions,
        suspended_ticks,
        if engine.simulate_enabled() { "ENABLED" } else { "DISABLED" }
    );

    Ok(())
}
