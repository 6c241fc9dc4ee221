use serde::{Deserialize, Serialize};

use crate::Millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub at_ms: Millis,
    pub bounce_count: u32,
    pub last_latency_ms: Option<Millis>,
    pub simulate_enabled: bool,
    pub integrator_threshold: u32,
}

/// Bounce counter and press latency, reported and reset on a fixed cadence.
pub struct MetricsCollector {
    report_interval: Millis,
    integrator_threshold: u32,
    bounce_count: u32,
    last_latency: Option<Millis>,
    last_report_at: Millis,
}

impl MetricsCollector {
    pub fn new(report_interval: Millis, integrator_threshold: u32) -> Self {
        Self {
            report_interval,
            integrator_threshold,
            bounce_count: 0,
            last_latency: None,
            last_report_at: 0,
        }
    }

    /// Restarts the reporting cadence from `now`.
    pub fn reset_clock(&mut self, now: Millis) {
        self.last_report_at = now;
    }

    pub fn record_bounce(&mut self) {
        self.bounce_count = self.bounce_count.saturating_add(1);
    }

    pub fn record_response(&mut self, latency: Millis) {
        self.last_latency = Some(latency);
    }

    pub fn bounce_count(&self) -> u32 {
        self.bounce_count
    }

    pub fn last_latency(&self) -> Option<Millis> {
        self.last_latency
    }

    /// Returns a report once per `report_interval` and clears the bounce
    /// count. The latency is kept until the next press overwrites it.
    pub fn snapshot_and_reset(
        &mut self,
        now: Millis,
        simulate_enabled: bool,
    ) -> Option<MetricsReport> {
        if now.saturating_sub(self.last_report_at) < self.report_interval {
            return None;
        }
        self.last_report_at = now;

        let report = MetricsReport {
            at_ms: now,
            bounce_count: self.bounce_count,
            last_latency_ms: self.last_latency,
            simulate_enabled,
            integrator_threshold: self.integrator_threshold,
        };
        self.bounce_count = 0;
        Some(report)
    }
}
