//! Timing telemetry for inspection runs.
//!
//! A [`Telemetry`] collects one [`Sample`] per instrumented run. The
//! process-wide instance lives behind a `OnceLock` and is never torn down;
//! tests and embedders that need isolation use [`LocalTelemetry`].

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use std::time::{Duration, Instant};

/// One timed run of an inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Display name of the inspection.
    pub rule: String,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

/// Aggregated timings of one inspection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTiming {
    /// Display name of the inspection.
    pub rule: String,
    /// Number of recorded runs.
    pub runs: usize,
    /// Sum of all runs.
    pub total: Duration,
    /// Slowest single run.
    pub max: Duration,
}

impl RuleTiming {
    /// Average time per run.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg(&self) -> Duration {
        match u32::try_from(self.runs) {
            Ok(0) => Duration::ZERO,
            Ok(runs) => self.total / runs,
            Err(_) => Duration::from_secs_f64(self.total.as_secs_f64() / self.runs as f64),
        }
    }
}

/// Thread-safe sample collector.
#[derive(Debug, Default)]
pub struct Telemetry {
    samples: Mutex<Vec<Sample>>,
}

impl Telemetry {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // A panicking recorder cannot leave the vector half-written.
    fn lock(&self) -> MutexGuard<'_, Vec<Sample>> {
        self.samples
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Appends a sample.
    pub fn record(&self, rule: impl Into<String>, elapsed: Duration) {
        let rule = rule.into();
        tracing::trace!("{} ran in {:?}", rule, elapsed);
        self.lock().push(Sample { rule, elapsed });
    }

    /// Starts timing a run; the sample is recorded when the guard drops.
    #[must_use = "dropping the guard immediately records a zero-length run"]
    pub fn start(&self, rule: impl Into<String>) -> TimingGuard<'_> {
        TimingGuard {
            telemetry: self,
            rule: rule.into(),
            started: Instant::now(),
        }
    }

    /// Copy of all samples in recording order.
    #[must_use]
    pub fn samples(&self) -> Vec<Sample> {
        self.lock().clone()
    }

    /// Removes and returns all samples.
    pub fn drain(&self) -> Vec<Sample> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no sample was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Per-inspection timings sorted by total time, slowest first.
    #[must_use]
    pub fn summary(&self) -> Vec<RuleTiming> {
        let mut by_rule: HashMap<String, RuleTiming> = HashMap::new();
        for sample in self.lock().iter() {
            let timing = by_rule
                .entry(sample.rule.clone())
                .or_insert_with(|| RuleTiming {
                    rule: sample.rule.clone(),
                    ..RuleTiming::default()
                });
            timing.runs += 1;
            timing.total += sample.elapsed;
            timing.max = timing.max.max(sample.elapsed);
        }
        let mut timings: Vec<RuleTiming> = by_rule.into_values().collect();
        timings.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.rule.cmp(&b.rule)));
        timings
    }

    /// Formats the summary as a table.
    #[must_use]
    pub fn format_summary(&self) -> String {
        let timings = self.summary();
        if timings.is_empty() {
            return "No timing data available".to_string();
        }
        let mut output = format!(
            "{:<50} {:>6} {:>12} {:>12} {:>12}\n",
            "Inspection", "Runs", "Total", "Avg", "Max"
        );
        for t in &timings {
            let _ = writeln!(
                output,
                "{:<50} {:>6} {:>12.3?} {:>12.3?} {:>12.3?}",
                t.rule,
                t.runs,
                t.total,
                t.avg(),
                t.max
            );
        }
        output
    }

    /// Logs the summary at info level.
    pub fn log_summary(&self) {
        for t in self.summary() {
            tracing::info!(
                "{}: {} run(s), total {:?}, max {:?}",
                t.rule,
                t.runs,
                t.total,
                t.max
            );
        }
    }
}

/// Records a sample for its run when dropped, including during unwinding.
#[derive(Debug)]
pub struct TimingGuard<'a> {
    telemetry: &'a Telemetry,
    rule: String,
    started: Instant,
}

impl Drop for TimingGuard<'_> {
    fn drop(&mut self) {
        let rule = std::mem::take(&mut self.rule);
        self.telemetry.record(rule, self.started.elapsed());
    }
}

/// Settings collaborator deciding whether and where runs are timed.
pub trait TelemetrySettings: Send + Sync {
    /// Whether timing is enabled.
    fn telemetry_enabled(&self) -> bool;

    /// Collector receiving the samples.
    fn telemetry(&self) -> Arc<Telemetry>;
}

static ENABLED: AtomicBool = AtomicBool::new(false);
static GLOBAL: OnceLock<Arc<Telemetry>> = OnceLock::new();

/// Process-wide settings: a global switch and a global collector.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessTelemetry;

impl ProcessTelemetry {
    /// Turns process-wide timing on or off.
    pub fn set_enabled(enabled: bool) {
        ENABLED.store(enabled, Ordering::Relaxed);
    }

    /// Whether process-wide timing is on.
    #[must_use]
    pub fn is_enabled() -> bool {
        ENABLED.load(Ordering::Relaxed)
    }

    /// The process-wide collector, created on first use.
    #[must_use]
    pub fn global() -> Arc<Telemetry> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Telemetry::new())))
    }
}

impl TelemetrySettings for ProcessTelemetry {
    fn telemetry_enabled(&self) -> bool {
        Self::is_enabled()
    }

    fn telemetry(&self) -> Arc<Telemetry> {
        Self::global()
    }
}

/// Always-on settings backed by a private collector.
#[derive(Debug, Clone, Default)]
pub struct LocalTelemetry(pub Arc<Telemetry>);

impl LocalTelemetry {
    /// Creates settings with a fresh collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The collector.
    #[must_use]
    pub fn collector(&self) -> &Arc<Telemetry> {
        &self.0
    }
}

impl TelemetrySettings for LocalTelemetry {
    fn telemetry_enabled(&self) -> bool {
        true
    }

    fn telemetry(&self) -> Arc<Telemetry> {
        Arc::clone(&self.0)
    }
}

/// Settings with timing switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTelemetry;

impl TelemetrySettings for NoTelemetry {
    fn telemetry_enabled(&self) -> bool {
        false
    }

    fn telemetry(&self) -> Arc<Telemetry> {
        ProcessTelemetry::global()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::thread;

    #[test]
    fn guard_records_on_drop() {
        let telemetry = Telemetry::new();
        {
            let _guard = telemetry.start("Infinite loop statement");
        }
        let samples = telemetry.samples();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].rule, "Infinite loop statement");
    }

    #[test]
    fn guard_records_during_unwinding() {
        let telemetry = Telemetry::new();
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _guard = telemetry.start("Broken");
            panic!("boom");
        }));
        assert!(result.is_err());
        assert_eq!(telemetry.len(), 1);
    }

    #[test]
    fn concurrent_records_are_all_kept() {
        let telemetry = Arc::new(Telemetry::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let telemetry = Arc::clone(&telemetry);
                thread::spawn(move || {
                    for _ in 0..100 {
                        telemetry.record(format!("rule-{}", i % 2), Duration::from_micros(1));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(telemetry.len(), 800);
        let summary = telemetry.summary();
        assert_eq!(summary.len(), 2);
        assert!(summary.iter().all(|t| t.runs == 400));
    }

    #[test]
    fn summary_sorts_by_total() {
        let telemetry = Telemetry::new();
        telemetry.record("fast", Duration::from_millis(1));
        telemetry.record("slow", Duration::from_millis(5));
        telemetry.record("slow", Duration::from_millis(7));
        let summary = telemetry.summary();
        assert_eq!(summary[0].rule, "slow");
        assert_eq!(summary[0].max, Duration::from_millis(7));
        assert_eq!(summary[0].avg(), Duration::from_millis(6));
        assert_eq!(telemetry.drain().len(), 3);
        assert!(telemetry.is_empty());
    }
}
