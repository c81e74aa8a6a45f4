//! Opt-in wall-clock timing of named pipeline steps.
//!
//! Loaders, engines and the sink wrap their work in [`timed`] with a dotted
//! name such as `graph.load` or `engine.pagerank`. Nothing is recorded unless
//! collection was switched on with [`set_timing_enabled`] (the CLI does so for
//! `--timing` or `CENTRA_TIMING=1`). The part before the first dot is the
//! stage; [`TimingReport::stages`] sums samples per stage.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};

/// One recorded step.
#[derive(Debug, Clone)]
struct Sample {
    step: String,
    elapsed: Duration,
}

// Engines may run inside rayon workers, so samples live in one shared
// buffer rather than per thread.
static SAMPLES: Mutex<Vec<Sample>> = Mutex::new(Vec::new());
static ENABLED: AtomicBool = AtomicBool::new(false);

/// Aggregated durations of one step name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepTiming {
    pub step: String,
    pub count: usize,
    #[serde(rename = "total_us", serialize_with = "as_micros")]
    pub total: Duration,
    #[serde(rename = "p50_us", serialize_with = "as_micros")]
    pub p50: Duration,
    #[serde(rename = "p95_us", serialize_with = "as_micros")]
    pub p95: Duration,
    #[serde(rename = "p99_us", serialize_with = "as_micros")]
    pub p99: Duration,
}

impl StepTiming {
    /// Stage prefix of the step name (`engine` for `engine.closeness`).
    #[must_use]
    pub fn stage(&self) -> &str {
        self.step.split('.').next().unwrap_or(&self.step)
    }
}

/// Aggregated timings, one row per step name in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimingReport {
    pub steps: Vec<StepTiming>,
}

/// Returns true when `CENTRA_TIMING` is set to `1`, `true`, `yes` or `on`.
#[must_use]
pub fn timing_enabled_from_env() -> bool {
    std::env::var("CENTRA_TIMING").is_ok_and(|value| {
        matches!(
            value.to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

/// Enable or disable collection. Disabling drops recorded samples.
pub fn set_timing_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
    if !enabled {
        clear_timings();
    }
}

#[must_use]
pub fn is_timing_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

pub fn clear_timings() {
    samples().clear();
}

/// Run `f`, recording its duration under `step` when collection is on.
pub fn timed<R>(step: &str, f: impl FnOnce() -> R) -> R {
    if !is_timing_enabled() {
        return f();
    }

    let started = Instant::now();
    let result = f();
    let elapsed = started.elapsed();
    samples().push(Sample {
        step: step.to_string(),
        elapsed,
    });
    result
}

/// Drain recorded samples into a report.
#[must_use]
pub fn collect_report() -> TimingReport {
    let drained = std::mem::take(&mut *samples());

    let mut by_step: BTreeMap<String, Vec<Duration>> = BTreeMap::new();
    for sample in drained {
        by_step.entry(sample.step).or_default().push(sample.elapsed);
    }

    let steps = by_step
        .into_iter()
        .map(|(step, mut durations)| {
            durations.sort_unstable();
            StepTiming {
                count: durations.len(),
                total: durations.iter().sum(),
                p50: nearest_rank(&durations, 50),
                p95: nearest_rank(&durations, 95),
                p99: nearest_rank(&durations, 99),
                step,
            }
        })
        .collect();

    TimingReport { steps }
}

impl TimingReport {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Total time per stage prefix, in stage name order.
    #[must_use]
    pub fn stages(&self) -> Vec<(&str, Duration)> {
        let mut totals: BTreeMap<&str, Duration> = BTreeMap::new();
        for step in &self.steps {
            *totals.entry(step.stage()).or_default() += step.total;
        }
        totals.into_iter().collect()
    }

    /// Fixed-width table of every step followed by the stage totals.
    #[must_use]
    pub fn display_table(&self) -> String {
        if self.steps.is_empty() {
            return "no timing samples recorded".to_string();
        }

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<24} {:>5} {:>11} {:>11} {:>11} {:>11}",
            "step", "count", "total", "p50", "p95", "p99"
        );
        for step in &self.steps {
            let _ = writeln!(
                out,
                "{:<24} {:>5} {:>11} {:>11} {:>11} {:>11}",
                step.step,
                step.count,
                human(step.total),
                human(step.p50),
                human(step.p95),
                human(step.p99),
            );
        }
        for (stage, total) in self.stages() {
            let _ = writeln!(out, "{:<24} {:>5} {:>11}", format!("[{stage}]"), "", human(total));
        }
        out
    }
}

fn samples() -> std::sync::MutexGuard<'static, Vec<Sample>> {
    SAMPLES.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Nearest-rank percentile of an ascending, non-empty slice.
fn nearest_rank(sorted: &[Duration], percent: usize) -> Duration {
    let rank = (percent * sorted.len()).div_ceil(100).max(1);
    sorted[rank.min(sorted.len()) - 1]
}

fn human(duration: Duration) -> String {
    let micros = duration.as_micros();
    match micros {
        0..1_000 => format!("{micros}µs"),
        1_000..1_000_000 => format!("{:.3}ms", duration.as_secs_f64() * 1e3),
        _ => format!("{:.3}s", duration.as_secs_f64()),
    }
}

fn as_micros<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u128(duration.as_micros())
}

#[cfg(test)]
mod tests {
    use super::*;

    static TEST_GUARD: Mutex<()> = Mutex::new(());

    fn step(name: &str, micros: u64) -> StepTiming {
        let d = Duration::from_micros(micros);
        StepTiming {
            step: name.to_string(),
            count: 1,
            total: d,
            p50: d,
            p95: d,
            p99: d,
        }
    }

    #[test]
    fn nothing_recorded_while_disabled() {
        let _guard = TEST_GUARD.lock().expect("test guard lock");
        set_timing_enabled(false);

        assert_eq!(timed("engine.closeness", || 7_u8), 7);
        assert!(collect_report().is_empty());
    }

    #[test]
    fn samples_group_by_step_name() {
        let _guard = TEST_GUARD.lock().expect("test guard lock");
        set_timing_enabled(true);
        clear_timings();

        timed("engine.closeness", || std::thread::sleep(Duration::from_millis(1)));
        timed("engine.closeness", || std::thread::sleep(Duration::from_millis(1)));
        timed("graph.load", || ());

        let report = collect_report();
        set_timing_enabled(false);

        assert_eq!(report.steps.len(), 2);
        assert_eq!(report.steps[0].step, "engine.closeness");
        assert_eq!(report.steps[0].count, 2);
        assert!(report.steps[0].total >= Duration::from_millis(2));
        assert!(report.steps[0].p99 >= report.steps[0].p50);
        assert!(collect_report().is_empty(), "collect drains the buffer");
    }

    #[test]
    fn stages_sum_their_steps() {
        let report = TimingReport {
            steps: vec![
                step("engine.betweenness", 300),
                step("engine.pagerank", 200),
                step("graph.load", 50),
            ],
        };
        assert_eq!(
            report.stages(),
            vec![
                ("engine", Duration::from_micros(500)),
                ("graph", Duration::from_micros(50)),
            ]
        );
        assert!(report.display_table().contains("[engine]"));
    }

    #[test]
    fn json_uses_microseconds() {
        let report = TimingReport {
            steps: vec![step("sink.write", 1_500)],
        };
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["steps"][0]["step"], "sink.write");
        assert_eq!(json["steps"][0]["total_us"], 1_500);
    }

    #[test]
    fn nearest_rank_percentiles() {
        let sorted: Vec<Duration> = (1..=100).map(Duration::from_millis).collect();
        assert_eq!(nearest_rank(&sorted, 50), Duration::from_millis(50));
        assert_eq!(nearest_rank(&sorted, 99), Duration::from_millis(99));
        assert_eq!(nearest_rank(&sorted[..1], 95), Duration::from_millis(1));
    }

    #[test]
    fn durations_pick_a_readable_unit() {
        assert_eq!(human(Duration::from_micros(12)), "12µs");
        assert_eq!(human(Duration::from_micros(1_500)), "1.500ms");
        assert_eq!(human(Duration::from_millis(2_250)), "2.250s");
    }

    #[test]
    fn empty_report_renders_placeholder() {
        assert_eq!(
            TimingReport::default().display_table(),
            "no timing samples recorded"
        );
    }
}
