//! Per-run instrumentation: named counters and named wall-clock timers.
//!
//! A [`Metrics`] value is created once per top-level run and passed as
//! `&mut Metrics` into every pipeline stage. There is no global or
//! thread-local state; the caller owns the only handle.
//!
//! Counter names used by the pipeline:
//!
//! | Counter              | Incremented by |
//! |----------------------|----------------|
//! | `scc.dfs1.visits`    | finish-order pass, per vertex |
//! | `scc.dfs1.edges`     | finish-order pass, per edge examined |
//! | `scc.dfs2.visits`    | assignment pass, per vertex |
//! | `scc.dfs2.edges`     | assignment pass, per edge examined |
//! | `topo.dfs.visits`    | topological sort, per vertex |
//! | `topo.dfs.edges`     | topological sort, per edge examined |
//! | `dagsp.relaxations`  | path finder, per edge relaxed |

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::time::{Duration, Instant};

use serde_json::json;

/// Elapsed time recorded for one named timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timing {
    /// Timer name as passed to [`Metrics::start`].
    pub name: String,
    /// Time between the last `start` and `stop` calls.
    pub elapsed: Duration,
}

/// Named counters and timers for a single analysis run.
#[derive(Debug, Default)]
pub struct Metrics {
    counters: HashMap<String, u64>,
    running: HashMap<String, Instant>,
    timings: Vec<Timing>,
}

impl Metrics {
    /// Create an empty metrics bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the timer `name`.
    pub fn start(&mut self, name: &str) {
        self.running.insert(name.to_string(), Instant::now());
    }

    /// Stop the timer `name` and record its elapsed time.
    ///
    /// Stopping a timer that was never started does nothing. Stopping the
    /// same timer again overwrites its elapsed time but keeps its position
    /// in the report.
    pub fn stop(&mut self, name: &str) {
        let Some(started) = self.running.get(name) else {
            return;
        };
        let elapsed = started.elapsed();

        if let Some(existing) = self.timings.iter_mut().find(|t| t.name == name) {
            existing.elapsed = elapsed;
        } else {
            self.timings.push(Timing {
                name: name.to_string(),
                elapsed,
            });
        }
    }

    /// Run `f` between `start(name)` and `stop(name)`.
    pub fn timed<R>(&mut self, name: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.start(name);
        let result = f(self);
        self.stop(name);
        result
    }

    /// Add one to the counter `name`.
    pub fn increment(&mut self, name: &str) {
        self.increment_by(name, 1);
    }

    /// Add `amount` to the counter `name`, treating an absent counter as zero.
    pub fn increment_by(&mut self, name: &str, amount: u64) {
        if let Some(value) = self.counters.get_mut(name) {
            *value = value.saturating_add(amount);
        } else {
            self.counters.insert(name.to_string(), amount);
        }
    }

    /// Current value of the counter `name` (zero when never incremented).
    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// All counters, sorted by name.
    #[must_use]
    pub fn counters(&self) -> BTreeMap<&str, u64> {
        self.counters
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
            .collect()
    }

    /// Recorded timer, if `name` has been stopped at least once.
    #[must_use]
    pub fn timing(&self, name: &str) -> Option<Duration> {
        self.timings
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.elapsed)
    }

    /// Recorded timers in the order they were first stopped.
    #[must_use]
    pub fn timings(&self) -> &[Timing] {
        &self.timings
    }

    /// Render counters, then timers in milliseconds, as a text block.
    #[must_use]
    pub fn report(&self) -> String {
        let mut out = String::from("Counters:\n");
        for (name, value) in self.counters() {
            let _ = writeln!(out, "  {name:<25}: {value}");
        }
        out.push_str("\nTimings:\n");
        for timing in &self.timings {
            let _ = writeln!(
                out,
                "  {:<25}: {:.4} ms",
                timing.name,
                duration_millis(timing.elapsed)
            );
        }
        out
    }

    /// Render the same data as [`Metrics::report`] as JSON.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let timings = self
            .timings
            .iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "elapsed_us": t.elapsed.as_micros(),
                })
            })
            .collect::<Vec<_>>();

        json!({
            "counters": self.counters(),
            "timings": timings,
        })
    }
}

fn duration_millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}
