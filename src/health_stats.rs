//! Health statistics for the inspector server.
//!
//! Tracks HTTP requests and snapshot fetch outcomes so `/health` can report
//! whether the configured worker is reachable.

use std::fmt::Write as FmtWrite;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

/// Running statistics for a single metric.
#[derive(Clone, Copy, Default)]
pub struct RunningStat {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
    last: f64,
}

impl RunningStat {
    pub fn add(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.sum += value;
        self.last = value;
    }

    pub fn avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / (self.count as f64)
        }
    }
}

/// Thread-safe wrapper for running statistics.
#[derive(Default)]
pub struct Stat {
    inner: Mutex<RunningStat>,
}

impl Stat {
    pub fn add_sample(&self, value: f64) {
        if let Ok(mut s) = self.inner.lock() {
            s.add(value);
        }
    }

    /// `(last, avg, max, min, count)`
    pub fn snapshot(&self) -> (f64, f64, f64, f64, u64) {
        if let Ok(s) = self.inner.lock() {
            (s.last, s.avg(), s.max, s.min, s.count)
        } else {
            (0.0, 0.0, 0.0, 0.0, 0)
        }
    }
}

/// Counters shared by all request handlers.
pub struct HealthStats {
    pub http_requests_total: AtomicU64,
    pub fetch_success_count: AtomicU64,
    pub fetch_failure_count: AtomicU64,
    pub fetch_duration_seconds: Stat,
    pub threads_per_snapshot: Stat,
    start_time: Instant,
}

impl Default for HealthStats {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthStats {
    pub fn new() -> Self {
        Self {
            http_requests_total: AtomicU64::new(0),
            fetch_success_count: AtomicU64::new(0),
            fetch_failure_count: AtomicU64::new(0),
            fetch_duration_seconds: Stat::default(),
            threads_per_snapshot: Stat::default(),
            start_time: Instant::now(),
        }
    }

    pub fn record_http_request(&self) {
        self.http_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_success(&self, duration_seconds: f64, threads: usize) {
        self.fetch_success_count.fetch_add(1, Ordering::Relaxed);
        self.fetch_duration_seconds.add_sample(duration_seconds);
        self.threads_per_snapshot.add_sample(threads as f64);
    }

    pub fn record_fetch_failure(&self) {
        self.fetch_failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// True unless every fetch so far has failed.
    pub fn is_healthy(&self) -> bool {
        let failures = self.fetch_failure_count.load(Ordering::Relaxed);
        let successes = self.fetch_success_count.load(Ordering::Relaxed);
        failures == 0 || successes > 0
    }

    /// Renders a plain-text table of all counters.
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        writeln!(
            out,
            "{:28} | {:>10} | {:>10} | {:>10} | {:>10}",
            "Metric", "Last", "Avg", "Max", "Min"
        )
        .ok();
        writeln!(out, "{}", "-".repeat(80)).ok();

        for (name, stat) in [
            ("fetch_duration_seconds", &self.fetch_duration_seconds),
            ("threads_per_snapshot", &self.threads_per_snapshot),
        ] {
            let (last, avg, max, min, _) = stat.snapshot();
            writeln!(
                out,
                "{:28} | {:>10.3} | {:>10.3} | {:>10.3} | {:>10.3}",
                name, last, avg, max, min
            )
            .ok();
        }

        writeln!(out).ok();
        writeln!(
            out,
            "http_requests_total: {}",
            self.http_requests_total.load(Ordering::Relaxed)
        )
        .ok();
        writeln!(
            out,
            "snapshot_fetch_success: {}",
            self.fetch_success_count.load(Ordering::Relaxed)
        )
        .ok();
        writeln!(
            out,
            "snapshot_fetch_failure: {}",
            self.fetch_failure_count.load(Ordering::Relaxed)
        )
        .ok();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stat() {
        let mut stat = RunningStat::default();
        stat.add(2.0);
        stat.add(4.0);
        assert_eq!(stat.avg(), 3.0);
        assert_eq!(stat.min, 2.0);
        assert_eq!(stat.max, 4.0);
        assert_eq!(stat.last, 4.0);
    }

    #[test]
    fn test_health_follows_fetch_outcomes() {
        let stats = HealthStats::new();
        assert!(stats.is_healthy());

        stats.record_fetch_failure();
        assert!(!stats.is_healthy());

        stats.record_fetch_success(0.2, 150);
        assert!(stats.is_healthy());

        let table = stats.render_table();
        assert!(table.contains("snapshot_fetch_success: 1"));
        assert!(table.contains("snapshot_fetch_failure: 1"));
    }
}
