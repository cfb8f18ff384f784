use crate::types::Stage;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

/// Sliding window (≤60s, §4.A) of latency samples for one `(venue, stage)`
/// pair, used to compute a running p99.
struct Window {
    samples: VecDeque<(Instant, Duration)>,
}

impl Window {
    fn new() -> Self {
        Self {
            samples: VecDeque::new(),
        }
    }

    fn record(&mut self, at: Instant, d: Duration, horizon: Duration) {
        self.samples.push_back((at, d));
        while let Some((t, _)) = self.samples.front() {
            if at.duration_since(*t) > horizon {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    fn percentile(&self, p: f64) -> Option<Duration> {
        if self.samples.is_empty() {
            return None;
        }
        let mut durs: Vec<Duration> = self.samples.iter().map(|(_, d)| *d).collect();
        durs.sort();
        let idx = ((durs.len() as f64 - 1.0) * p).round() as usize;
        Some(durs[idx.min(durs.len() - 1)])
    }
}

/// Per-venue latency histograms across the fixed stage enumeration
/// `{order, fetch, score}` (§6 Guards/adapters contract).
pub struct LatencyHistogram {
    horizon: Duration,
    windows: Mutex<HashMap<(String, Stage), Window>>,
}

impl LatencyHistogram {
    pub fn new() -> Self {
        Self::with_horizon(Duration::from_secs(60))
    }

    pub fn with_horizon(horizon: Duration) -> Self {
        Self {
            horizon,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn record(&self, venue: &str, stage: Stage, duration: Duration) {
        let mut guard = self.windows.lock();
        let key = (venue.to_string(), stage);
        let window = guard.entry(key).or_insert_with(Window::new);
        window.record(Instant::now(), duration, self.horizon);
    }

    pub fn p50_ms(&self, venue: &str, stage: Stage) -> Option<f64> {
        self.percentile_ms(venue, stage, 0.50)
    }

    pub fn p99_ms(&self, venue: &str, stage: Stage) -> Option<f64> {
        self.percentile_ms(venue, stage, 0.99)
    }

    fn percentile_ms(&self, venue: &str, stage: Stage, p: f64) -> Option<f64> {
        let mut guard = self.windows.lock();
        let key = (venue.to_string(), stage);
        guard
            .get_mut(&key)
            .and_then(|w| w.percentile(p))
            .map(|d| d.as_secs_f64() * 1000.0)
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn p99_reflects_worst_recent_sample() {
        let h = LatencyHistogram::new();
        for ms in [50, 60, 55, 500, 52] {
            h.record("binance", Stage::Order, Duration::from_millis(ms));
        }
        let p99 = h.p99_ms("binance", Stage::Order).unwrap();
        assert!(p99 >= 500.0);
    }

    #[test]
    fn stages_are_independent() {
        let h = LatencyHistogram::new();
        h.record("binance", Stage::Order, Duration::from_millis(900));
        assert!(h.p99_ms("binance", Stage::Fetch).is_none());
    }

    #[test]
    fn venues_are_independent() {
        let h = LatencyHistogram::new();
        h.record("binance", Stage::Order, Duration::from_millis(900));
        assert!(h.p99_ms("okx", Stage::Order).is_none());
    }

    #[test]
    fn samples_older_than_horizon_are_evicted() {
        let h = LatencyHistogram::with_horizon(Duration::from_millis(0));
        h.record("binance", Stage::Order, Duration::from_millis(100));
        std::thread::sleep(Duration::from_millis(5));
        h.record("binance", Stage::Order, Duration::from_millis(200));
        // The first sample is older than a zero horizon relative to `now` at
        // the second record call, so only the second sample should remain.
        let p50 = h.p50_ms("binance", Stage::Order).unwrap();
        assert_eq!(p50, 200.0);
    }
}
