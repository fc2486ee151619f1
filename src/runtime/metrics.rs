//! Counters plus a bounded FIFO of recent per-frame processing times, used
//! for percentile latency reporting.

use std::collections::VecDeque;

const LATENCY_WINDOW: usize = 64;

#[derive(Debug, Clone, Default)]
pub struct RuntimeMetrics {
    pub frames_read_total: u64,
    pub frames_processed_total: u64,
    pub frames_dropped_total: u64,
    pub windows_rejected_total: u64,
    pub shape_change_total: u64,
    pub window_fill_ratio: f32,
    latencies_us: VecDeque<u64>,
}

impl RuntimeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one processing-time sample, evicting the oldest once the
    /// window exceeds its fixed capacity.
    pub fn record_latency_us(&mut self, micros: u64) {
        self.latencies_us.push_back(micros);
        while self.latencies_us.len() > LATENCY_WINDOW {
            self.latencies_us.pop_front();
        }
    }

    /// `p`-th percentile (0..=100) of the retained latency samples;
    /// `sorted[floor(p/100*(n-1))]`, or 0 when empty.
    pub fn percentile(&self, p: f32) -> u64 {
        if self.latencies_us.is_empty() {
            return 0;
        }
        let mut sorted: Vec<u64> = self.latencies_us.iter().copied().collect();
        sorted.sort_unstable();
        let n = sorted.len();
        let idx = ((p / 100.0) * (n as f32 - 1.0)).floor() as usize;
        sorted[idx.min(n - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_of_empty_is_zero() {
        let m = RuntimeMetrics::new();
        assert_eq!(m.percentile(50.0), 0);
    }

    #[test]
    fn window_is_bounded_to_64_samples() {
        let mut m = RuntimeMetrics::new();
        for i in 0..100u64 {
            m.record_latency_us(i);
        }
        assert_eq!(m.latencies_us.len(), 64);
        assert_eq!(*m.latencies_us.front().unwrap(), 36);
    }

    #[test]
    fn p100_is_max() {
        let mut m = RuntimeMetrics::new();
        for v in [5, 1, 9, 3] {
            m.record_latency_us(v);
        }
        assert_eq!(m.percentile(100.0), 9);
        assert_eq!(m.percentile(0.0), 1);
    }
}
