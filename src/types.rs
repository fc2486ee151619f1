//! Core data model: `Frame`, `FrameSignals`, `Window`, `Decision`,
//! `StreamStats`, `Checkpoint`.

use std::collections::VecDeque;

/// A single complex sample, stored as separate 32-bit re/im components to
/// match the wire formats (CSV `re_list;im_list`, JSONL `data_re`/`data_im`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex32 {
    pub re: f32,
    pub im: f32,
}

impl Complex32 {
    pub fn new(re: f32, im: f32) -> Self {
        Self { re, im }
    }

    pub fn abs(self) -> f32 {
        (self.re * self.re + self.im * self.im).sqrt()
    }

    pub fn phase(self) -> f32 {
        self.im.atan2(self.re)
    }
}

impl std::ops::Add for Complex32 {
    type Output = Complex32;
    fn add(self, rhs: Complex32) -> Complex32 {
        Complex32::new(self.re + rhs.re, self.im + rhs.im)
    }
}

/// One raw record from the stream: `data.len() == rx_count * tx_count *
/// subcarrier_count`, indexed `((rx * tx_count + tx) * subcarrier_count + sc)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub timestamp_ns: u64,
    pub center_freq_hz: u64,
    pub rx_count: u8,
    pub tx_count: u8,
    pub subcarrier_count: u16,
    pub data: Vec<Complex32>,
}

impl Frame {
    pub fn expected_len(&self) -> usize {
        self.rx_count as usize * self.tx_count as usize * self.subcarrier_count as usize
    }

    pub fn is_shape_consistent(&self) -> bool {
        self.data.len() == self.expected_len()
    }

    /// Sample at `(rx, tx, sc)` using the source ordering preserved from the
    /// original implementation: `((rx * tx_count + tx) * sc_count + sc)`.
    pub fn sample(&self, rx: usize, tx: usize, sc: usize) -> Complex32 {
        let idx = (rx * self.tx_count as usize + tx) * self.subcarrier_count as usize + sc;
        self.data[idx]
    }
}

/// Per-subcarrier amplitude/phase derived from one `Frame`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSignals {
    pub timestamp_ns: u64,
    pub amplitude_by_sc: Vec<f32>,
    pub phase_by_sc: Vec<f32>,
}

impl FrameSignals {
    pub fn subcarrier_count(&self) -> usize {
        self.amplitude_by_sc.len()
    }
}

/// Bounded FIFO of `FrameSignals`, cleared whenever the subcarrier count of
/// an incoming entry differs from the entries already held.
#[derive(Debug, Clone)]
pub struct Window {
    capacity: usize,
    entries: VecDeque<FrameSignals>,
}

impl Window {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn last_subcarrier_count(&self) -> Option<usize> {
        self.entries.back().map(|e| e.subcarrier_count())
    }

    /// Append, evicting the oldest entry if the window is over capacity.
    pub fn push(&mut self, signals: FrameSignals) {
        self.entries.push_back(signals);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameSignals> {
        self.entries.iter()
    }

    pub fn fill_ratio(&self) -> f32 {
        self.entries.len() as f32 / self.capacity as f32
    }
}

/// Output of one completed window's processing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub timestamp_ns: u64,
    pub energy_motion: f32,
    pub energy_breathing: f32,
    pub present: bool,
}

/// Counters owned and mutated exclusively by the Recovery Stream Reader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub records_total: u64,
    pub records_corrupt_total: u64,
    pub records_partial_total: u64,
    pub rotations_detected_total: u64,
    pub checkpoint_writes_total: u64,
    pub checkpoint_resume_total: u64,
    pub consecutive_errors_current: u64,
}

/// Persisted reader position: `signature offset timestamp_ns`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub signature: String,
    pub offset: u64,
    pub timestamp_ns: u64,
}

impl Checkpoint {
    pub fn to_line(&self) -> String {
        format!("{} {} {}", self.signature, self.offset, self.timestamp_ns)
    }

    pub fn parse_line(line: &str) -> Option<Checkpoint> {
        let mut parts = line.trim().split(' ');
        let signature = parts.next()?.to_string();
        let offset = parts.next()?.parse().ok()?;
        let timestamp_ns = parts.next()?.parse().ok()?;
        Some(Checkpoint {
            signature,
            offset,
            timestamp_ns,
        })
    }
}
