//! Typed, `serde`-deserializable configuration mirroring the dotted schema
//! in the external interface description. Enum-valued fields stay as plain
//! `String`s, validated imperatively in [`Config::validate`], matching the
//! source system's own string-based config rather than tagged Rust enums.

use serde::Deserialize;
use std::path::Path;

use crate::error::{AetherError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    pub format: String,
    pub path: String,
    pub mode: String,
    pub start_position: String,
    pub rotate_handling: String,
    pub max_corrupt_ratio: f32,
    pub max_partial_line_bytes: usize,
    pub poll_interval_ms: u64,
    pub max_consecutive_errors: u64,
    pub checkpoint_path: String,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            format: "csv".to_string(),
            path: String::new(),
            mode: "file".to_string(),
            start_position: "begin".to_string(),
            rotate_handling: "reopen".to_string(),
            max_corrupt_ratio: 0.25,
            max_partial_line_bytes: 65536,
            poll_interval_ms: 200,
            max_consecutive_errors: 20,
            checkpoint_path: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub alpha: f32,
    pub kernel: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            kind: "ema".to_string(),
            alpha: 0.3,
            kernel: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FftConfig {
    pub window: String,
    pub zero_pad_pow2: bool,
}

impl Default for FftConfig {
    fn default() -> Self {
        Self {
            window: "hann".to_string(),
            zero_pad_pow2: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResamplingConfig {
    pub method: String,
    pub reject_jitter_ratio: f32,
}

impl Default for ResamplingConfig {
    fn default() -> Self {
        Self {
            method: "linear".to_string(),
            reject_jitter_ratio: 0.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutlierConfig {
    pub method: String,
    pub k: f32,
    pub window: usize,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            method: "mad".to_string(),
            k: 3.0,
            window: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BandConfig {
    pub enabled: bool,
    pub low_hz: f32,
    pub high_hz: f32,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            low_hz: 0.5,
            high_hz: 3.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BandsConfig {
    pub motion: BandConfig,
    pub breathing: BandConfig,
}

impl Default for BandsConfig {
    fn default() -> Self {
        Self {
            motion: BandConfig {
                enabled: true,
                low_hz: 0.5,
                high_hz: 3.0,
            },
            breathing: BandConfig {
                enabled: false,
                low_hz: 0.2,
                high_hz: 0.5,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DspConfig {
    pub window_frames: usize,
    pub topk_subcarriers: usize,
    pub smoothing: SmoothingConfig,
    pub fft: FftConfig,
    pub resampling: ResamplingConfig,
    pub outlier: OutlierConfig,
    pub bands: BandsConfig,
}

impl Default for DspConfig {
    fn default() -> Self {
        Self {
            window_frames: 64,
            topk_subcarriers: 4,
            smoothing: SmoothingConfig::default(),
            fft: FftConfig::default(),
            resampling: ResamplingConfig::default(),
            outlier: OutlierConfig::default(),
            bands: BandsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    pub threshold_on: f32,
    pub threshold_off: f32,
    pub hold_frames: u32,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            threshold_on: 1.0,
            threshold_off: 0.5,
            hold_frames: 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub ring_buffer_capacity_frames: usize,
    pub max_batch_frames: usize,
    pub clock: String,
    pub max_jitter_ratio: f32,
    pub backpressure: String,
    pub report_every_seconds: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            ring_buffer_capacity_frames: 64,
            max_batch_frames: 16,
            clock: "from_input".to_string(),
            max_jitter_ratio: 0.5,
            backpressure: "block".to_string(),
            report_every_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub io: IoConfig,
    pub dsp: DspConfig,
    pub decision: DecisionConfig,
    pub runtime: RuntimeConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load and validate in one step, mirroring the source loader's
    /// load-then-validate contract.
    pub fn from_json_file(path: &Path) -> Result<Config> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AetherError::InvalidConfig(format!("cannot open config {}: {e}", path.display())))?;
        let cfg: Config = serde_json::from_str(&text)
            .map_err(|e| AetherError::InvalidConfig(format!("malformed config json: {e}")))?;
        cfg.validate(false)?;
        Ok(cfg)
    }

    /// Validate every schema rule, in the same order the field checks
    /// appear in the external interface description, returning on the
    /// first violation.
    pub fn validate(&self, require_existing_path: bool) -> Result<()> {
        let invalid = |msg: String| AetherError::InvalidConfig(msg);

        if self.io.format != "csv" && self.io.format != "jsonl" {
            return Err(invalid("io.format must be csv|jsonl".into()));
        }
        if self.io.mode != "file" && self.io.mode != "tail" {
            return Err(invalid("io.mode must be file|tail".into()));
        }
        if !["begin", "end", "checkpoint"].contains(&self.io.start_position.as_str()) {
            return Err(invalid("invalid io.start_position".into()));
        }
        if self.io.rotate_handling != "reopen" && self.io.rotate_handling != "error" {
            return Err(invalid("invalid io.rotate_handling".into()));
        }
        if !(0.0..=1.0).contains(&self.io.max_corrupt_ratio) {
            return Err(invalid("io.max_corrupt_ratio must be in [0,1]".into()));
        }
        if self.io.max_partial_line_bytes == 0 {
            return Err(invalid("io.max_partial_line_bytes must be > 0".into()));
        }
        if self.io.poll_interval_ms == 0 || self.io.max_consecutive_errors == 0 {
            return Err(invalid("io polling/error thresholds must be > 0".into()));
        }

        if self.dsp.window_frames < 16 {
            return Err(invalid("dsp.window_frames must be >= 16".into()));
        }
        if self.dsp.topk_subcarriers < 1 {
            return Err(invalid("dsp.topk_subcarriers must be >= 1".into()));
        }
        match self.dsp.smoothing.kind.as_str() {
            "ema" => {
                if !(self.dsp.smoothing.alpha > 0.0 && self.dsp.smoothing.alpha <= 1.0) {
                    return Err(invalid("dsp.smoothing.alpha must be in (0,1]".into()));
                }
            }
            "median" => {
                if self.dsp.smoothing.kernel < 3 || self.dsp.smoothing.kernel % 2 == 0 {
                    return Err(invalid("dsp.smoothing.kernel must be odd and >= 3".into()));
                }
            }
            _ => return Err(invalid("dsp.smoothing.type must be ema|median".into())),
        }
        if self.dsp.fft.window != "hann" && self.dsp.fft.window != "hamming" {
            return Err(invalid("dsp.fft.window must be hann|hamming".into()));
        }
        if self.dsp.resampling.method != "linear" && self.dsp.resampling.method != "nearest" {
            return Err(invalid("dsp.resampling.method unsupported".into()));
        }
        if self.dsp.resampling.reject_jitter_ratio < 0.0 {
            return Err(invalid("dsp.resampling.reject_jitter_ratio must be >= 0".into()));
        }
        if self.dsp.outlier.method != "mad" && self.dsp.outlier.method != "hampel" {
            return Err(invalid("dsp.outlier.method unsupported".into()));
        }
        if self.dsp.outlier.k <= 0.0 {
            return Err(invalid("dsp.outlier.k must be > 0".into()));
        }
        if self.dsp.outlier.window < 3 {
            return Err(invalid("dsp.outlier.window must be >= 3".into()));
        }
        if !(self.dsp.bands.motion.low_hz > 0.0 && self.dsp.bands.motion.low_hz < self.dsp.bands.motion.high_hz) {
            return Err(invalid("dsp.bands.motion must have 0 < low_hz < high_hz".into()));
        }
        if self.dsp.bands.breathing.enabled
            && !(self.dsp.bands.breathing.low_hz > 0.0
                && self.dsp.bands.breathing.low_hz < self.dsp.bands.breathing.high_hz)
        {
            return Err(invalid("dsp.bands.breathing must have 0 < low_hz < high_hz".into()));
        }

        if self.decision.threshold_off >= self.decision.threshold_on {
            return Err(invalid("decision.threshold_off must be < threshold_on".into()));
        }

        if self.runtime.ring_buffer_capacity_frames < 8 {
            return Err(invalid("runtime.ring_buffer_capacity_frames must be >= 8".into()));
        }
        if self.runtime.max_batch_frames > self.runtime.ring_buffer_capacity_frames {
            return Err(invalid("runtime.max_batch_frames must be <= capacity".into()));
        }
        if self.runtime.clock != "monotonic" && self.runtime.clock != "from_input" {
            return Err(invalid("runtime.clock must be monotonic|from_input".into()));
        }
        if !(0.0..=1.0).contains(&self.runtime.max_jitter_ratio) {
            return Err(invalid("runtime.max_jitter_ratio must be in [0,1]".into()));
        }
        if !["block", "drop_oldest", "drop_newest"].contains(&self.runtime.backpressure.as_str()) {
            return Err(invalid("runtime.backpressure must be block|drop_oldest|drop_newest".into()));
        }
        if self.runtime.report_every_seconds == 0 {
            return Err(invalid("runtime.report_every_seconds must be > 0".into()));
        }

        if require_existing_path && !Path::new(&self.io.path).exists() {
            return Err(AetherError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("io.path does not exist: {}", self.io.path),
            )));
        }

        Ok(())
    }
}
