//! AetherSense: a streaming Channel State Information (CSI) presence-
//! detection pipeline. Recovers a record stream from a possibly rotating
//! file, maintains a sliding window of per-subcarrier amplitude/phase
//! signals, and emits a hysteretic presence decision per completed window.

pub mod config;
pub mod dsp;
pub mod error;
pub mod io;
pub mod runtime;
pub mod types;
pub mod util;

pub use config::Config;
pub use error::{AetherError, Result};
pub use types::{Checkpoint, Complex32, Decision, Frame, FrameSignals, StreamStats, Window};
