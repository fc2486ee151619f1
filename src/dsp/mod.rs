//! Pure numeric DSP primitives used by the pipeline engine. Every function
//! here allocates its output rather than mutating its input, except where
//! noted (outlier filtering and CPE removal operate in place on owned
//! buffers the pipeline already holds exclusively).

pub mod fft;
pub mod outlier;
pub mod phase;
pub mod resample;
pub mod smoothing;
pub mod stats;
pub mod topk;
pub mod window;
