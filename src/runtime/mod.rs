//! Pipeline orchestration, hysteresis decision, metrics, and the bounded
//! inter-thread queue.

pub mod decision;
pub mod metrics;
pub mod pipeline;
pub mod queue;

pub use decision::{DecisionEngine, PresenceState};
pub use metrics::RuntimeMetrics;
pub use pipeline::Pipeline;
pub use queue::{BackpressurePolicy, BoundedQueue};
