//! Per-turn telemetry.
//!
//! Read-only side channel: routing decisions never consult it.
//! Events carry ids, kinds, counts and durations only, never user text.

pub mod event;
pub mod metrics;
pub mod recorder;

pub use event::{TelemetryEvent, TurnId};
pub use metrics::TelemetrySnapshot;
pub use recorder::TelemetryRecorder;
