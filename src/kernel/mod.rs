pub mod router;
pub mod telemetry;

pub use router::{Assistant, TurnOutcome};
