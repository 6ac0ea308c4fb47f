pub mod detector;
pub mod fuzzy;

pub use detector::{MatchResult, WakePhraseDetector, WakeWordConfig};
pub use fuzzy::similarity;
