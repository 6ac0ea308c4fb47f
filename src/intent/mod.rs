pub mod aliases;
pub mod classifier;
pub mod direct;
pub mod types;

pub use aliases::ProgramAliases;
pub use classifier::IntentClassifier;
pub use direct::{parse_direct, DirectCommand};
pub use types::{Action, ActionKind, VolumeMode};
