pub mod config;
pub mod error;
pub mod intent;
pub mod kernel;
pub mod memory;
pub mod services;
pub mod wake;

// Re-export specific items if needed for convenient access
pub use error::{Result, RouterError};
pub use kernel::router::{Assistant, TurnOutcome};
