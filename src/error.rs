use std::time::Duration;
use thiserror::Error;

/// Errors crossing the router's public surface.
///
/// Absence of a match is never an error: classification falls back to
/// `Action::Conversation` and wake detection to `matched: false`.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Input the router cannot interpret at all (non UTF-8 transcript,
    /// nonsensical configuration). Fatal to that call only.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A cascade tier is not reachable. Recovered by fallthrough.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A cascade tier answered, but with an error or unusable output.
    #[error("backend failed: {0}")]
    BackendFailed(String),

    #[error("backend timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RouterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let skipped = RouterError::BackendUnavailable("Local tier failed its probe".to_string());
        assert_eq!(skipped.to_string(), "backend unavailable: Local tier failed its probe");
        assert_eq!(
            RouterError::Timeout(Duration::from_millis(200)).to_string(),
            "backend timed out after 200ms"
        );
    }
}
