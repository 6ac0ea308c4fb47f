use async_trait::async_trait;
use std::sync::Arc;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::SpeechSettings;

/// Text-to-speech collaborator.
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str) -> anyhow::Result<()>;
}

/// Speaks by running an external program (`say`, `espeak`) with the text.
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    program: String,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl Speaker for CommandSpeaker {
    async fn speak(&self, text: &str) -> anyhow::Result<()> {
        let status = Command::new(&self.program)
            .arg(text)
            .kill_on_drop(true)
            .status()
            .await?;
        if !status.success() {
            anyhow::bail!("{} exited with {}", self.program, status);
        }
        Ok(())
    }
}

/// Hands finished responses to the speaker without blocking the turn loop.
///
/// Each dispatch owns its copy of the text. Cancelling the shutdown token
/// abandons whatever is still playing.
#[derive(Clone)]
pub struct SpeechDispatcher {
    speaker: Option<Arc<dyn Speaker>>,
    shutdown: CancellationToken,
}

impl SpeechDispatcher {
    pub fn new(speaker: Arc<dyn Speaker>) -> Self {
        Self {
            speaker: Some(speaker),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            speaker: None,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn from_settings(settings: &SpeechSettings) -> Self {
        if settings.enabled {
            Self::new(Arc::new(CommandSpeaker::new(settings.program.clone())))
        } else {
            Self::disabled()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.speaker.is_some()
    }

    /// Fire and forget. Returns the task handle for callers that care
    /// (tests), `None` when speech is disabled or the text is blank.
    pub fn dispatch(&self, text: &str) -> Option<JoinHandle<()>> {
        let speaker = self.speaker.clone()?;
        let text = text.trim().to_string();
        if text.is_empty() {
            return None;
        }
        let shutdown = self.shutdown.clone();

        Some(tokio::spawn(async move {
            tokio::select! {
                result = speaker.speak(&text) => {
                    if let Err(e) = result {
                        warn!("speech failed: {:#}", e);
                    }
                }
                _ = shutdown.cancelled() => {
                    debug!("speech abandoned on shutdown");
                }
            }
        }))
    }

    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
