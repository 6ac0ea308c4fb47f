pub mod cascade;
pub mod client;
pub mod fallback;
pub mod remote;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use cascade::{CascadeMode, CascadeState, ResponseCascade};
pub use client::LocalLlm;
pub use fallback::FallbackResponder;
pub use remote::RemoteLlm;

/// Which tier produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    Local,
    Remote,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendResult {
    pub text: String,
    pub source: SourceTag,
}

/// Persona wrapped around the user's words by the generative tiers.
pub const PERSONA: &str =
    "Eres JARVIS en español. Responde de forma cortés y proactiva de manera concisa (máximo 2-3 oraciones).";

pub fn persona_prompt(user_text: &str) -> String {
    format!("{}\nUsuario: {}\nJARVIS:", PERSONA, user_text)
}

/// A generative tier of the cascade.
#[async_trait]
pub trait ResponseProvider: Send + Sync {
    fn tag(&self) -> SourceTag;

    /// Whether the tier can be used at all. Called once per cascade lifetime
    /// (or after a reset), never during generation.
    async fn probe(&self) -> bool;

    async fn try_generate(&self, prompt: &str, max_tokens: usize) -> Result<String>;
}
