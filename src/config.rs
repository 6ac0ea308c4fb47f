use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::wake::detector::{default_phrases, DEFAULT_THRESHOLD};

pub const DEFAULT_LLAMA_SERVER_URL: &str = "http://localhost:8080";
pub const DEFAULT_REMOTE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_MAX_TOKENS: usize = 256;
pub const DEFAULT_TIER_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WakeSettings {
    pub phrases: Vec<String>,
    pub threshold: f64,
}

impl Default for WakeSettings {
    fn default() -> Self {
        Self {
            phrases: default_phrases(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// llama.cpp `llama-server` serving a local model file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalLlmConfig {
    pub model_path: Option<PathBuf>,
    pub base_url: String,
}

impl Default for LocalLlmConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            base_url: DEFAULT_LLAMA_SERVER_URL.to_string(),
        }
    }
}

/// Hosted inference endpoint (Hugging Face style).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteLlmConfig {
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechSettings {
    pub enabled: bool,
    /// Program invoked with the text as its only argument.
    pub program: String,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        let program = if cfg!(target_os = "macos") { "say" } else { "espeak" };
        Self {
            enabled: true,
            program: program.to_string(),
        }
    }
}

/// Read once at startup; nothing reloads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    pub wake: WakeSettings,
    pub local: LocalLlmConfig,
    pub remote: Option<RemoteLlmConfig>,
    pub max_tokens: usize,
    pub tier_timeout_secs: u64,
    pub memory_path: PathBuf,
    pub speech: SpeechSettings,
    pub confirm_actions: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            wake: WakeSettings::default(),
            local: LocalLlmConfig::default(),
            remote: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            tier_timeout_secs: DEFAULT_TIER_TIMEOUT_SECS,
            memory_path: PathBuf::from("assistant_data").join("memory.json"),
            speech: SpeechSettings::default(),
            confirm_actions: false,
        }
    }
}

impl AssistantConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset or blank keys keep the
    /// default; unparsable numbers keep the default and log a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(phrases) = get("JARVIS_WAKE_PHRASES") {
            config.wake.phrases = phrases.split(',').map(|p| p.trim().to_string()).collect();
        }
        if let Some(v) = get("JARVIS_WAKE_THRESHOLD") {
            config.wake.threshold = parse_or("JARVIS_WAKE_THRESHOLD", &v, DEFAULT_THRESHOLD);
        }

        config.local.model_path = get("MODEL_PATH").map(PathBuf::from);
        if let Some(url) = get("LLAMA_SERVER_URL") {
            config.local.base_url = url;
        }

        if let (Some(model), Some(api_key)) = (get("REMOTE_LLM_MODEL"), get("HF_API_TOKEN")) {
            config.remote = Some(RemoteLlmConfig {
                model,
                api_key,
                base_url: get("REMOTE_LLM_URL").unwrap_or_else(|| DEFAULT_REMOTE_URL.to_string()),
            });
        }

        if let Some(v) = get("JARVIS_MAX_TOKENS") {
            config.max_tokens = parse_or("JARVIS_MAX_TOKENS", &v, DEFAULT_MAX_TOKENS);
        }
        if let Some(v) = get("JARVIS_TIER_TIMEOUT_SECS") {
            config.tier_timeout_secs =
                parse_or("JARVIS_TIER_TIMEOUT_SECS", &v, DEFAULT_TIER_TIMEOUT_SECS);
        }
        if let Some(path) = get("JARVIS_MEMORY_PATH") {
            config.memory_path = PathBuf::from(path);
        }
        if let Some(program) = get("JARVIS_TTS_PROGRAM") {
            config.speech.program = program;
        }
        if let Some(v) = get("JARVIS_NO_TTS") {
            config.speech.enabled = !truthy(&v);
        }
        if let Some(v) = get("JARVIS_CONFIRM_ACTIONS") {
            config.confirm_actions = truthy(&v);
        }

        config
    }

    pub fn tier_timeout(&self) -> Duration {
        Duration::from_secs(self.tier_timeout_secs)
    }
}

fn truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "y")
}

fn parse_or<T: std::str::FromStr + Copy>(key: &str, value: &str, default: T) -> T {
    match value.parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(key, value, "unparsable config value, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = AssistantConfig::from_lookup(|_| None);
        assert_eq!(config.wake.phrases[0], "hey jarvis");
        assert_eq!(config.wake.threshold, 0.70);
        assert!(config.local.model_path.is_none());
        assert!(config.remote.is_none());
        assert_eq!(config.max_tokens, 256);
    }

    #[test]
    fn test_remote_requires_model_and_token() {
        let config = AssistantConfig::from_lookup(lookup(&[("REMOTE_LLM_MODEL", "mistral")]));
        assert!(config.remote.is_none());

        let config = AssistantConfig::from_lookup(lookup(&[
            ("REMOTE_LLM_MODEL", "mistral"),
            ("HF_API_TOKEN", "hf_x"),
        ]));
        let remote = config.remote.unwrap();
        assert_eq!(remote.model, "mistral");
        assert_eq!(remote.base_url, DEFAULT_REMOTE_URL);
    }

    #[test]
    fn test_bad_numbers_keep_defaults() {
        let config = AssistantConfig::from_lookup(lookup(&[
            ("JARVIS_MAX_TOKENS", "lots"),
            ("JARVIS_WAKE_THRESHOLD", "0.8"),
            ("JARVIS_NO_TTS", "yes"),
            ("JARVIS_WAKE_PHRASES", "computer, oye computer"),
        ]));
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.wake.threshold, 0.8);
        assert!(!config.speech.enabled);
        assert_eq!(config.wake.phrases, vec!["computer", "oye computer"]);
    }
}
