use serde::{Deserialize, Serialize};
use tracing::debug;

use super::fuzzy::similarity;
use crate::error::{Result, RouterError};

pub const DEFAULT_THRESHOLD: f64 = 0.70;

/// Tokens this short carry too little signal for fuzzy comparison.
const MIN_TOKEN_CHARS: usize = 3;

pub fn default_phrases() -> Vec<String> {
    ["hey jarvis", "jarvis", "oye jarvis", "escucha jarvis"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

/// Canonical activation phrases plus the similarity threshold.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WakeWordConfig {
    phrases: Vec<String>,
    threshold: f64,
}

impl WakeWordConfig {
    /// Phrases are lower-cased, trimmed and de-duplicated keeping the first
    /// occurrence. Blank phrases are dropped since they would match anything.
    pub fn new<I, S>(phrases: I, threshold: f64) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(RouterError::InvalidInput(format!(
                "wake threshold {threshold} outside [0, 1]"
            )));
        }

        let mut normalized: Vec<String> = Vec::new();
        for phrase in phrases {
            let p = phrase.as_ref().trim().to_lowercase();
            if !p.is_empty() && !normalized.contains(&p) {
                normalized.push(p);
            }
        }

        if normalized.is_empty() {
            return Err(RouterError::InvalidInput(
                "at least one wake phrase is required".to_string(),
            ));
        }

        Ok(Self {
            phrases: normalized,
            threshold,
        })
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for WakeWordConfig {
    fn default() -> Self {
        Self {
            phrases: default_phrases(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched: bool,
    /// Canonical phrase that triggered the match.
    pub phrase: Option<String>,
}

impl MatchResult {
    pub fn hit(phrase: &str) -> Self {
        Self {
            matched: true,
            phrase: Some(phrase.to_string()),
        }
    }

    pub fn miss() -> Self {
        Self {
            matched: false,
            phrase: None,
        }
    }
}

/// Decides whether a noisy transcript contains an activation phrase.
#[derive(Debug, Clone, Default)]
pub struct WakePhraseDetector {
    config: WakeWordConfig,
}

impl WakePhraseDetector {
    pub fn new(config: WakeWordConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WakeWordConfig {
        &self.config
    }

    /// First hit wins:
    /// 1. exact substring, 2. fuzzy over the whole transcript,
    /// 3. fuzzy per token (tokens shorter than three chars skipped).
    pub fn detect(&self, transcript: &str) -> MatchResult {
        let text = transcript.trim().to_lowercase();
        if text.is_empty() {
            return MatchResult::miss();
        }

        // 1. Exact
        if let Some(phrase) = self.config.phrases.iter().find(|p| text.contains(p.as_str())) {
            debug!(phrase = %phrase, "wake phrase: exact");
            return MatchResult::hit(phrase);
        }

        let threshold = self.config.threshold;

        // 2. Whole transcript
        for phrase in &self.config.phrases {
            if similarity(&text, phrase) >= threshold {
                debug!(phrase = %phrase, "wake phrase: fuzzy transcript");
                return MatchResult::hit(phrase);
            }
        }

        // 3. Per token
        for phrase in &self.config.phrases {
            for token in text.split_whitespace() {
                if token.chars().count() < MIN_TOKEN_CHARS {
                    continue;
                }
                if similarity(token, phrase) >= threshold {
                    debug!(phrase = %phrase, token, "wake phrase: fuzzy token");
                    return MatchResult::hit(phrase);
                }
            }
        }

        MatchResult::miss()
    }

    /// Entry point for raw collaborator bytes. Non UTF-8 data is rejected
    /// instead of being lossily decoded into something that might match.
    pub fn detect_bytes(&self, transcript: &[u8]) -> Result<MatchResult> {
        let text = std::str::from_utf8(transcript)
            .map_err(|e| RouterError::InvalidInput(format!("transcript is not UTF-8: {e}")))?;
        Ok(self.detect(text))
    }
}
