use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use super::{persona_prompt, ResponseProvider, SourceTag};
use crate::config::LocalLlmConfig;
use crate::error::{Result, RouterError};

const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);

/// Local model served by llama.cpp's `llama-server`.
#[derive(Clone)]
pub struct LocalLlm {
    client: Client,
    base_url: String,
    model_path: Option<PathBuf>,
}

#[derive(Serialize)]
struct CompletionRequest {
    prompt: String,
    stream: bool,
    n_predict: usize,
    temperature: f32,
    stop: Vec<String>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    content: String,
}

impl LocalLlm {
    pub fn new(config: &LocalLlmConfig) -> Self {
        Self {
            client: Client::builder()
                .connect_timeout(HEALTH_TIMEOUT)
                .build()
                .unwrap_or_default(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model_path: config.model_path.clone(),
        }
    }
}

#[async_trait]
impl ResponseProvider for LocalLlm {
    fn tag(&self) -> SourceTag {
        SourceTag::Local
    }

    /// Model file must exist and the server must answer its health check.
    async fn probe(&self) -> bool {
        let Some(path) = &self.model_path else {
            debug!("local model: MODEL_PATH not set");
            return false;
        };
        if tokio::fs::metadata(path).await.is_err() {
            debug!(path = %path.display(), "local model: file missing");
            return false;
        }

        match self
            .client
            .get(format!("{}/health", self.base_url))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("local model: server unreachable: {}", e);
                false
            }
        }
    }

    async fn try_generate(&self, prompt: &str, max_tokens: usize) -> Result<String> {
        let request_body = CompletionRequest {
            prompt: persona_prompt(prompt),
            stream: false,
            n_predict: max_tokens,
            temperature: 0.7,
            stop: vec!["Usuario:".to_string(), "\nJARVIS:".to_string()],
        };

        let response = self
            .client
            .post(format!("{}/completion", self.base_url))
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RouterError::BackendFailed(format!(
                "llama-server error: {}",
                response.status()
            )));
        }

        let resp_json: CompletionResponse = response.json().await?;
        let text = resp_json.content.trim();
        if text.is_empty() {
            return Err(RouterError::BackendFailed("llama-server returned no text".to_string()));
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_probe_without_model_path() {
        let llm = LocalLlm::new(&LocalLlmConfig::default());
        assert!(!llm.probe().await);
    }

    #[tokio::test]
    async fn test_probe_with_missing_file() {
        let llm = LocalLlm::new(&LocalLlmConfig {
            model_path: Some(PathBuf::from("/definitely/not/here/model.gguf")),
            ..LocalLlmConfig::default()
        });
        assert!(!llm.probe().await);
    }
}
