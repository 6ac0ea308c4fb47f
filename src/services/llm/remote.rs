use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{persona_prompt, ResponseProvider, SourceTag};
use crate::config::RemoteLlmConfig;
use crate::error::{Result, RouterError};

/// Hosted text-generation endpoint (`POST {base}/models/{model}`).
#[derive(Clone)]
pub struct RemoteLlm {
    client: Client,
    config: RemoteLlmConfig,
}

#[derive(Serialize)]
struct InferenceRequest {
    inputs: String,
    parameters: InferenceParameters,
}

#[derive(Serialize)]
struct InferenceParameters {
    max_new_tokens: usize,
    return_full_text: bool,
}

#[derive(Deserialize)]
struct Generated {
    generated_text: String,
}

impl RemoteLlm {
    pub fn new(config: RemoteLlmConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl ResponseProvider for RemoteLlm {
    fn tag(&self) -> SourceTag {
        SourceTag::Remote
    }

    /// Configuration only; no request goes out while probing.
    async fn probe(&self) -> bool {
        !self.config.model.trim().is_empty() && !self.config.api_key.trim().is_empty()
    }

    async fn try_generate(&self, prompt: &str, max_tokens: usize) -> Result<String> {
        let body = InferenceRequest {
            inputs: persona_prompt(prompt),
            parameters: InferenceParameters {
                max_new_tokens: max_tokens,
                return_full_text: false,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(RouterError::BackendFailed(format!(
                "remote inference error {}: {}",
                status, detail
            )));
        }

        let generated: Vec<Generated> = response.json().await?;
        generated
            .into_iter()
            .map(|g| g.generated_text.trim().to_string())
            .find(|t| !t.is_empty())
            .ok_or_else(|| {
                RouterError::BackendFailed("remote inference returned no text".to_string())
            })
    }
}
