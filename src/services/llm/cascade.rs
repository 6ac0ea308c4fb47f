use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{BackendResult, FallbackResponder, ResponseProvider, SourceTag};
use crate::error::RouterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeMode {
    LocalReady,
    RemoteReady,
    FallbackOnly,
}

/// Probe outcome for every generative tier, in cascade order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeState {
    available: Vec<(SourceTag, bool)>,
}

impl CascadeState {
    pub fn is_available(&self, tag: SourceTag) -> bool {
        self.available.iter().any(|(t, ok)| *t == tag && *ok)
    }

    pub fn mode(&self) -> CascadeMode {
        match self.available.iter().find(|(_, ok)| *ok) {
            Some((SourceTag::Local, _)) => CascadeMode::LocalReady,
            Some((SourceTag::Remote, _)) => CascadeMode::RemoteReady,
            _ => CascadeMode::FallbackOnly,
        }
    }
}

/// Ordered chain of response backends ending in the canned fallback.
///
/// Availability is probed on first use and memoized until `reset`. The lock
/// only guards the memo; probing and generation run without it, so two
/// racing first calls may both probe and the last one to finish is kept.
pub struct ResponseCascade {
    providers: Vec<Arc<dyn ResponseProvider>>,
    fallback: FallbackResponder,
    tier_timeout: Duration,
    state: Mutex<Option<CascadeState>>,
}

impl ResponseCascade {
    /// `providers` are tried in the given order (local before remote).
    pub fn new(providers: Vec<Arc<dyn ResponseProvider>>, tier_timeout: Duration) -> Self {
        Self {
            providers,
            fallback: FallbackResponder::new(),
            tier_timeout,
            state: Mutex::new(None),
        }
    }

    pub fn fallback_only() -> Self {
        Self::new(Vec::new(), Duration::from_secs(crate::config::DEFAULT_TIER_TIMEOUT_SECS))
    }

    /// Cached probe result, if any.
    pub fn state(&self) -> Option<CascadeState> {
        self.state.lock().ok().and_then(|guard| guard.clone())
    }

    /// Forget the probe result; the next `generate` probes again.
    pub fn reset(&self) {
        if let Ok(mut guard) = self.state.lock() {
            *guard = None;
        }
    }

    pub async fn ensure_probed(&self) -> CascadeState {
        if let Some(state) = self.state() {
            return state;
        }

        let mut available = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            let ok = provider.probe().await;
            info!(tier = ?provider.tag(), available = ok, "probed response backend");
            available.push((provider.tag(), ok));
        }
        let state = CascadeState { available };
        info!(mode = ?state.mode(), "response cascade ready");

        // Only written once the outcome is known.
        if let Ok(mut guard) = self.state.lock() {
            *guard = Some(state.clone());
        }
        state
    }

    /// Always returns a response; tier failures are logged and swallowed.
    pub async fn generate(&self, prompt: &str, max_tokens: usize) -> BackendResult {
        let state = self.ensure_probed().await;

        for provider in &self.providers {
            let tag = provider.tag();
            if !state.is_available(tag) {
                let skipped =
                    RouterError::BackendUnavailable(format!("{:?} tier failed its probe", tag));
                debug!(tier = ?tag, "{}", skipped);
                continue;
            }

            let attempt =
                tokio::time::timeout(self.tier_timeout, provider.try_generate(prompt, max_tokens))
                    .await;
            let failure = match attempt {
                Ok(Ok(text)) => {
                    return BackendResult { text, source: tag };
                }
                Ok(Err(e)) => e,
                Err(_) => RouterError::Timeout(self.tier_timeout),
            };
            warn!(tier = ?tag, "response backend failed, falling through: {}", failure);
        }

        BackendResult {
            text: self.fallback.respond(prompt),
            source: SourceTag::Fallback,
        }
    }
}
