use anyhow::Context;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::telemetry::{TelemetryEvent, TelemetryRecorder, TurnId};
use crate::config::AssistantConfig;
use crate::intent::{Action, IntentClassifier};
use crate::memory::{
    ConversationEntry, ConversationLog, ConversationStore, InMemoryConversationLog, Role,
};
use crate::services::executor::{ActionExecutor, ActionOutcome, MailDraft, SystemExecutor};
use crate::services::llm::{BackendResult, LocalLlm, RemoteLlm, ResponseCascade, ResponseProvider};
use crate::services::speech::SpeechDispatcher;
use crate::wake::{MatchResult, WakePhraseDetector, WakeWordConfig};

/// What a single turn produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// A system action ran (successfully or not).
    Executed {
        confirmation: String,
        outcome: ActionOutcome,
    },
    /// Confirm mode: nothing ran yet. Pass `action` to `Assistant::confirm`.
    PendingConfirmation {
        action: Action,
        confirmation: String,
    },
    /// Mail needs recipient, subject and body from the user first.
    NeedsMailDraft { confirmation: String },
    Reply(BackendResult),
}

impl TurnOutcome {
    /// Text shown (and spoken) to the user for this outcome.
    pub fn message(&self) -> &str {
        match self {
            TurnOutcome::Executed { confirmation, .. }
            | TurnOutcome::PendingConfirmation { confirmation, .. }
            | TurnOutcome::NeedsMailDraft { confirmation } => confirmation.as_str(),
            TurnOutcome::Reply(reply) => reply.text.as_str(),
        }
    }
}

/// Owns every collaborator a turn needs. One turn at a time.
pub struct Assistant {
    classifier: IntentClassifier,
    wake: WakePhraseDetector,
    cascade: Arc<ResponseCascade>,
    executor: Arc<dyn ActionExecutor>,
    speech: SpeechDispatcher,
    memory: Box<dyn ConversationStore>,
    pub telemetry: TelemetryRecorder,
    max_tokens: usize,
    confirm_actions: bool,
}

impl Assistant {
    /// In-memory log, no speech, default limits. Handy for tests.
    pub fn new(
        classifier: IntentClassifier,
        wake: WakePhraseDetector,
        cascade: Arc<ResponseCascade>,
        executor: Arc<dyn ActionExecutor>,
    ) -> Self {
        Self {
            classifier,
            wake,
            cascade,
            executor,
            speech: SpeechDispatcher::disabled(),
            memory: Box::new(InMemoryConversationLog::new()),
            telemetry: TelemetryRecorder::new(),
            max_tokens: crate::config::DEFAULT_MAX_TOKENS,
            confirm_actions: false,
        }
    }

    /// Wires the full production stack from configuration.
    pub fn from_config(config: &AssistantConfig) -> anyhow::Result<Self> {
        let wake_config = WakeWordConfig::new(&config.wake.phrases, config.wake.threshold)
            .context("invalid wake word configuration")?;

        let mut providers: Vec<Arc<dyn ResponseProvider>> =
            vec![Arc::new(LocalLlm::new(&config.local))];
        if let Some(remote) = &config.remote {
            providers.push(Arc::new(RemoteLlm::new(remote.clone())));
        }
        let cascade = ResponseCascade::new(providers, config.tier_timeout());

        let memory = ConversationLog::open(&config.memory_path)
            .with_context(|| format!("failed to open memory at {}", config.memory_path.display()))?;

        Ok(Self::new(
            IntentClassifier::default(),
            WakePhraseDetector::new(wake_config),
            Arc::new(cascade),
            Arc::new(SystemExecutor::new()),
        )
        .with_memory(Box::new(memory))
        .with_speech(SpeechDispatcher::from_settings(&config.speech))
        .with_max_tokens(config.max_tokens)
        .with_confirmation(config.confirm_actions))
    }

    pub fn with_memory(mut self, memory: Box<dyn ConversationStore>) -> Self {
        self.memory = memory;
        self
    }

    pub fn with_speech(mut self, speech: SpeechDispatcher) -> Self {
        self.speech = speech;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_confirmation(mut self, confirm_actions: bool) -> Self {
        self.confirm_actions = confirm_actions;
        self
    }

    pub fn cascade(&self) -> &ResponseCascade {
        &self.cascade
    }

    pub fn speech(&self) -> &SpeechDispatcher {
        &self.speech
    }

    pub fn history(&self, limit: usize) -> Vec<ConversationEntry> {
        self.memory.list(limit)
    }

    /// Voice mode gate: does this transcript arm the next turn?
    pub fn accept_transcript(&mut self, text: &str) -> MatchResult {
        let result = self.wake.detect(text);
        self.telemetry.record(TelemetryEvent::WakeCheck {
            matched: result.matched,
        });
        if result.matched {
            info!(phrase = ?result.phrase, "wake phrase detected");
        }
        result
    }

    /// Classify and route one utterance.
    pub async fn handle_turn(&mut self, text: &str) -> TurnOutcome {
        let action = self.classifier.classify(text);
        self.remember(Role::User, text);
        self.route(action, text).await
    }

    /// Route an already-built action (direct `!` commands). `typed` is what
    /// the user actually entered and is what the log keeps.
    pub async fn handle_action(&mut self, typed: &str, action: Action) -> TurnOutcome {
        self.remember(Role::User, typed);
        self.route(action, typed).await
    }

    /// Runs an action that was held for confirmation.
    pub async fn confirm(&mut self, action: Action) -> TurnOutcome {
        let turn_id = TurnId::new();
        self.run_action(turn_id, action).await
    }

    pub async fn send_mail(&mut self, draft: &MailDraft) -> ActionOutcome {
        let outcome = self.executor.send_mail(draft).await;
        self.telemetry.record(TelemetryEvent::ActionCompleted {
            turn_id: TurnId::new(),
            kind: crate::intent::ActionKind::SendMail,
            success: outcome.success,
        });
        self.remember(Role::Assistant, &outcome.status);
        outcome
    }

    async fn route(&mut self, action: Action, text: &str) -> TurnOutcome {
        let turn_id = TurnId::new();
        let kind = action.kind();
        self.telemetry.record(TelemetryEvent::TurnClassified { turn_id, kind });
        debug!(?kind, "turn classified");

        match action {
            Action::Conversation { .. } => {
                let started = Instant::now();
                let reply = self.cascade.generate(text, self.max_tokens).await;
                self.telemetry.record(TelemetryEvent::ResponseProduced {
                    turn_id,
                    source: reply.source,
                    latency_ms: started.elapsed().as_millis() as u64,
                });
                info!(source = ?reply.source, "reply ready");
                self.remember(Role::Assistant, &reply.text);
                self.speech.dispatch(&reply.text);
                TurnOutcome::Reply(reply)
            }
            Action::SendMail => {
                let confirmation = action.confirmation();
                self.speech.dispatch(&confirmation);
                TurnOutcome::NeedsMailDraft { confirmation }
            }
            action if self.confirm_actions => TurnOutcome::PendingConfirmation {
                confirmation: action.confirmation(),
                action,
            },
            action => self.run_action(turn_id, action).await,
        }
    }

    async fn run_action(&mut self, turn_id: TurnId, action: Action) -> TurnOutcome {
        let confirmation = action.confirmation();
        self.speech.dispatch(&confirmation);

        let outcome = self.executor.execute(&action).await;
        self.telemetry.record(TelemetryEvent::ActionCompleted {
            turn_id,
            kind: action.kind(),
            success: outcome.success,
        });
        self.remember(Role::Assistant, &format!("{} ({})", confirmation, outcome.status));

        TurnOutcome::Executed { confirmation, outcome }
    }

    // Memory failures never fail the turn.
    fn remember(&mut self, role: Role, text: &str) {
        if let Err(e) = self.memory.add(role, text) {
            warn!("failed to persist conversation: {}", e);
        }
    }
}
