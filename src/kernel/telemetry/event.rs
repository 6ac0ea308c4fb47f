use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::intent::types::ActionKind;
use crate::services::llm::SourceTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnId(pub Uuid);

impl TurnId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TelemetryEvent {
    WakeCheck {
        matched: bool,
    },

    TurnClassified {
        turn_id: TurnId,
        kind: ActionKind,
    },

    ResponseProduced {
        turn_id: TurnId,
        source: SourceTag,
        latency_ms: u64,
    },

    ActionCompleted {
        turn_id: TurnId,
        kind: ActionKind,
        success: bool,
    },
}
