use serde::{Deserialize, Serialize};

pub const VOLUME_MIN: i64 = 0;
pub const VOLUME_MAX: i64 = 100;
pub const DEFAULT_VOLUME: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeMode {
    Up,
    Down,
    Set,
}

/// Classified purpose of an utterance. Exactly one case per result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Exec { command: String },
    Open { path: String },
    /// `value` is always within `0..=100`.
    Volume { mode: VolumeMode, value: u8 },
    /// Recipient, subject and body are gathered by the caller.
    SendMail,
    Conversation { text: String },
}

/// Payload-free discriminant, for logging and telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Exec,
    Open,
    Volume,
    SendMail,
    Conversation,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Exec { .. } => ActionKind::Exec,
            Action::Open { .. } => ActionKind::Open,
            Action::Volume { .. } => ActionKind::Volume,
            Action::SendMail => ActionKind::SendMail,
            Action::Conversation { .. } => ActionKind::Conversation,
        }
    }

    pub fn volume(mode: VolumeMode, value: i64) -> Self {
        Action::Volume {
            mode,
            value: clamp_volume(value),
        }
    }

    /// Short confirmation spoken back to the user before execution.
    pub fn confirmation(&self) -> String {
        match self {
            Action::Exec { command } => format!("Ejecutando: {}", command),
            Action::Open { path } => format!("Abriendo: {}", path),
            Action::Volume { mode: VolumeMode::Set, value } => {
                format!("Ajustando volumen a {}", value)
            }
            Action::Volume { mode: VolumeMode::Up, .. } => "Subiendo volumen".to_string(),
            Action::Volume { mode: VolumeMode::Down, .. } => "Bajando volumen".to_string(),
            Action::SendMail => "Preparando envío de correo...".to_string(),
            Action::Conversation { text } => text.clone(),
        }
    }
}

pub fn clamp_volume(value: i64) -> u8 {
    value.clamp(VOLUME_MIN, VOLUME_MAX) as u8
}
