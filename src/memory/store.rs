use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("memory io: {0}")]
    Io(#[from] std::io::Error),
    #[error("memory file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub timestamp: DateTime<Utc>,
    pub role: Role,
    pub text: String,
}

/// Append-only log of `(role, text)` pairs. Order of `add` calls is kept.
pub trait ConversationStore: Send {
    fn add(&mut self, role: Role, text: &str) -> Result<(), MemoryError>;
    /// Last `limit` entries, oldest first.
    fn list(&self, limit: usize) -> Vec<ConversationEntry>;
    fn clear(&mut self) -> Result<(), MemoryError>;
}

fn tail(entries: &[ConversationEntry], limit: usize) -> Vec<ConversationEntry> {
    entries[entries.len().saturating_sub(limit)..].to_vec()
}

#[derive(Debug, Default)]
pub struct InMemoryConversationLog {
    entries: Vec<ConversationEntry>,
}

impl InMemoryConversationLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversationStore for InMemoryConversationLog {
    fn add(&mut self, role: Role, text: &str) -> Result<(), MemoryError> {
        self.entries.push(ConversationEntry {
            timestamp: Utc::now(),
            role,
            text: text.to_string(),
        });
        Ok(())
    }

    fn list(&self, limit: usize) -> Vec<ConversationEntry> {
        tail(&self.entries, limit)
    }

    fn clear(&mut self) -> Result<(), MemoryError> {
        self.entries.clear();
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct MemoryFile {
    memories: Vec<ConversationEntry>,
}

/// JSON file log: `{ "memories": [ {timestamp, role, text}, ... ] }`.
/// The whole snapshot is rewritten on every append.
#[derive(Debug)]
pub struct ConversationLog {
    path: PathBuf,
    data: MemoryFile,
}

impl ConversationLog {
    /// Opens (or creates) the log, including missing parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MemoryError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut log = Self {
            path,
            data: MemoryFile::default(),
        };
        if log.path.exists() {
            let content = fs::read_to_string(&log.path)?;
            if !content.trim().is_empty() {
                log.data = serde_json::from_str(&content)?;
            }
        } else {
            log.save()?;
        }
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), MemoryError> {
        let json = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl ConversationStore for ConversationLog {
    fn add(&mut self, role: Role, text: &str) -> Result<(), MemoryError> {
        self.data.memories.push(ConversationEntry {
            timestamp: Utc::now(),
            role,
            text: text.to_string(),
        });
        self.save()
    }

    fn list(&self, limit: usize) -> Vec<ConversationEntry> {
        tail(&self.data.memories, limit)
    }

    fn clear(&mut self) -> Result<(), MemoryError> {
        self.data.memories.clear();
        self.save()
    }
}
