use std::collections::{HashMap, VecDeque};

use super::event::TelemetryEvent;
use crate::intent::types::ActionKind;
use crate::services::llm::SourceTag;

#[derive(Debug, Clone, Default)]
pub struct TelemetrySnapshot {
    pub wake_stats: WakeStats,
    pub turns_by_kind: HashMap<ActionKind, u64>,
    pub response_stats: ResponseStats,
    pub action_stats: ActionStats,
}

#[derive(Debug, Clone, Default)]
pub struct WakeStats {
    pub checks: u64,
    pub matched: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ResponseStats {
    pub by_source: HashMap<SourceTag, u64>,
    pub total_latency_ms: u64,
    pub avg_latency_ms: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ActionStats {
    pub succeeded: u64,
    pub failed: u64,
}

impl TelemetrySnapshot {
    pub fn turns(&self, kind: ActionKind) -> u64 {
        self.turns_by_kind.get(&kind).copied().unwrap_or(0)
    }

    pub fn responses(&self, source: SourceTag) -> u64 {
        self.response_stats.by_source.get(&source).copied().unwrap_or(0)
    }
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();
    let mut responses = 0u64;

    for event in events {
        match event {
            TelemetryEvent::WakeCheck { matched } => {
                snap.wake_stats.checks += 1;
                if *matched {
                    snap.wake_stats.matched += 1;
                }
            }
            TelemetryEvent::TurnClassified { kind, .. } => {
                *snap.turns_by_kind.entry(*kind).or_insert(0) += 1;
            }
            TelemetryEvent::ResponseProduced { source, latency_ms, .. } => {
                *snap.response_stats.by_source.entry(*source).or_insert(0) += 1;
                snap.response_stats.total_latency_ms += latency_ms;
                responses += 1;
            }
            TelemetryEvent::ActionCompleted { success, .. } => {
                if *success {
                    snap.action_stats.succeeded += 1;
                } else {
                    snap.action_stats.failed += 1;
                }
            }
        }
    }

    if responses > 0 {
        snap.response_stats.avg_latency_ms =
            snap.response_stats.total_latency_ms as f64 / responses as f64;
    }

    snap
}
