use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::DominantReading;
use crate::capture::CaptureStream;

use super::history::EmotionHistory;
use super::stats::SessionStats;

/// Lifecycle of the realtime loop. `Idle` is re-enterable; `Starting` and
/// `Stopping` are transitional while a lifecycle command is in flight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum StreamStatus {
    Idle,
    Starting,
    Running,
    Stopping,
}

impl Default for StreamStatus {
    fn default() -> Self {
        StreamStatus::Idle
    }
}

/// Everything owned by one running realtime session: the capture stream, the
/// bounded histories, the counters and the last dominant reading. Built fresh
/// on every start, so no prior session's samples can leak through.
pub(crate) struct ActiveSession<S: CaptureStream> {
    pub stream: S,
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    /// Monotonic anchor for sample timestamps; combines with `started_at`
    /// the way the wall/monotonic pair is kept apart in timer state.
    pub anchor: Instant,
    pub history: EmotionHistory,
    pub stats: SessionStats,
    pub last_dominant: DominantReading,
}

impl<S: CaptureStream> ActiveSession<S> {
    pub fn new(stream: S, history_bound: usize) -> Self {
        Self {
            stream,
            session_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            anchor: Instant::now(),
            history: EmotionHistory::new(history_bound),
            stats: SessionStats::new(),
            last_dominant: DominantReading::NoDetection,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.anchor.elapsed().as_millis() as u64
    }
}
