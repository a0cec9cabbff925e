use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{error, info};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::analysis::DominantReading;
use crate::capture::{CaptureProvider, CaptureStream};
use crate::config::{LabelTable, StreamConfig};
use crate::error::{CaptureError, StartError};
use crate::inference::EmotionModel;
use crate::render::{Renderer, SeriesSnapshot};

use super::state::{ActiveSession, StreamStatus};
use super::worker;

/// How one `tick()` invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A detection was analyzed and appended to the histories.
    Analyzed,
    /// The model found no subject; histories were left untouched.
    NoDetection,
    /// The model errored; treated like a no-detection tick.
    InferenceFailed,
    /// The device is not producing frames yet.
    Warmup,
    /// A previous tick was still in flight; this call did nothing.
    InFlight,
    /// No session is running; this call did nothing.
    Inactive,
}

/// Read-only view of the loop for callers and displays.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamSnapshot {
    pub status: StreamStatus,
    pub session_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub frame_count: u64,
    pub cumulative_avg_confidence: f32,
    pub dominant: DominantReading,
    pub series: Vec<SeriesSnapshot>,
}

/// The realtime loop: owns the capture stream, the ticker task and the
/// bounded histories; collaborators only ever see snapshots. Commands are
/// serialized, so a stop issued mid-start waits for the acquisition to
/// settle.
pub struct EmotionStream<C, M, R>
where
    C: CaptureProvider,
    M: EmotionModel,
    R: Renderer,
{
    pub(super) config: StreamConfig,
    pub(super) labels: Arc<LabelTable>,
    pub(super) capture: Arc<C>,
    pub(super) model: Arc<M>,
    pub(super) renderer: Arc<Mutex<R>>,
    pub(super) status: Arc<Mutex<StreamStatus>>,
    pub(super) session: Arc<Mutex<Option<ActiveSession<C::Stream>>>>,
    tick_busy: Arc<AtomicBool>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    cancel_token: Arc<Mutex<Option<CancellationToken>>>,
    commands: Arc<Mutex<()>>,
}

impl<C, M, R> Clone for EmotionStream<C, M, R>
where
    C: CaptureProvider,
    M: EmotionModel,
    R: Renderer,
{
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            labels: Arc::clone(&self.labels),
            capture: Arc::clone(&self.capture),
            model: Arc::clone(&self.model),
            renderer: Arc::clone(&self.renderer),
            status: Arc::clone(&self.status),
            session: Arc::clone(&self.session),
            tick_busy: Arc::clone(&self.tick_busy),
            ticker: Arc::clone(&self.ticker),
            cancel_token: Arc::clone(&self.cancel_token),
            commands: Arc::clone(&self.commands),
        }
    }
}

impl<C, M, R> EmotionStream<C, M, R>
where
    C: CaptureProvider,
    M: EmotionModel,
    R: Renderer,
{
    pub fn new(config: StreamConfig, labels: LabelTable, capture: C, model: M, renderer: R) -> Self {
        Self {
            config,
            labels: Arc::new(labels),
            capture: Arc::new(capture),
            model: Arc::new(model),
            renderer: Arc::new(Mutex::new(renderer)),
            status: Arc::new(Mutex::new(StreamStatus::Idle)),
            session: Arc::new(Mutex::new(None)),
            tick_busy: Arc::new(AtomicBool::new(false)),
            ticker: Arc::new(Mutex::new(None)),
            cancel_token: Arc::new(Mutex::new(None)),
            commands: Arc::new(Mutex::new(())),
        }
    }

    pub async fn status(&self) -> StreamStatus {
        *self.status.lock().await
    }

    /// Bring the loop up: check model readiness, open the capture stream off
    /// the async runtime, reset histories and counters, spawn the ticker.
    /// A no-op when already running.
    pub async fn start(&self) -> Result<(), StartError> {
        let _commands = self.commands.lock().await;

        if *self.status.lock().await != StreamStatus::Idle {
            return Ok(());
        }

        if !self.model.is_ready() {
            return Err(StartError::ProviderNotReady);
        }

        *self.status.lock().await = StreamStatus::Starting;

        // The acquisition may sit behind a permission prompt; keep it off
        // the runtime threads.
        let capture = Arc::clone(&self.capture);
        let constraints = self.config.capture.clone();
        let acquired = tokio::task::spawn_blocking(move || capture.acquire(&constraints)).await;

        let stream = match acquired {
            Ok(Ok(stream)) => stream,
            Ok(Err(err)) => {
                *self.status.lock().await = StreamStatus::Idle;
                return Err(err.into());
            }
            Err(join_err) => {
                error!("capture acquisition worker failed: {join_err}");
                *self.status.lock().await = StreamStatus::Idle;
                return Err(StartError::Capture(CaptureError::DeviceUnavailable));
            }
        };

        let session = ActiveSession::new(stream, self.config.max_history_points);
        info!("realtime session {} started", session.session_id);
        *self.session.lock().await = Some(session);

        let token = CancellationToken::new();
        let handle = tokio::spawn(worker::run_ticker(
            self.clone(),
            Duration::from_millis(self.config.tick_interval_ms),
            token.clone(),
        ));
        *self.ticker.lock().await = Some(handle);
        *self.cancel_token.lock().await = Some(token);

        *self.status.lock().await = StreamStatus::Running;
        Ok(())
    }

    /// One capture/analyze/render cycle. Guarded against reentry: a call
    /// arriving while a previous tick is in flight is dropped, never queued.
    pub async fn tick(&self) -> TickOutcome {
        if self
            .tick_busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return TickOutcome::InFlight;
        }

        let outcome = worker::execute_tick(self).await;
        self.tick_busy.store(false, Ordering::SeqCst);
        outcome
    }

    /// Tear the loop down: cancel and join the ticker, release the capture
    /// stream, drop all histories and counters. Safe from any state and safe
    /// to call repeatedly; after it returns no further tick executes.
    pub async fn stop(&self) {
        let _commands = self.commands.lock().await;

        {
            let mut status = self.status.lock().await;
            if *status == StreamStatus::Idle {
                return;
            }
            *status = StreamStatus::Stopping;
        }

        if let Some(token) = self.cancel_token.lock().await.take() {
            token.cancel();
        }

        if let Some(handle) = self.ticker.lock().await.take() {
            if let Err(err) = handle.await {
                error!("realtime ticker failed to join: {err}");
            }
        }

        if let Some(mut session) = self.session.lock().await.take() {
            session.stream.release();
            info!(
                "realtime session {} stopped after {} frames",
                session.session_id,
                session.stats.frame_count()
            );
        }

        *self.status.lock().await = StreamStatus::Idle;
    }

    pub async fn snapshot(&self) -> StreamSnapshot {
        let status = *self.status.lock().await;
        let session_guard = self.session.lock().await;

        match session_guard.as_ref() {
            Some(session) => StreamSnapshot {
                status,
                session_id: Some(session.session_id.clone()),
                started_at: Some(session.started_at),
                frame_count: session.stats.frame_count(),
                cumulative_avg_confidence: session.stats.cumulative_avg_confidence(),
                dominant: session.last_dominant,
                series: session
                    .history
                    .snapshot()
                    .into_iter()
                    .map(|(label, samples)| SeriesSnapshot {
                        label,
                        color: self.labels.color(label).to_string(),
                        samples,
                    })
                    .collect(),
            },
            None => StreamSnapshot {
                status,
                session_id: None,
                started_at: None,
                frame_count: 0,
                cumulative_avg_confidence: 0.0,
                dominant: DominantReading::NoDetection,
                series: Vec::new(),
            },
        }
    }
}
