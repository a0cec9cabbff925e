use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::analysis::{dominant_reading, merge_scores, DominantReading};
use crate::capture::{CaptureProvider, CaptureStream, FrameGrab};
use crate::inference::EmotionModel;
use crate::render::{Renderer, RenderUpdate, SeriesSnapshot};
use crate::{log_error, log_info, log_warn};

use super::controller::{EmotionStream, TickOutcome};
use super::state::ActiveSession;

// Flip to false to silence per-tick logging in this module.
const ENABLE_LOGS: bool = true;

/// Periodic driver for a running session. Polls `tick()` at the configured
/// period until cancelled; an overrunning tick makes the guard drop the next
/// fire instead of queueing it.
pub(super) async fn run_ticker<C, M, R>(
    stream_loop: EmotionStream<C, M, R>,
    period: Duration,
    cancel_token: CancellationToken,
) where
    C: CaptureProvider,
    M: EmotionModel,
    R: Renderer,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // Consume the immediate first fire so the first real tick lands one
    // period after start.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match stream_loop.tick().await {
                    TickOutcome::InferenceFailed => {
                        log_warn!("tick completed without usable inference");
                    }
                    TickOutcome::InFlight => {
                        log_warn!("previous tick still in flight; dropping this one");
                    }
                    _ => {}
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("realtime ticker shutting down");
                break;
            }
        }
    }
}

/// One capture/analyze/render cycle. The caller holds the reentrancy guard.
pub(super) async fn execute_tick<C, M, R>(stream_loop: &EmotionStream<C, M, R>) -> TickOutcome
where
    C: CaptureProvider,
    M: EmotionModel,
    R: Renderer,
{
    let mut session_guard = stream_loop.session.lock().await;
    let Some(session) = session_guard.as_mut() else {
        return TickOutcome::Inactive;
    };

    let frame = match session.stream.current_frame() {
        FrameGrab::Frame(frame) => frame,
        FrameGrab::NotReady => {
            // Device still warming up: counted, nothing to analyze.
            session.stats.record_tick();
            let update = build_update(stream_loop, session);
            drop(session_guard);
            stream_loop.renderer.lock().await.render(&update);
            return TickOutcome::Warmup;
        }
    };

    let model = Arc::clone(&stream_loop.model);
    let frame = Arc::new(frame);
    let detect_frame = Arc::clone(&frame);
    let detected = tokio::task::spawn_blocking(move || model.detect(&detect_frame)).await;

    let outcome = match detected {
        Ok(Ok(detections)) if !detections.is_empty() => {
            let scores = merge_scores(&detections, &stream_loop.labels);
            session.history.append_tick(session.elapsed_ms(), &scores);

            let dominant = dominant_reading(&scores, &stream_loop.labels);
            if let DominantReading::Emotion { confidence, .. } = dominant {
                session.stats.record_dominant(confidence);
            }
            session.last_dominant = dominant;
            TickOutcome::Analyzed
        }
        Ok(Ok(_)) => {
            session.last_dominant = DominantReading::NoDetection;
            TickOutcome::NoDetection
        }
        Ok(Err(err)) => {
            log_warn!(
                "inference failed for session {}: {err}",
                session.session_id
            );
            session.last_dominant = DominantReading::NoDetection;
            TickOutcome::InferenceFailed
        }
        Err(err) => {
            log_error!("inference worker join failed: {err}");
            session.last_dominant = DominantReading::NoDetection;
            TickOutcome::InferenceFailed
        }
    };

    session.stats.record_tick();
    let update = build_update(stream_loop, session);
    drop(session_guard);

    stream_loop.renderer.lock().await.render(&update);
    outcome
}

fn build_update<C, M, R>(
    stream_loop: &EmotionStream<C, M, R>,
    session: &ActiveSession<C::Stream>,
) -> RenderUpdate
where
    C: CaptureProvider,
    M: EmotionModel,
    R: Renderer,
{
    let series = session
        .history
        .snapshot()
        .into_iter()
        .map(|(label, samples)| SeriesSnapshot {
            label,
            color: stream_loop.labels.color(label).to_string(),
            samples,
        })
        .collect();

    RenderUpdate {
        dominant: session.last_dominant,
        series,
        frame_count: session.stats.frame_count(),
        cumulative_avg_confidence: session.stats.cumulative_avg_confidence(),
    }
}
