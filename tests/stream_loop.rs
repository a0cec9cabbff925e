use std::sync::atomic::Ordering;
use std::time::Duration;

use emostream::capture::{CaptureConstraints, SyntheticCamera};
use emostream::inference::SyntheticExpressions;
use emostream::render::{Renderer, RenderUpdate};
use emostream::{EmotionStream, LabelTable, StreamConfig, StreamStatus};

struct CountingRenderer {
    renders: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

impl Renderer for CountingRenderer {
    fn render(&mut self, _update: &RenderUpdate) {
        self.renders.fetch_add(1, Ordering::SeqCst);
    }
}

fn fast_config() -> StreamConfig {
    StreamConfig {
        tick_interval_ms: 25,
        max_history_points: 5,
        capture: CaptureConstraints {
            width: 32,
            height: 24,
        },
    }
}

#[tokio::test]
async fn realtime_loop_runs_end_to_end() {
    let renders = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let camera = SyntheticCamera::new().with_warmup(1);
    let release_flag = camera.release_flag();

    let stream = EmotionStream::new(
        fast_config(),
        LabelTable::default(),
        camera,
        SyntheticExpressions::seeded(3),
        CountingRenderer {
            renders: std::sync::Arc::clone(&renders),
        },
    );

    stream.start().await.unwrap();
    assert_eq!(stream.status().await, StreamStatus::Running);

    tokio::time::sleep(Duration::from_millis(500)).await;
    let snapshot = stream.snapshot().await;

    // With a 25 ms period and ~500 ms of runtime the ticker has fired many
    // times; keep margins generous to stay timing-robust.
    assert!(snapshot.frame_count >= 3, "only {} ticks ran", snapshot.frame_count);
    assert!(renders.load(Ordering::SeqCst) >= 3);

    for series in &snapshot.series {
        assert!(series.samples.len() <= 5);
        for window in series.samples.windows(2) {
            assert!(window[0].elapsed_ms <= window[1].elapsed_ms);
        }
    }

    stream.stop().await;
    assert_eq!(stream.status().await, StreamStatus::Idle);
    assert!(release_flag.load(Ordering::SeqCst));

    // Restart begins a fresh session; with the live 25 ms ticker at most one
    // tick can have fired before this snapshot.
    stream.start().await.unwrap();
    let fresh = stream.snapshot().await;
    assert!(fresh.frame_count <= 1, "history leaked across restart");
    assert!(fresh.series.iter().all(|series| series.samples.len() <= 1));
    assert_ne!(fresh.session_id, snapshot.session_id);
    stream.stop().await;
}
