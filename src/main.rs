use std::time::Duration;

use anyhow::Result;
use log::info;

use emostream::capture::{CaptureProvider, CaptureStream, FrameGrab, SyntheticCamera};
use emostream::cosmetic::DecorativeMetrics;
use emostream::inference::{BrightnessHeuristic, SyntheticExpressions};
use emostream::render::ConsoleRenderer;
use emostream::{analyze_frame, EmotionStream, LabelTable, StreamConfig};

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("emostream demo starting up...");

    let config = match std::env::var("EMOSTREAM_CONFIG") {
        Ok(path) => StreamConfig::from_file(path)?,
        Err(_) => StreamConfig::default(),
    };
    let ticks = env_u64("EMOSTREAM_TICKS", 10);
    let labels = LabelTable::default();

    // Snapshot path: grab one frame from a bright scene and run the
    // brightness analyzer over it.
    let snapshot_camera = SyntheticCamera::new().with_brightness(210);
    let mut snapshot_stream = snapshot_camera.acquire(&config.capture)?;
    if let FrameGrab::Frame(frame) = snapshot_stream.current_frame() {
        let report = analyze_frame(&BrightnessHeuristic, &frame, &labels)?;
        println!("single-frame analysis ({} subject(s)):", report.subjects);
        for entry in &report.breakdown {
            println!(
                "  {:>9} {:5.1}%",
                entry.label.display_name(),
                entry.score * 100.0
            );
        }

        let metrics = DecorativeMetrics::sample(&mut rand::thread_rng());
        println!("decorative metrics (cosmetic only):");
        println!("  quantum correlation   {:.3}", metrics.quantum_correlation);
        println!("  superposition         {:.3}", metrics.superposition);
        println!("  spike frequency       {:.0} Hz", metrics.spike_frequency_hz);
        println!("  power reduction       {:.1}%", metrics.power_reduction_pct);
        println!(
            "  processing efficiency {:.0}%",
            metrics.processing_efficiency_pct
        );
    }
    snapshot_stream.release();

    // Realtime path: synthetic camera plus the demo expression generator,
    // rendered as terminal bars until the requested tick count has passed.
    let stream = EmotionStream::new(
        config.clone(),
        labels,
        SyntheticCamera::new().with_warmup(2),
        SyntheticExpressions::seeded(7),
        ConsoleRenderer::new(),
    );

    stream.start().await?;
    tokio::time::sleep(Duration::from_millis(config.tick_interval_ms * (ticks + 1))).await;

    let summary = stream.snapshot().await;
    stream.stop().await;

    println!();
    println!("session summary:");
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
