//! Display seam. Renderers receive complete, consistent snapshots after each
//! executed tick; the loop never hands out partial state and never calls a
//! renderer concurrently with itself.

use log::info;
use serde::Serialize;

use crate::analysis::DominantReading;
use crate::config::EmotionLabel;
use crate::stream::Sample;

/// Read-only copy of one label's bounded series.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSnapshot {
    pub label: EmotionLabel,
    pub color: String,
    pub samples: Vec<Sample>,
}

impl SeriesSnapshot {
    pub fn latest(&self) -> Option<Sample> {
        self.samples.last().copied()
    }
}

/// Everything the display needs after one tick.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderUpdate {
    pub dominant: DominantReading,
    pub series: Vec<SeriesSnapshot>,
    pub frame_count: u64,
    pub cumulative_avg_confidence: f32,
}

/// Pure presentation. Implementations must tolerate empty series (warmup
/// ticks render before any sample exists).
pub trait Renderer: Send + 'static {
    fn render(&mut self, update: &RenderUpdate);
}

/// Renders one info line per tick; useful for headless runs and tests.
#[derive(Debug, Default)]
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn render(&mut self, update: &RenderUpdate) {
        let dominant = describe_dominant(&update.dominant);
        info!(
            "tick {}: dominant {} (avg confidence {:.0}%)",
            update.frame_count,
            dominant,
            update.cumulative_avg_confidence * 100.0
        );
    }
}

/// Terminal bar display: one bar per label from its latest sample, then the
/// dominant reading and the running statistics.
#[derive(Debug)]
pub struct ConsoleRenderer {
    bar_width: usize,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self { bar_width: 24 }
    }
}

impl Default for ConsoleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for ConsoleRenderer {
    fn render(&mut self, update: &RenderUpdate) {
        println!();
        for series in &update.series {
            let value = series.latest().map(|sample| sample.value).unwrap_or(0.0);
            let filled = (value.clamp(0.0, 1.0) * self.bar_width as f32).round() as usize;
            println!(
                "{:>9} [{}{}] {:5.1}%  {}",
                series.label.display_name(),
                "#".repeat(filled),
                "-".repeat(self.bar_width - filled),
                value * 100.0,
                series.color,
            );
        }
        println!(
            "dominant: {}  frames: {}  avg confidence: {:.1}%",
            describe_dominant(&update.dominant),
            update.frame_count,
            update.cumulative_avg_confidence * 100.0
        );
    }
}

fn describe_dominant(dominant: &DominantReading) -> String {
    match dominant {
        DominantReading::Emotion { label, confidence } => {
            format!("{} ({:.0}%)", label.display_name(), confidence * 100.0)
        }
        DominantReading::NoDetection => "no detection".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderers_tolerate_empty_series() {
        let update = RenderUpdate {
            dominant: DominantReading::NoDetection,
            series: EmotionLabel::ALL
                .into_iter()
                .map(|label| SeriesSnapshot {
                    label,
                    color: "#ffffff".to_string(),
                    samples: Vec::new(),
                })
                .collect(),
            frame_count: 0,
            cumulative_avg_confidence: 0.0,
        };

        LogRenderer.render(&update);
        ConsoleRenderer::new().render(&update);
    }
}
