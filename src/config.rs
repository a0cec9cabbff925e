use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::capture::CaptureConstraints;

/// The fixed set of tracked emotions. Declaration order is the tie-break
/// order for dominant selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmotionLabel {
    Joy,
    Sadness,
    Anger,
    Surprise,
    Fear,
    Disgust,
    Contempt,
    Neutral,
}

impl EmotionLabel {
    pub const COUNT: usize = 8;

    pub const ALL: [EmotionLabel; EmotionLabel::COUNT] = [
        EmotionLabel::Joy,
        EmotionLabel::Sadness,
        EmotionLabel::Anger,
        EmotionLabel::Surprise,
        EmotionLabel::Fear,
        EmotionLabel::Disgust,
        EmotionLabel::Contempt,
        EmotionLabel::Neutral,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn display_name(self) -> &'static str {
        match self {
            EmotionLabel::Joy => "joy",
            EmotionLabel::Sadness => "sadness",
            EmotionLabel::Anger => "anger",
            EmotionLabel::Surprise => "surprise",
            EmotionLabel::Fear => "fear",
            EmotionLabel::Disgust => "disgust",
            EmotionLabel::Contempt => "contempt",
            EmotionLabel::Neutral => "neutral",
        }
    }
}

/// Display color and dominance threshold for one tracked label.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelEntry {
    pub label: EmotionLabel,
    pub color: String,
    pub threshold: f32,
}

/// Per-label presentation and threshold data plus the provider-vocabulary
/// translation table. Fixed at configuration time; the loop never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelTable {
    pub entries: Vec<LabelEntry>,
    /// Maps the inference provider's own label names onto tracked labels.
    pub vocabulary: HashMap<String, EmotionLabel>,
}

const DEFAULT_THRESHOLD: f32 = 0.5;
const DEFAULT_COLOR: &str = "#ffffff";

impl Default for LabelTable {
    fn default() -> Self {
        let colors = [
            (EmotionLabel::Joy, "#ff6384"),
            (EmotionLabel::Sadness, "#36a2eb"),
            (EmotionLabel::Anger, "#ff9f40"),
            (EmotionLabel::Surprise, "#4bc0c0"),
            (EmotionLabel::Fear, "#9966ff"),
            (EmotionLabel::Disgust, "#c9cbcf"),
            (EmotionLabel::Contempt, "#ff6b9d"),
            (EmotionLabel::Neutral, "#95e1d3"),
        ];

        let entries = colors
            .into_iter()
            .map(|(label, color)| LabelEntry {
                label,
                color: color.to_string(),
                threshold: DEFAULT_THRESHOLD,
            })
            .collect();

        let vocabulary = [
            ("happy", EmotionLabel::Joy),
            ("sad", EmotionLabel::Sadness),
            ("angry", EmotionLabel::Anger),
            ("surprised", EmotionLabel::Surprise),
            ("fearful", EmotionLabel::Fear),
            ("disgusted", EmotionLabel::Disgust),
            ("contempt", EmotionLabel::Contempt),
            ("neutral", EmotionLabel::Neutral),
        ]
        .into_iter()
        .map(|(name, label)| (name.to_string(), label))
        .collect();

        Self {
            entries,
            vocabulary,
        }
    }
}

impl LabelTable {
    pub fn threshold(&self, label: EmotionLabel) -> f32 {
        self.entries
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.threshold)
            .unwrap_or(DEFAULT_THRESHOLD)
    }

    pub fn color(&self, label: EmotionLabel) -> &str {
        self.entries
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.color.as_str())
            .unwrap_or(DEFAULT_COLOR)
    }

    /// Translate a provider-vocabulary name; unknown names are dropped.
    pub fn resolve(&self, provider_label: &str) -> Option<EmotionLabel> {
        self.vocabulary.get(provider_label).copied()
    }

    pub fn with_threshold(mut self, label: EmotionLabel, threshold: f32) -> Self {
        for entry in &mut self.entries {
            if entry.label == label {
                entry.threshold = threshold;
            }
        }
        self
    }
}

/// Tunable parameters for the realtime loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamConfig {
    /// Polling period of the capture/analyze cycle.
    pub tick_interval_ms: u64,

    /// Count-based history window; oldest samples are evicted first.
    pub max_history_points: usize,

    pub capture: CaptureConstraints,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1_000,
            max_history_points: 30,
            capture: CaptureConstraints::default(),
        }
    }
}

impl StreamConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read stream config from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse stream config at {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_demo_parameters() {
        let config = StreamConfig::default();
        assert_eq!(config.tick_interval_ms, 1_000);
        assert_eq!(config.max_history_points, 30);
        assert_eq!(config.capture.width, 640);
        assert_eq!(config.capture.height, 480);
    }

    #[test]
    fn vocabulary_translates_provider_names() {
        let table = LabelTable::default();
        assert_eq!(table.resolve("happy"), Some(EmotionLabel::Joy));
        assert_eq!(table.resolve("surprised"), Some(EmotionLabel::Surprise));
        assert_eq!(table.resolve("neutral"), Some(EmotionLabel::Neutral));
        assert_eq!(table.resolve("smirking"), None);
    }

    #[test]
    fn every_label_has_a_color_and_threshold() {
        let table = LabelTable::default();
        for label in EmotionLabel::ALL {
            assert!(table.color(label).starts_with('#'));
            assert_eq!(table.threshold(label), 0.5);
        }
    }

    #[test]
    fn with_threshold_overrides_one_label() {
        let table = LabelTable::default().with_threshold(EmotionLabel::Joy, 0.45);
        assert_eq!(table.threshold(EmotionLabel::Joy), 0.45);
        assert_eq!(table.threshold(EmotionLabel::Sadness), 0.5);
    }
}
