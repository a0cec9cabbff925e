//! Score translation and dominant-label selection, shared by the realtime
//! loop and the single-frame path.

use serde::Serialize;

use crate::capture::Frame;
use crate::config::{EmotionLabel, LabelTable};
use crate::error::InferenceError;
use crate::inference::{Detection, EmotionModel};

/// What the display should call the current emotion for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DominantReading {
    Emotion {
        label: EmotionLabel,
        confidence: f32,
    },
    /// Sentinel shown when the model found no subject.
    NoDetection,
}

/// Collapse detections into one confidence per tracked label: provider names
/// are translated through the vocabulary map, unreported labels read 0.0, and
/// multiple subjects merge by per-label maximum so one tick yields exactly
/// one value per label.
pub fn merge_scores(
    detections: &[Detection],
    table: &LabelTable,
) -> [f32; EmotionLabel::COUNT] {
    let mut merged = [0.0_f32; EmotionLabel::COUNT];
    for detection in detections {
        for (name, score) in &detection.scores {
            if let Some(label) = table.resolve(name) {
                let slot = &mut merged[label.index()];
                if *score > *slot {
                    *slot = *score;
                }
            }
        }
    }
    merged
}

/// Pick the dominant label: highest confidence among labels meeting their
/// own threshold; ties go to the earlier label in enumeration order. When no
/// label clears its threshold the reading falls back to neutral at 0.
pub fn dominant_reading(
    scores: &[f32; EmotionLabel::COUNT],
    table: &LabelTable,
) -> DominantReading {
    let mut best: Option<(EmotionLabel, f32)> = None;
    for label in EmotionLabel::ALL {
        let score = scores[label.index()];
        if score < table.threshold(label) {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((label, score)),
        }
    }

    let (label, confidence) = best.unwrap_or((EmotionLabel::Neutral, 0.0));
    DominantReading::Emotion { label, confidence }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelScore {
    pub label: EmotionLabel,
    pub score: f32,
}

/// Full per-label breakdown for one analyzed frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameReport {
    pub breakdown: Vec<LabelScore>,
    pub dominant: DominantReading,
    pub subjects: usize,
}

/// Single-shot path for a snapshot or an uploaded image: same translation
/// and dominance rule as the loop, without touching any history.
pub fn analyze_frame<M: EmotionModel>(
    model: &M,
    frame: &Frame,
    table: &LabelTable,
) -> Result<FrameReport, InferenceError> {
    let detections = model.detect(frame)?;
    let subjects = detections.len();

    let scores = merge_scores(&detections, table);
    let dominant = if subjects == 0 {
        DominantReading::NoDetection
    } else {
        dominant_reading(&scores, table)
    };

    let breakdown = EmotionLabel::ALL
        .into_iter()
        .map(|label| LabelScore {
            label,
            score: scores[label.index()],
        })
        .collect();

    Ok(FrameReport {
        breakdown,
        dominant,
        subjects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores_for(pairs: &[(EmotionLabel, f32)]) -> [f32; EmotionLabel::COUNT] {
        let mut scores = [0.0; EmotionLabel::COUNT];
        for (label, score) in pairs {
            scores[label.index()] = *score;
        }
        scores
    }

    #[test]
    fn thresholded_maximum_wins() {
        let table = LabelTable::default()
            .with_threshold(EmotionLabel::Joy, 0.45)
            .with_threshold(EmotionLabel::Sadness, 0.4);
        let scores = scores_for(&[
            (EmotionLabel::Joy, 0.8),
            (EmotionLabel::Sadness, 0.1),
            (EmotionLabel::Neutral, 0.05),
        ]);

        assert_eq!(
            dominant_reading(&scores, &table),
            DominantReading::Emotion {
                label: EmotionLabel::Joy,
                confidence: 0.8
            }
        );
    }

    #[test]
    fn nothing_above_threshold_falls_back_to_neutral_zero() {
        let table = LabelTable::default();
        let scores = scores_for(&[(EmotionLabel::Anger, 0.3), (EmotionLabel::Fear, 0.2)]);

        assert_eq!(
            dominant_reading(&scores, &table),
            DominantReading::Emotion {
                label: EmotionLabel::Neutral,
                confidence: 0.0
            }
        );
    }

    #[test]
    fn ties_resolve_in_enumeration_order() {
        let table = LabelTable::default();
        let scores = scores_for(&[
            (EmotionLabel::Sadness, 0.7),
            (EmotionLabel::Surprise, 0.7),
        ]);

        assert_eq!(
            dominant_reading(&scores, &table),
            DominantReading::Emotion {
                label: EmotionLabel::Sadness,
                confidence: 0.7
            }
        );
    }

    #[test]
    fn merge_translates_and_takes_per_label_maximum() {
        let table = LabelTable::default();
        let detections = vec![
            Detection::from_scores([("happy", 0.6), ("sad", 0.2)]),
            Detection::from_scores([("happy", 0.4), ("angry", 0.5), ("grimacing", 0.9)]),
        ];

        let scores = merge_scores(&detections, &table);
        assert_eq!(scores[EmotionLabel::Joy.index()], 0.6);
        assert_eq!(scores[EmotionLabel::Sadness.index()], 0.2);
        assert_eq!(scores[EmotionLabel::Anger.index()], 0.5);
        // Unknown provider names are dropped, unreported labels read zero.
        assert_eq!(scores[EmotionLabel::Contempt.index()], 0.0);
    }

    #[test]
    fn analyze_frame_reports_every_label() {
        use image::{Rgba, RgbaImage};

        let mut pixels = RgbaImage::new(8, 8);
        for pixel in pixels.pixels_mut() {
            *pixel = Rgba([230, 230, 230, 255]);
        }
        let frame = Frame::new(pixels);

        let table = LabelTable::default();
        let report =
            analyze_frame(&crate::inference::BrightnessHeuristic, &frame, &table).unwrap();

        assert_eq!(report.breakdown.len(), EmotionLabel::COUNT);
        assert_eq!(report.subjects, 1);
        assert_eq!(
            report.dominant,
            DominantReading::Emotion {
                label: EmotionLabel::Joy,
                confidence: 0.9
            }
        );
    }
}
