//! Demo expression generator: per-expression sine waves with noise and a
//! slowly rotating boosted dominant, so charts look alive without a camera
//! subject. Always reports exactly one detection.

use std::f64::consts::PI;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::capture::Frame;
use crate::error::InferenceError;

use super::{Detection, EmotionModel};

const EXPRESSIONS: [&str; 8] = [
    "happy",
    "sad",
    "angry",
    "surprised",
    "fearful",
    "disgusted",
    "contempt",
    "neutral",
];

const BASE_NOISE: f64 = 0.1;
const DOMINANT_ROTATION_TICKS: u64 = 5;
const DOMINANT_BOOST: f64 = 1.5;

pub struct SyntheticExpressions {
    rng: Mutex<StdRng>,
    ticks: AtomicU64,
}

impl SyntheticExpressions {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ticks: AtomicU64::new(0),
        }
    }
}

impl EmotionModel for SyntheticExpressions {
    fn detect(&self, _frame: &Frame) -> Result<Vec<Detection>, InferenceError> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        let t = tick as f64;
        let mut rng = self.rng.lock().unwrap();

        let mut scores: Vec<(String, f32)> = EXPRESSIONS
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let frequency = 0.1 + index as f64 * 0.05;
                let phase = index as f64 * PI / 4.0;
                let amplitude = 0.3 + rng.gen::<f64>() * 0.4;

                let mut value = amplitude * (frequency * t + phase).sin() + 0.5;
                value += (rng.gen::<f64>() - 0.5) * BASE_NOISE;
                (name.to_string(), value.clamp(0.0, 1.0) as f32)
            })
            .collect();

        let dominant = (tick / DOMINANT_ROTATION_TICKS) as usize % EXPRESSIONS.len();
        scores[dominant].1 = (scores[dominant].1 as f64 * DOMINANT_BOOST).min(1.0) as f32;

        Ok(vec![Detection::from_scores(scores)])
    }
}

#[cfg(test)]
mod tests {
    use image::RgbaImage;

    use super::*;

    fn frame() -> Frame {
        Frame::new(RgbaImage::new(4, 4))
    }

    #[test]
    fn always_reports_one_detection_with_all_expressions() {
        let model = SyntheticExpressions::seeded(7);
        let detections = model.detect(&frame()).unwrap();
        assert_eq!(detections.len(), 1);
        for name in EXPRESSIONS {
            assert!(detections[0].scores.contains_key(name));
        }
    }

    #[test]
    fn scores_stay_in_unit_range() {
        let model = SyntheticExpressions::seeded(42);
        for _ in 0..50 {
            let detections = model.detect(&frame()).unwrap();
            for score in detections[0].scores.values() {
                assert!((0.0..=1.0).contains(score), "score {score} out of range");
            }
        }
    }

    #[test]
    fn seeded_models_are_reproducible() {
        let a = SyntheticExpressions::seeded(9);
        let b = SyntheticExpressions::seeded(9);
        let first = a.detect(&frame()).unwrap();
        let second = b.detect(&frame()).unwrap();
        assert_eq!(first[0].scores, second[0].scores);
    }
}
