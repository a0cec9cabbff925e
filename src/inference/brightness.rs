//! The fabricated analyzer: mean frame brightness banded into an expression
//! guess, with a contrast bonus on the confidence. Deterministic image math
//! only; there is no face detection behind it.

use crate::capture::Frame;
use crate::error::InferenceError;

use super::{Detection, EmotionModel};

const VERY_BRIGHT_LUMA: f64 = 200.0;
const BRIGHT_LUMA: f64 = 150.0;
const MODERATE_LUMA: f64 = 80.0;

const HIGH_CONTRAST: f64 = 60.0;
const MEDIUM_CONTRAST: f64 = 30.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct BrightnessHeuristic;

impl BrightnessHeuristic {
    fn classify(mean_luma: f64) -> (&'static str, f32) {
        if mean_luma >= VERY_BRIGHT_LUMA {
            ("happy", 0.9)
        } else if mean_luma >= BRIGHT_LUMA {
            ("happy", 0.8)
        } else if mean_luma >= MODERATE_LUMA {
            ("neutral", 0.7)
        } else {
            ("sad", 0.6)
        }
    }

    fn contrast_bonus(luma_stddev: f64) -> f32 {
        if luma_stddev >= HIGH_CONTRAST {
            0.10
        } else if luma_stddev >= MEDIUM_CONTRAST {
            0.05
        } else {
            0.0
        }
    }
}

impl EmotionModel for BrightnessHeuristic {
    fn detect(&self, frame: &Frame) -> Result<Vec<Detection>, InferenceError> {
        let pixel_count = (frame.width() as u64 * frame.height() as u64) as f64;
        if pixel_count == 0.0 {
            return Err(InferenceError("empty frame".to_string()));
        }

        let mut sum = 0.0_f64;
        let mut sum_squares = 0.0_f64;
        for pixel in frame.pixels.pixels() {
            let [r, g, b, _] = pixel.0;
            // Rec. 601 luma weights.
            let luma = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
            sum += luma;
            sum_squares += luma * luma;
        }

        let mean = sum / pixel_count;
        let variance = (sum_squares / pixel_count - mean * mean).max(0.0);
        let stddev = variance.sqrt();

        let (expression, base_confidence) = Self::classify(mean);
        let confidence = (base_confidence + Self::contrast_bonus(stddev)).min(1.0);

        Ok(vec![Detection::from_scores([(expression, confidence)])])
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::*;

    fn flat_frame(value: u8) -> Frame {
        let mut pixels = RgbaImage::new(16, 16);
        for pixel in pixels.pixels_mut() {
            *pixel = Rgba([value, value, value, 255]);
        }
        Frame::new(pixels)
    }

    fn score_of(frame: &Frame, expression: &str) -> f32 {
        let detections = BrightnessHeuristic.detect(frame).unwrap();
        assert_eq!(detections.len(), 1);
        *detections[0].scores.get(expression).unwrap()
    }

    #[test]
    fn very_bright_frames_read_happy() {
        let frame = flat_frame(220);
        assert_eq!(score_of(&frame, "happy"), 0.9);
    }

    #[test]
    fn moderate_frames_read_neutral() {
        let frame = flat_frame(120);
        assert_eq!(score_of(&frame, "neutral"), 0.7);
    }

    #[test]
    fn dark_frames_read_sad() {
        let frame = flat_frame(30);
        assert_eq!(score_of(&frame, "sad"), 0.6);
    }

    #[test]
    fn high_contrast_raises_confidence() {
        let mut pixels = RgbaImage::new(16, 16);
        for (x, _y, pixel) in pixels.enumerate_pixels_mut() {
            let value = if x % 2 == 0 { 255 } else { 60 };
            *pixel = Rgba([value, value, value, 255]);
        }
        let frame = Frame::new(pixels);
        // Mean sits in the bright band; checkerboard contrast adds the bonus.
        assert!((score_of(&frame, "happy") - 0.9).abs() < 1e-6);
    }
}
