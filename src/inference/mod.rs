//! Expression-model seam. A model maps one frame to zero or more detected
//! subjects, each scored in the model's own label vocabulary; translation to
//! the tracked labels happens in `analysis`.

pub mod brightness;
pub mod synthetic;

use std::collections::HashMap;

use crate::capture::Frame;
use crate::error::InferenceError;

pub use brightness::BrightnessHeuristic;
pub use synthetic::SyntheticExpressions;

/// One detected subject with per-expression confidences in [0, 1], keyed by
/// the provider's own vocabulary.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    pub scores: HashMap<String, f32>,
}

impl Detection {
    pub fn from_scores<I, S>(scores: I) -> Self
    where
        I: IntoIterator<Item = (S, f32)>,
        S: Into<String>,
    {
        Self {
            scores: scores
                .into_iter()
                .map(|(name, score)| (name.into(), score))
                .collect(),
        }
    }
}

/// A pretrained (or fabricated) expression model. `detect` may be slow, so
/// the loop always runs it on a blocking worker thread; an empty result means
/// no subject was found in the frame.
pub trait EmotionModel: Send + Sync + 'static {
    /// Whether the model's weights are loaded. `start()` refuses to run an
    /// unready model.
    fn is_ready(&self) -> bool {
        true
    }

    fn detect(&self, frame: &Frame) -> Result<Vec<Detection>, InferenceError>;
}
