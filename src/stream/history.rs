use std::collections::VecDeque;

use serde::Serialize;

use crate::config::EmotionLabel;

/// One confidence reading. `elapsed_ms` counts from the session's monotonic
/// start anchor, so ordering is immune to wall-clock jumps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub elapsed_ms: u64,
    pub value: f32,
}

/// Bounded, append-only series for one label. Oldest samples fall off the
/// front once the count window is full.
#[derive(Debug, Clone)]
pub struct EmotionSeries {
    samples: VecDeque<Sample>,
    bound: usize,
}

impl EmotionSeries {
    pub fn new(bound: usize) -> Self {
        let bound = bound.max(1);
        Self {
            samples: VecDeque::with_capacity(bound),
            bound,
        }
    }

    pub fn push(&mut self, sample: Sample) {
        while self.samples.len() >= self.bound {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<Sample> {
        self.samples.back().copied()
    }

    pub fn to_vec(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// One bounded series per tracked label. Exclusively owned by the loop;
/// everyone else sees cloned snapshots.
#[derive(Debug)]
pub struct EmotionHistory {
    series: [EmotionSeries; EmotionLabel::COUNT],
}

impl EmotionHistory {
    pub fn new(bound: usize) -> Self {
        Self {
            series: std::array::from_fn(|_| EmotionSeries::new(bound)),
        }
    }

    /// Append one sample per label, all sharing the tick's timestamp.
    pub fn append_tick(&mut self, elapsed_ms: u64, scores: &[f32; EmotionLabel::COUNT]) {
        for label in EmotionLabel::ALL {
            self.series[label.index()].push(Sample {
                elapsed_ms,
                value: scores[label.index()],
            });
        }
    }

    pub fn series(&self, label: EmotionLabel) -> &EmotionSeries {
        &self.series[label.index()]
    }

    pub fn snapshot(&self) -> Vec<(EmotionLabel, Vec<Sample>)> {
        EmotionLabel::ALL
            .into_iter()
            .map(|label| (label, self.series[label.index()].to_vec()))
            .collect()
    }

    pub fn clear(&mut self) {
        for series in &mut self.series {
            series.clear();
        }
    }
}
