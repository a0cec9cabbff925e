//! Decorative pseudo-metrics ("quantum correlation", "neuromorphic spike
//! frequency"). Purely cosmetic randomized output with no computational
//! basis: each generator is only a value-range contract, and nothing here
//! ever feeds the confidence data path.

use rand::Rng;
use serde::Serialize;

pub const QUANTUM_CORRELATION_RANGE: (f64, f64) = (0.7, 1.0);
pub const SUPERPOSITION_RANGE: (f64, f64) = (0.6, 1.0);
pub const SPIKE_FREQUENCY_HZ_RANGE: (f64, f64) = (100.0, 200.0);
pub const POWER_REDUCTION_PCT_RANGE: (f64, f64) = (70.0, 90.0);
pub const EFFICIENCY_PCT_RANGE: (f64, f64) = (200.0, 300.0);

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorativeMetrics {
    pub quantum_correlation: f64,
    pub superposition: f64,
    pub spike_frequency_hz: f64,
    pub power_reduction_pct: f64,
    pub processing_efficiency_pct: f64,
}

impl DecorativeMetrics {
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        Self {
            quantum_correlation: draw(rng, QUANTUM_CORRELATION_RANGE),
            superposition: draw(rng, SUPERPOSITION_RANGE),
            spike_frequency_hz: draw(rng, SPIKE_FREQUENCY_HZ_RANGE),
            power_reduction_pct: draw(rng, POWER_REDUCTION_PCT_RANGE),
            processing_efficiency_pct: draw(rng, EFFICIENCY_PCT_RANGE),
        }
    }
}

fn draw<R: Rng>(rng: &mut R, (low, high): (f64, f64)) -> f64 {
    rng.gen_range(low..=high)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn every_metric_respects_its_declared_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let metrics = DecorativeMetrics::sample(&mut rng);
            assert!((0.7..=1.0).contains(&metrics.quantum_correlation));
            assert!((0.6..=1.0).contains(&metrics.superposition));
            assert!((100.0..=200.0).contains(&metrics.spike_frequency_hz));
            assert!((70.0..=90.0).contains(&metrics.power_reduction_pct));
            assert!((200.0..=300.0).contains(&metrics.processing_efficiency_pct));
        }
    }
}
