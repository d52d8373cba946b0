use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Explicitly seeded source of the cosmetic numbers shown next to steps
/// (example activations, errors, losses).
///
/// Structurally inert: nothing produced here may influence step targets or
/// ordering. The same seed yields the same number stream.
#[derive(Clone, Debug)]
pub struct IllustrativeValues {
    rng: StdRng,
}

impl IllustrativeValues {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Example activation values in [0, 1), rounded for display.
    pub fn activations(&mut self, count: usize) -> Vec<f64> {
        (0..count)
            .map(|_| round2(self.rng.random_range(0.0..1.0)))
            .collect()
    }

    /// Example signed error values in (-0.5, 0.5), rounded for display.
    pub fn errors(&mut self, count: usize) -> Vec<f64> {
        (0..count)
            .map(|_| round2(self.rng.random_range(-0.5..0.5)))
            .collect()
    }

    /// Example loss value in [0, 0.25), rounded for display.
    pub fn loss(&mut self) -> f64 {
        round2(self.rng.random_range(0.0..0.25))
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
