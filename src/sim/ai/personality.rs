//! Per-controller quirks rolled once at creation

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::random_between;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    /// Distance the AI tries to hold from its target
    pub preferred_range: f32,
    /// Minimum gap between strafe direction flips (ms)
    pub strafe_frequency_ms: f64,
    /// 0.3-0.8, carried for tuning; no behavior reads it yet
    pub patience: f32,
}

impl Personality {
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            preferred_range: random_between(rng, 150.0, 300.0),
            strafe_frequency_ms: random_between(rng, 500.0, 1500.0) as f64,
            patience: random_between(rng, 0.3, 0.8),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_roll_ranges() {
        let mut rng = Pcg32::seed_from_u64(21);
        for _ in 0..200 {
            let p = Personality::roll(&mut rng);
            assert!((150.0..=300.0).contains(&p.preferred_range));
            assert!((500.0..=1500.0).contains(&p.strafe_frequency_ms));
            assert!((0.3..=0.8).contains(&p.patience));
        }
    }
}
