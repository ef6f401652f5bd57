//! Random sources for report sampling.

use rand::Rng;

/// Uniform source over `[0, 1)`.
pub trait RandomSource: Send + Sync {
    fn next_f64(&self) -> f64;
}

/// Thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Always yields the same value; forces sampling decisions in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn next_f64(&self) -> f64 {
        self.0
    }
}

/// Keep a report when the draw falls below the rate.
pub fn should_sample(random: &dyn RandomSource, sample_rate: f64) -> bool {
    random.next_f64() < sample_rate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_bounds() {
        for _ in 0..1000 {
            assert!(should_sample(&ThreadRandom, 1.0));
            assert!(!should_sample(&ThreadRandom, 0.0));
        }
    }

    #[test]
    fn test_fixed_draw() {
        assert!(should_sample(&FixedRandom(0.49), 0.5));
        assert!(!should_sample(&FixedRandom(0.5), 0.5));
    }
}
