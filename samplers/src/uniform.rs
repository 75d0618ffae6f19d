//! Uniform option and thinking-time samplers

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};
use rand_distr::Uniform;

use quiz_bots_core::AnswerSampler;

/// Uniform index in `[0, option_count)`, or 0 when there are no options
fn pick_option<R: Rng + ?Sized>(rng: &mut R, option_count: usize) -> usize {
    if option_count == 0 {
        return 0;
    }
    rng.sample(Uniform::new(0, option_count))
}

/// Uniform whole seconds in `[1, max(1, max_secs)]`
fn pick_think_time<R: Rng + ?Sized>(rng: &mut R, max_secs: u64) -> u64 {
    rng.sample(Uniform::new_inclusive(1, max_secs.max(1)))
}

/// Sampler backed by the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSampler;

impl AnswerSampler for ThreadRngSampler {
    fn name(&self) -> &str {
        "thread_rng"
    }

    fn choose_option(&self, option_count: usize) -> usize {
        pick_option(&mut thread_rng(), option_count)
    }

    fn think_time(&self, max_secs: u64) -> u64 {
        pick_think_time(&mut thread_rng(), max_secs)
    }
}

/// Sampler with a fixed seed.
///
/// Draws are serialized through a mutex, so with many bots the sequence each
/// bot sees depends on scheduling; the multiset of draws over a run does not.
#[derive(Debug)]
pub struct SeededSampler {
    seed: u64,
    rng: Mutex<StdRng>,
}

impl SeededSampler {
    /// Create a sampler seeded with `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Seed this sampler was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }
}

impl AnswerSampler for SeededSampler {
    fn name(&self) -> &str {
        "seeded"
    }

    fn choose_option(&self, option_count: usize) -> usize {
        self.with_rng(|rng| pick_option(rng, option_count))
    }

    fn think_time(&self, max_secs: u64) -> u64 {
        self.with_rng(|rng| pick_think_time(rng, max_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_option_in_range() {
        let sampler = ThreadRngSampler;
        for _ in 0..500 {
            assert!(sampler.choose_option(4) < 4);
        }
    }

    #[test]
    fn test_no_options_chooses_zero() {
        assert_eq!(ThreadRngSampler.choose_option(0), 0);
        assert_eq!(SeededSampler::new(1).choose_option(0), 0);
    }

    #[test]
    fn test_think_time_bounds() {
        let sampler = ThreadRngSampler;
        for _ in 0..500 {
            let t = sampler.think_time(5);
            assert!((1..=5).contains(&t));
        }
        assert_eq!(sampler.think_time(0), 1);
        assert_eq!(sampler.think_time(1), 1);
    }

    #[test]
    fn test_every_option_reachable() {
        let sampler = SeededSampler::new(7);
        let seen: HashSet<_> = (0..1000).map(|_| sampler.choose_option(4)).collect();
        assert_eq!(seen.len(), 4);

        let times: HashSet<_> = (0..1000).map(|_| sampler.think_time(3)).collect();
        assert_eq!(times, HashSet::from([1, 2, 3]));
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = SeededSampler::new(42);
        let b = SeededSampler::new(42);

        let draws_a: Vec<_> = (0..50)
            .map(|_| (a.choose_option(6), a.think_time(10)))
            .collect();
        let draws_b: Vec<_> = (0..50)
            .map(|_| (b.choose_option(6), b.think_time(10)))
            .collect();

        assert_eq!(draws_a, draws_b);
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn test_sampler_names() {
        assert_eq!(ThreadRngSampler.name(), "thread_rng");
        assert_eq!(SeededSampler::new(0).name(), "seeded");
        assert_eq!(crate::sampler_for(Some(3)).name(), "seeded");
        assert_eq!(crate::sampler_for(None).name(), "thread_rng");
    }
}
