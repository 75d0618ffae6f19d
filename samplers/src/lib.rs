//! Answer samplers for quiz-bots
//!
//! This crate provides implementations of the `AnswerSampler` trait:
//!
//! - [`ThreadRngSampler`]: thread-local RNG, the default for live runs
//! - [`SeededSampler`]: a seeded `StdRng` for reproducible runs

#![warn(missing_docs)]
#![warn(clippy::all)]

mod uniform;

pub use uniform::{SeededSampler, ThreadRngSampler};

use std::sync::Arc;

use quiz_bots_core::AnswerSampler;

/// Pick a sampler: seeded when `seed` is given, thread RNG otherwise.
pub fn sampler_for(seed: Option<u64>) -> Arc<dyn AnswerSampler> {
    match seed {
        Some(seed) => Arc::new(SeededSampler::new(seed)),
        None => Arc::new(ThreadRngSampler),
    }
}
