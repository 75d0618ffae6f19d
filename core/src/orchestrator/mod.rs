//! Orchestrator for run lifecycle management
//!
//! The Orchestrator coordinates one bot-swarm run:
//! - Probing the quiz status and, if asked, starting the quiz first
//! - Spawning one task per bot session
//! - Propagating a stop request to every session via a cancellation token
//! - Joining all sessions and assembling the run report
//!
//! # Example
//!
//! ```ignore
//! use quiz_bots_core::{OrchestratorBuilder, RunConfig};
//!
//! let (orchestrator, events_rx) = OrchestratorBuilder::new()
//!     .config(RunConfig::new(25).with_auto_start(true))
//!     .api(api)
//!     .sampler(sampler)
//!     .build()?;
//!
//! let report = orchestrator.run_with_signal_handling().await?;
//! println!("{:?}", report.summary());
//! ```

mod aggregator;
mod builder;
mod executor;

pub use aggregator::{RunStats, RunStatsSnapshot};
pub use builder::OrchestratorBuilder;
pub use executor::{ensure_quiz_started, Orchestrator, StopHandle};
