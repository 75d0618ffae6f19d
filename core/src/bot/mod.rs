//! Bot session: one simulated quiz participant
//!
//! Each bot is an independent tokio task driving the state machine
//! **connect -> await start -> answer -> submit**:
//!
//! 1. Joins with a display name and obtains a client id
//! 2. Fetches the quiz unless it was inlined on connect
//! 3. Polls status until the quiz is in progress
//! 4. Answers each question the first time it becomes current, after a
//!    randomized thinking delay
//! 5. Submits once every question is answered or the quiz ends
//!
//! A stop request is honoured before every poll, during every thinking delay
//! and before submission. Once the submit call is issued the bot completes
//! regardless.
//!
//! # Example
//!
//! ```ignore
//! use quiz_bots_core::bot::BotSessionBuilder;
//!
//! let bot = BotSessionBuilder::for_run(0, &run_config)
//!     .api(api)
//!     .sampler(sampler)
//!     .cancel(token)
//!     .build()?;
//!
//! let record = bot.run().await;
//! println!("{:?}", record.outcome);
//! ```

mod builder;
mod executor;
mod state;

pub use builder::BotSessionBuilder;
pub use executor::{resolve_num_questions, BotSession};
pub use state::{BotOutcome, BotState};
