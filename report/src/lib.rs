//! Report output for quiz-bots runs
//!
//! This crate turns a `RunReport` into:
//!
//! - A pretty-printed JSON file
//! - A terminal summary

#![warn(missing_docs)]
#![warn(clippy::all)]

mod json_export;
mod summary;

pub use json_export::JsonExporter;
pub use summary::render_summary;
