//! Micro-benchmark runner
//!
//! Calibrates how many calls fit in `min_time`, derives a round count from
//! `max_time`, times every round and summarizes the per-call durations.

mod config;
pub mod report;
mod runner;
mod stats;
mod timer;

pub use config::*;
pub use runner::*;
pub use stats::*;
pub use timer::*;
