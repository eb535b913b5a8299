//! Timer scheduler module
//!
//! This module provides:
//! - **Records**: reusable `Timer` slots and the `TimerHandle`s that point at them
//! - **Requests**: `TimerRequest`, a builder describing a timer to start
//! - **Manager**: `TimersManager`, the pooled scheduler driven by `tick`
//!
//! # Lifecycle
//!
//! `Pooled -> Active -> { Active (repeating) | Pooled (one-shot or stopped) }`

mod error;
mod manager;
mod stats;
mod timer;


pub use error::TimerError;
pub use manager::TimersManager;
pub use stats::PoolStats;
pub use timer::{CompletionCallback, ProgressCallback, Timer, TimerHandle, TimerRequest};
