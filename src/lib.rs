//! Frame Timers - a pooled, frame-driven timer scheduler
//! 
//! This library provides a single-threaded scheduler for one-shot and
//! repeating timers backed by a bounded pool of reusable records, plus the
//! host loop pieces needed to drive it at a fixed frame rate.

pub mod config;
pub mod scheduler;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::{Config, SchedulerConfig};
pub use scheduler::{PoolStats, Timer, TimerError, TimerHandle, TimerRequest, TimersManager};
pub use tasks::run_frame_loop;
pub use utils::signals::shutdown_signal;
