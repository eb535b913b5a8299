//! Host-side tasks module
//! 
//! This module contains the frame loop that drives the scheduler, the status
//! reports it emits, and the demo workload run by the binary.

pub mod demo;
pub mod frame_loop;
pub mod status;

// Re-export main functions
pub use demo::{register_demo_workload, DemoCounters};
pub use frame_loop::{run_frame_loop, FrameLoopSettings, FrameLoopSummary};
pub use status::StatusReport;
