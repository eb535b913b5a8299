//! Frame Timers - drive a pooled timer scheduler from a fixed-rate loop
//! 
//! This is the main entry point for the frame-timers host binary.

use tracing::info;

use frame_timers::{
    config::Config,
    scheduler::TimersManager,
    tasks::{register_demo_workload, run_frame_loop, FrameLoopSettings},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("frame_timers={}", config.log_level()))
        .init();

    config.validate()?;

    info!("Starting frame-timers v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: pool={}/{}, tick_rate={}Hz, run_for={:?}",
          config.initial_pool_size, config.max_pool_size, config.tick_rate, config.run_for);

    let mut manager = TimersManager::new(&config.scheduler_config());
    let counters = register_demo_workload(&mut manager);

    let summary = run_frame_loop(&mut manager, FrameLoopSettings::from(&config), shutdown_signal()).await;

    info!("Frame loop stopped after {} frames in {:?}", summary.frames, summary.elapsed);
    info!("Heartbeats: {}, dashes: {}, burst timers: {}",
          counters.heartbeats.get(), counters.dashes.get(), counters.burst.get());
    info!("Shutdown complete");
    Ok(())
}
