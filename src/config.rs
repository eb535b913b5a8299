//! Configuration and CLI argument handling

use std::time::Duration;

use anyhow::ensure;
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Highest frame rate the host loop accepts
pub const MAX_TICK_RATE: u32 = 1_000;

/// Pool sizing for a `TimersManager`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Records allocated up front
    pub initial_pool_size: usize,
    /// Upper bound on records, pooled and active together
    pub max_pool_size: usize,
}

impl SchedulerConfig {
    pub fn new(initial_pool_size: usize, max_pool_size: usize) -> Self {
        Self {
            initial_pool_size,
            max_pool_size,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::new(8, 32)
    }
}

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "frame-timers")]
#[command(about = "Drive a pooled timer scheduler from a fixed-rate frame loop")]
#[command(version)]
pub struct Config {
    /// Timer records allocated at startup
    #[arg(long, default_value = "8")]
    pub initial_pool_size: usize,

    /// Maximum number of timer records
    #[arg(long, default_value = "32")]
    pub max_pool_size: usize,

    /// Frames per second of the host loop
    #[arg(short, long, default_value = "60")]
    pub tick_rate: u32,

    /// Seconds between status reports
    #[arg(short, long, default_value = "5")]
    pub status_interval: u64,

    /// Stop after this many seconds instead of waiting for a signal
    #[arg(short, long)]
    pub run_for: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Reject values the frame loop cannot work with
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.max_pool_size > 0, "--max-pool-size must be greater than zero");
        ensure!(self.tick_rate > 0, "--tick-rate must be greater than zero");
        ensure!(
            self.tick_rate <= MAX_TICK_RATE,
            "--tick-rate must be at most {}",
            MAX_TICK_RATE
        );
        ensure!(self.status_interval > 0, "--status-interval must be greater than zero");
        Ok(())
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig::new(self.initial_pool_size, self.max_pool_size)
    }

    /// Time between two frames
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_interval)
    }

    pub fn run_for(&self) -> Option<Duration> {
        self.run_for.map(Duration::from_secs)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("frame-timers").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn defaults_match_scheduler_defaults() {
        let config = parse(&[]);
        assert_eq!(config.scheduler_config(), SchedulerConfig::default());
        assert_eq!(config.frame_interval(), Duration::from_secs(1) / 60);
        assert_eq!(config.run_for(), None);
        assert_eq!(config.log_level(), "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_tick_rate_is_rejected() {
        let config = parse(&["--tick-rate", "0"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn tick_rate_above_limit_is_rejected() {
        let config = parse(&["--tick-rate", "2000000000"]);
        assert!(config.validate().is_err());

        let config = parse(&["--tick-rate", "1001"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn highest_tick_rate_has_nonzero_frame() {
        let config = parse(&["--tick-rate", "1000"]);
        assert!(config.validate().is_ok());
        assert_eq!(config.frame_interval(), Duration::from_millis(1));
    }

    #[test]
    fn zero_max_pool_is_rejected() {
        let config = parse(&["--max-pool-size", "0"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn verbose_switches_log_level() {
        let config = parse(&["-v", "--run-for", "3"]);
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.run_for(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn scheduler_config_fills_missing_fields() {
        let config: SchedulerConfig = serde_json::from_str(r#"{"max_pool_size": 4}"#).unwrap();
        assert_eq!(config, SchedulerConfig::new(8, 4));
    }
}
