//! Host frame loop that drives the timer scheduler

use std::{
    future::Future,
    time::{Duration, Instant},
};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::{config::Config, scheduler::TimersManager};
use super::status::StatusReport;

/// How fast and how long the loop runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLoopSettings {
    pub frame_interval: Duration,
    pub status_interval: Duration,
    /// Wall-clock budget; `None` runs until shutdown
    pub run_for: Option<Duration>,
    /// Frame budget; `None` runs until shutdown
    pub max_frames: Option<u64>,
}

impl From<&Config> for FrameLoopSettings {
    fn from(config: &Config) -> Self {
        Self {
            frame_interval: config.frame_interval(),
            status_interval: config.status_interval(),
            run_for: config.run_for(),
            max_frames: None,
        }
    }
}

/// What the loop did before it stopped
#[derive(Debug, Clone, Copy)]
pub struct FrameLoopSummary {
    pub frames: u64,
    /// Status reports logged
    pub reports: u64,
    pub elapsed: Duration,
}

/// Tick `manager` once per frame until `shutdown` resolves or a budget runs out.
///
/// Each tick receives the wall-clock time since the previous frame. Every
/// active timer is torn down before returning.
pub async fn run_frame_loop<S>(
    manager: &mut TimersManager,
    settings: FrameLoopSettings,
    shutdown: S,
) -> FrameLoopSummary
where
    S: Future<Output = ()>,
{
    info!(
        "Starting frame loop: frame={:?}, status every {:?}",
        settings.frame_interval, settings.status_interval
    );

    // tokio rejects a zero period
    let frame_interval = if settings.frame_interval.is_zero() {
        warn!("Zero frame interval requested, using 1ms");
        Duration::from_millis(1)
    } else {
        settings.frame_interval
    };
    let mut frame_timer = interval(frame_interval);
    frame_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let started = Instant::now();
    let mut last_frame = started;
    let mut next_status = started + settings.status_interval;
    let mut frames: u64 = 0;
    let mut reports: u64 = 0;

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }

            _ = frame_timer.tick() => {
                let now = Instant::now();
                let delta = now - last_frame;
                last_frame = now;

                manager.tick(delta);
                frames += 1;

                if now >= next_status {
                    log_status(manager, started, frames);
                    reports += 1;
                    next_status = now + settings.status_interval;
                }

                if settings.run_for.is_some_and(|budget| now - started >= budget) {
                    info!("Run time budget reached after {} frames", frames);
                    break;
                }
                if settings.max_frames.is_some_and(|budget| frames >= budget) {
                    debug!("Frame budget reached");
                    break;
                }
            }
        }
    }

    manager.teardown();

    FrameLoopSummary {
        frames,
        reports,
        elapsed: started.elapsed(),
    }
}

fn log_status(manager: &TimersManager, started: Instant, frames: u64) {
    let report = StatusReport::new(manager.stats(), started.elapsed(), frames);
    match serde_json::to_string(&report) {
        Ok(json) => info!("Status: {}", json),
        Err(e) => warn!("Failed to serialize status report: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, future, rc::Rc};

    use super::*;
    use crate::{config::SchedulerConfig, scheduler::TimerRequest};

    fn settings(max_frames: Option<u64>) -> FrameLoopSettings {
        FrameLoopSettings {
            frame_interval: Duration::from_millis(1),
            status_interval: Duration::from_secs(60),
            run_for: None,
            max_frames,
        }
    }

    #[tokio::test]
    async fn ready_shutdown_stops_before_first_frame() {
        let mut manager = TimersManager::new(&SchedulerConfig::new(2, 4));
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        manager
            .start(TimerRequest::new(Duration::ZERO).on_complete(move |_| flag.set(true)))
            .unwrap();

        let summary = run_frame_loop(&mut manager, settings(None), future::ready(())).await;

        assert_eq!(summary.frames, 0);
        assert!(!fired.get(), "teardown must not fire callbacks");
        assert_eq!(manager.active_count(), 0);
        assert_eq!(manager.pooled_count(), 2);
    }

    #[tokio::test]
    async fn frame_budget_ticks_active_timers() {
        let mut manager = TimersManager::new(&SchedulerConfig::new(2, 4));
        let fired = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&fired);
        manager
            .start(
                TimerRequest::new(Duration::ZERO)
                    .repeating(true)
                    .on_complete(move |_| counter.set(counter.get() + 1)),
            )
            .unwrap();

        let summary =
            run_frame_loop(&mut manager, settings(Some(5)), future::pending::<()>()).await;

        assert_eq!(summary.frames, 5);
        assert_eq!(summary.reports, 0);
        assert_eq!(fired.get(), 5);
        assert_eq!(manager.active_count(), 0);
    }

    #[tokio::test]
    async fn run_time_budget_stops_loop_and_reports_status() {
        let mut manager = TimersManager::new(&SchedulerConfig::new(1, 1));
        manager
            .start(TimerRequest::new(Duration::from_secs(60)).addressable("long"))
            .unwrap();

        let budget = Duration::from_millis(30);
        let settings = FrameLoopSettings {
            frame_interval: Duration::from_millis(1),
            status_interval: Duration::from_millis(1),
            run_for: Some(budget),
            max_frames: None,
        };

        let summary = run_frame_loop(&mut manager, settings, future::pending::<()>()).await;

        assert!(summary.elapsed >= budget);
        assert!(summary.frames >= 2);
        assert!(summary.reports >= 1, "status interval elapsed during the run");
        assert!(!manager.is_active("long"));
        assert_eq!(manager.pooled_count(), 1);
    }

    #[tokio::test]
    async fn zero_frame_interval_does_not_panic() {
        let mut manager = TimersManager::new(&SchedulerConfig::new(1, 1));
        let settings = FrameLoopSettings {
            frame_interval: Duration::ZERO,
            ..settings(Some(3))
        };

        let summary = run_frame_loop(&mut manager, settings, future::pending::<()>()).await;

        assert_eq!(summary.frames, 3);
    }
}
