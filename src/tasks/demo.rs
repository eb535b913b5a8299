//! Demo workload for the host binary
//!
//! A repeating heartbeat, a dash maneuver that chains into its own cooldown,
//! and a burst of short anonymous timers.

use std::{cell::Cell, rc::Rc, time::Duration};
use tracing::{debug, info, warn};

use crate::scheduler::{TimerError, TimerHandle, TimerRequest, TimersManager};

pub const DASH_ID: &str = "dash";
pub const DASH_COOLDOWN_ID: &str = "dash-cooldown";

const HEARTBEAT: Duration = Duration::from_secs(1);
const DASH: Duration = Duration::from_millis(1500);
const DASH_COOLDOWN: Duration = Duration::from_secs(3);
const BURST_SIZE: u32 = 4;
const BURST_STEP: Duration = Duration::from_millis(250);

/// Counters shared with the demo callbacks
#[derive(Debug, Clone, Default)]
pub struct DemoCounters {
    pub heartbeats: Rc<Cell<u64>>,
    pub dashes: Rc<Cell<u64>>,
    pub burst: Rc<Cell<u64>>,
}

/// Register the demo timers and return the counters they update.
///
/// Timers the scheduler rejects are logged and skipped; the rest still run.
pub fn register_demo_workload(manager: &mut TimersManager) -> DemoCounters {
    let counters = DemoCounters::default();

    let heartbeats = Rc::clone(&counters.heartbeats);
    let heartbeat = manager.start(
        TimerRequest::new(HEARTBEAT)
            .id("heartbeat")
            .repeating(true)
            .on_complete(move |manager| {
                heartbeats.set(heartbeats.get() + 1);
                debug!(
                    "Heartbeat {} ({} active timers)",
                    heartbeats.get(),
                    manager.active_count()
                );
            }),
    );
    if let Err(e) = heartbeat {
        warn!("Heartbeat timer not started: {}", e);
    }

    if let Err(e) = start_dash(manager, Rc::clone(&counters.dashes)) {
        warn!("Dash timer not started: {}", e);
    }

    for i in 1..=BURST_SIZE {
        let burst = Rc::clone(&counters.burst);
        let result = manager.start(TimerRequest::new(BURST_STEP * i).on_complete(move |_| {
            burst.set(burst.get() + 1);
        }));
        if let Err(e) = result {
            warn!("Burst timer {} not started: {}", i, e);
        }
    }

    info!("Demo workload registered: {:?}", manager.stats());
    counters
}

/// Start the dash maneuver. On completion it starts its cooldown, and the
/// cooldown starts the next dash.
pub fn start_dash(
    manager: &mut TimersManager,
    dashes: Rc<Cell<u64>>,
) -> Result<TimerHandle, TimerError> {
    let mut last_quarter = 0;

    manager.start(
        TimerRequest::new(DASH)
            .addressable(DASH_ID)
            .on_progress(move |progress| {
                let quarter = (progress * 4.0) as u8;
                if quarter > last_quarter {
                    last_quarter = quarter;
                    debug!("Dash {}% complete", u32::from(quarter) * 25);
                }
            })
            .on_complete(move |manager| {
                dashes.set(dashes.get() + 1);
                info!("Dash {} finished, cooling down", dashes.get());

                let dashes = Rc::clone(&dashes);
                let cooldown = TimerRequest::new(DASH_COOLDOWN)
                    .addressable(DASH_COOLDOWN_ID)
                    .on_complete(move |manager| {
                        if let Err(e) = start_dash(manager, Rc::clone(&dashes)) {
                            debug!("Next dash not started: {}", e);
                        }
                    });
                if let Err(e) = manager.start(cooldown) {
                    debug!("Dash cooldown not started: {}", e);
                }
            }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchedulerConfig;

    const FRAME: Duration = Duration::from_millis(250);

    #[test]
    fn workload_fills_expected_slots() {
        let mut manager = TimersManager::new(&SchedulerConfig::new(4, 16));
        register_demo_workload(&mut manager);

        let stats = manager.stats();
        assert_eq!(stats.active, 2 + BURST_SIZE as usize);
        assert_eq!(stats.addressable, 1);
        assert!(manager.is_active(DASH_ID));
    }

    #[test]
    fn dash_chains_into_cooldown_and_back() {
        let mut manager = TimersManager::new(&SchedulerConfig::new(4, 16));
        let counters = register_demo_workload(&mut manager);

        // 1.5s of dash
        for _ in 0..6 {
            manager.tick(FRAME);
        }
        assert_eq!(counters.dashes.get(), 1);
        assert!(!manager.is_active(DASH_ID));
        assert!(manager.is_active(DASH_COOLDOWN_ID));
        assert_eq!(counters.burst.get(), u64::from(BURST_SIZE));

        // 3s of cooldown
        for _ in 0..12 {
            manager.tick(FRAME);
        }
        assert!(manager.is_active(DASH_ID));
        assert!(!manager.is_active(DASH_COOLDOWN_ID));
        assert_eq!(counters.heartbeats.get(), 4);
    }

    #[test]
    fn small_pool_runs_what_fits() {
        let mut manager = TimersManager::new(&SchedulerConfig::new(0, 5));
        let counters = register_demo_workload(&mut manager);

        // Heartbeat, dash and three of the four burst timers
        assert_eq!(manager.active_count(), 5);
        assert!(manager.is_active(DASH_ID));

        for _ in 0..4 {
            manager.tick(FRAME);
        }
        assert_eq!(counters.burst.get(), 3);
        assert_eq!(counters.heartbeats.get(), 1);
    }

    #[test]
    fn dash_cannot_be_started_twice() {
        let mut manager = TimersManager::default();
        let dashes = Rc::new(Cell::new(0));
        start_dash(&mut manager, Rc::clone(&dashes)).unwrap();

        let err = start_dash(&mut manager, dashes).unwrap_err();
        assert_eq!(err, TimerError::DuplicateId { id: DASH_ID.to_string() });
    }
}
