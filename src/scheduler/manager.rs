//! Pooled timer scheduler
//!
//! Owns every timer record. Records live in an arena and move between the
//! free pool and the active set; addressable timers are also indexed by id.
//! The host loop drives everything through [`TimersManager::tick`].

use std::{
    collections::{HashMap, VecDeque},
    panic::{self, AssertUnwindSafe},
    time::Duration,
};
use tracing::{debug, error, info, warn};

use crate::config::SchedulerConfig;
use super::{PoolStats, Timer, TimerError, TimerHandle, TimerRequest};

/// Single-threaded timer scheduler with a bounded record pool
#[derive(Debug)]
pub struct TimersManager {
    /// Every record ever allocated; indices are stable
    timers: Vec<Timer>,
    /// Free record slots, reused front first
    pool: VecDeque<usize>,
    /// Running timers in start order
    active: Vec<TimerHandle>,
    /// Addressable timer id -> slot
    addressable: HashMap<String, usize>,
    max_pool_size: usize,
}

impl TimersManager {
    /// Create a scheduler and pre-warm its pool
    pub fn new(config: &SchedulerConfig) -> Self {
        let max_pool_size = config.max_pool_size;
        let initial = if config.initial_pool_size > max_pool_size {
            warn!(
                "Initial pool size {} exceeds max pool size {}, clamping",
                config.initial_pool_size, max_pool_size
            );
            max_pool_size
        } else {
            config.initial_pool_size
        };

        let timers: Vec<Timer> = (0..initial).map(|_| Timer::pooled()).collect();
        let pool = (0..initial).collect();

        debug!("Timer pool pre-warmed with {} records (max {})", initial, max_pool_size);

        Self {
            timers,
            pool,
            active: Vec::new(),
            addressable: HashMap::new(),
            max_pool_size,
        }
    }

    /// Start a timer.
    ///
    /// Reuses a pooled record when one is free and grows the pool otherwise,
    /// up to `max_pool_size` records in total. No callback fires here.
    pub fn start(&mut self, request: TimerRequest) -> Result<TimerHandle, TimerError> {
        if request.addressable {
            if request.id.is_empty() {
                warn!("Rejected addressable timer without an identifier");
                return Err(TimerError::EmptyId);
            }
            if self.addressable.contains_key(&request.id) {
                warn!("A timer with the identifier {} already exists", request.id);
                return Err(TimerError::DuplicateId { id: request.id });
            }
        }

        let slot = match self.pool.pop_front() {
            Some(slot) => slot,
            None if self.timers.len() < self.max_pool_size => {
                self.timers.push(Timer::pooled());
                debug!("Expanding pool size to {}", self.timers.len());
                self.timers.len() - 1
            }
            None => {
                warn!("Timer pool size reached its limit: {}", self.max_pool_size);
                return Err(TimerError::PoolExhausted {
                    max_pool_size: self.max_pool_size,
                });
            }
        };

        let timer = &mut self.timers[slot];
        timer.assign(request);
        let handle = TimerHandle {
            slot,
            generation: timer.generation,
        };

        if timer.addressable {
            self.addressable.insert(timer.id.clone(), slot);
        }
        self.active.push(handle);

        debug!(
            "Started timer {:?} ({:?}, repeating={})",
            timer.id, timer.duration, timer.repeating
        );
        Ok(handle)
    }

    /// Cancel an addressable timer by id. Its completion callback never fires.
    pub fn stop(&mut self, id: &str) -> Result<(), TimerError> {
        match self.addressable.get(id).copied() {
            Some(slot) => {
                self.recycle(slot);
                debug!("Stopped timer {}", id);
                Ok(())
            }
            None => {
                warn!("{} is not accessible", id);
                Err(TimerError::UnknownId { id: id.to_string() })
            }
        }
    }

    /// Cancel any active timer, anonymous ones included, by handle
    pub fn stop_handle(&mut self, handle: TimerHandle) -> Result<(), TimerError> {
        if self.get(handle).is_none() {
            warn!("Tried to stop a timer through a stale handle");
            return Err(TimerError::StaleHandle);
        }
        self.recycle(handle.slot);
        Ok(())
    }

    /// Advance every active timer by `delta` and fire completions.
    ///
    /// Works on a snapshot of the active set taken before any callback runs.
    /// Timers started during the tick wait for the next one; timers stopped
    /// by an earlier callback in the same tick are skipped. A panicking
    /// callback is logged and does not affect other timers.
    pub fn tick(&mut self, delta: Duration) {
        let snapshot = self.active.clone();

        for handle in snapshot {
            let Some(timer) = self.timers.get_mut(handle.slot).filter(|t| t.matches(handle)) else {
                continue;
            };

            timer.elapsed = timer.elapsed.saturating_add(delta);

            let progress = timer.progress();
            if let Some(on_progress) = timer.on_progress.as_mut() {
                if let Err(reason) = isolate(|| on_progress(progress)) {
                    error!("Progress callback of timer {:?} panicked: {}", timer.id, reason);
                }
            }

            if !timer.is_complete() {
                continue;
            }

            let mut on_complete = timer.on_complete.take();
            if let Some(callback) = on_complete.as_mut() {
                if let Err(reason) = isolate(|| callback(self)) {
                    error!(
                        "Completion callback of timer {:?} panicked: {}",
                        self.timers[handle.slot].id, reason
                    );
                }
            }

            // The callback may have stopped this timer or recycled its record.
            let timer = &mut self.timers[handle.slot];
            if !timer.matches(handle) {
                continue;
            }
            timer.on_complete = on_complete;

            if timer.repeating {
                timer.elapsed = Duration::ZERO;
            } else {
                self.recycle(handle.slot);
            }
        }
    }

    /// Normalized progress of a running timer, `None` once the handle is stale
    pub fn progress(&self, handle: TimerHandle) -> Option<f32> {
        self.get(handle).map(Timer::progress)
    }

    pub fn progress_of(&self, id: &str) -> Option<f32> {
        self.find(id).map(Timer::progress)
    }

    pub fn remaining(&self, handle: TimerHandle) -> Option<Duration> {
        self.get(handle).map(Timer::remaining)
    }

    /// Look up a running timer by handle
    pub fn get(&self, handle: TimerHandle) -> Option<&Timer> {
        self.timers.get(handle.slot).filter(|t| t.matches(handle))
    }

    /// Look up a running addressable timer by id
    pub fn find(&self, id: &str) -> Option<&Timer> {
        self.addressable.get(id).map(|&slot| &self.timers[slot])
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.addressable.contains_key(id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn pooled_count(&self) -> usize {
        self.pool.len()
    }

    pub fn max_pool_size(&self) -> usize {
        self.max_pool_size
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            pooled: self.pool.len(),
            active: self.active.len(),
            addressable: self.addressable.len(),
            total: self.timers.len(),
            max_pool_size: self.max_pool_size,
        }
    }

    /// Stop every active timer without firing callbacks
    pub fn teardown(&mut self) {
        let count = self.active.len();
        for handle in self.active.clone() {
            self.recycle(handle.slot);
        }
        info!("Timer scheduler torn down, {} active timers returned to pool", count);
    }

    /// Move a record from the active set back to the pool
    fn recycle(&mut self, slot: usize) {
        let timer = &mut self.timers[slot];
        if timer.addressable && self.addressable.get(&timer.id) == Some(&slot) {
            self.addressable.remove(&timer.id);
        }
        self.active.retain(|handle| handle.slot != slot);
        timer.release();
        self.pool.push_back(slot);
    }
}

impl Default for TimersManager {
    fn default() -> Self {
        Self::new(&SchedulerConfig::default())
    }
}

/// Run a callback, turning a panic into an error message
fn isolate<F: FnOnce()>(f: F) -> Result<(), String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        if let Some(message) = payload.downcast_ref::<&str>() {
            message.to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "unknown panic payload".to_string()
        }
    })
}
