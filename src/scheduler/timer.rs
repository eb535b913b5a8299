//! Timer records, handles and start requests

use std::{fmt, time::Duration};

use super::TimersManager;

/// Fired once per completion. Receives the scheduler so it can start or stop timers.
pub type CompletionCallback = Box<dyn FnMut(&mut TimersManager)>;

/// Fired once per tick with normalized progress in `[0, 1]`.
pub type ProgressCallback = Box<dyn FnMut(f32)>;

/// Identifies one run of a timer.
///
/// Records are reused through the pool, so a handle also carries the record's
/// generation. Once the timer completes (one-shot) or is stopped, the
/// generation moves on and the handle goes stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    pub(crate) slot: usize,
    pub(crate) generation: u32,
}

/// A reusable timer record owned by the scheduler
pub struct Timer {
    pub(crate) duration: Duration,
    pub(crate) elapsed: Duration,
    pub(crate) on_complete: Option<CompletionCallback>,
    pub(crate) on_progress: Option<ProgressCallback>,
    pub(crate) repeating: bool,
    pub(crate) addressable: bool,
    pub(crate) id: String,
    pub(crate) generation: u32,
    pub(crate) active: bool,
}

impl Timer {
    /// Create a neutral record for the free pool
    pub(crate) fn pooled() -> Self {
        Self {
            duration: Duration::ZERO,
            elapsed: Duration::ZERO,
            on_complete: None,
            on_progress: None,
            repeating: false,
            addressable: false,
            id: String::new(),
            generation: 0,
            active: false,
        }
    }

    /// Load a start request into this record and mark it active
    pub(crate) fn assign(&mut self, request: TimerRequest) {
        self.duration = request.duration;
        self.elapsed = Duration::ZERO;
        self.on_complete = request.on_complete;
        self.on_progress = request.on_progress;
        self.repeating = request.repeating;
        self.addressable = request.addressable;
        self.id = request.id;
        self.active = true;
    }

    /// Return the record to its neutral state and invalidate outstanding handles
    pub(crate) fn release(&mut self) {
        self.duration = Duration::ZERO;
        self.elapsed = Duration::ZERO;
        self.on_complete = None;
        self.on_progress = None;
        self.repeating = false;
        self.addressable = false;
        self.id.clear();
        self.active = false;
        self.generation = self.generation.wrapping_add(1);
    }

    pub(crate) fn matches(&self, handle: TimerHandle) -> bool {
        self.active && self.generation == handle.generation
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Normalized progress, `elapsed / duration` clamped to `[0, 1]`.
    ///
    /// A zero-length timer reports `1.0`.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_repeating(&self) -> bool {
        self.repeating
    }

    pub fn is_addressable(&self) -> bool {
        self.addressable
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("id", &self.id)
            .field("duration", &self.duration)
            .field("elapsed", &self.elapsed)
            .field("repeating", &self.repeating)
            .field("addressable", &self.addressable)
            .field("active", &self.active)
            .field("generation", &self.generation)
            .field("on_complete", &self.on_complete.is_some())
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

/// Everything needed to start a timer
///
/// ```ignore
/// let request = TimerRequest::from_secs_f32(3.0)
///     .addressable("dash")
///     .on_complete(|_| println!("dash finished"));
/// ```
pub struct TimerRequest {
    pub(crate) duration: Duration,
    pub(crate) on_complete: Option<CompletionCallback>,
    pub(crate) on_progress: Option<ProgressCallback>,
    pub(crate) id: String,
    pub(crate) repeating: bool,
    pub(crate) addressable: bool,
}

impl TimerRequest {
    /// Create an anonymous one-shot request with no callbacks
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            on_complete: None,
            on_progress: None,
            id: String::new(),
            repeating: false,
            addressable: false,
        }
    }

    /// Create a request from seconds. Negative or NaN values become zero.
    pub fn from_secs_f32(secs: f32) -> Self {
        let duration = Duration::try_from_secs_f32(secs.max(0.0)).unwrap_or(Duration::ZERO);
        Self::new(duration)
    }

    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut TimersManager) + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: FnMut(f32) + 'static,
    {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// Label the timer without registering it for lookup
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Register the timer under `id` for cancellation and duplicate rejection
    pub fn addressable(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self.addressable = true;
        self
    }

    pub fn repeating(mut self, repeating: bool) -> Self {
        self.repeating = repeating;
        self
    }
}

impl fmt::Debug for TimerRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerRequest")
            .field("duration", &self.duration)
            .field("id", &self.id)
            .field("repeating", &self.repeating)
            .field("addressable", &self.addressable)
            .finish_non_exhaustive()
    }
}
