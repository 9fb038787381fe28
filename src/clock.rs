//! Injectable time sources for cost accrual.
//!
//! Power cost is charged per elapsed hour of real time, so the accrual rate
//! tracks how fast the driving loop actually runs. Tests and batch runs
//! replace the wall clock with a [ManualClock] and advance time explicitly.

use std::{
    fmt::Debug,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use dyn_clone::DynClone;

/// A monotonic time source. Implementations report time elapsed since some
/// fixed origin of their choosing; only differences between readings are
/// meaningful.
pub trait Clock: Debug + DynClone + Send {
    /// Time elapsed since this clock's origin.
    fn elapsed(&self) -> Duration;
}

dyn_clone::clone_trait_object!(Clock);

/// Wall-clock time, measured from the instant of construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock that only moves when told to. Clones share the same underlying
/// instant, so a test can hold one handle and advance the copy held inside
/// an account.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves this clock (and all of its clones) forward by `step`.
    pub fn advance(&self, step: Duration) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += step;
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        *self.now.lock().expect("clock lock poisoned")
    }
}
