//! Monotonic time source and soft timers.

use core::cell::Cell;

/// Monotonic clock.
pub trait Clock {
    /// Microseconds since an arbitrary fixed origin. Never decreases.
    fn now_micros(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_micros(&self) -> u64 {
        (**self).now_micros()
    }
}

/// Measures the time between successive calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftTimer {
    last_micros: Option<u64>,
}

impl SoftTimer {
    pub const fn new() -> Self {
        Self { last_micros: None }
    }

    /// Seconds since the previous call (or [`reset()`](Self::reset)); zero on
    /// the first call.
    pub fn elapsed(&mut self, clock: &impl Clock) -> f32 {
        let now = clock.now_micros();
        let delta = self.last_micros.map_or(0, |last| now.saturating_sub(last));
        self.last_micros = Some(now);
        delta as f32 / 1_000_000.0
    }

    /// Start measuring from now.
    pub fn reset(&mut self, clock: &impl Clock) {
        self.last_micros = Some(clock.now_micros());
    }
}

/// Clock advanced by hand, for simulation and host tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_micros: Cell<u64>,
}

impl ManualClock {
    pub const fn new() -> Self {
        Self {
            now_micros: Cell::new(0),
        }
    }

    pub fn advance_millis(&self, millis: u64) {
        self.now_micros.set(self.now_micros.get() + millis * 1_000);
    }
}

impl Clock for ManualClock {
    fn now_micros(&self) -> u64 {
        self.now_micros.get()
    }
}

/// System clock backed by the embassy time driver.
#[cfg(feature = "embassy-time")]
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

#[cfg(feature = "embassy-time")]
impl Clock for EmbassyClock {
    fn now_micros(&self) -> u64 {
        embassy_time::Instant::now().as_micros()
    }
}
