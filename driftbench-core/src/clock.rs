//! Wall-Clock Abstraction
//!
//! Timing runs against an injectable [`Clock`] so calibration and trial
//! logic can be exercised with scripted time instead of the host clock.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Source of monotonic readings.
///
/// `now` returns time elapsed since an arbitrary fixed origin; only the
/// difference between two readings is meaningful.
pub trait Clock {
    /// Current reading since the clock's origin.
    fn now(&self) -> Duration;
}

/// System monotonic clock backed by [`std::time::Instant`].
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}

impl MonotonicClock {
    /// Clock anchored at the current instant.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline(always)]
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-advanced clock for tests and simulations.
///
/// Clones share one underlying reading, so a snippet can capture a clone
/// and advance time while the measurement loop observes the same clock.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    reading: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// Clock at reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the reading by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.reading.set(self.reading.get() + delta);
    }

    /// Set the reading to an absolute value.
    pub fn set(&self, reading: Duration) {
        self.reading.set(reading);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.reading.get()
    }
}

/// Set CPU affinity to pin the current thread to a specific core
///
/// Reduces scheduling noise in timing runs by keeping the measuring thread
/// off other cores.
#[cfg(target_os = "linux")]
pub fn pin_to_cpu(cpu: usize) -> Result<(), std::io::Error> {
    use std::mem::MaybeUninit;

    unsafe {
        let mut set = MaybeUninit::<libc::cpu_set_t>::zeroed().assume_init();
        libc::CPU_ZERO(&mut set);
        libc::CPU_SET(cpu, &mut set);

        let result = libc::sched_setaffinity(
            0, // current thread
            std::mem::size_of::<libc::cpu_set_t>(),
            &set as *const libc::cpu_set_t,
        );

        if result != 0 {
            return Err(std::io::Error::last_os_error());
        }
    }

    Ok(())
}

/// Set CPU affinity (no-op on non-Linux platforms)
#[cfg(not(target_os = "linux"))]
pub fn pin_to_cpu(_cpu: usize) -> Result<(), std::io::Error> {
    // CPU pinning not supported on this platform
    Ok(())
}
