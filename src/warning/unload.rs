//! Navigation guard
//!
//! When the page starts unloading the channel drops, which would flash a
//! disconnection notice right before the next page appears. The guard stays
//! raised for a short window and clears itself, in case the navigation was
//! cancelled.

use std::time::Duration;

/// Monotonic time source
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin
    fn now(&self) -> Duration;
}

/// Wall clock of the current platform
///
/// Browsers have no `Instant`; there the clock reads `Date.now()` whether or
/// not the `wasm` feature is enabled.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    #[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
    origin: std::time::Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
            origin: std::time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    // `Instant` is not available in browsers.
    #[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
    fn now(&self) -> Duration {
        Duration::from_secs_f64(js_sys::Date::now() / 1000.0)
    }
}

/// Transient "unloading" flag with automatic expiry
#[derive(Debug, Clone)]
pub struct UnloadGuard {
    window: Duration,
    until: Option<Duration>,
}

impl UnloadGuard {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            until: None,
        }
    }

    /// Raise the guard at `now`
    pub fn begin(&mut self, now: Duration) {
        self.until = Some(now + self.window);
    }

    /// Whether the guard is still raised at `now`
    pub fn is_active(&self, now: Duration) -> bool {
        self.until.is_some_and(|until| now < until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_expires() {
        let mut guard = UnloadGuard::new(Duration::from_secs(5));
        assert!(!guard.is_active(Duration::ZERO));

        guard.begin(Duration::from_secs(10));
        assert!(guard.is_active(Duration::from_secs(10)));
        assert!(guard.is_active(Duration::from_millis(14_999)));
        assert!(!guard.is_active(Duration::from_secs(15)));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
