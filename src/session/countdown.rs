//! Auto-accept countdown of the request dialog
//!
//! The host drives the countdown from a one-second timer and passes back the
//! token it was started with. Resolving the prompt drops the countdown, so
//! ticks from a timer the host failed to clear carry a stale token and are
//! ignored.

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Remaining(u32),
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoAcceptCountdown {
    token: u64,
    remaining: u32,
}

impl AutoAcceptCountdown {
    pub fn new(token: u64, ticks: u32) -> Self {
        Self {
            token,
            remaining: ticks,
        }
    }

    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn tick(&mut self) -> Tick {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            Tick::Expired
        } else {
            Tick::Remaining(self.remaining)
        }
    }
}
