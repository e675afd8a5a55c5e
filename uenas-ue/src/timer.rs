//! UE Timer Management
//!
//! Logical NAS timers driven by the owning task's tick pulse. A timer stores
//! a deadline on the engine's tick counter instead of a wall-clock instant, so
//! expiry is only ever observed from `on_timer_tick`.
//!
//! ## Session Management Timers (3GPP TS 24.501 Table 10.3.1)
//! - T3580: PDU session establishment timer
//! - T3581: PDU session modification timer
//! - T3582: PDU session release timer

use std::fmt;

/// Timer code for T3580 (PDU session establishment)
pub const TIMER_T3580: u16 = 3580;
/// Timer code for T3581 (PDU session modification)
pub const TIMER_T3581: u16 = 3581;
/// Timer code for T3582 (PDU session release)
pub const TIMER_T3582: u16 = 3582;

/// Converts a timer value in seconds to a number of ticks.
///
/// Rounds up and never returns less than one tick, so a timer armed on one
/// tick can expire no earlier than the next.
pub fn ticks_for_secs(secs: u32, tick_period_ms: u64) -> u64 {
    if tick_period_ms == 0 {
        return 1;
    }
    (u64::from(secs) * 1000).div_ceil(tick_period_ms).max(1)
}

/// Logical NAS timer
///
/// Tracks the deadline tick, running status and expiry count used for
/// retransmission decisions.
#[derive(Debug, Clone)]
pub struct NasTimer {
    /// Timer code (e.g., 3580 for T3580)
    code: u16,
    /// Timer interval in ticks
    interval_ticks: u64,
    /// Tick at which the timer fires
    deadline: Option<u64>,
    /// Number of times the timer has expired since the last reset
    expiry_count: u32,
}

impl NasTimer {
    /// Create a new stopped timer
    pub fn new(code: u16, interval_ticks: u64) -> Self {
        Self {
            code,
            interval_ticks: interval_ticks.max(1),
            deadline: None,
            expiry_count: 0,
        }
    }

    /// Start (or restart) the timer relative to tick `now`
    pub fn start(&mut self, now: u64, clear_expiry_count: bool) {
        if clear_expiry_count {
            self.expiry_count = 0;
        }
        self.deadline = Some(now + self.interval_ticks);
    }

    /// Stop the timer. Stopping a stopped timer does nothing.
    pub fn stop(&mut self, clear_expiry_count: bool) {
        if clear_expiry_count {
            self.expiry_count = 0;
        }
        self.deadline = None;
    }

    /// Checks the deadline against tick `now`.
    ///
    /// Returns `true` exactly once per arming, when the deadline is reached;
    /// the timer is stopped and its expiry count incremented.
    pub fn poll(&mut self, now: u64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.expiry_count += 1;
                true
            }
            _ => false,
        }
    }

    /// Check if the timer is currently running
    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    /// Get the timer code
    pub fn code(&self) -> u16 {
        self.code
    }

    /// Get the timer interval in ticks
    pub fn interval_ticks(&self) -> u64 {
        self.interval_ticks
    }

    /// Ticks left until expiry, 0 when stopped
    pub fn remaining(&self, now: u64) -> u64 {
        self.deadline.map_or(0, |d| d.saturating_sub(now))
    }

    /// Get the number of times the timer has expired
    pub fn expiry_count(&self) -> u32 {
        self.expiry_count
    }
}

impl fmt::Display for NasTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.deadline {
            Some(deadline) => write!(
                f,
                "T{}: deadline[{}] int[{}]",
                self.code, deadline, self.interval_ticks
            ),
            None => write!(f, "T{}: .", self.code),
        }
    }
}
