//! Key-press rate over a sliding one-second window.
//!
//! A fixed ring of press timestamps. Old entries are never removed, they
//! simply stop counting once they fall out of the window; a full ring
//! overwrites its oldest entry, so the estimate saturates at the ring size.

use core::fmt;

use crate::config::{KEY_LOG_CAPACITY, RATE_WINDOW_MS};

pub struct KeyPressLog {
    stamps: [u64; KEY_LOG_CAPACITY],
    next: usize,
    len: usize,
}

impl KeyPressLog {
    pub const fn new() -> Self {
        Self {
            stamps: [0; KEY_LOG_CAPACITY],
            next: 0,
            len: 0,
        }
    }

    pub fn record(&mut self, now_ms: u64) {
        self.stamps[self.next] = now_ms;
        self.next = (self.next + 1) % KEY_LOG_CAPACITY;
        self.len = (self.len + 1).min(KEY_LOG_CAPACITY);
    }

    /// Presses inside the trailing window ending at `now_ms`.
    pub fn estimate(&self, now_ms: u64) -> PressRate {
        let count = self.stamps[..self.len]
            .iter()
            .filter(|&&t| t <= now_ms && now_ms - t < RATE_WINDOW_MS)
            .count();
        PressRate(count as u8)
    }
}

impl Default for KeyPressLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Presses per second. Shown with one decimal place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PressRate(pub u8);

impl fmt::Display for PressRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.0/s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn empty_log_is_zero() {
        let log = KeyPressLog::new();
        assert_eq!(log.estimate(5_000), PressRate(0));
    }

    #[test]
    fn counts_presses_inside_window() {
        let mut log = KeyPressLog::new();
        for t in [10_000, 10_200, 10_400, 10_900] {
            log.record(t);
        }
        assert_eq!(log.estimate(10_950), PressRate(4));
    }

    #[test]
    fn old_presses_expire() {
        let mut log = KeyPressLog::new();
        log.record(1_000);
        log.record(1_500);
        assert_eq!(log.estimate(1_999), PressRate(2));
        assert_eq!(log.estimate(2_000), PressRate(1));
        assert_eq!(log.estimate(2_500), PressRate(0));
    }

    #[test]
    fn saturates_at_ring_capacity() {
        let mut log = KeyPressLog::new();
        for i in 0..50u64 {
            log.record(20_000 + i * 10);
        }
        assert_eq!(log.estimate(20_500), PressRate(KEY_LOG_CAPACITY as u8));
    }

    #[test]
    fn overwrite_drops_the_oldest_first() {
        let mut log = KeyPressLog::new();
        log.record(0); // will be overwritten
        for i in 0..KEY_LOG_CAPACITY as u64 {
            log.record(5_000 + i);
        }
        assert!(!log.stamps.contains(&0));
        assert_eq!(log.estimate(5_100), PressRate(KEY_LOG_CAPACITY as u8));
    }

    #[test]
    fn renders_with_one_decimal() {
        let mut s: heapless::String<16> = heapless::String::new();
        write!(s, "{}", PressRate(7)).unwrap();
        assert_eq!(s.as_str(), "7.0/s");
    }
}
