//! Rotary encoder decoding.
//!
//! Two halves with split ownership:
//!
//! - [`QuadratureDecoder`] runs in the pin-edge context, which on the
//!   board is an interrupt-priority task above the main loop. It owns the
//!   raw phase state and the signed tick counter, both atomics, and is the
//!   only writer of either. It must observe every edge: a full cycle
//!   sampled only at its resting state counts nothing.
//! - [`DetentTracker`] runs in the main tick. It polls the counter, turns
//!   it into whole detents and remembers the direction for the on-screen
//!   indicator.
//!
//! Quadrature sequence (`A` leading `B` is clockwise, counted positive):
//! ```text
//!   CW : 00 → 10 → 11 → 01 → 00
//!   CCW: 00 → 01 → 11 → 10 → 00
//! ```

use core::sync::atomic::{AtomicI32, AtomicU8, Ordering};

use crate::config::{DIRECTION_HOLD_MS, TICKS_PER_DETENT};

/// Signed tick delta indexed by `(previous << 2) | current`.
///
/// Non-transitions (diagonal) and two-bit jumps are zero.
const TRANSITIONS: [i8; 16] = [
    0, -1, 1, 0, //
    1, 0, 0, -1, //
    -1, 0, 0, 1, //
    0, 1, -1, 0, //
];

#[inline]
const fn phase(a: bool, b: bool) -> u8 {
    ((a as u8) << 1) | (b as u8)
}

/// Edge-driven quadrature decoder, safe to share as a `static`.
pub struct QuadratureDecoder {
    phase: AtomicU8,
    ticks: AtomicI32,
}

impl QuadratureDecoder {
    pub const fn new() -> Self {
        Self {
            phase: AtomicU8::new(0),
            ticks: AtomicI32::new(0),
        }
    }

    /// Seed the phase from the current line levels without counting.
    pub fn reset_phase(&self, a: bool, b: bool) {
        self.phase.store(phase(a, b), Ordering::Relaxed);
    }

    /// Handle one transition on either phase line.
    ///
    /// `a` and `b` are the line levels sampled after the edge.
    #[inline]
    pub fn on_edge(&self, a: bool, b: bool) {
        let current = phase(a, b);
        let previous = self.phase.swap(current, Ordering::Relaxed);
        let delta = TRANSITIONS[((previous << 2) | current) as usize & 0x0F];
        if delta != 0 {
            self.ticks.fetch_add(delta as i32, Ordering::Relaxed);
        }
    }

    /// Accumulated ticks since boot.
    pub fn position(&self) -> i32 {
        self.ticks.load(Ordering::Relaxed)
    }
}

impl Default for QuadratureDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction of the most recent detent step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    #[default]
    None,
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// Glyph for the home screen indicator.
    pub fn symbol(self) -> &'static str {
        match self {
            Direction::None => "",
            Direction::Clockwise => "+",
            Direction::CounterClockwise => "-",
        }
    }
}

/// Main-loop side of the encoder: detent index, direction, indicator timer.
#[derive(Debug, Default)]
pub struct DetentTracker {
    detent: i32,
    direction: Direction,
    changed_at_ms: u64,
}

impl DetentTracker {
    pub const fn new() -> Self {
        Self {
            detent: 0,
            direction: Direction::None,
            changed_at_ms: 0,
        }
    }

    /// Adopt the current position so rotation seen so far is discarded.
    pub fn prime(&mut self, position: i32) {
        self.detent = detent_of(position);
    }

    /// Take the whole detents moved since the previous poll.
    ///
    /// Returns the signed step count (zero when the knob is between
    /// detents or idle) and updates direction and its timestamp.
    pub fn poll(&mut self, position: i32, now_ms: u64) -> i32 {
        let detent = detent_of(position);
        let steps = detent - self.detent;
        if steps != 0 {
            self.detent = detent;
            self.direction = if steps > 0 {
                Direction::Clockwise
            } else {
                Direction::CounterClockwise
            };
            self.changed_at_ms = now_ms;
        }
        steps
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Direction to show on screen, `None` once the hold time has passed.
    pub fn indicator(&self, now_ms: u64) -> Direction {
        if now_ms.saturating_sub(self.changed_at_ms) < DIRECTION_HOLD_MS {
            self.direction
        } else {
            Direction::None
        }
    }
}

// Floor division keeps every detent exactly TICKS_PER_DETENT wide across zero.
fn detent_of(position: i32) -> i32 {
    position.div_euclid(TICKS_PER_DETENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CW: [(bool, bool); 4] = [(true, false), (true, true), (false, true), (false, false)];
    const CCW: [(bool, bool); 4] = [(false, true), (true, true), (true, false), (false, false)];

    fn turn(decoder: &QuadratureDecoder, seq: &[(bool, bool)], detents: usize) {
        for _ in 0..detents {
            for &(a, b) in seq {
                decoder.on_edge(a, b);
            }
        }
    }

    #[test]
    fn clockwise_counts_up_four_per_detent() {
        let decoder = QuadratureDecoder::new();
        turn(&decoder, &CW, 3);
        assert_eq!(decoder.position(), 3 * TICKS_PER_DETENT);
    }

    #[test]
    fn counter_clockwise_counts_down_four_per_detent() {
        let decoder = QuadratureDecoder::new();
        turn(&decoder, &CCW, 2);
        assert_eq!(decoder.position(), -2 * TICKS_PER_DETENT);
    }

    #[test]
    fn back_and_forth_cancels() {
        let decoder = QuadratureDecoder::new();
        turn(&decoder, &CW, 5);
        turn(&decoder, &CCW, 5);
        assert_eq!(decoder.position(), 0);
    }

    #[test]
    fn repeated_level_is_a_no_op() {
        let decoder = QuadratureDecoder::new();
        decoder.on_edge(true, false);
        decoder.on_edge(true, false);
        decoder.on_edge(true, false);
        assert_eq!(decoder.position(), 1);
    }

    #[test]
    fn implausible_jump_contributes_zero() {
        let decoder = QuadratureDecoder::new();
        // 00 -> 11 skips a phase; direction is unknowable.
        decoder.on_edge(true, true);
        assert_eq!(decoder.position(), 0);
        // 11 -> 00 likewise.
        decoder.on_edge(false, false);
        assert_eq!(decoder.position(), 0);
    }

    #[test]
    fn cycle_seen_only_at_rest_counts_nothing() {
        let decoder = QuadratureDecoder::new();
        // A whole clockwise detent whose intermediate edges were never
        // handled looks like no motion at all.
        decoder.on_edge(false, false);
        assert_eq!(decoder.position(), 0);
        // Seeing only every other state loses the direction too.
        decoder.on_edge(true, true);
        decoder.on_edge(false, false);
        assert_eq!(decoder.position(), 0);
    }

    #[test]
    fn concurrent_reader_sees_monotonic_whole_detents() {
        const DETENTS: usize = 500;
        let decoder = QuadratureDecoder::new();
        std::thread::scope(|scope| {
            scope.spawn(|| turn(&decoder, &CW, DETENTS));

            let mut tracker = DetentTracker::new();
            let mut seen = 0;
            while seen < DETENTS as i32 {
                let steps = tracker.poll(decoder.position(), 0);
                assert!(steps >= 0, "reader saw the count go backwards");
                seen += steps;
            }
            assert_eq!(seen, DETENTS as i32);
        });
        assert_eq!(decoder.position(), DETENTS as i32 * TICKS_PER_DETENT);
    }

    #[test]
    fn table_is_antisymmetric() {
        for prev in 0..4u8 {
            for cur in 0..4u8 {
                let fwd = TRANSITIONS[((prev << 2) | cur) as usize];
                let back = TRANSITIONS[((cur << 2) | prev) as usize];
                assert_eq!(fwd, -back, "prev={prev} cur={cur}");
            }
        }
    }

    #[test]
    fn reset_phase_avoids_spurious_first_step() {
        let decoder = QuadratureDecoder::new();
        decoder.reset_phase(true, true);
        // 11 -> 01 is one clockwise tick from the seeded phase.
        decoder.on_edge(false, true);
        assert_eq!(decoder.position(), 1);
    }

    #[test]
    fn tracker_reports_whole_detents_only() {
        let mut tracker = DetentTracker::new();
        assert_eq!(tracker.poll(3, 10), 0);
        assert_eq!(tracker.direction(), Direction::None);
        assert_eq!(tracker.poll(4, 20), 1);
        assert_eq!(tracker.direction(), Direction::Clockwise);
        assert_eq!(tracker.poll(13, 30), 2);
        assert_eq!(tracker.poll(13, 40), 0);
    }

    #[test]
    fn tracker_detents_are_uniform_across_zero() {
        let mut tracker = DetentTracker::new();
        // One tick backwards from zero already crosses into detent -1.
        assert_eq!(tracker.poll(-1, 0), -1);
        assert_eq!(tracker.direction(), Direction::CounterClockwise);
        assert_eq!(tracker.poll(-4, 0), 0);
        assert_eq!(tracker.poll(-5, 0), -1);
    }

    #[test]
    fn indicator_expires_after_hold_time() {
        let mut tracker = DetentTracker::new();
        tracker.poll(4, 1_000);
        assert_eq!(tracker.indicator(1_000), Direction::Clockwise);
        assert_eq!(
            tracker.indicator(1_000 + DIRECTION_HOLD_MS - 1),
            Direction::Clockwise
        );
        assert_eq!(tracker.indicator(1_000 + DIRECTION_HOLD_MS), Direction::None);
        // Direction itself is sticky.
        assert_eq!(tracker.direction(), Direction::Clockwise);
    }

    #[test]
    fn prime_discards_pending_rotation() {
        let mut tracker = DetentTracker::new();
        tracker.prime(12);
        assert_eq!(tracker.poll(12, 0), 0);
        assert_eq!(tracker.poll(16, 0), 1);
    }

    #[test]
    fn direction_symbols() {
        assert_eq!(Direction::Clockwise.symbol(), "+");
        assert_eq!(Direction::CounterClockwise.symbol(), "-");
        assert_eq!(Direction::None.symbol(), "");
    }
}
