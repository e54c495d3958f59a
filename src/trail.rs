//! Key-press trails - the bars that grow out of a held key and float away.
//!
//! A fixed pool of [`TRAIL_CAPACITY`] slots; a full pool silently drops new
//! spawns. Each trail is anchored at its key's column:
//!
//! ```text
//!   held:      bottom pinned at TRAIL_ANCHOR_Y, height grows to the ceiling
//!   released:  whole bar moves up TRAIL_DRIFT_STEP per tick
//!   retired:   once y + height <= 0 (fully above the top edge)
//! ```

use crate::config::{
    KEY_SLOT_WIDTH, KEY_SLOT_X, TRAIL_ANCHOR_Y, TRAIL_CAPACITY, TRAIL_DRIFT_STEP, TRAIL_GROW_STEP,
    TRAIL_MAX_HEIGHT, TRAIL_START_HEIGHT, TRAIL_WIDTH,
};
use crate::input::ButtonId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Trail {
    pub active: bool,
    pub button: ButtonId,
    pub x: i16,
    /// Top edge; negative once the bar starts leaving the screen.
    pub y: i16,
    pub height: i16,
    pub held: bool,
    seq: u32,
}

impl Trail {
    const IDLE: Trail = Trail {
        active: false,
        button: ButtonId::ALL[0],
        x: 0,
        y: 0,
        height: 0,
        held: false,
        seq: 0,
    };
}

/// Column of the trail bar for `button`, centred over its key slot.
pub fn trail_x(button: ButtonId) -> i16 {
    KEY_SLOT_X[button.index()] + (KEY_SLOT_WIDTH as i16 - TRAIL_WIDTH) / 2
}

pub struct TrailPool {
    slots: [Trail; TRAIL_CAPACITY],
    next_seq: u32,
}

impl TrailPool {
    pub const fn new() -> Self {
        Self {
            slots: [Trail::IDLE; TRAIL_CAPACITY],
            next_seq: 0,
        }
    }

    /// Start a trail for a fresh press. Returns `false` when the pool is full.
    pub fn spawn(&mut self, button: ButtonId) -> bool {
        let Some(slot) = self.slots.iter_mut().find(|t| !t.active) else {
            #[cfg(feature = "defmt")]
            defmt::trace!("trail pool full, dropping trail for {}", button);
            return false;
        };
        *slot = Trail {
            active: true,
            button,
            x: trail_x(button),
            y: TRAIL_ANCHOR_Y - TRAIL_START_HEIGHT,
            height: TRAIL_START_HEIGHT,
            held: true,
            seq: self.next_seq,
        };
        self.next_seq = self.next_seq.wrapping_add(1);
        true
    }

    /// Detach the newest held trail of `button`. Returns `false` if none.
    pub fn release(&mut self, button: ButtonId) -> bool {
        let newest = self
            .slots
            .iter_mut()
            .filter(|t| t.active && t.held && t.button == button)
            .max_by_key(|t| t.seq);
        match newest {
            Some(trail) => {
                trail.held = false;
                true
            }
            None => false,
        }
    }

    /// One animation step for every active trail.
    pub fn advance(&mut self) {
        for trail in self.slots.iter_mut().filter(|t| t.active) {
            if trail.held {
                let bottom = trail.y + trail.height;
                trail.height = (trail.height + TRAIL_GROW_STEP).min(TRAIL_MAX_HEIGHT);
                trail.y = bottom - trail.height;
            } else {
                trail.y -= TRAIL_DRIFT_STEP;
                if trail.y + trail.height <= 0 {
                    trail.active = false;
                }
            }
        }
    }

    pub fn active(&self) -> impl Iterator<Item = &Trail> {
        self.slots.iter().filter(|t| t.active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }
}

impl Default for TrailPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(i: u8) -> ButtonId {
        ButtonId::new(i).unwrap()
    }

    fn only(pool: &TrailPool) -> Trail {
        let mut iter = pool.active();
        let trail = *iter.next().expect("one active trail");
        assert!(iter.next().is_none());
        trail
    }

    #[test]
    fn spawn_anchors_at_key_column() {
        let mut pool = TrailPool::new();
        assert!(pool.spawn(key(2)));
        let t = only(&pool);
        assert_eq!(t.x, trail_x(key(2)));
        assert_eq!(t.y + t.height, TRAIL_ANCHOR_Y);
        assert!(t.held);
    }

    #[test]
    fn held_trail_grows_to_ceiling_with_bottom_pinned() {
        let mut pool = TrailPool::new();
        pool.spawn(key(0));
        let mut last = only(&pool).height;
        loop {
            pool.advance();
            let t = only(&pool);
            assert_eq!(t.y + t.height, TRAIL_ANCHOR_Y);
            if t.height == last {
                assert_eq!(t.height, TRAIL_MAX_HEIGHT);
                break;
            }
            assert!(t.height > last);
            last = t.height;
        }
    }

    #[test]
    fn released_trail_drifts_up_and_retires_off_screen() {
        let mut pool = TrailPool::new();
        pool.spawn(key(1));
        pool.advance();
        let before = only(&pool);
        assert!(pool.release(key(1)));

        let mut y = before.y;
        let mut ticks = 0;
        while pool.active_count() > 0 {
            pool.advance();
            ticks += 1;
            if let Some(t) = pool.active().next() {
                assert!(t.y < y);
                assert_eq!(t.height, before.height);
                assert!(t.y + t.height > 0);
                y = t.y;
            }
            assert!(ticks < 100, "trail never retired");
        }
        // Retired on exactly the step that put it fully past the top.
        assert!(y - TRAIL_DRIFT_STEP + before.height <= 0);
    }

    #[test]
    fn pool_never_exceeds_capacity() {
        let mut pool = TrailPool::new();
        for i in 0..TRAIL_CAPACITY {
            assert!(pool.spawn(key((i % 4) as u8)));
        }
        let snapshot = pool.slots;
        assert!(!pool.spawn(key(0)));
        assert!(!pool.spawn(key(3)));
        assert_eq!(pool.active_count(), TRAIL_CAPACITY);
        assert_eq!(pool.slots, snapshot);
    }

    #[test]
    fn release_hits_newest_held_trail_of_that_key() {
        let mut pool = TrailPool::new();
        pool.spawn(key(0)); // seq 0
        pool.spawn(key(1)); // seq 1
        pool.spawn(key(0)); // seq 2
        assert!(pool.release(key(0)));
        let held: [bool; 3] = [pool.slots[0].held, pool.slots[1].held, pool.slots[2].held];
        assert_eq!(held, [true, true, false]);

        assert!(pool.release(key(0)));
        assert!(!pool.slots[0].held);
        assert!(!pool.release(key(0)));
    }

    #[test]
    fn newest_wins_even_in_a_lower_slot() {
        let mut pool = TrailPool::new();
        pool.spawn(key(3)); // slot 0
        pool.spawn(key(3)); // slot 1
        pool.release(key(3)); // detaches slot 1
        pool.release(key(3)); // detaches slot 0
        for _ in 0..40 {
            pool.advance();
        }
        assert_eq!(pool.active_count(), 0);

        pool.spawn(key(3)); // reuses slot 0, seq 2
        pool.spawn(key(3)); // slot 1, seq 3
        pool.slots.swap(0, 1);
        pool.release(key(3));
        assert!(!pool.slots[0].held);
        assert!(pool.slots[1].held);
    }

    #[test]
    fn release_without_trail_is_a_no_op() {
        let mut pool = TrailPool::new();
        assert!(!pool.release(key(2)));
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut pool = TrailPool::new();
        for _ in 0..TRAIL_CAPACITY {
            pool.spawn(key(0));
        }
        for _ in 0..TRAIL_CAPACITY {
            pool.release(key(0));
        }
        for _ in 0..40 {
            pool.advance();
        }
        assert_eq!(pool.active_count(), 0);
        assert!(pool.spawn(key(1)));
    }
}
