//! Per-tick edge detection for the key and encoder-switch lines.
//!
//! All five lines are active-low with pull-ups: a line reading low is a
//! pressed switch. There is no debounce filter; a bouncing contact shows
//! up as extra edges.

use crate::config::BUTTON_COUNT;

/// One of the four key buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonId(u8);

impl ButtonId {
    pub const ALL: [ButtonId; BUTTON_COUNT] = [ButtonId(0), ButtonId(1), ButtonId(2), ButtonId(3)];

    /// `None` for indices outside `0..BUTTON_COUNT`.
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < BUTTON_COUNT {
            Some(ButtonId(index))
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Raw line levels sampled once per tick (`true` = electrically high).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawLines {
    pub buttons: [bool; BUTTON_COUNT],
    pub encoder_button: bool,
}

impl RawLines {
    /// Every switch open (all lines pulled high).
    pub const IDLE: RawLines = RawLines {
        buttons: [true; BUTTON_COUNT],
        encoder_button: true,
    };

    /// Same lines with one key held down.
    pub fn with_button_pressed(mut self, button: ButtonId) -> Self {
        self.buttons[button.index()] = false;
        self
    }

    /// Same lines with the encoder switch held down.
    pub fn with_encoder_button_pressed(mut self) -> Self {
        self.encoder_button = false;
        self
    }
}

impl Default for RawLines {
    fn default() -> Self {
        Self::IDLE
    }
}

/// A logical level change on one line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Pressed,
    Released,
}

/// Edges found by one [`EdgeDetector::scan`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Edges {
    pub buttons: [Option<Edge>; BUTTON_COUNT],
    pub encoder_button: Option<Edge>,
}

impl Edges {
    /// Key edges in button order.
    pub fn button_edges(&self) -> impl Iterator<Item = (ButtonId, Edge)> + '_ {
        ButtonId::ALL
            .into_iter()
            .filter_map(|id| self.buttons[id.index()].map(|edge| (id, edge)))
    }
}

/// Remembers the previous logical level of every line.
#[derive(Clone, Debug, Default)]
pub struct EdgeDetector {
    buttons: [bool; BUTTON_COUNT],
    encoder_button: bool,
}

impl EdgeDetector {
    pub const fn new() -> Self {
        Self {
            buttons: [false; BUTTON_COUNT],
            encoder_button: false,
        }
    }

    /// Adopt the current levels without reporting edges.
    pub fn prime(&mut self, lines: &RawLines) {
        for (held, &high) in self.buttons.iter_mut().zip(lines.buttons.iter()) {
            *held = !high;
        }
        self.encoder_button = !lines.encoder_button;
    }

    pub fn scan(&mut self, lines: &RawLines) -> Edges {
        let mut edges = Edges::default();
        for (i, &high) in lines.buttons.iter().enumerate() {
            edges.buttons[i] = transition(&mut self.buttons[i], !high);
        }
        edges.encoder_button = transition(&mut self.encoder_button, !lines.encoder_button);
        edges
    }

    pub fn is_pressed(&self, button: ButtonId) -> bool {
        self.buttons[button.index()]
    }

    pub fn encoder_button_pressed(&self) -> bool {
        self.encoder_button
    }
}

fn transition(previous: &mut bool, pressed: bool) -> Option<Edge> {
    let edge = match (*previous, pressed) {
        (false, true) => Some(Edge::Pressed),
        (true, false) => Some(Edge::Released),
        _ => None,
    };
    *previous = pressed;
    edge
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(i: u8) -> ButtonId {
        ButtonId::new(i).unwrap()
    }

    #[test]
    fn button_id_bounds() {
        assert!(ButtonId::new(3).is_some());
        assert!(ButtonId::new(4).is_none());
        assert_eq!(key(2).index(), 2);
    }

    #[test]
    fn low_line_is_a_press_edge() {
        let mut det = EdgeDetector::new();
        let edges = det.scan(&RawLines::IDLE.with_button_pressed(key(1)));
        assert_eq!(edges.buttons, [None, Some(Edge::Pressed), None, None]);
        assert!(det.is_pressed(key(1)));
    }

    #[test]
    fn held_steady_produces_nothing() {
        let mut det = EdgeDetector::new();
        let held = RawLines::IDLE.with_button_pressed(key(0));
        det.scan(&held);
        for _ in 0..10 {
            assert_eq!(det.scan(&held), Edges::default());
        }
    }

    #[test]
    fn release_edge_follows_press() {
        let mut det = EdgeDetector::new();
        det.scan(&RawLines::IDLE.with_button_pressed(key(3)));
        let edges = det.scan(&RawLines::IDLE);
        assert_eq!(edges.buttons[3], Some(Edge::Released));
        assert!(!det.is_pressed(key(3)));
    }

    #[test]
    fn encoder_switch_is_independent_of_keys() {
        let mut det = EdgeDetector::new();
        let edges = det.scan(&RawLines::IDLE.with_encoder_button_pressed());
        assert_eq!(edges.encoder_button, Some(Edge::Pressed));
        assert_eq!(edges.buttons, [None; BUTTON_COUNT]);
        assert!(det.encoder_button_pressed());

        let edges = det.scan(&RawLines::IDLE.with_button_pressed(key(0)));
        assert_eq!(edges.encoder_button, Some(Edge::Released));
        assert_eq!(edges.buttons[0], Some(Edge::Pressed));
    }

    #[test]
    fn prime_swallows_levels_already_held() {
        let mut det = EdgeDetector::new();
        let held = RawLines::IDLE
            .with_button_pressed(key(2))
            .with_encoder_button_pressed();
        det.prime(&held);
        assert_eq!(det.scan(&held), Edges::default());
        let edges = det.scan(&RawLines::IDLE);
        assert_eq!(edges.buttons[2], Some(Edge::Released));
        assert_eq!(edges.encoder_button, Some(Edge::Released));
    }

    #[test]
    fn button_edges_iterates_in_order() {
        let mut det = EdgeDetector::new();
        let lines = RawLines::IDLE
            .with_button_pressed(key(3))
            .with_button_pressed(key(1));
        let edges = det.scan(&lines);
        let mut iter = edges.button_edges();
        assert_eq!(iter.next(), Some((key(1), Edge::Pressed)));
        assert_eq!(iter.next(), Some((key(3), Edge::Pressed)));
        assert_eq!(iter.next(), None);
    }
}
