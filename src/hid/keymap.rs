//! Key mapper - turns key and encoder activity into HID reports.
//!
//! - A key press asserts that key's code alone in slot 0.
//! - Any key release sends an all-zero keyboard report. With two keys held,
//!   releasing one also releases the other on the host; chords are not
//!   supported.
//! - One encoder detent is a volume up/down pulse: assert, short delay,
//!   clear.
//! - The encoder switch holds play/pause for as long as it is pressed.
//!   Volume pulses clear back to play/pause while it is held.
//!
//! Emission can be switched off globally; the rest of the pipeline
//! (trails, rate, indicator) is unaffected.

use embedded_hal_async::delay::DelayNs;

use super::consumer::{ConsumerReport, ConsumerUsage};
use super::keyboard::KeyboardReport;
use super::{HidReport, ReportSink};
use crate::config::{CONSUMER_PULSE_MS, KEYMAP};
use crate::encoder::Direction;
use crate::input::ButtonId;

/// Key code sent for `button`.
pub const fn keycode(button: ButtonId) -> u8 {
    KEYMAP[button.index()]
}

pub struct KeyMapper<S> {
    sink: S,
    enabled: bool,
    play_pause_held: bool,
}

impl<S: ReportSink> KeyMapper<S> {
    pub fn new(sink: S, enabled: bool) -> Self {
        Self {
            sink,
            enabled,
            play_pause_held: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        #[cfg(feature = "defmt")]
        defmt::info!("HID emission {}", if enabled { "enabled" } else { "disabled" });
        self.enabled = enabled;
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn key_down(&mut self, button: ButtonId) {
        self.emit(HidReport::Keyboard(KeyboardReport::single(keycode(button))));
    }

    pub fn key_up(&mut self) {
        self.emit(HidReport::Keyboard(KeyboardReport::empty()));
    }

    /// One detent worth of volume change as an assert/clear pair in the
    /// pulse slot. A held play/pause stays asserted in its own slot.
    ///
    /// `Direction::None` is ignored. Nothing is sent, and no time is spent,
    /// while emission is disabled.
    pub async fn volume_step<D: DelayNs>(&mut self, direction: Direction, delay: &mut D) {
        let usage = match direction {
            Direction::Clockwise => ConsumerUsage::VolumeUp,
            Direction::CounterClockwise => ConsumerUsage::VolumeDown,
            Direction::None => return,
        };
        if !self.enabled {
            return;
        }
        let pulse = self.resting_consumer().with_pulse(usage);
        self.emit(HidReport::Consumer(pulse));
        delay.delay_ms(CONSUMER_PULSE_MS).await;
        self.emit(HidReport::Consumer(self.resting_consumer()));
    }

    /// Encoder switch pressed (`true`) or released (`false`).
    pub fn play_pause(&mut self, pressed: bool) {
        self.play_pause_held = pressed;
        self.emit(HidReport::Consumer(self.resting_consumer()));
    }

    // What the consumer interface reports between pulses.
    fn resting_consumer(&self) -> ConsumerReport {
        if self.play_pause_held {
            ConsumerReport::held(ConsumerUsage::PlayPause)
        } else {
            ConsumerReport::empty()
        }
    }

    fn emit(&mut self, report: HidReport) {
        if self.enabled {
            self.sink.send(report);
        }
    }
}
