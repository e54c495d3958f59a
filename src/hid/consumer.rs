//! Consumer Control HID support - media keys and volume.
//!
//! Consumer Control is a separate HID usage page (0x0C). The pad uses it
//! for volume up/down on the encoder and play/pause on the encoder switch.
//! It is transmitted as its own USB HID interface next to the keyboard.
//!
//! The report is a two-entry usage array. Slot 0 holds the play/pause
//! usage for as long as the switch is down and slot 1 carries the short
//! volume pulses, so a detent turned while play/pause is held never makes
//! the host see play/pause released and pressed again.

/// Number of usages carried in one report.
pub const CONSUMER_SLOTS: usize = 2;

/// Consumer control report size (one little-endian u16 per slot).
pub const CONSUMER_REPORT_SIZE: usize = 2 * CONSUMER_SLOTS;

/// Consumer control usage codes used by the pad (Usage Page 0x0C).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum ConsumerUsage {
    /// Play/Pause toggle.
    PlayPause = 0x00CD,
    /// Volume up.
    VolumeUp = 0x00E9,
    /// Volume down.
    VolumeDown = 0x00EA,
}

/// Consumer Control HID report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsumerReport {
    /// `[held, pulse]` usage codes, 0 for an unused slot.
    pub usages: [u16; CONSUMER_SLOTS],
}

impl ConsumerReport {
    /// Create an empty (no keys pressed) report.
    pub const fn empty() -> Self {
        Self {
            usages: [0; CONSUMER_SLOTS],
        }
    }

    /// Report with `usage` held in slot 0.
    pub const fn held(usage: ConsumerUsage) -> Self {
        Self {
            usages: [usage as u16, 0],
        }
    }

    /// Same report with `usage` pulsed in slot 1.
    pub const fn with_pulse(self, usage: ConsumerUsage) -> Self {
        Self {
            usages: [self.usages[0], usage as u16],
        }
    }

    /// Serialize to USB HID report bytes.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < CONSUMER_REPORT_SIZE {
            return 0;
        }
        for (chunk, usage) in buf.chunks_exact_mut(2).zip(self.usages) {
            chunk.copy_from_slice(&usage.to_le_bytes());
        }
        CONSUMER_REPORT_SIZE
    }
}

/// USB HID Report Descriptor for Consumer Control.
///
/// Two 16-bit usage slots in one array input.
pub const CONSUMER_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x0C, // Usage Page (Consumer)
    0x09, 0x01, // Usage (Consumer Control)
    0xA1, 0x01, // Collection (Application)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x03, //   Logical Maximum (1023)
    0x19, 0x00, //   Usage Minimum (0)
    0x2A, 0xFF, 0x03, //   Usage Maximum (1023)
    0x75, 0x10, //   Report Size (16)
    0x95, 0x02, //   Report Count (2)
    0x81, 0x00, //   Input (Data, Array, Absolute)
    0xC0, // End Collection
];
