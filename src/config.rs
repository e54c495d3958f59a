//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and protocol
//! constants live here so they can be tuned in one place.

// Input hardware

/// Number of key buttons on the pad.
pub const BUTTON_COUNT: usize = 4;

/// Raw quadrature ticks per mechanical detent of the encoder.
pub const TICKS_PER_DETENT: i32 = 4;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; the concrete `embassy_nrf::peripherals::*` pins
// are picked in `main.rs`.  Adjust for your custom PCB.
//
//   Key 0          → P0.11
//   Key 1          → P0.12
//   Key 2          → P0.24
//   Key 3          → P0.25
//   Encoder A      → P0.03
//   Encoder B      → P0.04
//   Encoder switch → P0.28
//   I²C SDA        → P0.26
//   I²C SCL        → P0.27
//
// Every input is active-low with the internal pull-up enabled.

// Key mapping

/// USB HID usage codes sent by each key (F13..F16 by default).
pub const KEYMAP: [u8; BUTTON_COUNT] = [0x68, 0x69, 0x6A, 0x6B];

/// HID report emission state at boot. Visual feedback runs either way.
pub const HID_ENABLED_AT_BOOT: bool = true;

// Timing

/// Main loop period (ms).
pub const TICK_MS: u64 = 16;

/// How long the splash logo stays up before the home screen (ms).
pub const SPLASH_DWELL_MS: u64 = 1200;

/// Gap between asserting and clearing a volume usage (ms).
pub const CONSUMER_PULSE_MS: u32 = 10;

/// How long the rotation direction indicator stays visible (ms).
pub const DIRECTION_HOLD_MS: u64 = 2000;

/// Sliding window of the press-rate estimate (ms).
pub const RATE_WINDOW_MS: u64 = 1000;

/// Number of press timestamps kept for the rate estimate.
pub const KEY_LOG_CAPACITY: usize = 32;

// Trails

/// Maximum number of simultaneously active trails.
pub const TRAIL_CAPACITY: usize = 24;

/// Width of a trail bar (px).
pub const TRAIL_WIDTH: i16 = 16;

/// Bottom edge that held trails are anchored to (px).
pub const TRAIL_ANCHOR_Y: i16 = 48;

/// Height of a freshly spawned trail (px).
pub const TRAIL_START_HEIGHT: i16 = 2;

/// Growth per tick while the key is held (px).
pub const TRAIL_GROW_STEP: i16 = 2;

/// Height ceiling of a held trail (px).
pub const TRAIL_MAX_HEIGHT: i16 = 24;

/// Upward drift per tick once released (px).
pub const TRAIL_DRIFT_STEP: i16 = 3;

// Display

/// Panel size in pixels.
pub const SCREEN_WIDTH: u32 = 128;
pub const SCREEN_HEIGHT: u32 = 64;

/// Left edge of each key slot along the bottom of the home screen (px).
pub const KEY_SLOT_X: [i16; BUTTON_COUNT] = [10, 38, 66, 94];

/// Size of a key slot outline (px).
pub const KEY_SLOT_WIDTH: u32 = 24;
pub const KEY_SLOT_HEIGHT: u32 = 13;

/// Top of the key slot row (px).
pub const KEY_SLOT_Y: i32 = 50;

// Host link

/// Answer to the host's `IDENTIFY` probe.
pub const HOST_IDENTITY: &str = "MACROPAD_STATION";

/// Host link line rate. Nominal only over CDC-ACM.
pub const HOST_BAUD_RATE: u32 = 115_200;

/// A mirror frame keeps replacing the home screen for this long (ms).
pub const MIRROR_HOLD_MS: u64 = 1000;

/// Longest accepted host text line (bytes, excluding the newline).
pub const HOST_LINE_CAPACITY: usize = 256;

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0001;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "macropad-station";
pub const USB_PRODUCT: &str = "Macropad Station";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// USB HID polling interval (ms). 1 ms = 1000 Hz for lowest latency.
pub const USB_HID_POLL_MS: u8 = 1;
