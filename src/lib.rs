//! Macropad station core logic.
//!
//! Everything here is hardware-independent and runs on the host:
//! quadrature decoding, key edge detection, HID report generation, the
//! trail animation, the press-rate estimate, the host link parser and the
//! screen layouts (drawn through `embedded-graphics`).
//!
//! Usage: `cargo test`
//!
//! Note: The embedded binary (`src/main.rs`, feature `embedded`) owns the
//! peripherals, Embassy tasks and the USB stack, and drives
//! [`app::Macropad::tick`] once per main-loop period.

#![cfg_attr(not(test), no_std)]

// ═══════════════════════════════════════════════════════════════════════════
// Input
// ═══════════════════════════════════════════════════════════════════════════

pub mod config;
pub mod encoder;
pub mod input;

// ═══════════════════════════════════════════════════════════════════════════
// Output: HID reports, visuals, host link
// ═══════════════════════════════════════════════════════════════════════════

pub mod hid;
pub mod host_link;
pub mod rate;
pub mod trail;
pub mod ui;

// ═══════════════════════════════════════════════════════════════════════════
// Main loop
// ═══════════════════════════════════════════════════════════════════════════

pub mod app;

pub use app::Macropad;
pub use encoder::{Direction, QuadratureDecoder};
pub use hid::{HidReport, ReportSink};
pub use input::{ButtonId, RawLines};
