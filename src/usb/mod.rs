//! USB Device subsystem - presents a composite device to the host.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`.  We create a **composite device** with three
//! functions:
//!
//! - Interface 0: Keyboard (boot protocol)
//! - Interface 1: Consumer control (media keys)
//! - Interfaces 2-3: CDC-ACM serial port for the host companion link
//!
//! The HID writer task drains the main loop's report queue into the two
//! HID endpoints; the host link task owns the serial port.

pub mod hid_device;
pub mod host_link;
