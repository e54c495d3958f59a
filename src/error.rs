//! Unified error type for the board layer.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.
//! Nothing here is fatal to the main loop; callers log and carry on.

use defmt::Format;
use embassy_usb::driver::EndpointError;

/// Top-level error type used across the firmware.
#[derive(Debug, Clone, Copy, Format)]
pub enum Error {
    // USB
    /// Endpoint not usable: the host deconfigured the device or closed
    /// the port.
    Disconnected,

    /// Packet did not fit the receive buffer.
    BufferOverflow,

    // Display
    /// I²C transaction to the display failed.
    Display,
}

// Convenience conversions

impl From<EndpointError> for Error {
    fn from(e: EndpointError) -> Self {
        match e {
            EndpointError::Disabled => Error::Disconnected,
            EndpointError::BufferOverflow => Error::BufferOverflow,
        }
    }
}
