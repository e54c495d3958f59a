//! User interface - splash logo, then the live home screen.
//!
//! The UI has two states and one transition:
//!
//! ```text
//!   Splash --(SPLASH_DWELL_MS elapsed)--> Home
//! ```
//!
//! Home is terminal until the device is reset. Drawing goes through
//! [`Surface`], an `embedded-graphics` target that can also present a
//! finished frame (flush to the panel).

pub mod frame;
pub mod home;
pub mod logo;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::pixelcolor::BinaryColor;

use crate::config::SPLASH_DWELL_MS;

/// Monochrome drawing surface with an explicit present step.
pub trait Surface: DrawTarget<Color = BinaryColor> {
    /// Push the finished frame to the panel.
    fn present(&mut self);
}

/// Screens the UI can be in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiState {
    /// Boot logo; input is ignored.
    Splash,
    /// Live status screen.
    Home,
}

pub struct Ui {
    state: UiState,
    entered_ms: u64,
}

impl Ui {
    pub const fn new(now_ms: u64) -> Self {
        Self {
            state: UiState::Splash,
            entered_ms: now_ms,
        }
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    /// Advance the state machine. Returns `true` on the tick Home is entered.
    pub fn update(&mut self, now_ms: u64) -> bool {
        if self.state == UiState::Splash
            && now_ms.saturating_sub(self.entered_ms) >= SPLASH_DWELL_MS
        {
            #[cfg(feature = "defmt")]
            defmt::info!("UI: Splash -> Home after {} ms", now_ms - self.entered_ms);
            self.state = UiState::Home;
            self.entered_ms = now_ms;
            return true;
        }
        false
    }
}
