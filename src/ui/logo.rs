//! Splash logo.
//!
//! The artwork is kept in XBM order (least significant bit is the leftmost
//! pixel) and flipped to the MSB-first packing `embedded-graphics` expects
//! at compile time.

use embedded_graphics::image::{Image, ImageRaw};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use super::Surface;
use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub const LOGO_WIDTH: u32 = 48;
pub const LOGO_HEIGHT: u32 = 24;

const LOGO_BYTES: usize = (LOGO_WIDTH / 8 * LOGO_HEIGHT) as usize;

// Four keycaps, the knob, and a name plate.
const LOGO_XBM: [u8; LOGO_BYTES] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xfc, 0xcf, 0xff, 0x00, 0x3f, 0x00,
    0x04, 0x48, 0x80, 0xc0, 0xc0, 0x00, 0xe4, 0x49, 0x9e, 0x20, 0x00, 0x01,
    0x24, 0x49, 0x92, 0x10, 0x1e, 0x02, 0xe4, 0x49, 0x9e, 0x10, 0x21, 0x02,
    0x04, 0x48, 0x80, 0x88, 0x40, 0x04, 0xfc, 0xcf, 0xff, 0x88, 0x40, 0x04,
    0x00, 0x00, 0x00, 0x88, 0x40, 0x04, 0xfc, 0xcf, 0xff, 0x88, 0x40, 0x04,
    0x04, 0x48, 0x80, 0x10, 0x21, 0x02, 0xe4, 0x49, 0x9e, 0x10, 0x1e, 0x02,
    0x24, 0x49, 0x92, 0x20, 0x00, 0x01, 0xe4, 0x49, 0x9e, 0xc0, 0xc0, 0x00,
    0x04, 0x48, 0x80, 0x00, 0x3f, 0x00, 0xfc, 0xcf, 0xff, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xfe, 0xff, 0xff, 0xff, 0xff, 0x1f,
    0x02, 0x00, 0x00, 0x00, 0x00, 0x10, 0x32, 0x63, 0x38, 0xc7, 0x31, 0x17,
    0xd2, 0x92, 0x04, 0x29, 0x4a, 0x19, 0x12, 0xf2, 0x04, 0x27, 0x7a, 0x19,
    0x12, 0x92, 0x38, 0xc9, 0x49, 0x17, 0xfe, 0xff, 0xff, 0xff, 0xff, 0x1f,
];

/// Logo in MSB-first packing, ready for [`ImageRaw`].
pub const LOGO: [u8; LOGO_BYTES] = lsb_to_msb_first(LOGO_XBM);

/// Reverse the bit order of every byte of a packed bitmap.
pub const fn lsb_to_msb_first<const N: usize>(packed: [u8; N]) -> [u8; N] {
    let mut out = [0u8; N];
    let mut i = 0;
    while i < N {
        out[i] = packed[i].reverse_bits();
        i += 1;
    }
    out
}

/// Top-left corner that centres the logo on the panel.
pub const fn logo_origin() -> Point {
    Point::new(
        ((SCREEN_WIDTH - LOGO_WIDTH) / 2) as i32,
        ((SCREEN_HEIGHT - LOGO_HEIGHT) / 2) as i32,
    )
}

pub fn draw_splash<S: Surface>(surface: &mut S) {
    let _ = surface.clear(BinaryColor::Off);
    let raw = ImageRaw::<BinaryColor>::new(&LOGO, LOGO_WIDTH);
    let _ = Image::new(&raw, logo_origin()).draw(surface);
    surface.present();
}
