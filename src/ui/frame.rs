//! In-memory 128x64 monochrome frame.
//!
//! Same byte layout as the host's mirror frames: row-major, 16 bytes per
//! row, most significant bit is the leftmost pixel. Doubles as an
//! off-screen [`Surface`](super::Surface).

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use super::Surface;
use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};

const ROW_BYTES: usize = SCREEN_WIDTH as usize / 8;

/// Size of one packed frame in bytes.
pub const FRAME_BYTES: usize = ROW_BYTES * SCREEN_HEIGHT as usize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    bytes: [u8; FRAME_BYTES],
}

impl Frame {
    pub const fn new() -> Self {
        Self {
            bytes: [0; FRAME_BYTES],
        }
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_BYTES] {
        &self.bytes
    }

    pub fn as_mut_bytes(&mut self) -> &mut [u8; FRAME_BYTES] {
        &mut self.bytes
    }

    /// Pixel state; anything off-frame reads as dark.
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        match index(x as i32, y as i32) {
            Some((byte, mask)) => self.bytes[byte] & mask != 0,
            None => false,
        }
    }

    /// Number of lit pixels.
    pub fn lit(&self) -> u32 {
        self.bytes.iter().map(|b| b.count_ones()).sum()
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

fn index(x: i32, y: i32) -> Option<(usize, u8)> {
    if x < 0 || y < 0 || x >= SCREEN_WIDTH as i32 || y >= SCREEN_HEIGHT as i32 {
        return None;
    }
    let (x, y) = (x as usize, y as usize);
    Some((y * ROW_BYTES + x / 8, 0x80 >> (x % 8)))
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some((byte, mask)) = index(point.x, point.y) {
                match color {
                    BinaryColor::On => self.bytes[byte] |= mask,
                    BinaryColor::Off => self.bytes[byte] &= !mask,
                }
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = if color.is_on() { 0xFF } else { 0x00 };
        self.bytes.fill(fill);
        Ok(())
    }
}

impl Surface for Frame {
    fn present(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn pixels_pack_msb_first() {
        let mut frame = Frame::new();
        frame
            .draw_iter([Pixel(Point::new(0, 0), BinaryColor::On), Pixel(Point::new(9, 1), BinaryColor::On)])
            .unwrap();
        assert_eq!(frame.as_bytes()[0], 0x80);
        assert_eq!(frame.as_bytes()[ROW_BYTES + 1], 0x40);
        assert!(frame.pixel(9, 1));
        assert_eq!(frame.lit(), 2);
    }

    #[test]
    fn off_frame_pixels_are_clipped() {
        let mut frame = Frame::new();
        Rectangle::new(Point::new(-4, -4), Size::new(8, 8))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut frame)
            .unwrap();
        assert_eq!(frame.lit(), 16);
        assert!(!frame.pixel(200, 3));
    }

    #[test]
    fn clear_fills_everything() {
        let mut frame = Frame::new();
        frame.clear(BinaryColor::On).unwrap();
        assert_eq!(frame.lit(), SCREEN_WIDTH * SCREEN_HEIGHT);
        frame.clear(BinaryColor::Off).unwrap();
        assert_eq!(frame.lit(), 0);
    }
}
