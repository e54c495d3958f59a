//! Home screen.
//!
//! ```text
//!  +----------------------------------------------+
//!  |3.0/s           HID OFF                      +|  header
//!  || Title                                      ||  media block + VU bars
//!  || Artist                                     ||
//!  || 1:05/3:30 42%      |||                     ||  trails float up
//!  |  [    ]   [####]   [    ]   [    ]          |  key slots
//!  +----------------------------------------------+
//! ```
//!
//! A recent host mirror frame replaces the whole layout.

use core::fmt::Write;

use embedded_graphics::image::{Image, ImageRaw};
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use heapless::String;

use super::frame::Frame;
use super::Surface;
use crate::config::{
    BUTTON_COUNT, KEY_SLOT_HEIGHT, KEY_SLOT_WIDTH, KEY_SLOT_X, KEY_SLOT_Y, SCREEN_WIDTH,
    TRAIL_WIDTH,
};
use crate::encoder::Direction;
use crate::host_link::MediaStatus;
use crate::rate::PressRate;
use crate::trail::TrailPool;

/// Pixels per VU level step.
const VU_STEP: u32 = 5;
const VU_WIDTH: u32 = 3;
/// Bottom edge of the VU bars.
const VU_BASE_Y: i32 = 48;

const MEDIA_X: i32 = 6;
const HOFF_X: i32 = 43;
const INDICATOR_X: i32 = SCREEN_WIDTH as i32 - 6;

/// Everything the home screen shows, borrowed from the app for one frame.
pub struct HomeView<'a> {
    pub rate: PressRate,
    pub indicator: Direction,
    pub hid_enabled: bool,
    pub keys_held: [bool; BUTTON_COUNT],
    pub trails: &'a TrailPool,
    pub media: Option<&'a MediaStatus>,
    pub mirror: Option<&'a Frame>,
}

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

fn text<S: Surface>(surface: &mut S, s: &str, x: i32, y: i32) {
    let _ = Text::with_baseline(s, Point::new(x, y), text_style(), Baseline::Top).draw(surface);
}

pub fn draw_home<S: Surface>(surface: &mut S, view: &HomeView<'_>) {
    let _ = surface.clear(BinaryColor::Off);

    if let Some(frame) = view.mirror {
        let raw = ImageRaw::<BinaryColor>::new(frame.as_bytes(), SCREEN_WIDTH);
        let _ = Image::new(&raw, Point::zero()).draw(surface);
        surface.present();
        return;
    }

    draw_header(surface, view);
    if let Some(media) = view.media {
        draw_media(surface, media);
    }
    draw_key_slots(surface, &view.keys_held);
    draw_trails(surface, view.trails);

    surface.present();
}

fn draw_header<S: Surface>(surface: &mut S, view: &HomeView<'_>) {
    let mut rate: String<12> = String::new();
    let _ = write!(rate, "{}", view.rate);
    text(surface, &rate, 0, 0);

    if !view.hid_enabled {
        text(surface, "HID OFF", HOFF_X, 0);
    }

    text(surface, view.indicator.symbol(), INDICATOR_X, 0);
}

fn draw_media<S: Surface>(surface: &mut S, media: &MediaStatus) {
    text(surface, &media.title, MEDIA_X, 12);
    text(surface, &media.artist, MEDIA_X, 22);

    let mut progress: String<24> = String::new();
    let _ = write!(progress, "{}/{} {}%", media.elapsed, media.total, media.volume);
    text(surface, &progress, MEDIA_X, 32);

    let bar = PrimitiveStyle::with_fill(BinaryColor::On);
    for (x, level) in [
        (0, media.level_left),
        (SCREEN_WIDTH - VU_WIDTH, media.level_right),
    ] {
        let h = level as u32 * VU_STEP;
        if h > 0 {
            let _ = Rectangle::new(
                Point::new(x as i32, VU_BASE_Y - h as i32),
                Size::new(VU_WIDTH, h),
            )
            .into_styled(bar)
            .draw(surface);
        }
    }
}

fn draw_key_slots<S: Surface>(surface: &mut S, held: &[bool; BUTTON_COUNT]) {
    for (&x, &down) in KEY_SLOT_X.iter().zip(held.iter()) {
        let style = if down {
            PrimitiveStyle::with_fill(BinaryColor::On)
        } else {
            PrimitiveStyle::with_stroke(BinaryColor::On, 1)
        };
        let _ = Rectangle::new(
            Point::new(x as i32, KEY_SLOT_Y),
            Size::new(KEY_SLOT_WIDTH, KEY_SLOT_HEIGHT),
        )
        .into_styled(style)
        .draw(surface);
    }
}

fn draw_trails<S: Surface>(surface: &mut S, trails: &TrailPool) {
    let fill = PrimitiveStyle::with_fill(BinaryColor::On);
    for trail in trails.active() {
        if trail.height <= 0 {
            continue;
        }
        let _ = Rectangle::new(
            Point::new(trail.x as i32, trail.y as i32),
            Size::new(TRAIL_WIDTH as u32, trail.height as u32),
        )
        .into_styled(fill)
        .draw(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host_link::parse_media;
    use crate::input::ButtonId;
    use crate::trail::trail_x;

    fn view(trails: &TrailPool) -> HomeView<'_> {
        HomeView {
            rate: PressRate(0),
            indicator: Direction::None,
            hid_enabled: true,
            keys_held: [false; BUTTON_COUNT],
            trails,
            media: None,
            mirror: None,
        }
    }

    fn lit_in(frame: &Frame, x0: u32, y0: u32, x1: u32, y1: u32) -> u32 {
        let mut n = 0;
        for y in y0..y1 {
            for x in x0..x1 {
                n += frame.pixel(x, y) as u32;
            }
        }
        n
    }

    #[test]
    fn key_slots_are_outlined_until_held() {
        let trails = TrailPool::new();
        let mut frame = Frame::new();
        let mut v = view(&trails);
        draw_home(&mut frame, &v);

        let x = KEY_SLOT_X[1] as u32;
        let y = KEY_SLOT_Y as u32;
        assert!(frame.pixel(x, y));
        assert!(!frame.pixel(x + 5, y + 5));

        v.keys_held[1] = true;
        draw_home(&mut frame, &v);
        assert!(frame.pixel(x + 5, y + 5));
    }

    #[test]
    fn trails_are_drawn_as_bars() {
        let mut trails = TrailPool::new();
        let key = ButtonId::new(0).unwrap();
        trails.spawn(key);
        trails.advance();
        let t = *trails.active().next().unwrap();

        let mut frame = Frame::new();
        draw_home(&mut frame, &view(&trails));
        let x = trail_x(key) as u32;
        assert!(frame.pixel(x, t.y as u32));
        assert!(frame.pixel(x + TRAIL_WIDTH as u32 - 1, (t.y + t.height - 1) as u32));
        assert!(!frame.pixel(x, (t.y - 1) as u32));
    }

    #[test]
    fn indicator_and_hid_flag_render_in_header() {
        let trails = TrailPool::new();
        let mut frame = Frame::new();
        let mut v = view(&trails);
        draw_home(&mut frame, &v);
        assert_eq!(lit_in(&frame, INDICATOR_X as u32, 0, SCREEN_WIDTH, 10), 0);
        assert_eq!(lit_in(&frame, HOFF_X as u32, 0, HOFF_X as u32 + 42, 10), 0);

        v.indicator = Direction::Clockwise;
        v.hid_enabled = false;
        draw_home(&mut frame, &v);
        assert!(lit_in(&frame, INDICATOR_X as u32, 0, SCREEN_WIDTH, 10) > 0);
        assert!(lit_in(&frame, HOFF_X as u32, 0, HOFF_X as u32 + 42, 10) > 0);
    }

    #[test]
    fn vu_bars_follow_levels() {
        let trails = TrailPool::new();
        let media = parse_media("t|a|2|8|50|0:01|0:02").unwrap();
        let mut frame = Frame::new();
        let mut v = view(&trails);
        v.media = Some(&media);
        draw_home(&mut frame, &v);

        // Left column shares rows 0..10 with the rate text.
        let left = lit_in(&frame, 0, 10, VU_WIDTH, VU_BASE_Y as u32);
        let right = lit_in(&frame, SCREEN_WIDTH - VU_WIDTH, 0, SCREEN_WIDTH, VU_BASE_Y as u32);
        assert_eq!(left, 2 * VU_STEP * VU_WIDTH);
        assert_eq!(right, 8 * VU_STEP * VU_WIDTH);
    }

    #[test]
    fn mirror_frame_replaces_dashboard() {
        let trails = TrailPool::new();
        let mut mirror = Frame::new();
        mirror.as_mut_bytes()[0] = 0xC0;
        let mut v = view(&trails);
        v.keys_held = [true; BUTTON_COUNT];
        v.mirror = Some(&mirror);

        let mut frame = Frame::new();
        draw_home(&mut frame, &v);
        assert_eq!(frame, mirror);
    }
}
