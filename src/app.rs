//! Application core: one `tick` per main-loop period.
//!
//! The firmware samples the hardware into [`RawLines`] plus the shared
//! [`QuadratureDecoder`] and hands them to [`Macropad::tick`]. Everything
//! past that point (edge detection, HID reports, trails, rendering) is
//! plain logic and runs the same on the host under test.

use embedded_hal_async::delay::DelayNs;

use crate::config::{BUTTON_COUNT, HID_ENABLED_AT_BOOT, MIRROR_HOLD_MS};
use crate::encoder::{DetentTracker, Direction, QuadratureDecoder};
use crate::hid::keymap::KeyMapper;
use crate::hid::ReportSink;
use crate::host_link::MediaStatus;
use crate::input::{ButtonId, Edge, EdgeDetector, RawLines};
use crate::rate::{KeyPressLog, PressRate};
use crate::trail::TrailPool;
use crate::ui::frame::Frame;
use crate::ui::home::{draw_home, HomeView};
use crate::ui::logo::draw_splash;
use crate::ui::{Surface, Ui, UiState};

pub struct Macropad<S, D> {
    ui: Ui,
    keys: KeyMapper<S>,
    delay: D,
    edges: EdgeDetector,
    detents: DetentTracker,
    trails: TrailPool,
    presses: KeyPressLog,
    media: Option<MediaStatus>,
    mirror: Frame,
    mirror_at_ms: Option<u64>,
}

impl<S: ReportSink, D: DelayNs> Macropad<S, D> {
    pub fn new(sink: S, delay: D, now_ms: u64) -> Self {
        Self {
            ui: Ui::new(now_ms),
            keys: KeyMapper::new(sink, HID_ENABLED_AT_BOOT),
            delay,
            edges: EdgeDetector::new(),
            detents: DetentTracker::new(),
            trails: TrailPool::new(),
            presses: KeyPressLog::new(),
            media: None,
            mirror: Frame::new(),
            mirror_at_ms: None,
        }
    }

    pub fn ui_state(&self) -> UiState {
        self.ui.state()
    }

    pub fn hid_enabled(&self) -> bool {
        self.keys.is_enabled()
    }

    pub fn set_hid_enabled(&mut self, enabled: bool) {
        self.keys.set_enabled(enabled);
    }

    pub fn sink(&self) -> &S {
        self.keys.sink()
    }

    pub fn sink_mut(&mut self) -> &mut S {
        self.keys.sink_mut()
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    pub fn trails(&self) -> &TrailPool {
        &self.trails
    }

    pub fn press_rate(&self, now_ms: u64) -> PressRate {
        self.presses.estimate(now_ms)
    }

    pub fn direction_indicator(&self, now_ms: u64) -> Direction {
        self.detents.indicator(now_ms)
    }

    pub fn media(&self) -> Option<&MediaStatus> {
        self.media.as_ref()
    }

    pub fn set_media(&mut self, media: MediaStatus) {
        self.media = Some(media);
    }

    /// Show `frame` instead of the dashboard for the next `MIRROR_HOLD_MS`.
    pub fn show_mirror_frame(&mut self, frame: &Frame, now_ms: u64) {
        self.mirror.clone_from(frame);
        self.mirror_at_ms = Some(now_ms);
    }

    fn mirror_active(&self, now_ms: u64) -> bool {
        self.mirror_at_ms
            .is_some_and(|at| now_ms.saturating_sub(at) < MIRROR_HOLD_MS)
    }

    /// Run one main-loop period and render the resulting frame.
    pub async fn tick<G: Surface>(
        &mut self,
        now_ms: u64,
        lines: &RawLines,
        encoder: &QuadratureDecoder,
        surface: &mut G,
    ) {
        if self.ui.state() == UiState::Splash {
            if !self.ui.update(now_ms) {
                draw_splash(surface);
                return;
            }
            // Whatever happened during the splash is not an event.
            self.edges.prime(lines);
            self.detents.prime(encoder.position());
        }

        let steps = self.detents.poll(encoder.position(), now_ms);
        let direction = self.detents.direction();
        for _ in 0..steps.unsigned_abs() {
            self.keys.volume_step(direction, &mut self.delay).await;
        }

        let edges = self.edges.scan(lines);
        if let Some(edge) = edges.encoder_button {
            self.keys.play_pause(edge == Edge::Pressed);
        }

        for (button, edge) in edges.button_edges() {
            match edge {
                Edge::Pressed => {
                    self.presses.record(now_ms);
                    self.trails.spawn(button);
                    self.keys.key_down(button);
                }
                Edge::Released => {
                    self.keys.key_up();
                    self.trails.release(button);
                }
            }
        }

        self.trails.advance();

        let mut keys_held = [false; BUTTON_COUNT];
        for button in ButtonId::ALL {
            keys_held[button.index()] = self.edges.is_pressed(button);
        }
        let view = HomeView {
            rate: self.presses.estimate(now_ms),
            indicator: self.detents.indicator(now_ms),
            hid_enabled: self.keys.is_enabled(),
            keys_held,
            trails: &self.trails,
            media: self.media.as_ref(),
            mirror: self.mirror_active(now_ms).then_some(&self.mirror),
        };
        draw_home(surface, &view);
    }
}
