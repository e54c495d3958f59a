//! Host companion link over the USB serial port.
//!
//! The desktop service talks a tiny byte protocol:
//!
//! ```text
//! host → pad   IDENTIFY\n
//! pad  → host  MACROPAD_STATION\n
//!
//! host → pad   MET:<title>|<artist>|<L>|<R>|<vol>|<elapsed>|<total>\n
//!
//! host → pad   0x02 <1024 bytes: 128x64 1bpp frame, row-major, MSB first>
//! pad  → host  0x06
//! ```
//!
//! `L`/`R` are VU levels 0..=8, `vol` is the system volume in percent,
//! `elapsed`/`total` are preformatted `m:ss` strings. `\r` is ignored.
//! Lines that do not parse are dropped; so are lines longer than
//! [`HOST_LINE_CAPACITY`], up to their newline.

use heapless::{String, Vec};

use crate::config::{HOST_IDENTITY, HOST_LINE_CAPACITY};
use crate::ui::frame::{Frame, FRAME_BYTES};

/// Marks the start of a mirror frame.
pub const START_OF_FRAME: u8 = 0x02;

/// Sent back once a mirror frame has been taken.
pub const ACK: u8 = 0x06;

pub const MAX_LEVEL: u8 = 8;

/// Now-playing information pushed by the host.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MediaStatus {
    pub title: String<32>,
    pub artist: String<32>,
    pub level_left: u8,
    pub level_right: u8,
    pub volume: u8,
    pub elapsed: String<8>,
    pub total: String<8>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum HostMessage<'a> {
    Identify,
    Media(MediaStatus),
    Frame(&'a Frame),
}

impl HostMessage<'_> {
    /// Bytes the host waits for after this message, if any.
    pub fn reply(&self) -> Option<Vec<u8, 24>> {
        let mut out = Vec::new();
        match self {
            HostMessage::Identify => {
                out.extend_from_slice(HOST_IDENTITY.as_bytes()).ok()?;
                out.push(b'\n').ok()?;
            }
            HostMessage::Frame(_) => out.push(ACK).ok()?,
            HostMessage::Media(_) => return None,
        }
        Some(out)
    }
}

enum State {
    Line,
    Frame { filled: usize },
}

/// Incremental parser; feed it bytes as they arrive.
pub struct HostLinkParser {
    state: State,
    line: Vec<u8, HOST_LINE_CAPACITY>,
    overflowed: bool,
    frame: Frame,
}

impl HostLinkParser {
    pub const fn new() -> Self {
        Self {
            state: State::Line,
            line: Vec::new(),
            overflowed: false,
            frame: Frame::new(),
        }
    }

    /// Drop any half-received line or frame and go back to line mode.
    pub fn reset(&mut self) {
        self.state = State::Line;
        self.line.clear();
        self.overflowed = false;
    }

    pub fn push(&mut self, byte: u8) -> Option<HostMessage<'_>> {
        match self.state {
            State::Frame { filled } => {
                self.frame.as_mut_bytes()[filled] = byte;
                if filled + 1 == FRAME_BYTES {
                    self.state = State::Line;
                    return Some(HostMessage::Frame(&self.frame));
                }
                self.state = State::Frame { filled: filled + 1 };
                None
            }
            State::Line => match byte {
                START_OF_FRAME if self.line.is_empty() && !self.overflowed => {
                    self.state = State::Frame { filled: 0 };
                    None
                }
                b'\n' => {
                    let message = if self.overflowed {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("host line too long, dropped");
                        None
                    } else {
                        parse_line(&self.line)
                    };
                    self.line.clear();
                    self.overflowed = false;
                    message
                }
                b'\r' => None,
                _ => {
                    if self.line.push(byte).is_err() {
                        self.overflowed = true;
                    }
                    None
                }
            },
        }
    }
}

impl Default for HostLinkParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_line(raw: &[u8]) -> Option<HostMessage<'static>> {
    // Spaces are field content; `\r` never reaches the line buffer.
    let line = core::str::from_utf8(raw).ok()?;
    if line == "IDENTIFY" {
        return Some(HostMessage::Identify);
    }
    let payload = line.strip_prefix("MET:")?;
    let Some(media) = parse_media(payload) else {
        #[cfg(feature = "defmt")]
        defmt::debug!("malformed MET line dropped");
        return None;
    };
    Some(HostMessage::Media(media))
}

/// Parse the body of a `MET:` line.
///
/// The five trailing fields are split off from the right so a `|` inside
/// the artist survives.
pub fn parse_media(payload: &str) -> Option<MediaStatus> {
    let mut fields = payload.rsplitn(6, '|');
    let total = fields.next()?;
    let elapsed = fields.next()?;
    let volume = fields.next()?;
    let right = fields.next()?;
    let left = fields.next()?;
    let (title, artist) = fields.next()?.split_once('|')?;

    Some(MediaStatus {
        title: truncated(title),
        artist: truncated(artist),
        level_left: clamped(left, MAX_LEVEL)?,
        level_right: clamped(right, MAX_LEVEL)?,
        volume: clamped(volume, 100)?,
        elapsed: truncated(elapsed),
        total: truncated(total),
    })
}

fn clamped(field: &str, max: u8) -> Option<u8> {
    let value: i32 = field.trim().parse().ok()?;
    Some(value.clamp(0, max as i32) as u8)
}

// Keeps whole characters only.
fn truncated<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
