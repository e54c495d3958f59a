//! Host companion link over CDC-ACM.
//!
//! Bytes from the host go through [`HostLinkParser`]; media status and
//! mirror frames are handed to the main loop through signals, which keep
//! only the newest value.

use defmt::{debug, info, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{with_timeout, Duration};
use embassy_usb::class::cdc_acm::CdcAcmClass;

use macropad::config::HOST_BAUD_RATE;
use macropad::host_link::{HostLinkParser, HostMessage, MediaStatus};
use macropad::ui::frame::Frame;

use super::hid_device::{UsbDriver, SERIAL_PACKET_SIZE};
use crate::error::Error;

/// How often an idle session checks whether the host dropped DTR.
const DTR_POLL: Duration = Duration::from_millis(100);

static MEDIA_SIGNAL: Signal<CriticalSectionRawMutex, MediaStatus> = Signal::new();
static MIRROR_SIGNAL: Signal<CriticalSectionRawMutex, Frame> = Signal::new();

/// Latest media status from the host.
pub fn media_signal() -> &'static Signal<CriticalSectionRawMutex, MediaStatus> {
    &MEDIA_SIGNAL
}

/// Latest mirror frame from the host.
pub fn mirror_signal() -> &'static Signal<CriticalSectionRawMutex, Frame> {
    &MIRROR_SIGNAL
}

/// Serve the host link forever, one session per DTR connection.
pub async fn host_link_task(mut serial: CdcAcmClass<'static, UsbDriver>) -> ! {
    let mut parser = HostLinkParser::new();

    loop {
        serial.wait_connection().await;
        let baud = serial.line_coding().data_rate();
        if baud == HOST_BAUD_RATE {
            info!("Host link connected");
        } else {
            debug!("Host link connected at {} baud (expected {})", baud, HOST_BAUD_RATE);
        }

        match serve(&mut serial, &mut parser).await {
            Ok(()) => info!("Host link closed"),
            Err(e) => info!("Host link closed: {}", e),
        }
        // Nothing half-received survives into the next session.
        parser.reset();
    }
}

/// Returns `Ok` once the host drops DTR, `Err` when the endpoint goes away.
async fn serve(
    serial: &mut CdcAcmClass<'static, UsbDriver>,
    parser: &mut HostLinkParser,
) -> Result<(), Error> {
    let mut buf = [0u8; SERIAL_PACKET_SIZE as usize];

    loop {
        let n = match with_timeout(DTR_POLL, serial.read_packet(&mut buf)).await {
            Ok(read) => read?,
            Err(_) if serial.dtr() => continue,
            Err(_) => return Ok(()),
        };
        if !serial.dtr() {
            return Ok(());
        }
        for &byte in &buf[..n] {
            let Some(message) = parser.push(byte) else {
                continue;
            };
            let reply = message.reply();
            match message {
                HostMessage::Identify => info!("Host identified"),
                HostMessage::Media(media) => MEDIA_SIGNAL.signal(media),
                HostMessage::Frame(frame) => MIRROR_SIGNAL.signal(frame.clone()),
            }
            if let Some(reply) = reply {
                if serial.write_packet(&reply).await.is_err() {
                    warn!("Host link reply dropped");
                }
            }
        }
    }
}
