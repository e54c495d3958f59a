//! Macropad station firmware for the nRF52840.
//!
//! Four keys, a rotary encoder with push switch and a 128x64 SSD1306
//! OLED, presented to the host as a USB keyboard, a consumer-control
//! device and a serial port for the companion service.
//!
//! Task layout:
//!
//! ```text
//!   usb_task        embassy-usb device runner
//!   hid_task        report queue  → keyboard / consumer endpoints
//!   host_link       CDC-ACM bytes → media / mirror signals
//!   encoder_task    GPIOTE edges on A/B → QuadratureDecoder atomics
//!   main            16 ms ticker → Macropad::tick → OLED
//! ```
//!
//! `encoder_task` runs on an interrupt executor driven by SWI1, above
//! thread mode, so the blocking OLED flush in the main loop cannot hold
//! back edge decoding. Everything else shares the thread-mode executor.

#![no_std]
#![no_main]

mod display;
mod error;
mod usb;

use {defmt_rtt as _, panic_probe as _};

use defmt::{info, unwrap};
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_futures::select::select;
use embassy_nrf::gpio::{Input, Pull};
use embassy_nrf::interrupt;
use embassy_nrf::interrupt::{InterruptExt, Priority};
use embassy_nrf::{bind_interrupts, peripherals, twim};
use embassy_time::{Delay, Duration, Instant, Ticker};

use macropad::config::TICK_MS;
use macropad::ui::logo::draw_splash;
use macropad::{Macropad, QuadratureDecoder, RawLines};

use usb::hid_device::{self, QueueSink, ReportChannel, UsbComposite, UsbDriver};
use usb::host_link;

bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

/// Written only by `encoder_task` in SWI1 interrupt context, read by the
/// thread-mode main loop.
static ENCODER: QuadratureDecoder = QuadratureDecoder::new();

/// Runs `encoder_task`. Must stay below the GPIOTE priority so the edge
/// interrupt that wakes the task is never blocked by the task itself.
static ENCODER_EXECUTOR: InterruptExecutor = InterruptExecutor::new();

const ENCODER_PRIORITY: Priority = Priority::P6;

#[interrupt]
unsafe fn EGU1_SWI1() {
    ENCODER_EXECUTOR.on_interrupt()
}

static REPORTS: ReportChannel = ReportChannel::new();

#[embassy_executor::task]
async fn usb_task(device: embassy_usb::UsbDevice<'static, UsbDriver>) -> ! {
    hid_device::run_usb_device(device).await
}

#[embassy_executor::task]
async fn hid_task(
    keyboard: embassy_usb::class::hid::HidWriter<'static, UsbDriver, 8>,
    consumer: embassy_usb::class::hid::HidWriter<'static, UsbDriver, 8>,
) -> ! {
    hid_device::hid_writer_task(keyboard, consumer, REPORTS.receiver()).await
}

#[embassy_executor::task]
async fn host_link_task(
    serial: embassy_usb::class::cdc_acm::CdcAcmClass<'static, UsbDriver>,
) -> ! {
    host_link::host_link_task(serial).await
}

/// Decode every edge on either phase line.
///
/// The decoder only counts transitions between adjacent states, so this
/// task must see each edge before the next one lands.
#[embassy_executor::task]
async fn encoder_task(mut a: Input<'static>, mut b: Input<'static>) -> ! {
    ENCODER.reset_phase(a.is_high(), b.is_high());
    loop {
        select(a.wait_for_any_edge(), b.wait_for_any_edge()).await;
        ENCODER.on_edge(a.is_high(), b.is_high());
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let mut nrf_config = embassy_nrf::config::Config::default();
    nrf_config.gpiote_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(nrf_config);
    info!("macropad-station starting");

    // Display first so the logo is up while USB enumerates.
    let mut twim_config = twim::Config::default();
    twim_config.frequency = twim::Frequency::K400;
    let i2c = twim::Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim_config);
    let mut oled = unwrap!(display::init(i2c));
    let splash_at = Instant::now().as_millis();
    draw_splash(&mut oled);

    let keys = [
        Input::new(p.P0_11, Pull::Up),
        Input::new(p.P0_12, Pull::Up),
        Input::new(p.P0_24, Pull::Up),
        Input::new(p.P0_25, Pull::Up),
    ];
    let encoder_switch = Input::new(p.P0_28, Pull::Up);
    let enc_a = Input::new(p.P0_03, Pull::Up);
    let enc_b = Input::new(p.P0_04, Pull::Up);

    let UsbComposite {
        device,
        keyboard_writer,
        consumer_writer,
        serial,
    } = hid_device::init(p.USBD);

    unwrap!(spawner.spawn(usb_task(device)));
    unwrap!(spawner.spawn(hid_task(keyboard_writer, consumer_writer)));
    unwrap!(spawner.spawn(host_link_task(serial)));

    interrupt::EGU1_SWI1.set_priority(ENCODER_PRIORITY);
    let encoder_spawner = ENCODER_EXECUTOR.start(interrupt::EGU1_SWI1);
    unwrap!(encoder_spawner.spawn(encoder_task(enc_a, enc_b)));

    // Reports sent before enumeration would only fill the queue.
    while !hid_device::configured_signal().wait().await {}
    info!("USB ready, entering main loop");

    // The splash dwell counts from when the logo went up.
    let mut pad = Macropad::new(QueueSink(REPORTS.sender()), Delay, splash_at);
    let mut ticker = Ticker::every(Duration::from_millis(TICK_MS));

    loop {
        let now = Instant::now().as_millis();

        if let Some(media) = host_link::media_signal().try_take() {
            pad.set_media(media);
        }
        if let Some(frame) = host_link::mirror_signal().try_take() {
            pad.show_mirror_frame(&frame, now);
        }

        let lines = RawLines {
            buttons: [
                keys[0].is_high(),
                keys[1].is_high(),
                keys[2].is_high(),
                keys[3].is_high(),
            ],
            encoder_button: encoder_switch.is_high(),
        };

        pad.tick(now, &lines, &ENCODER, &mut oled).await;
        ticker.next().await;
    }
}
