//! USB composite device - keyboard + consumer control + CDC-ACM serial.
//!
//! Initialises the Embassy USB stack on the nRF52840 hardware USB
//! peripheral and exposes two HID endpoints and one serial port.

use defmt::{info, warn};
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_sync::signal::Signal;
use embassy_usb::class::cdc_acm::{self, CdcAcmClass};
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, State};
use embassy_usb::{Builder, Config, UsbDevice};
use static_cell::StaticCell;

use macropad::config;
use macropad::hid::consumer::CONSUMER_REPORT_DESCRIPTOR;
use macropad::hid::keyboard::{KEYBOARD_REPORT_DESCRIPTOR, KEYBOARD_REPORT_SIZE};
use macropad::{HidReport, ReportSink};

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;

/// Depth of the main loop → HID writer queue.
pub const REPORT_QUEUE_DEPTH: usize = 16;

/// Max packet size of the CDC-ACM bulk endpoints.
pub const SERIAL_PACKET_SIZE: u16 = 64;

pub type ReportChannel = Channel<CriticalSectionRawMutex, HidReport, REPORT_QUEUE_DEPTH>;

static KB_STATE: StaticCell<State> = StaticCell::new();
static CONSUMER_STATE: StaticCell<State> = StaticCell::new();
static SERIAL_STATE: StaticCell<cdc_acm::State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static USB_STATE_HANDLER: StaticCell<UsbStateHandler> = StaticCell::new();
static USB_CONFIGURED_SIGNAL: Signal<CriticalSectionRawMutex, bool> = Signal::new();

struct UsbStateHandler;

impl embassy_usb::Handler for UsbStateHandler {
    fn configured(&mut self, configured: bool) {
        info!("USB configured: {}", configured);
        USB_CONFIGURED_SIGNAL.signal(configured);
    }

    fn suspended(&mut self, suspended: bool) {
        info!("USB suspended: {}", suspended);
    }
}

/// USB configuration signal.
///
/// Emits `true` once the host has selected a configuration and `false`
/// when it is dropped again (reset, unplug).
pub fn configured_signal() -> &'static Signal<CriticalSectionRawMutex, bool> {
    &USB_CONFIGURED_SIGNAL
}

/// Build result containing the USB device runner, the two HID writers and
/// the serial class for the host link.
pub struct UsbComposite {
    pub device: UsbDevice<'static, UsbDriver>,
    pub keyboard_writer: HidWriter<'static, UsbDriver, 8>,
    pub consumer_writer: HidWriter<'static, UsbDriver, 8>,
    pub serial: CdcAcmClass<'static, UsbDriver>,
}

/// Initialise the USB stack and create the composite device.
///
/// Must be called exactly once.  All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD) -> UsbComposite {
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;

    // CDC-ACM needs an interface association next to the HID interfaces.
    usb_config.device_class = 0xEF;
    usb_config.device_sub_class = 0x02;
    usb_config.device_protocol = 0x01;
    usb_config.composite_with_iads = true;

    let config_desc = USB_CONFIG_DESC.init([0u8; 256]);
    let bos_desc = USB_BOS_DESC.init([0u8; 256]);
    let msos_desc = USB_MSOS_DESC.init([0u8; 256]);
    let ctrl_buf = USB_CTRL_BUF.init([0u8; 128]);

    let mut builder = Builder::new(
        driver,
        usb_config,
        config_desc,
        bos_desc,
        msos_desc,
        ctrl_buf,
    );

    builder.handler(USB_STATE_HANDLER.init(UsbStateHandler));

    let kb_state = KB_STATE.init(State::new());
    let kb_config = HidConfig {
        report_descriptor: KEYBOARD_REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: 8,
    };
    let keyboard_writer = HidWriter::new(&mut builder, kb_state, kb_config);

    let consumer_state = CONSUMER_STATE.init(State::new());
    let consumer_config = HidConfig {
        report_descriptor: CONSUMER_REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: 8,
    };
    let consumer_writer = HidWriter::new(&mut builder, consumer_state, consumer_config);

    let serial_state = SERIAL_STATE.init(cdc_acm::State::new());
    let serial = CdcAcmClass::new(&mut builder, serial_state, SERIAL_PACKET_SIZE);

    let device = builder.build();

    info!("USB composite device initialised (keyboard + consumer + serial)");

    UsbComposite {
        device,
        keyboard_writer,
        consumer_writer,
        serial,
    }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
///
/// This handles USB enumeration, suspend/resume, and endpoint servicing.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}

/// HID report forwarding task - reads from the report queue and writes
/// to the matching USB HID endpoint.
pub async fn hid_writer_task(
    mut keyboard: HidWriter<'static, UsbDriver, 8>,
    mut consumer: HidWriter<'static, UsbDriver, 8>,
    report_rx: Receiver<'static, CriticalSectionRawMutex, HidReport, REPORT_QUEUE_DEPTH>,
) -> ! {
    info!("HID writer task started - waiting for reports");

    let mut buf = [0u8; KEYBOARD_REPORT_SIZE];

    loop {
        let report = report_rx.receive().await;
        let n = report.serialize(&mut buf);

        let written = match report {
            HidReport::Keyboard(_) => keyboard.write(&buf[..n]).await,
            HidReport::Consumer(_) => consumer.write(&buf[..n]).await,
        };
        if let Err(e) = written {
            warn!("USB HID write failed: {}", crate::error::Error::from(e));
        }
    }
}

/// Main-loop side of the report queue.
///
/// Never blocks: a full queue drops the report.
pub struct QueueSink(pub Sender<'static, CriticalSectionRawMutex, HidReport, REPORT_QUEUE_DEPTH>);

impl ReportSink for QueueSink {
    fn send(&mut self, report: HidReport) {
        if self.0.try_send(report).is_err() {
            warn!("HID report queue full, dropped {}", report);
        }
    }
}
