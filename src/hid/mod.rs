//! HID report types and the report sink seam.

pub mod consumer;
pub mod keyboard;
pub mod keymap;


use consumer::ConsumerReport;
use keyboard::KeyboardReport;

/// A report bound for one of the two HID interfaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidReport {
    Keyboard(KeyboardReport),
    Consumer(ConsumerReport),
}

impl HidReport {
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        match self {
            HidReport::Keyboard(k) => k.serialize(buf),
            HidReport::Consumer(c) => c.serialize(buf),
        }
    }
}

/// Destination for outgoing HID reports.
///
/// Fire-and-forget: the sink never reports transmission failure back to
/// the input pipeline.
pub trait ReportSink {
    fn send(&mut self, report: HidReport);
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn send(&mut self, report: HidReport) {
        (**self).send(report)
    }
}
