//! blink(1) device communication via USB HID.

use crate::{Error, Result, BLINK1_PID, BLINK1_VID};
use hidapi::{HidApi, HidDevice};
use tracing::{debug, info};

/// HID feature report ID used for all commands.
const REPORT_ID: u8 = 0x01;

/// Command byte for "fade to RGB".
const CMD_FADE: u8 = b'c';

/// Feature report size including the report ID byte.
pub const FADE_REPORT_SIZE: usize = 9;

/// Builds the fade-to-RGB feature report.
///
/// The device encodes the fade duration in 10 ms units, big-endian.
pub fn build_fade_report(millis: u64, r: u8, g: u8, b: u8, ledn: u8) -> [u8; FADE_REPORT_SIZE] {
    let dms = (millis / 10).min(u16::MAX as u64) as u16;
    [
        REPORT_ID,
        CMD_FADE,
        r,
        g,
        b,
        (dms >> 8) as u8,
        (dms & 0xFF) as u8,
        ledn,
        0,
    ]
}

/// A live connection to one blink(1).
pub struct Blink1Device {
    device: HidDevice,
    serial: Option<String>,
}

impl Blink1Device {
    /// Enumerates attached blink(1) devices, returning their serial numbers.
    ///
    /// An empty list is a normal result, not an error.
    pub fn enumerate() -> Result<Vec<String>> {
        let api = HidApi::new()?;
        let serials = api
            .device_list()
            .filter(|d| d.vendor_id() == BLINK1_VID && d.product_id() == BLINK1_PID)
            .map(|d| d.serial_number().unwrap_or_default().to_string())
            .collect();
        Ok(serials)
    }

    /// Opens the first attached blink(1).
    pub fn open() -> Result<Self> {
        let api = HidApi::new()?;

        let device_info = api
            .device_list()
            .find(|d| d.vendor_id() == BLINK1_VID && d.product_id() == BLINK1_PID)
            .ok_or(Error::DeviceNotFound)?;

        let device = device_info.open_device(&api).map_err(|e| {
            debug!("Failed to open device: {}", e);
            Error::DeviceNotFound
        })?;
        let serial = device_info.serial_number().map(str::to_string);

        info!(
            "blink(1) opened (VID:{:04X} PID:{:04X}, serial {})",
            BLINK1_VID,
            BLINK1_PID,
            serial.as_deref().unwrap_or("unknown")
        );

        Ok(Self { device, serial })
    }

    /// Fades the given LED channel to a color over `millis` milliseconds.
    ///
    /// Channel 0 addresses all LEDs; 1 and 2 address the individual LEDs
    /// on mk2 and later hardware.
    pub fn fade_to_rgb(&self, millis: u64, r: u8, g: u8, b: u8, ledn: u8) -> Result<()> {
        let report = build_fade_report(millis, r, g, b, ledn);
        self.device.send_feature_report(&report)?;
        debug!(
            "fade #{:02x}{:02x}{:02x} over {}ms on led {}",
            r, g, b, millis, ledn
        );
        Ok(())
    }

    /// Returns the device serial number, if the descriptor carried one.
    pub fn serial(&self) -> Option<&str> {
        self.serial.as_deref()
    }
}
