//! Error types for the blink(1) hardware library.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when interacting with the hardware.
#[derive(Error, Debug)]
pub enum Error {
    /// blink(1) device not found or could not be opened.
    #[error("blink(1) device not found (VID:PID 27B8:01ED)")]
    DeviceNotFound,

    /// USB HID communication error.
    #[error("USB HID error: {0}")]
    Hid(#[from] hidapi::HidError),

    /// Color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),
}
