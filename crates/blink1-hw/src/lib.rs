//! blink(1) Hardware Library
//!
//! Provides device discovery and color control for the ThingM blink(1)
//! USB RGB LED (mk2 and later).

pub mod color;
pub mod device;
pub mod error;

pub use color::Rgb;
pub use device::Blink1Device;
pub use error::{Error, Result};

/// USB VID:PID for the blink(1).
pub const BLINK1_VID: u16 = 0x27B8;
pub const BLINK1_PID: u16 = 0x01ED;
