//! Application state: the device session and the last-command record.

use blink1_hw::{Blink1Device, Rgb};
use std::sync::{Mutex, RwLock};
use tracing::{info, warn};

/// Last issued command parameters, surfaced by the status endpoint.
#[derive(Debug, Clone)]
pub struct Session {
    /// Canonical hex of the last parsed color.
    pub last_color: String,
    /// Last fade/blink time in seconds.
    pub last_time: f64,
    /// Last target LED channel.
    pub last_ledn: u8,
    /// Last blink repeat count.
    pub last_repeats: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            last_color: "#000000".to_string(),
            last_time: 0.0,
            last_ledn: 0,
            last_repeats: 0,
        }
    }
}

/// Result of one fade command, reported in-band as the response `status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FadeOutcome {
    /// The device accepted the command.
    Success,
    /// No device is attached.
    NoDevice,
    /// The hardware call failed; the connection has been discarded.
    Failed(String),
}

impl std::fmt::Display for FadeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FadeOutcome::Success => write!(f, "success"),
            FadeOutcome::NoDevice => write!(f, "no blink1"),
            FadeOutcome::Failed(err) => write!(f, "{}", err),
        }
    }
}

/// Shared application state.
///
/// At most one live device connection exists process-wide. Absence means
/// "known disconnected"; presence is only disproved by a failing command.
pub struct AppState {
    /// Live device connection (may not be present)
    device: Mutex<Option<Blink1Device>>,

    /// Serial numbers seen by the most recent enumeration
    serials: RwLock<Vec<String>>,

    /// Last command parameters
    session: RwLock<Session>,
}

impl AppState {
    /// Creates a new application state with no device attached yet.
    pub fn new() -> Self {
        Self {
            device: Mutex::new(None),
            serials: RwLock::new(Vec::new()),
            session: RwLock::new(Session::default()),
        }
    }

    /// Attempts to connect if no live handle exists.
    ///
    /// Refreshes the serial roster while disconnected. An empty bus is a
    /// normal state; enumeration or open failures are logged and leave the
    /// handle absent so the next call retries.
    pub fn try_connect(&self) {
        let mut device = self.device.lock().unwrap();
        if device.is_some() {
            return;
        }

        let found = match Blink1Device::enumerate() {
            Ok(serials) => serials,
            Err(e) => {
                warn!("USB enumeration failed: {}", e);
                return;
            }
        };
        *self.serials.write().unwrap() = found.clone();
        if found.is_empty() {
            return;
        }

        match Blink1Device::open() {
            Ok(dev) => {
                info!(
                    "blink(1) connected (serial {})",
                    dev.serial().unwrap_or("unknown")
                );
                *device = Some(dev);
            }
            Err(e) => warn!("blink(1) enumerated but open failed: {}", e),
        }
    }

    /// Returns true if a live device handle exists.
    pub fn is_connected(&self) -> bool {
        self.device.lock().unwrap().is_some()
    }

    /// Returns the serial roster from the most recent enumeration.
    pub fn serials(&self) -> Vec<String> {
        self.serials.read().unwrap().clone()
    }

    /// Fades `ledn` to `color` over `millis`, reconnecting on demand.
    ///
    /// A failed hardware call discards the handle, forcing the next
    /// command to re-attempt connection. Failures never propagate as
    /// errors; they become `FadeOutcome` values.
    pub fn fade(&self, millis: u64, color: Rgb, ledn: u8) -> FadeOutcome {
        self.try_connect();

        let mut device = self.device.lock().unwrap();
        let Some(dev) = device.as_ref() else {
            return FadeOutcome::NoDevice;
        };
        match dev.fade_to_rgb(millis, color.r, color.g, color.b, ledn) {
            Ok(()) => FadeOutcome::Success,
            Err(e) => {
                warn!("fade failed, dropping device handle: {}", e);
                *device = None;
                FadeOutcome::Failed(e.to_string())
            }
        }
    }

    /// Returns a snapshot of the session record.
    pub fn session(&self) -> Session {
        self.session.read().unwrap().clone()
    }

    /// Records a fade request's parameters.
    pub fn record_fade(&self, color: &Rgb, time: f64, ledn: u8) {
        let mut session = self.session.write().unwrap();
        session.last_color = color.to_string();
        session.last_time = time;
        session.last_ledn = ledn;
    }

    /// Records a blink request's parameters.
    pub fn record_blink(&self, color: &Rgb, time: f64, ledn: u8, repeats: u32) {
        let mut session = self.session.write().unwrap();
        session.last_color = color.to_string();
        session.last_time = time;
        session.last_ledn = ledn;
        session.last_repeats = repeats;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
