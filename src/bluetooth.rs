//! Bluetooth audio bridge bring-up.
//!
//! The bridge itself (A2DP sink/source and its PCM path) runs on its own
//! once started; the firmware only names it and sets the volume.

use crate::config::{BT_DEVICE_NAME, BT_INITIAL_VOLUME_PERCENT};
use crate::error::Error;

/// A Bluetooth audio stack that is configured once at power-up.
pub trait BluetoothAudio {
    /// Make the bridge discoverable as `name` at `volume_percent`.
    fn start(&mut self, name: &str, volume_percent: u8) -> Result<(), Error>;
}

/// Stand-in for targets whose radio driver has no A2DP profile.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unavailable;

impl BluetoothAudio for Unavailable {
    fn start(&mut self, _name: &str, _volume_percent: u8) -> Result<(), Error> {
        Err(Error::BluetoothUnavailable)
    }
}

/// Start the bridge with the configured name and volume.
///
/// Failure is not fatal: the radio and WiFi menus work without it.
pub fn start_bridge<B: BluetoothAudio>(bt: &mut B) -> bool {
    match bt.start(BT_DEVICE_NAME, BT_INITIAL_VOLUME_PERCENT) {
        Ok(()) => {
            info!("Bluetooth bridge discoverable as {}", BT_DEVICE_NAME);
            true
        }
        Err(e) => {
            warn!("Bluetooth bridge not started: {}", e);
            false
        }
    }
}
