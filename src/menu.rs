//! Menu states.
//!
//! Each variant owns only the state that lives as long as the menu is on
//! screen. Cursors that must survive leaving and re-entering a menu (the
//! main menu highlight, the selected station) live in
//! [`ControlState`](crate::control::ControlState) instead.

use crate::radio::PlaybackState;
use crate::wifi::credentials::CredentialEntry;
use crate::wifi::NetworkList;

/// Entries of the main menu, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MainMenuOption {
    Wifi,
    Bluetooth,
    PlayRadio,
}

impl MainMenuOption {
    pub const ALL: [MainMenuOption; 3] = [
        MainMenuOption::Wifi,
        MainMenuOption::Bluetooth,
        MainMenuOption::PlayRadio,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Option under the cursor. Out-of-range indices fold back into range.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::COUNT]
    }

    pub fn label(self) -> &'static str {
        match self {
            MainMenuOption::Wifi => "WiFi",
            MainMenuOption::Bluetooth => "Bluetooth",
            MainMenuOption::PlayRadio => "Play Radio",
        }
    }
}

/// The active menu. Exactly one is active at any time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuState {
    MainMenu,
    /// Network picker over the latest scan.
    WifiMenu(NetworkList),
    BluetoothMenu,
    /// Station picker; playback state is reset on every entry.
    RadioMenu(PlaybackState),
    /// On-device password entry for the network picked in `WifiMenu`.
    PasswordEntry(CredentialEntry),
}

impl MenuState {
    pub fn name(&self) -> &'static str {
        match self {
            MenuState::MainMenu => "MainMenu",
            MenuState::WifiMenu(_) => "WifiMenu",
            MenuState::BluetoothMenu => "BluetoothMenu",
            MenuState::RadioMenu(_) => "RadioMenu",
            MenuState::PasswordEntry(_) => "PasswordEntry",
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, MenuState::RadioMenu(playback) if playback.is_playing)
    }
}
