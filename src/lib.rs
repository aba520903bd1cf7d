//! radiobridge: three-button ESP32 firmware for WiFi setup, a Bluetooth
//! speaker bridge and internet radio to I2S.
//!
//! Everything above the board drivers lives here and builds on the host:
//! the menu state machine, the password entry, the WiFi connect policy and
//! the stream pump all run against capability traits, so the tests drive
//! them with mocks.
//!
//! Usage: `cargo test --lib --tests`
//!
//! Note: The embedded binary (`src/main.rs`, feature `embedded`) wires the
//! esp-hal drivers into these traits.
//!
//! Note: The stream transport is plain TCP without TLS, so the built-in
//! station catalog ([`config::STATIONS`]) points at the `http://` mounts of
//! its Icecast servers and `https://` URLs are refused with
//! [`StreamError::UnsupportedScheme`].

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every module.
#[macro_use]
mod fmt;

// ═══════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════

pub mod bluetooth;
pub mod config;
pub mod control;
pub mod error;
pub mod menu;
pub mod radio;
pub mod ui;
pub mod wifi;

pub use control::{Board, ControlState, Controller};
pub use error::{Error, StreamError, WifiError};
pub use menu::{MainMenuOption, MenuState};
pub use ui::ButtonEvent;
