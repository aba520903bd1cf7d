//! Unified error type for radiobridge.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for on-target
//! logging.

/// Top-level error type used across the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // WiFi
    /// The WiFi driver rejected a request.
    Wifi(WifiError),

    // Radio stream
    /// Opening or reading the station stream failed.
    Stream(StreamError),

    // Audio
    /// The audio output refused the data.
    AudioOutput,

    // Bluetooth
    /// The radio driver offers no Bluetooth audio profile.
    BluetoothUnavailable,

    // UI / Display
    /// I²C transaction to the display failed.
    Display,
}

/// Subset of WiFi driver errors we propagate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WifiError {
    /// The radio could not be started.
    NotStarted,
    /// Scanning for access points failed.
    ScanFailed,
    /// SSID or password was rejected by the driver configuration.
    InvalidCredentials,
    /// The association request could not be issued.
    ConnectFailed,
    /// The connection status could not be read.
    StatusUnavailable,
}

/// Errors from the HTTP station stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StreamError {
    /// The station URL could not be parsed.
    InvalidUrl,
    /// Only `http://` URLs can be opened.
    UnsupportedScheme,
    /// Host name lookup failed.
    Dns,
    /// TCP connect failed.
    Connect,
    /// The request could not be written.
    Request,
    /// The response head was malformed or did not fit in the buffer.
    BadResponse,
    /// Reading from an open stream failed.
    Read,
    /// No stream is open.
    NotOpen,
}

// Convenience conversions

impl From<WifiError> for Error {
    fn from(e: WifiError) -> Self {
        Error::Wifi(e)
    }
}

impl From<StreamError> for Error {
    fn from(e: StreamError) -> Self {
        Error::Stream(e)
    }
}

impl From<httparse::Error> for StreamError {
    fn from(_e: httparse::Error) -> Self {
        StreamError::BadResponse
    }
}

impl From<nourl::Error> for StreamError {
    fn from(_e: nourl::Error) -> Self {
        StreamError::InvalidUrl
    }
}
