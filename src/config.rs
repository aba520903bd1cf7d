//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, capacities and the
//! station catalog live here so they can be tuned in one place.

// Timing

/// Settle time after every accepted button event (ms).
///
/// The control loop sleeps for this long before sampling the buttons
/// again, which doubles as the hardware debounce.
pub const BUTTON_SETTLE_MS: u32 = 200;

/// Interval between WiFi association status polls (ms).
pub const WIFI_CONNECT_POLL_MS: u32 = 1000;

/// Number of status polls before a connection attempt is declared failed.
pub const WIFI_CONNECT_MAX_POLLS: u8 = 10;

/// How long the connect outcome stays on screen before returning to the
/// main menu (ms).
pub const WIFI_RESULT_DISPLAY_MS: u32 = 2000;

/// Pause between stream polls when no input is ready (ms).
pub const STREAM_IDLE_POLL_MS: u32 = 100;

// Capacities

/// Maximum number of networks kept from one scan.
pub const MAX_NETWORKS: usize = 10;

/// Maximum SSID length in bytes (IEEE 802.11).
pub const SSID_MAX_LEN: usize = 32;

/// Number of characters entered on-device for a WiFi password.
pub const PASSWORD_LEN: usize = 32;

/// Bytes moved from the stream to the audio output per read.
pub const STREAM_CHUNK_SIZE: usize = 512;

/// Longest station URL accepted by the catalog and the HTTP client.
pub const MAX_URL_LEN: usize = 128;

/// Characters per display line (`SCREEN_WIDTH_PX` / 6 px font columns).
pub const SCREEN_LINE_LEN: usize = 21;

/// Maximum number of text lines on one screen (64 px / 10 px font rows).
pub const SCREEN_MAX_LINES: usize = 6;

// Display (SSD1306 128×64 over I²C)

pub const SCREEN_WIDTH_PX: u32 = 128;

/// 7-bit I²C address of the OLED.
pub const SCREEN_I2C_ADDRESS: u8 = 0x3C;

/// I²C bus frequency (kHz).
pub const I2C_FREQUENCY_KHZ: u32 = 100;

// GPIO pin assignments (ESP32 DevKit)
//
// esp-hal hands out each pin as its own `peripherals::GPIOn` type, so
// the mapping is applied in `main.rs`.  Adjust both for your board.
//
//   I²C SDA        → GPIO15
//   I²C SCL        → GPIO14
//   Button PREV    → GPIO12 (external pull-down, active-high)
//   Button NEXT    → GPIO13 (external pull-down, active-high)
//   Button SELECT  → GPIO2  (external pull-down, active-high)
//   I²S BCLK       → GPIO26
//   I²S WS         → GPIO25
//   I²S DOUT       → GPIO22

// Audio output

/// I²S sample rate (Hz).
pub const I2S_SAMPLE_RATE_HZ: u32 = 44_100;

/// Size of the I²S DMA ring (bytes).
pub const I2S_DMA_BUFFER_SIZE: usize = 4 * 4092;

// Bluetooth

/// Name the Bluetooth audio bridge advertises.
pub const BT_DEVICE_NAME: &str = "ESP32-A2DP";

/// Initial Bluetooth output volume (percent).
pub const BT_INITIAL_VOLUME_PERCENT: u8 = 30;

// Network

/// TCP socket buffer sizes for the station stream.
pub const TCP_RX_BUFFER_SIZE: usize = 6000;
pub const TCP_TX_BUFFER_SIZE: usize = 1024;

/// Space reserved for the HTTP response head.
pub const HTTP_HEADER_BUFFER_SIZE: usize = 2048;

/// User-Agent sent with every stream request.
pub const HTTP_USER_AGENT: &str = "radiobridge/0.1";

// Stations

/// A station entry in the fixed catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StationEntry {
    pub name: &'static str,
    pub url: &'static str,
}

/// Number of stations in the catalog.
pub const STATION_COUNT: usize = 5;

/// Swedish commercial radio streams.
///
/// The same Icecast mounts are served over HTTPS as well; plain HTTP is
/// used because the firmware transport has no TLS.
pub const STATIONS: [StationEntry; STATION_COUNT] = [
    StationEntry {
        name: "RIX FM",
        url: "http://fm01-ice.stream.khz.se/fm01_mp3",
    },
    StationEntry {
        name: "Star FM",
        url: "http://fm05-ice.stream.khz.se/fm05_mp3",
    },
    StationEntry {
        name: "Svenska Favoriter",
        url: "http://wr13-ice.stream.khz.se/wr13_mp3",
    },
    StationEntry {
        name: "Disco 54",
        url: "http://wr15-ice.stream.khz.se/wr15_mp3",
    },
    StationEntry {
        name: "Gamla Favoriter",
        url: "http://wr09-ice.stream.khz.se/wr09_mp3",
    },
];
