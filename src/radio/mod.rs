//! Internet radio: station catalog, stream and audio capabilities.
//!
//! The station stream and the audio output are capabilities supplied by
//! the board; [`pipeline`] moves bytes between them. Bytes are forwarded
//! untouched, whatever the station encodes them as.

pub mod http;
#[cfg(feature = "embedded")]
pub mod i2s;
#[cfg(feature = "embedded")]
pub mod net;
pub mod pipeline;

use crate::config::StationEntry;
use crate::error::Error;
use crate::ui::input_logic::{select_next, select_prev};
use crate::ui::Screen;
use http::ResponseStatusCode;

/// An HTTP client that yields one streaming response body at a time.
#[allow(async_fn_in_trait)]
pub trait StationStream {
    /// Issue a `GET` for `url` and return the response status. On success
    /// the body is ready to be read.
    async fn get(&mut self, url: &str) -> Result<ResponseStatusCode, Error>;

    /// True if body bytes can be read without waiting.
    fn available(&mut self) -> bool;

    /// Read up to `buf.len()` body bytes. `Ok(0)` means the server closed
    /// the stream.
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error>;

    /// Close the current response, if any.
    fn end(&mut self);
}

/// Digital audio output.
#[allow(async_fn_in_trait)]
pub trait AudioSink {
    /// Queue bytes for output, returning how many were accepted.
    async fn write(&mut self, bytes: &[u8]) -> Result<usize, Error>;
}

impl<T: StationStream + ?Sized> StationStream for &mut T {
    async fn get(&mut self, url: &str) -> Result<ResponseStatusCode, Error> {
        (**self).get(url).await
    }

    fn available(&mut self) -> bool {
        (**self).available()
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        (**self).read(buf).await
    }

    fn end(&mut self) {
        (**self).end()
    }
}

impl<T: AudioSink + ?Sized> AudioSink for &mut T {
    async fn write(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        (**self).write(bytes).await
    }
}

/// What the radio screen reports under the station.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioStatus {
    #[default]
    Stopped,
    Playing,
    /// The stream could not be opened or returned a non-success status.
    OpenFailed,
    /// The server closed the stream.
    Ended,
    /// Reading the stream or writing the audio output failed mid-play.
    Error,
}

impl RadioStatus {
    pub fn label(self) -> &'static str {
        match self {
            RadioStatus::Stopped => "[] Stopped",
            RadioStatus::Playing => "> Playing",
            RadioStatus::OpenFailed => "Stream failed",
            RadioStatus::Ended => "Stream ended",
            RadioStatus::Error => "Playback error",
        }
    }
}

/// Play/stop flag of the radio menu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub status: RadioStatus,
}

impl PlaybackState {
    /// Stopped, as on every entry into the radio menu.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip play/stop. Returns the new `is_playing`.
    pub fn toggle(&mut self) -> bool {
        self.is_playing = !self.is_playing;
        self.status = if self.is_playing {
            RadioStatus::Playing
        } else {
            RadioStatus::Stopped
        };
        self.is_playing
    }

    /// Stop because of `status` (failure or end of stream).
    pub fn halt(&mut self, status: RadioStatus) {
        self.is_playing = false;
        self.status = status;
    }
}

/// The fixed list of stations and the station cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StationCatalog {
    stations: &'static [StationEntry],
    current: usize,
}

impl StationCatalog {
    pub fn new(stations: &'static [StationEntry]) -> Self {
        Self {
            stations,
            current: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&'static StationEntry> {
        self.stations.get(self.current)
    }

    pub fn select_prev(&mut self) {
        self.current = select_prev(self.current, self.stations.len());
    }

    pub fn select_next(&mut self) {
        self.current = select_next(self.current, self.stations.len());
    }

    /// Radio screen for the current station, `None` for an empty catalog.
    pub fn screen(&self, status: RadioStatus) -> Option<Screen<'static>> {
        self.current()
            .map(|station| Screen::Radio { station, status })
    }
}
