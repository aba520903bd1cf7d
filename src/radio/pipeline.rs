//! Station stream → audio output copy loop.
//!
//! The loop runs inside the control loop and does not return until
//! something stops it, so it samples the buttons itself once per pass:
//! any press ends the copy and is handed back to the menu, which decides
//! what it means (SELECT stops, PREV/NEXT retune).

use embedded_hal_async::delay::DelayNs;

use crate::config::{STREAM_CHUNK_SIZE, STREAM_IDLE_POLL_MS};
use crate::error::Error;
use crate::radio::{AudioSink, StationStream};
use crate::ui::buttons::{ButtonLines, Debouncer};
use crate::ui::ButtonEvent;

/// Why the copy loop returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackOutcome {
    /// The GET failed or did not return a success status. Nothing was
    /// copied.
    OpenFailed,
    /// A button was pressed while streaming.
    Interrupted(ButtonEvent),
    /// The server closed the stream.
    Ended,
    /// Reading the stream failed.
    ReadFailed,
    /// The audio output rejected data.
    OutputFailed,
}

/// Reusable copy buffer for the stream pump.
pub struct Pipeline {
    chunk: [u8; STREAM_CHUNK_SIZE],
    idle_poll_ms: u32,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub const fn new() -> Self {
        Self {
            chunk: [0; STREAM_CHUNK_SIZE],
            idle_poll_ms: STREAM_IDLE_POLL_MS,
        }
    }

    /// Open `url` and copy its body into `sink` until a button is pressed
    /// or the stream stops.
    ///
    /// Each pass samples the buttons, then either moves one chunk (up to
    /// `STREAM_CHUNK_SIZE` bytes) or, when nothing is buffered, waits
    /// `STREAM_IDLE_POLL_MS`. The stream is always closed before
    /// returning.
    pub async fn play<S, A, L, D>(
        &mut self,
        url: &str,
        stream: &mut S,
        sink: &mut A,
        buttons: &mut Debouncer<L>,
        delay: &mut D,
    ) -> PlaybackOutcome
    where
        S: StationStream,
        A: AudioSink,
        L: ButtonLines,
        D: DelayNs,
    {
        info!("Opening stream {}", url);

        match stream.get(url).await {
            Ok(status) if status.is_success() => {
                info!("Streaming audio from {} ({})", url, status);
            }
            Ok(status) => {
                warn!("Stream refused: {}", status);
                stream.end();
                return PlaybackOutcome::OpenFailed;
            }
            Err(e) => {
                warn!("Failed to connect to the audio stream: {}", e);
                stream.end();
                return PlaybackOutcome::OpenFailed;
            }
        }

        let mut copied: u32 = 0;
        let outcome = loop {
            if let Some(event) = buttons.poll(delay).await {
                break PlaybackOutcome::Interrupted(event);
            }

            if !stream.available() {
                delay.delay_ms(self.idle_poll_ms).await;
                continue;
            }

            let n = match stream.read(&mut self.chunk).await {
                Ok(0) => break PlaybackOutcome::Ended,
                Ok(n) => n,
                Err(e) => {
                    warn!("Stream read failed: {}", e);
                    break PlaybackOutcome::ReadFailed;
                }
            };

            if let Err(e) = write_all(sink, &self.chunk[..n]).await {
                warn!("Audio output failed: {}", e);
                break PlaybackOutcome::OutputFailed;
            }
            copied = copied.wrapping_add(n as u32);
        };

        stream.end();
        info!("Stream closed after {} bytes: {}", copied, outcome);
        outcome
    }
}

/// Push every byte of `bytes` into `sink`.
async fn write_all<A: AudioSink>(sink: &mut A, mut bytes: &[u8]) -> Result<(), Error> {
    while !bytes.is_empty() {
        match sink.write(bytes).await? {
            0 => return Err(Error::AudioOutput),
            n => bytes = &bytes[n.min(bytes.len())..],
        }
    }
    Ok(())
}
