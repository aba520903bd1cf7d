//! [`AudioSink`] over the ESP32 I2S transmitter.
//!
//! Bytes are copied into a DMA-capable staging buffer and pushed out one
//! transfer at a time.

use esp_hal::i2s::master::I2sTx;
use esp_hal::Async;

use crate::error::Error;
use crate::radio::AudioSink;

pub struct I2sSink<'d> {
    tx: I2sTx<'d, Async>,
    staging: &'d mut [u8],
}

impl<'d> I2sSink<'d> {
    /// `staging` must live in DMA-capable RAM.
    pub fn new(tx: I2sTx<'d, Async>, staging: &'d mut [u8]) -> Self {
        Self { tx, staging }
    }
}

impl AudioSink for I2sSink<'_> {
    async fn write(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        let n = bytes.len().min(self.staging.len());
        if n == 0 {
            return Ok(0);
        }

        self.staging[..n].copy_from_slice(&bytes[..n]);
        self.tx
            .write_dma_async(&mut self.staging[..n])
            .await
            .map_err(|_| Error::AudioOutput)?;
        Ok(n)
    }
}
