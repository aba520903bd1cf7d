//! [`WifiLink`] over the esp-wifi station-mode controller.

use esp_wifi::wifi::{AuthMethod, ClientConfiguration, Configuration, WifiController};

use crate::config::MAX_NETWORKS;
use crate::error::{Error, WifiError};
use crate::wifi::WifiLink;

pub struct EspWifi<'d> {
    controller: WifiController<'d>,
}

impl<'d> EspWifi<'d> {
    pub fn new(controller: WifiController<'d>) -> Self {
        Self { controller }
    }

    /// Bring the radio up in station mode if it is not running yet.
    async fn ensure_started(&mut self) -> Result<(), Error> {
        if matches!(self.controller.is_started(), Ok(true)) {
            return Ok(());
        }

        self.controller
            .set_configuration(&Configuration::Client(ClientConfiguration::default()))
            .map_err(|_| WifiError::NotStarted)?;
        self.controller
            .start_async()
            .await
            .map_err(|_| WifiError::NotStarted)?;
        info!("WiFi started");
        Ok(())
    }
}

impl WifiLink for EspWifi<'_> {
    async fn scan(&mut self, found: &mut dyn FnMut(&str)) -> Result<(), Error> {
        self.ensure_started().await?;

        let access_points = self
            .controller
            .scan_n_async(MAX_NETWORKS)
            .await
            .map_err(|_| WifiError::ScanFailed)?;

        for ap in access_points.iter() {
            found(ap.ssid.as_str());
        }
        Ok(())
    }

    async fn begin(&mut self, ssid: &str, password: &str) -> Result<(), Error> {
        self.ensure_started().await?;

        if matches!(self.controller.is_connected(), Ok(true)) {
            if self.controller.disconnect_async().await.is_err() {
                warn!("WiFi disconnect before reconnect failed");
            }
        }

        let auth_method = if password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let config = Configuration::Client(ClientConfiguration {
            ssid: ssid.try_into().map_err(|_| WifiError::InvalidCredentials)?,
            password: password
                .try_into()
                .map_err(|_| WifiError::InvalidCredentials)?,
            auth_method,
            ..Default::default()
        });

        self.controller
            .set_configuration(&config)
            .map_err(|_| WifiError::InvalidCredentials)?;
        self.controller
            .connect()
            .map_err(|_| WifiError::ConnectFailed)?;
        Ok(())
    }

    async fn is_connected(&mut self) -> Result<bool, Error> {
        self.controller
            .is_connected()
            .map_err(|_| WifiError::StatusUnavailable.into())
    }
}
