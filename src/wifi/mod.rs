//! WiFi credential flow - scan, pick, type a password, associate.
//!
//! The radio itself sits behind [`WifiLink`]; this module owns the
//! policy around it:
//!
//! 1. **Scan** - keep the first `MAX_NETWORKS` names in the order the
//!    driver reports them.
//! 2. **Pick** - [`NetworkList`] with a wrapping cursor that tolerates an
//!    empty scan.
//! 3. **Associate** - [`connect`] issues the request and polls the link
//!    state a bounded number of times, drawing progress as it goes.

pub mod credentials;
#[cfg(feature = "embedded")]
pub mod esp;

use crate::config::{
    MAX_NETWORKS, SSID_MAX_LEN, WIFI_CONNECT_MAX_POLLS, WIFI_CONNECT_POLL_MS,
    WIFI_RESULT_DISPLAY_MS,
};
use crate::error::Error;
use crate::ui::input_logic::{select_next, select_prev};
use crate::ui::{Presenter, Screen};
use credentials::Password;
use embedded_hal_async::delay::DelayNs;

/// A network name as shown in the picker.
pub type Ssid = heapless::String<SSID_MAX_LEN>;

/// WiFi station-mode capability.
#[allow(async_fn_in_trait)]
pub trait WifiLink {
    /// Scan for access points, calling `found` once per network name in
    /// the order the radio reports them.
    async fn scan(&mut self, found: &mut dyn FnMut(&str)) -> Result<(), Error>;

    /// Start associating with `ssid`. Returns once the request is issued,
    /// not once the link is up.
    async fn begin(&mut self, ssid: &str, password: &str) -> Result<(), Error>;

    /// Current association state.
    async fn is_connected(&mut self) -> Result<bool, Error>;
}

impl<T: WifiLink + ?Sized> WifiLink for &mut T {
    async fn scan(&mut self, found: &mut dyn FnMut(&str)) -> Result<(), Error> {
        (**self).scan(found).await
    }

    async fn begin(&mut self, ssid: &str, password: &str) -> Result<(), Error> {
        (**self).begin(ssid, password).await
    }

    async fn is_connected(&mut self) -> Result<bool, Error> {
        (**self).is_connected().await
    }
}

/// Networks from the latest scan plus the picker cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NetworkList {
    names: heapless::Vec<Ssid, MAX_NETWORKS>,
    selected: usize,
}

impl NetworkList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from names in reported order, keeping the first
    /// `MAX_NETWORKS`.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut list = Self::new();
        for name in names {
            list.push(name);
        }
        list
    }

    /// Append a name. Returns `false` once the list is full; SSIDs longer
    /// than 32 bytes are cut.
    pub fn push(&mut self, name: &str) -> bool {
        if self.names.is_full() {
            return false;
        }
        let mut ssid = Ssid::new();
        for c in name.chars() {
            if ssid.push(c).is_err() {
                break;
            }
        }
        self.names.push(ssid).is_ok()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index(&self) -> usize {
        self.selected
    }

    /// Name under the cursor, `None` for an empty scan.
    pub fn selected(&self) -> Option<&str> {
        self.names.get(self.selected).map(|s| s.as_str())
    }

    pub fn select_prev(&mut self) {
        self.selected = select_prev(self.selected, self.names.len());
    }

    pub fn select_next(&mut self) {
        self.selected = select_next(self.selected, self.names.len());
    }

    pub fn screen(&self) -> Screen<'_> {
        Screen::Networks {
            ssid: self.selected(),
            index: self.selected,
            count: self.names.len(),
        }
    }
}

/// Credentials and outcome of the latest connection attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WifiSession {
    pub selected_ssid: Ssid,
    pub password: Password,
    /// Advisory only; nothing is gated on it.
    pub connected: bool,
}

/// Scan for networks, keeping the first `MAX_NETWORKS` reported.
///
/// A failed scan is logged and treated as an empty one.
pub async fn scan<W: WifiLink>(link: &mut W) -> NetworkList {
    let mut list = NetworkList::new();
    let mut reported = 0usize;

    let result = link
        .scan(&mut |name| {
            reported += 1;
            list.push(name);
        })
        .await;

    match result {
        Ok(()) => info!(
            "WiFi scan: {} networks reported, {} kept",
            reported,
            list.len()
        ),
        Err(e) => {
            warn!("WiFi scan failed: {}", e);
        }
    }

    list
}

/// Associate with `ssid`, polling the link once per
/// `WIFI_CONNECT_POLL_MS` for at most `WIFI_CONNECT_MAX_POLLS` polls.
///
/// Progress and the outcome are drawn on `presenter`; the outcome stays
/// up for `WIFI_RESULT_DISPLAY_MS` before this returns. There is no
/// retry: a failed attempt has to be restarted from the menu.
pub async fn connect<W, P, D>(
    link: &mut W,
    presenter: &mut P,
    delay: &mut D,
    ssid: &str,
    password: &str,
) -> bool
where
    W: WifiLink,
    P: Presenter,
    D: DelayNs,
{
    info!("WiFi: connecting to {}", ssid);
    presenter.render(&Screen::Connecting { ssid, polls: 0 });

    let connected = match link.begin(ssid, password).await {
        Ok(()) => poll_until_connected(link, presenter, delay, ssid).await,
        Err(e) => {
            warn!("WiFi: connect request rejected: {}", e);
            false
        }
    };

    if connected {
        info!("WiFi: connected to {}", ssid);
    } else {
        warn!("WiFi: failed to connect to {}", ssid);
    }

    presenter.render(&Screen::ConnectResult { ssid, connected });
    delay.delay_ms(WIFI_RESULT_DISPLAY_MS).await;

    connected
}

async fn poll_until_connected<W, P, D>(
    link: &mut W,
    presenter: &mut P,
    delay: &mut D,
    ssid: &str,
) -> bool
where
    W: WifiLink,
    P: Presenter,
    D: DelayNs,
{
    for poll in 1..=WIFI_CONNECT_MAX_POLLS {
        delay.delay_ms(WIFI_CONNECT_POLL_MS).await;

        match link.is_connected().await {
            Ok(true) => return true,
            Ok(false) => {}
            Err(e) => debug!("WiFi: status poll {} failed: {}", poll, e),
        }

        presenter.render(&Screen::Connecting { ssid, polls: poll });
    }

    false
}
