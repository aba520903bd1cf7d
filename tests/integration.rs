//! Integration tests for the radiobridge control loop, driven through
//! scripted buttons and fake board capabilities.

use std::collections::VecDeque;

use embassy_futures::block_on;
use embedded_hal_async::delay::DelayNs;

use radiobridge::config::{PASSWORD_LEN, SCREEN_LINE_LEN, STATIONS};
use radiobridge::error::{Error, StreamError, WifiError};
use radiobridge::radio::http::ResponseStatusCode;
use radiobridge::radio::{AudioSink, PlaybackState, RadioStatus, StationStream};
use radiobridge::ui::buttons::ButtonLines;
use radiobridge::ui::{Presenter, Screen};
use radiobridge::wifi::WifiLink;
use radiobridge::{Board, ButtonEvent, Controller, MenuState};

use ButtonEvent::{Next, Prev, Select};

// ═══════════════════════════════════════════════════════════════════════════
// Fakes
// ═══════════════════════════════════════════════════════════════════════════

/// One scripted `sample()` result per call; `None` once exhausted.
struct Script(VecDeque<Option<ButtonEvent>>);

impl ButtonLines for Script {
    fn sample(&mut self) -> Option<ButtonEvent> {
        self.0.pop_front().flatten()
    }
}

#[derive(Default)]
struct Recorder {
    screens: Vec<Vec<String>>,
}

impl Recorder {
    fn last(&self) -> Vec<String> {
        self.screens.last().cloned().unwrap_or_default()
    }

    fn shown(&self, text: &str) -> bool {
        self.screens.iter().any(|lines| lines.iter().any(|l| l == text))
    }
}

impl Presenter for Recorder {
    fn render(&mut self, screen: &Screen<'_>) {
        self.screens
            .push(screen.lines().iter().map(|l| String::from(l.as_str())).collect());
    }
}

/// How the fake link answers status polls.
#[derive(Default, Clone, Copy)]
enum Link {
    /// Every status query fails.
    #[default]
    StatusFails,
    /// Status reads fine but never reports a link.
    NeverUp,
    /// The link comes up on this poll.
    UpOnPoll(u32),
}

#[derive(Default)]
struct FakeWifi {
    networks: Vec<&'static str>,
    link: Link,
    begun: Vec<(String, String)>,
    polls: u32,
}

impl WifiLink for FakeWifi {
    async fn scan(&mut self, found: &mut dyn FnMut(&str)) -> Result<(), Error> {
        for name in self.networks.iter().copied() {
            found(name);
        }
        Ok(())
    }

    async fn begin(&mut self, ssid: &str, password: &str) -> Result<(), Error> {
        self.begun.push((ssid.into(), password.into()));
        Ok(())
    }

    async fn is_connected(&mut self) -> Result<bool, Error> {
        self.polls += 1;
        match self.link {
            Link::StatusFails => Err(WifiError::StatusUnavailable.into()),
            Link::NeverUp => Ok(false),
            Link::UpOnPoll(n) => Ok(self.polls >= n),
        }
    }
}

/// What one `get` answers with.
struct Response {
    status: u16,
    chunks: VecDeque<Vec<u8>>,
    /// Report end of stream once the chunks are gone.
    eof: bool,
}

impl Response {
    fn ok(chunks: &[&[u8]], eof: bool) -> Self {
        Response {
            status: 200,
            chunks: chunks.iter().map(|c| c.to_vec()).collect(),
            eof,
        }
    }

    fn status(status: u16) -> Self {
        Response {
            status,
            chunks: VecDeque::new(),
            eof: true,
        }
    }
}

/// Answers each `get` with the next queued response, or a connect error.
#[derive(Default)]
struct FakeStream {
    responses: VecDeque<Response>,
    current: Option<Response>,
    gets: Vec<String>,
    ends: usize,
}

impl FakeStream {
    fn with(responses: impl IntoIterator<Item = Response>) -> Self {
        FakeStream {
            responses: responses.into_iter().collect(),
            ..Default::default()
        }
    }
}

impl StationStream for FakeStream {
    async fn get(&mut self, url: &str) -> Result<ResponseStatusCode, Error> {
        self.gets.push(url.into());
        match self.responses.pop_front() {
            Some(response) => {
                let status = ResponseStatusCode::from(response.status);
                self.current = Some(response);
                Ok(status)
            }
            None => Err(StreamError::Connect.into()),
        }
    }

    fn available(&mut self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|r| !r.chunks.is_empty() || r.eof)
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let response = self.current.as_mut().ok_or(StreamError::NotOpen)?;
        match response.chunks.pop_front() {
            Some(mut chunk) => {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                if n < chunk.len() {
                    response.chunks.push_front(chunk.split_off(n));
                }
                Ok(n)
            }
            None => Ok(0),
        }
    }

    fn end(&mut self) {
        self.current = None;
        self.ends += 1;
    }
}

#[derive(Default)]
struct Speaker {
    played: Vec<u8>,
    /// Largest write accepted at once; 0 means unlimited.
    max_write: usize,
    broken: bool,
}

impl AudioSink for Speaker {
    async fn write(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        if self.broken {
            return Err(Error::AudioOutput);
        }
        let n = match self.max_write {
            0 => bytes.len(),
            max => bytes.len().min(max),
        };
        self.played.extend_from_slice(&bytes[..n]);
        Ok(n)
    }
}

#[derive(Default)]
struct RecordingDelay {
    waits_ms: Vec<u32>,
}

impl RecordingDelay {
    fn count(&self, ms: u32) -> usize {
        self.waits_ms.iter().filter(|&&w| w == ms).count()
    }
}

impl DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.waits_ms.push(ns / 1_000_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.waits_ms.push(ms);
    }
}

type TestController = Controller<Script, Recorder, FakeWifi, FakeStream, Speaker, RecordingDelay>;

fn controller_with(
    presses: &[Option<ButtonEvent>],
    wifi: FakeWifi,
    stream: FakeStream,
    audio: Speaker,
) -> TestController {
    let mut controller = Controller::new(Board {
        buttons: Script(presses.iter().copied().collect()),
        presenter: Recorder::default(),
        wifi,
        stream,
        audio,
        delay: RecordingDelay::default(),
    });
    controller.start();
    controller
}

fn controller(presses: &[Option<ButtonEvent>]) -> TestController {
    controller_with(
        presses,
        FakeWifi::default(),
        FakeStream::default(),
        Speaker::default(),
    )
}

fn steps(controller: &mut TestController, n: usize) {
    for _ in 0..n {
        block_on(controller.step());
    }
}

fn playback(controller: &TestController) -> Option<PlaybackState> {
    match controller.state().menu {
        MenuState::RadioMenu(playback) => Some(playback),
        _ => None,
    }
}

/// Presses that open the radio menu from a fresh main menu.
const TO_RADIO: [Option<ButtonEvent>; 3] = [Some(Next), Some(Next), Some(Select)];

// ═══════════════════════════════════════════════════════════════════════════
// Main menu
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn boots_into_main_menu() {
    let c = controller(&[]);
    assert_eq!(c.state().menu, MenuState::MainMenu);
    assert_eq!(c.presenter().last(), ["Main Menu:", "WiFi"]);
}

#[test]
fn main_menu_wraps_both_ways() {
    let mut c = controller(&[Some(Prev), Some(Next)]);

    steps(&mut c, 1);
    assert_eq!(c.state().main_menu_index, 2);
    assert_eq!(c.presenter().last(), ["Main Menu:", "Play Radio"]);

    steps(&mut c, 1);
    assert_eq!(c.state().main_menu_index, 0);
    assert_eq!(c.presenter().last(), ["Main Menu:", "WiFi"]);
}

#[test]
fn settle_delay_follows_each_press() {
    let mut c = controller(&[Some(Next), None, Some(Next)]);
    steps(&mut c, 3);

    // Only the sample right after a press waits.
    assert_eq!(c.delay().waits_ms, [200]);
    assert_eq!(c.state().main_menu_index, 2);
}

#[test]
fn idle_passes_change_nothing() {
    let mut c = controller(&[None, None, None]);
    steps(&mut c, 3);

    assert_eq!(c.state().menu, MenuState::MainMenu);
    assert_eq!(c.presenter().screens.len(), 1);
    assert!(c.delay().waits_ms.is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// Bluetooth
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn bluetooth_menu_shows_bridge_name_and_ignores_buttons() {
    let mut c = controller(&[Some(Next), Some(Select), Some(Prev), Some(Next), Some(Select)]);
    c.set_bluetooth_ready(true);
    steps(&mut c, 2);

    assert_eq!(c.state().menu, MenuState::BluetoothMenu);
    assert_eq!(c.presenter().last(), ["Bluetooth:", "ESP32-A2DP"]);
    let drawn = c.presenter().screens.len();

    steps(&mut c, 3);
    assert_eq!(c.state().menu, MenuState::BluetoothMenu);
    assert_eq!(c.presenter().screens.len(), drawn);
}

#[test]
fn bluetooth_menu_reports_a_bridge_that_failed_to_start() {
    let mut c = controller(&[Some(Next), Some(Select)]);
    c.set_bluetooth_ready(false);
    steps(&mut c, 2);

    assert_eq!(c.state().menu, MenuState::BluetoothMenu);
    assert_eq!(
        c.presenter().last(),
        ["Bluetooth:", "ESP32-A2DP", "unavailable"]
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// WiFi
// ═══════════════════════════════════════════════════════════════════════════

fn password_presses(network_moves: &[Option<ButtonEvent>]) -> Vec<Option<ButtonEvent>> {
    let mut presses = vec![Some(Select)];
    presses.extend_from_slice(network_moves);
    presses.push(Some(Select));
    presses.extend(std::iter::repeat(Some(Select)).take(PASSWORD_LEN));
    presses
}

#[test]
fn wifi_menu_lists_scan_results() {
    let wifi = FakeWifi {
        networks: vec!["HomeNet", "Cafe", "Office"],
        ..Default::default()
    };
    let mut c = controller_with(
        &[Some(Select), Some(Prev)],
        wifi,
        FakeStream::default(),
        Speaker::default(),
    );

    steps(&mut c, 1);
    assert_eq!(c.presenter().last(), ["Select WiFi:", "HomeNet", "1/3"]);

    steps(&mut c, 1);
    assert_eq!(c.presenter().last(), ["Select WiFi:", "Office", "3/3"]);
}

#[test]
fn empty_scan_is_safe() {
    let mut c = controller(&[Some(Select), Some(Prev), Some(Next), Some(Select)]);

    steps(&mut c, 3);
    assert!(matches!(c.state().menu, MenuState::WifiMenu(ref list) if list.is_empty()));
    assert_eq!(c.presenter().last(), ["Select WiFi:", "No networks found"]);

    let drawn = c.presenter().screens.len();
    steps(&mut c, 1);
    assert!(matches!(c.state().menu, MenuState::WifiMenu(ref list) if list.is_empty()));
    assert_eq!(c.presenter().screens.len(), drawn);
    assert!(c.wifi().begun.is_empty());
}

#[test]
fn picking_a_network_opens_password_entry() {
    let wifi = FakeWifi {
        networks: vec!["HomeNet", "Cafe"],
        ..Default::default()
    };
    let mut c = controller_with(
        &[Some(Select), Some(Next), Some(Select), Some(Next), Some(Next)],
        wifi,
        FakeStream::default(),
        Speaker::default(),
    );

    steps(&mut c, 3);
    assert_eq!(c.state().session.selected_ssid.as_str(), "Cafe");
    assert!(matches!(c.state().menu, MenuState::PasswordEntry(_)));
    assert_eq!(c.presenter().last(), ["Enter WiFi Password:"]);

    steps(&mut c, 2);
    assert_eq!(c.presenter().last(), ["Password:", "C", "1/32"]);
}

#[test]
fn full_password_triggers_connect_with_ten_polls() {
    let wifi = FakeWifi {
        networks: vec!["HomeNet", "Cafe"],
        ..Default::default()
    };
    let presses = password_presses(&[Some(Next)]);
    let mut c = controller_with(&presses, wifi, FakeStream::default(), Speaker::default());

    steps(&mut c, presses.len());

    let expected_password: String = "A".repeat(PASSWORD_LEN);
    assert_eq!(c.wifi().begun, [(String::from("Cafe"), expected_password.clone())]);
    assert_eq!(c.state().session.password.as_str(), expected_password);
    assert_eq!(c.wifi().polls, 10);
    assert_eq!(c.delay().count(1000), 10);
    assert_eq!(c.delay().count(2000), 1);

    assert!(!c.state().session.connected);
    assert!(c.presenter().shown("Failed to connect."));
    assert_eq!(c.state().menu, MenuState::MainMenu);
    assert_eq!(c.presenter().last(), ["Main Menu:", "WiFi"]);
}

#[test]
fn link_that_never_comes_up_times_out_after_ten_polls() {
    let wifi = FakeWifi {
        networks: vec!["HomeNet"],
        link: Link::NeverUp,
        ..Default::default()
    };
    let presses = password_presses(&[]);
    let mut c = controller_with(&presses, wifi, FakeStream::default(), Speaker::default());

    steps(&mut c, presses.len());

    assert_eq!(c.wifi().begun.len(), 1);
    assert_eq!(c.wifi().polls, 10);
    assert_eq!(c.delay().count(1000), 10);
    assert_eq!(c.delay().count(2000), 1);
    assert!(!c.state().session.connected);
    assert!(c.presenter().shown("Failed to connect."));
    assert_eq!(c.state().menu, MenuState::MainMenu);
}

#[test]
fn connect_stops_polling_once_link_is_up() {
    let wifi = FakeWifi {
        networks: vec!["HomeNet"],
        link: Link::UpOnPoll(3),
        ..Default::default()
    };
    let presses = password_presses(&[]);
    let mut c = controller_with(&presses, wifi, FakeStream::default(), Speaker::default());

    steps(&mut c, presses.len());

    assert_eq!(c.wifi().polls, 3);
    assert!(c.state().session.connected);
    assert!(c.presenter().shown("Connected!"));
    assert_eq!(c.state().menu, MenuState::MainMenu);
}

// ═══════════════════════════════════════════════════════════════════════════
// Radio
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn radio_menu_starts_stopped_on_first_station() {
    let mut c = controller(&TO_RADIO);
    steps(&mut c, 3);

    assert_eq!(playback(&c), Some(PlaybackState::new()));
    let (url_head, url_tail) = STATIONS[0].url.split_at(SCREEN_LINE_LEN);
    assert_eq!(
        c.presenter().last(),
        ["Radio:", STATIONS[0].name, url_head, url_tail, "[] Stopped"]
    );
}

#[test]
fn station_cursor_wraps_both_ways() {
    let mut presses = TO_RADIO.to_vec();
    presses.extend([Some(Prev), Some(Next)]);
    let mut c = controller(&presses);

    steps(&mut c, 4);
    assert_eq!(c.state().stations.index(), 4);
    steps(&mut c, 1);
    assert_eq!(c.state().stations.index(), 0);
    assert!(c.stream().gets.is_empty());
}

#[test]
fn select_plays_the_highlighted_station_until_the_stream_ends() {
    let mut presses = TO_RADIO.to_vec();
    presses.extend([Some(Next), Some(Next), Some(Select)]);
    let stream = FakeStream::with([Response::ok(&[b"ID3", b"\xff\xfb\x90\x00"], true)]);
    let mut c = controller_with(&presses, FakeWifi::default(), stream, Speaker::default());

    steps(&mut c, presses.len());

    assert_eq!(c.stream().gets, [STATIONS[2].url]);
    assert_eq!(c.audio().played, b"ID3\xff\xfb\x90\x00");
    assert_eq!(
        playback(&c),
        Some(PlaybackState {
            is_playing: false,
            status: RadioStatus::Ended
        })
    );
    assert!(c.stream().ends >= 1);
    assert!(c.presenter().shown("Stream ended"));
}

#[test]
fn stream_bytes_are_forwarded_exactly_across_chunks() {
    let body: Vec<u8> = (0..1300u32).map(|i| (i % 251) as u8).collect();
    let mut presses = TO_RADIO.to_vec();
    presses.push(Some(Select));
    let stream = FakeStream::with([Response::ok(&[body.as_slice()], true)]);
    let speaker = Speaker {
        max_write: 100,
        ..Default::default()
    };
    let mut c = controller_with(&presses, FakeWifi::default(), stream, speaker);

    steps(&mut c, presses.len());

    assert_eq!(c.audio().played, body);
}

#[test]
fn select_during_playback_stops_without_reopening() {
    let mut presses = TO_RADIO.to_vec();
    presses.extend([Some(Select), None, None, Some(Select), None]);
    let stream = FakeStream::with([Response::ok(&[], false)]);
    let mut c = controller_with(&presses, FakeWifi::default(), stream, Speaker::default());

    // The play pass consumes the next three samples itself.
    steps(&mut c, 5);

    assert_eq!(c.stream().gets.len(), 1);
    assert_eq!(c.stream().ends, 1);
    assert_eq!(c.delay().count(100), 2);
    assert_eq!(
        playback(&c),
        Some(PlaybackState {
            is_playing: false,
            status: RadioStatus::Stopped
        })
    );
    assert_eq!(c.presenter().last().last().map(String::as_str), Some("[] Stopped"));
}

#[test]
fn next_during_playback_retunes() {
    let mut presses = TO_RADIO.to_vec();
    presses.extend([Some(Select), Some(Next)]);
    // Second station refuses the connection.
    let stream = FakeStream::with([Response::ok(&[], false)]);
    let mut c = controller_with(&presses, FakeWifi::default(), stream, Speaker::default());

    steps(&mut c, 5);

    assert_eq!(c.stream().gets, [STATIONS[0].url, STATIONS[1].url]);
    assert_eq!(c.state().stations.index(), 1);
    assert_eq!(
        playback(&c),
        Some(PlaybackState {
            is_playing: false,
            status: RadioStatus::OpenFailed
        })
    );
}

#[test]
fn refused_stream_stops_playback() {
    let mut presses = TO_RADIO.to_vec();
    presses.extend([Some(Select), None]);
    let stream = FakeStream::with([Response::status(404)]);
    let mut c = controller_with(&presses, FakeWifi::default(), stream, Speaker::default());

    steps(&mut c, 5);

    assert_eq!(c.stream().gets.len(), 1);
    assert!(c.audio().played.is_empty());
    assert_eq!(
        playback(&c),
        Some(PlaybackState {
            is_playing: false,
            status: RadioStatus::OpenFailed
        })
    );
    assert_eq!(c.presenter().last().last().map(String::as_str), Some("Stream failed"));
}

#[test]
fn broken_audio_output_stops_playback() {
    let mut presses = TO_RADIO.to_vec();
    presses.push(Some(Select));
    let stream = FakeStream::with([Response::ok(&[b"abc"], false)]);
    let speaker = Speaker {
        broken: true,
        ..Default::default()
    };
    let mut c = controller_with(&presses, FakeWifi::default(), stream, speaker);

    steps(&mut c, presses.len());

    assert_eq!(
        playback(&c),
        Some(PlaybackState {
            is_playing: false,
            status: RadioStatus::Error
        })
    );
    assert_eq!(c.stream().ends, 1);
}
