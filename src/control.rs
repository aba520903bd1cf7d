//! The control loop and menu state machine.
//!
//! One cooperative loop owns every piece of mutable state. Each pass it
//! samples the buttons, routes an event to the active menu, redraws what
//! changed and, while the radio menu is playing, runs the stream pump.
//!
//! | Menu          | PREV / NEXT             | SELECT                                   |
//! |---------------|-------------------------|------------------------------------------|
//! | MainMenu      | move highlight, wrap    | WiFi: scan + picker, Bluetooth, Radio    |
//! | WifiMenu      | move network, wrap      | remember SSID, start password entry      |
//! | BluetoothMenu | -                       | -                                        |
//! | PasswordEntry | scroll letter `A..=Z`   | next letter; after the last, connect     |
//! | RadioMenu     | move station, wrap      | play / stop                              |
//!
//! With an empty scan, SELECT in the WiFi menu does nothing.

use embedded_hal_async::delay::DelayNs;

use crate::config::{StationEntry, BT_DEVICE_NAME, STATIONS};
use crate::menu::{MainMenuOption, MenuState};
use crate::radio::pipeline::{PlaybackOutcome, Pipeline};
use crate::radio::{AudioSink, PlaybackState, RadioStatus, StationCatalog, StationStream};
use crate::ui::buttons::{ButtonLines, Debouncer};
use crate::ui::input_logic::{select_next, select_prev};
use crate::ui::{ButtonEvent, Presenter, Screen};
use crate::wifi::credentials::CredentialEntry;
use crate::wifi::{self, Ssid, WifiLink, WifiSession};

/// Everything the control loop mutates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlState {
    pub menu: MenuState,
    /// Main menu highlight; kept across visits.
    pub main_menu_index: usize,
    /// Station cursor; kept across visits.
    pub stations: StationCatalog,
    pub session: WifiSession,
    /// Whether the Bluetooth audio bridge came up at boot.
    pub bluetooth_ready: bool,
}

impl ControlState {
    pub fn new(stations: &'static [StationEntry]) -> Self {
        Self {
            menu: MenuState::MainMenu,
            main_menu_index: 0,
            stations: StationCatalog::new(stations),
            session: WifiSession::default(),
            bluetooth_ready: false,
        }
    }

    /// The screen for the active menu.
    pub fn screen(&self) -> Option<Screen<'_>> {
        match &self.menu {
            MenuState::MainMenu => Some(Screen::MainMenu {
                option: MainMenuOption::from_index(self.main_menu_index),
            }),
            MenuState::WifiMenu(networks) => Some(networks.screen()),
            MenuState::BluetoothMenu => Some(Screen::Bluetooth {
                name: BT_DEVICE_NAME,
                ready: self.bluetooth_ready,
            }),
            MenuState::RadioMenu(playback) => self.stations.screen(playback.status),
            MenuState::PasswordEntry(entry) => Some(Screen::Password {
                entered: entry.entered(),
                position: entry.position(),
            }),
        }
    }
}

/// The board capabilities the control loop drives.
pub struct Board<L, P, W, S, A, D> {
    pub buttons: L,
    pub presenter: P,
    pub wifi: W,
    pub stream: S,
    pub audio: A,
    pub delay: D,
}

/// What an event asks the loop to do once the menu has been updated.
enum Transition {
    None,
    Redraw,
    Enter(MenuState),
    EnterWifi,
    EnterPassword,
    Connect,
}

pub struct Controller<L, P, W, S, A, D> {
    state: ControlState,
    buttons: Debouncer<L>,
    presenter: P,
    wifi: W,
    stream: S,
    audio: A,
    delay: D,
    pipeline: Pipeline,
}

impl<L, P, W, S, A, D> Controller<L, P, W, S, A, D>
where
    L: ButtonLines,
    P: Presenter,
    W: WifiLink,
    S: StationStream,
    A: AudioSink,
    D: DelayNs,
{
    /// Controller over the built-in station catalog.
    pub fn new(board: Board<L, P, W, S, A, D>) -> Self {
        Self::with_stations(board, &STATIONS)
    }

    pub fn with_stations(board: Board<L, P, W, S, A, D>, stations: &'static [StationEntry]) -> Self {
        Self {
            state: ControlState::new(stations),
            buttons: Debouncer::new(board.buttons),
            presenter: board.presenter,
            wifi: board.wifi,
            stream: board.stream,
            audio: board.audio,
            delay: board.delay,
            pipeline: Pipeline::new(),
        }
    }

    /// Record the outcome of the Bluetooth bridge start-up.
    pub fn set_bluetooth_ready(&mut self, ready: bool) {
        self.state.bluetooth_ready = ready;
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn wifi(&self) -> &W {
        &self.wifi
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Draw the initial screen.
    pub fn start(&mut self) {
        info!("Control loop starting in {}", self.state.menu.name());
        self.render_current();
    }

    /// Run the control loop forever.
    pub async fn run(&mut self) -> ! {
        self.start();
        loop {
            self.step().await;
        }
    }

    /// One pass of the control loop.
    pub async fn step(&mut self) {
        if let Some(event) = self.buttons.poll(&mut self.delay).await {
            self.handle(event).await;
        }

        if self.state.menu.is_playing() {
            self.play_current().await;
        }
    }

    /// Route one button event to the active menu.
    pub async fn handle(&mut self, event: ButtonEvent) {
        let state = &mut self.state;

        let transition = match &mut state.menu {
            MenuState::MainMenu => match event {
                ButtonEvent::Prev => {
                    state.main_menu_index =
                        select_prev(state.main_menu_index, MainMenuOption::COUNT);
                    Transition::Redraw
                }
                ButtonEvent::Next => {
                    state.main_menu_index =
                        select_next(state.main_menu_index, MainMenuOption::COUNT);
                    Transition::Redraw
                }
                ButtonEvent::Select => match MainMenuOption::from_index(state.main_menu_index) {
                    MainMenuOption::Wifi => Transition::EnterWifi,
                    MainMenuOption::Bluetooth => Transition::Enter(MenuState::BluetoothMenu),
                    MainMenuOption::PlayRadio => {
                        Transition::Enter(MenuState::RadioMenu(PlaybackState::new()))
                    }
                },
            },

            MenuState::WifiMenu(networks) => match event {
                ButtonEvent::Prev => {
                    networks.select_prev();
                    Transition::Redraw
                }
                ButtonEvent::Next => {
                    networks.select_next();
                    Transition::Redraw
                }
                ButtonEvent::Select => match networks.selected() {
                    Some(name) => {
                        state.session.selected_ssid = Ssid::try_from(name).unwrap_or_default();
                        Transition::EnterPassword
                    }
                    // Empty scan: nothing to pick.
                    None => Transition::None,
                },
            },

            // The bridge runs by itself; this menu has no controls.
            MenuState::BluetoothMenu => Transition::None,

            MenuState::PasswordEntry(entry) => match event {
                ButtonEvent::Prev => {
                    entry.scroll_prev();
                    Transition::Redraw
                }
                ButtonEvent::Next => {
                    entry.scroll_next();
                    Transition::Redraw
                }
                ButtonEvent::Select => match entry.confirm() {
                    None => Transition::Redraw,
                    Some(password) => {
                        state.session.password = password;
                        Transition::Connect
                    }
                },
            },

            MenuState::RadioMenu(playback) => match event {
                ButtonEvent::Prev => {
                    state.stations.select_prev();
                    Transition::Redraw
                }
                ButtonEvent::Next => {
                    state.stations.select_next();
                    Transition::Redraw
                }
                ButtonEvent::Select => {
                    if playback.toggle() {
                        if let Some(station) = state.stations.current() {
                            info!("Playing station: {}", station.url);
                        }
                        if !state.session.connected {
                            warn!("Starting playback without a confirmed WiFi connection");
                        }
                    } else {
                        info!("Playback stopped");
                    }
                    Transition::Redraw
                }
            },
        };

        self.apply(transition).await;
    }

    async fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::None => {}
            Transition::Redraw => self.render_current(),
            Transition::Enter(menu) => {
                self.enter(menu);
                self.render_current();
            }
            Transition::EnterWifi => {
                let networks = wifi::scan(&mut self.wifi).await;
                self.enter(MenuState::WifiMenu(networks));
                self.render_current();
            }
            Transition::EnterPassword => {
                self.enter(MenuState::PasswordEntry(CredentialEntry::new()));
                self.presenter.render(&Screen::PasswordPrompt);
            }
            Transition::Connect => {
                let session = &mut self.state.session;
                session.connected = wifi::connect(
                    &mut self.wifi,
                    &mut self.presenter,
                    &mut self.delay,
                    &session.selected_ssid,
                    &session.password,
                )
                .await;
                self.enter(MenuState::MainMenu);
                self.render_current();
            }
        }
    }

    async fn play_current(&mut self) {
        let Some(station) = self.state.stations.current() else {
            self.halt(RadioStatus::OpenFailed);
            return;
        };

        let outcome = self
            .pipeline
            .play(
                station.url,
                &mut self.stream,
                &mut self.audio,
                &mut self.buttons,
                &mut self.delay,
            )
            .await;

        match outcome {
            PlaybackOutcome::Interrupted(event) => self.handle(event).await,
            PlaybackOutcome::OpenFailed => self.halt(RadioStatus::OpenFailed),
            PlaybackOutcome::Ended => self.halt(RadioStatus::Ended),
            PlaybackOutcome::ReadFailed | PlaybackOutcome::OutputFailed => {
                self.halt(RadioStatus::Error)
            }
        }
    }

    /// Stop playback with `status` and show it.
    fn halt(&mut self, status: RadioStatus) {
        if let MenuState::RadioMenu(playback) = &mut self.state.menu {
            playback.halt(status);
        }
        self.render_current();
    }

    fn enter(&mut self, menu: MenuState) {
        info!("Menu: {} -> {}", self.state.menu.name(), menu.name());
        self.state.menu = menu;
    }

    fn render_current(&mut self) {
        if let Some(screen) = self.state.screen() {
            self.presenter.render(&screen);
        }
    }
}
