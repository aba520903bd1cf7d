//! Screens the firmware can show, and the text each one is made of.
//!
//! A [`Screen`] borrows whatever it displays from the control state, so
//! building one is free. The presenter turns it into lines with
//! [`Screen::lines`] and draws them top to bottom.

use core::fmt::Write;

use crate::config::{StationEntry, PASSWORD_LEN, SCREEN_LINE_LEN, SCREEN_MAX_LINES};
use crate::menu::MainMenuOption;
use crate::radio::RadioStatus;

/// One rendered text line.
pub type Line = heapless::String<SCREEN_LINE_LEN>;

/// All lines of one screen, top to bottom.
pub type Lines = heapless::Vec<Line, SCREEN_MAX_LINES>;

/// Screens (views) the UI can be in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen<'a> {
    /// Top-level menu showing the highlighted option.
    MainMenu { option: MainMenuOption },
    /// Scanned networks. `ssid` is `None` when the scan found nothing.
    Networks {
        ssid: Option<&'a str>,
        index: usize,
        count: usize,
    },
    /// Shown right after a network was picked.
    PasswordPrompt,
    /// Password being typed; `entered` includes the letter under edit.
    Password { entered: &'a str, position: usize },
    /// Association in progress, one dot per status poll.
    Connecting { ssid: &'a str, polls: u8 },
    /// Final association outcome.
    ConnectResult { ssid: &'a str, connected: bool },
    /// Bluetooth bridge info; `ready` is false when the bridge failed to
    /// start.
    Bluetooth { name: &'a str, ready: bool },
    /// Selected station and playback state.
    Radio {
        station: &'a StationEntry,
        status: RadioStatus,
    },
}

impl Screen<'_> {
    /// Lay the screen out as text lines no wider than the display.
    pub fn lines(&self) -> Lines {
        let mut lines = Lines::new();

        match *self {
            Screen::MainMenu { option } => {
                push(&mut lines, "Main Menu:");
                push(&mut lines, option.label());
            }
            Screen::Networks { ssid, index, count } => {
                push(&mut lines, "Select WiFi:");
                match ssid {
                    Some(ssid) => {
                        push(&mut lines, ssid);
                        push_fmt(&mut lines, format_args!("{}/{}", index + 1, count));
                    }
                    None => push(&mut lines, "No networks found"),
                }
            }
            Screen::PasswordPrompt => {
                push(&mut lines, "Enter WiFi Password:");
            }
            Screen::Password { entered, position } => {
                push(&mut lines, "Password:");
                // Keep the letter under edit in view once the echo outgrows
                // the line.
                push_tail(&mut lines, entered);
                push_fmt(&mut lines, format_args!("{}/{}", position + 1, PASSWORD_LEN));
            }
            Screen::Connecting { ssid, polls } => {
                push(&mut lines, "Connecting to:");
                push(&mut lines, ssid);
                let mut dots = Line::new();
                for _ in 0..polls {
                    let _ = dots.push('.');
                }
                let _ = lines.push(dots);
            }
            Screen::ConnectResult { ssid, connected } => {
                push(&mut lines, "Connecting to:");
                push(&mut lines, ssid);
                push(
                    &mut lines,
                    if connected {
                        "Connected!"
                    } else {
                        "Failed to connect."
                    },
                );
            }
            Screen::Bluetooth { name, ready } => {
                push(&mut lines, "Bluetooth:");
                push(&mut lines, name);
                if !ready {
                    push(&mut lines, "unavailable");
                }
            }
            Screen::Radio { station, status } => {
                push(&mut lines, "Radio:");
                push(&mut lines, station.name);
                push_wrapped(&mut lines, station.url, 1);
                push(&mut lines, status.label());
            }
        }

        lines
    }
}

/// Append `text`, truncated to the line width.
fn push(lines: &mut Lines, text: &str) {
    let mut line = Line::new();
    for c in text.chars() {
        if line.push(c).is_err() {
            break;
        }
    }
    let _ = lines.push(line);
}

/// Append the last line-width characters of `text`.
fn push_tail(lines: &mut Lines, text: &str) {
    let skip = text.chars().count().saturating_sub(SCREEN_LINE_LEN);
    let start = text.char_indices().nth(skip).map_or(text.len(), |(i, _)| i);
    push(lines, &text[start..]);
}

/// Append `text` broken into line-width pieces, leaving `reserve` lines
/// free below it.
fn push_wrapped(lines: &mut Lines, text: &str, reserve: usize) {
    let room = SCREEN_MAX_LINES.saturating_sub(lines.len() + reserve);
    let mut chars = text.chars().peekable();
    for _ in 0..room {
        let mut line = Line::new();
        while let Some(&c) = chars.peek() {
            if line.push(c).is_err() {
                break;
            }
            chars.next();
        }
        if line.is_empty() {
            break;
        }
        let _ = lines.push(line);
    }
}

fn push_fmt(lines: &mut Lines, args: core::fmt::Arguments<'_>) {
    let mut line = Line::new();
    let _ = line.write_fmt(args);
    let _ = lines.push(line);
}
