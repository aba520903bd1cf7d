//! User interface subsystem - OLED display + physical buttons.
//!
//! The control loop samples the buttons, feeds the resulting event to the
//! menu state machine and asks the presenter to draw whichever screen the
//! new state calls for.
//!
//! ## Components
//!
//! - **Display**: SSD1306 128×64 OLED via I²C
//! - **Buttons**: 3 tactile switches, polled, settle-time debounce (PREV, NEXT, SELECT)

pub mod buttons;
#[cfg(feature = "embedded")]
pub mod display;
pub mod input_logic;
pub mod screen;

pub use screen::{Lines, Screen};

/// Physical button events (after debouncing).
///
/// Three buttons cover every screen:
///   - PREV/NEXT: move the cursor (menu entry, network, letter, station)
///   - SELECT: context-dependent action (enter, confirm letter, play/stop)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    Prev,
    Next,
    Select,
}

/// Something that can put a [`Screen`] in front of the user.
///
/// Rendering is fire-and-forget: a driver that fails mid-frame simply
/// leaves the old picture up.
pub trait Presenter {
    fn render(&mut self, screen: &Screen<'_>);
}

impl<T: Presenter + ?Sized> Presenter for &mut T {
    fn render(&mut self, screen: &Screen<'_>) {
        (**self).render(screen)
    }
}
