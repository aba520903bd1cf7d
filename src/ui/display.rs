//! SSD1306 OLED display wrapper.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

use crate::config::SCREEN_I2C_ADDRESS;
use crate::error::Error;
use crate::ui::{Presenter, Screen};

/// Baseline of the first text line.
const FIRST_BASELINE: i32 = 10;
/// Vertical distance between text lines.
const LINE_PITCH: i32 = 10;

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Initialise the SSD1306 display and clear the screen.
///
/// A display that does not answer here is fatal for the firmware, so
/// unlike later draws the error is returned.
pub fn init<I2C>(i2c: I2C) -> Result<Display<I2C>, Error>
where
    I2C: embedded_hal::i2c::I2c,
{
    let interface = I2CDisplayInterface::new_custom_address(i2c, SCREEN_I2C_ADDRESS);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    display.init().map_err(|_| Error::Display)?;
    display.clear_buffer();
    display.flush().map_err(|_| Error::Display)?;
    Ok(display)
}

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

/// Draws every [`Screen`] as left-aligned text lines.
pub struct OledPresenter<I2C> {
    display: Display<I2C>,
}

impl<I2C> OledPresenter<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    pub fn new(display: Display<I2C>) -> Self {
        Self { display }
    }
}

impl<I2C> Presenter for OledPresenter<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn render(&mut self, screen: &Screen<'_>) {
        self.display.clear_buffer();

        for (row, line) in screen.lines().iter().enumerate() {
            let y = FIRST_BASELINE + row as i32 * LINE_PITCH;
            let _ = Text::new(line.as_str(), Point::new(0, y), text_style()).draw(&mut self.display);
        }

        if self.display.flush().is_err() {
            warn!("Display flush failed");
        }
    }
}
