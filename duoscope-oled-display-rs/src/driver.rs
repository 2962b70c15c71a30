//! SSD1306 panel driver in async buffered graphics mode.
//!
//! [`OledDriver`] owns the panel lifecycle: construction without bus
//! traffic, explicit async initialisation, and presenting a composed
//! [`FrameBuffer`].

use display_interface_i2c::I2CInterface;
use embedded_graphics::Drawable;
use embedded_hal_async::i2c::I2c;
use ssd1306::{mode::BufferedGraphicsModeAsync, prelude::*, I2CDisplayInterface, Ssd1306Async};

use crate::error::OledError;
use crate::frame::FrameBuffer;

/// Concrete display type used internally by [`OledDriver`].
type Display<I2C> = Ssd1306Async<
    I2CInterface<I2C>,
    DisplaySize128x64,
    BufferedGraphicsModeAsync<DisplaySize128x64>,
>;

/// Async driver for an SSD1306 128×64 OLED over I2C.
///
/// # Lifecycle
///
/// 1. [`OledDriver::new()`] — no I2C traffic.
/// 2. [`OledDriver::init()`] — sends the SSD1306 initialisation sequence.
/// 3. [`OledDriver::present()`] — copies a composed frame into the panel
///    buffer and flushes it (~20 ms at 400 kHz).
///
/// # Example
///
/// ```no_run
/// use duoscope_oled_display_rs::{FrameBuffer, OledDriver};
///
/// # async fn example(i2c: impl embedded_hal_async::i2c::I2c) {
/// let mut oled = OledDriver::new(i2c, 0x3C);
/// oled.init().await.unwrap();
/// oled.present(&FrameBuffer::new()).await.unwrap();
/// # }
/// ```
pub struct OledDriver<I2C> {
    display: Display<I2C>,
    initialized: bool,
    presented: u32,
}

impl<I2C> OledDriver<I2C>
where
    I2C: I2c,
{
    /// Construct an uninitialised driver.
    ///
    /// # Arguments
    /// * `i2c` — I2C peripheral (taken by value for exclusive access).
    /// * `address` — 7-bit device address (typically `0x3C` or `0x3D`).
    pub fn new(i2c: I2C, address: u8) -> Self {
        let interface = I2CDisplayInterface::new_custom_address(i2c, address);
        let display = Ssd1306Async::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();

        Self {
            display,
            initialized: false,
            presented: 0,
        }
    }

    /// Initialise the panel. Must succeed before [`present()`](Self::present).
    ///
    /// # Errors
    ///
    /// Returns [`OledError::InitializationFailed`] if the panel does not
    /// respond.
    pub async fn init(&mut self) -> Result<(), OledError> {
        self.display
            .init()
            .await
            .map_err(|_| OledError::InitializationFailed)?;
        self.initialized = true;
        Ok(())
    }

    /// Show `frame` on the panel.
    ///
    /// # Errors
    ///
    /// Returns [`OledError::NotInitialized`] before a successful
    /// [`init()`](Self::init), or [`OledError::Display`] on a bus failure.
    pub async fn present(&mut self, frame: &FrameBuffer) -> Result<(), OledError> {
        if !self.initialized {
            return Err(OledError::NotInitialized);
        }
        self.display.clear_buffer();
        frame.draw(&mut self.display)?;
        self.display.flush().await?;
        self.presented = self.presented.wrapping_add(1);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Frames successfully flushed since construction.
    pub fn presented(&self) -> u32 {
        self.presented
    }
}
