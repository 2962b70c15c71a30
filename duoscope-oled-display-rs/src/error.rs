//! Error types for the OLED panel.

use core::fmt;

use display_interface::DisplayError;

/// Errors from the SSD1306 panel.
///
/// The `ssd1306` crate folds every I2C bus failure into [`DisplayError`],
/// so this enum is non-generic.
#[derive(Debug)]
pub enum OledError {
    /// Display interface error (I2C and other bus-level failures).
    Display(DisplayError),
    /// The panel did not accept the initialisation sequence.
    InitializationFailed,
    /// A frame was presented before [`OledDriver::init()`](crate::OledDriver::init)
    /// succeeded.
    NotInitialized,
}

impl From<DisplayError> for OledError {
    fn from(e: DisplayError) -> Self {
        OledError::Display(e)
    }
}

impl fmt::Display for OledError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OledError::Display(e) => write!(f, "display interface error: {:?}", e),
            OledError::InitializationFailed => write!(f, "panel initialisation failed"),
            OledError::NotInitialized => write!(f, "panel not initialised"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for OledError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            OledError::Display(_e) => defmt::write!(f, "Display interface error"),
            OledError::InitializationFailed => defmt::write!(f, "Panel initialisation failed"),
            OledError::NotInitialized => defmt::write!(f, "Panel not initialised"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_error_converts() {
        let err: OledError = DisplayError::BusWriteError.into();
        assert!(matches!(err, OledError::Display(DisplayError::BusWriteError)));
    }
}
