//! Error types for the signal pipeline.

use core::fmt;

/// Invalid configuration, rejected at the call site.
///
/// A call that returns one of these leaves the previous configuration
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A sample or output rate of zero was requested.
    ZeroRate,
    /// The requested output rate exceeds the converter's limit.
    RateTooHigh,
    /// Frequency outside `[1.0, 6.0]` kHz.
    FrequencyOutOfRange,
    /// Amplitude outside `[1.5, 3.3]` V.
    AmplitudeOutOfRange,
    /// Phase outside `[0, 180]` degrees.
    PhaseOutOfRange,
    /// An operation needed a channel that has not been configured yet.
    ChannelNotConfigured,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::ZeroRate => write!(f, "rate must be non-zero"),
            ConfigError::RateTooHigh => write!(f, "rate exceeds converter limit"),
            ConfigError::FrequencyOutOfRange => write!(f, "frequency out of range"),
            ConfigError::AmplitudeOutOfRange => write!(f, "amplitude out of range"),
            ConfigError::PhaseOutOfRange => write!(f, "phase out of range"),
            ConfigError::ChannelNotConfigured => write!(f, "channel not configured"),
        }
    }
}

/// Errors returned by the transfer controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferError<E> {
    /// The request was rejected before touching hardware.
    Config(ConfigError),
    /// The driver collaborator reported a failure.
    Driver(E),
}

// Allow `?` on validation results inside controller methods.
impl<E> From<ConfigError> for TransferError<E> {
    fn from(error: ConfigError) -> Self {
        TransferError::Config(error)
    }
}

impl<E: fmt::Debug> fmt::Display for TransferError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransferError::Config(e) => write!(f, "configuration rejected: {}", e),
            TransferError::Driver(e) => write!(f, "driver error: {:?}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for TransferError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            TransferError::Config(e) => defmt::write!(f, "Configuration rejected: {}", e),
            TransferError::Driver(e) => defmt::write!(f, "Driver error: {}", e),
        }
    }
}
