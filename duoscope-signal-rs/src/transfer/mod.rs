//! Continuous transfer controller.
//!
//! Two output channels stream their current [`WaveformTable`] to the
//! converter from autonomous, timer-triggered transfers, and an acquisition
//! transfer samples both analog inputs at an independent fixed rate.
//!
//! The controller is split into two owned handles so each execution context
//! owns exactly what it mutates:
//!
//! - [`OutputStreams`] — owned by the main loop. Binds, hot-swaps and
//!   restarts the output tables.
//! - [`AcquisitionStream`] — owned by the acquisition timer interrupt.
//!   Copies the newest sample pair into its landing buffer once per tick.
//!
//! # Timer topology
//!
//! Each output channel has its own sample-rate timer (the channel frequency
//! is realised as `frequency × table length` samples per second). Both
//! channel timers are cascaded from one master enable, so
//! [`OutputStreams::start()`] releases them on the same trigger edge. The
//! acquisition timer is independent of both.
//!
//! # Hot-swap
//!
//! A table bound to a running transfer is never written. Each channel owns
//! two tables: new codes are generated into the idle one, then the transfer
//! is paused, retargeted and resumed, and the two swap roles.
//!
//! [`WaveformTable`]: crate::synth::WaveformTable

mod acquisition;
mod driver;
mod output;

pub use acquisition::AcquisitionStream;
pub use driver::{AcquisitionDriver, ChannelId, OutputDriver, RepeatMode, SamplePair};
pub use output::{OutputStreams, OutputTables};

/// Rates and limits of the transfer hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferConfig {
    /// Acquisition sample rate in Hz. Default: 500.
    pub acquisition_rate_hz: u32,
    /// Highest per-channel output sample rate the converter sustains.
    /// Default: 1 MHz.
    pub max_output_rate_hz: u32,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            acquisition_rate_hz: 500,
            max_output_rate_hz: 1_000_000,
        }
    }
}
