//! Collaborator interfaces for the conversion hardware.
//!
//! The controller never touches registers. Hardware backends implement
//! these traits; tests implement them with recording doubles. Every call is
//! treated as triggering work, never as waiting for it.

/// One of the two output channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelId {
    Ch1,
    Ch2,
}

impl ChannelId {
    pub const ALL: [ChannelId; 2] = [ChannelId::Ch1, ChannelId::Ch2];

    pub const fn index(self) -> usize {
        match self {
            ChannelId::Ch1 => 0,
            ChannelId::Ch2 => 1,
        }
    }
}

/// How a bound table is replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RepeatMode {
    /// Wrap to the first sample after the last, forever.
    Circular,
    /// Stop after the last sample.
    Once,
}

/// One simultaneous reading of both analog inputs, in raw converter codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SamplePair {
    pub a: u16,
    pub b: u16,
}

/// Output channel driver: timer-triggered transfers from a table to a
/// converter channel.
///
/// A table passed to [`configure_continuous_output()`](Self::configure_continuous_output)
/// or [`retarget()`](Self::retarget) stays bound until the next retarget of
/// that channel. The controller guarantees a bound table is neither moved
/// nor written while bound, so implementations may keep its address.
pub trait OutputDriver {
    type Error;

    /// Bind `table` to `channel` and arm the transfer. Does not start it.
    fn configure_continuous_output(
        &mut self,
        channel: ChannelId,
        table: &[u16],
        mode: RepeatMode,
    ) -> Result<(), Self::Error>;

    /// Point the channel's transfer at a new table (base and length).
    fn retarget(&mut self, channel: ChannelId, table: &[u16]) -> Result<(), Self::Error>;

    /// Program the channel's sample-rate timer.
    fn set_sample_rate(&mut self, channel: ChannelId, rate_hz: u32) -> Result<(), Self::Error>;

    /// Stop the channel's transfer engine without touching the converter.
    fn pause(&mut self, channel: ChannelId);

    /// Re-enable the channel's transfer engine from the start of its table.
    fn resume(&mut self, channel: ChannelId);

    /// Release both channel timers on one master trigger.
    fn start_synchronized(&mut self) -> Result<(), Self::Error>;

    /// Returns and clears the channel's overrun/transfer-error flag.
    fn take_fault(&mut self, channel: ChannelId) -> bool;
}

/// Acquisition driver: timer-triggered conversions of both analog inputs.
pub trait AcquisitionDriver {
    type Error;

    /// Start sampling both inputs at `sample_rate_hz`.
    fn configure_continuous_input(&mut self, sample_rate_hz: u32) -> Result<(), Self::Error>;

    /// Most recent completed sample pair.
    fn latest(&mut self) -> SamplePair;

    /// Returns and clears the overrun/transfer-error flag.
    fn take_fault(&mut self) -> bool;

    /// Restart the acquisition transfer from the beginning.
    fn restart(&mut self);
}
