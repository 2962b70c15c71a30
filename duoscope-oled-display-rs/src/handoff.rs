//! Display-timer service pushing completed frames to the panel.

use crate::frame::FrameBuffer;
use crate::slots::FrameConsumer;

/// Panel link able to take one frame at a time.
///
/// Implementations start the transfer and return; [`is_busy()`](Self::is_busy)
/// reports whether the previous transfer is still in flight. The pushed
/// frame's slot stays reserved until the transport reports idle.
pub trait FrameTransport {
    type Error;

    fn is_busy(&self) -> bool;

    /// Begin transmitting `frame` (`frame.as_bytes()`, page by page).
    fn push_frame(&mut self, frame: &FrameBuffer) -> Result<(), Self::Error>;
}

/// What one [`DisplayHandoff::service()`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandoffOutcome {
    Pushed,
    /// The transport was still sending the previous frame.
    TransportBusy,
    /// No completed frame was available.
    NothingReady,
    /// The transport rejected the frame.
    Failed,
}

/// Running counts of [`HandoffOutcome`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HandoffStats {
    pub pushed: u32,
    pub busy_skips: u32,
    pub empty_skips: u32,
    pub errors: u32,
}

/// Pushes the latest completed frame whenever the transport is idle.
///
/// Call [`service()`](Self::service) from the display timer. A tick that
/// finds the transport busy or no frame ready is skipped and counted,
/// never waited on.
pub struct DisplayHandoff<T> {
    transport: T,
    stats: HandoffStats,
}

impl<T: FrameTransport> DisplayHandoff<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            stats: HandoffStats::default(),
        }
    }

    pub fn service(&mut self, consumer: &mut FrameConsumer<'_>) -> HandoffOutcome {
        if self.transport.is_busy() {
            self.stats.busy_skips = self.stats.busy_skips.wrapping_add(1);
            return HandoffOutcome::TransportBusy;
        }
        consumer.transfer_complete();

        let transport = &mut self.transport;
        match consumer.push_ready(|frame| transport.push_frame(frame)) {
            None => {
                self.stats.empty_skips = self.stats.empty_skips.wrapping_add(1);
                HandoffOutcome::NothingReady
            }
            Some(Ok(())) => {
                self.stats.pushed = self.stats.pushed.wrapping_add(1);
                HandoffOutcome::Pushed
            }
            Some(Err(_e)) => {
                self.stats.errors = self.stats.errors.wrapping_add(1);
                #[cfg(feature = "defmt")]
                defmt::warn!("Frame push failed ({} so far)", self.stats.errors);
                HandoffOutcome::Failed
            }
        }
    }

    pub fn stats(&self) -> HandoffStats {
        self.stats
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
