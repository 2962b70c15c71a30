use super::driver::{AcquisitionDriver, SamplePair};
use crate::error::{ConfigError, TransferError};

/// Acquisition side of the transfer controller.
///
/// Owned by the acquisition timer interrupt. Each [`tick()`](Self::tick)
/// recovers a faulted transfer if needed and copies the newest sample pair
/// into the landing buffer, which the interrupt then forwards to the trace.
pub struct AcquisitionStream<A> {
    driver: A,
    landing: SamplePair,
    rate_hz: Option<u32>,
    fault_count: u32,
}

impl<A> AcquisitionStream<A>
where
    A: AcquisitionDriver,
{
    pub const fn new(driver: A) -> Self {
        Self {
            driver,
            landing: SamplePair { a: 0, b: 0 },
            rate_hz: None,
            fault_count: 0,
        }
    }

    /// Start sampling both inputs at `sample_rate_hz`.
    pub fn configure(&mut self, sample_rate_hz: u32) -> Result<(), TransferError<A::Error>> {
        if sample_rate_hz == 0 {
            return Err(ConfigError::ZeroRate.into());
        }
        self.driver
            .configure_continuous_input(sample_rate_hz)
            .map_err(TransferError::Driver)?;
        self.rate_hz = Some(sample_rate_hz);
        Ok(())
    }

    /// Service one acquisition timer period and return the landed pair.
    pub fn tick(&mut self) -> SamplePair {
        if self.driver.take_fault() {
            self.driver.restart();
            self.fault_count = self.fault_count.wrapping_add(1);

            #[cfg(feature = "defmt")]
            defmt::warn!("Acquisition transfer fault, restarted (total {})", self.fault_count);
        }
        self.landing = self.driver.latest();
        self.landing
    }

    /// Last pair copied by [`tick()`](Self::tick).
    pub fn landing(&self) -> SamplePair {
        self.landing
    }

    pub fn rate_hz(&self) -> Option<u32> {
        self.rate_hz
    }

    pub fn fault_count(&self) -> u32 {
        self.fault_count
    }

    pub fn driver_mut(&mut self) -> &mut A {
        &mut self.driver
    }
}
