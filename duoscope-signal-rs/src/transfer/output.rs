use super::driver::{ChannelId, OutputDriver, RepeatMode};
use super::TransferConfig;
use crate::channel::ChannelParameters;
use crate::error::{ConfigError, TransferError};
use crate::synth::{Synthesizer, WaveformTable, DEFAULT_TABLE_LEN};

/// Active/scratch table pair of one channel.
struct TableBank<const N: usize> {
    tables: [WaveformTable<N>; 2],
    /// Index of the table currently bound to the transfer.
    active: usize,
    /// Programmed sample rate; `Some` once the channel has been configured.
    rate_hz: Option<u32>,
}

impl<const N: usize> TableBank<N> {
    const fn new() -> Self {
        Self {
            tables: [WaveformTable::new(), WaveformTable::new()],
            active: 0,
            rate_hz: None,
        }
    }

    fn is_bound(&self) -> bool {
        self.rate_hz.is_some()
    }

    fn scratch(&self) -> usize {
        1 - self.active
    }
}

/// Table storage of both output channels.
///
/// The transfer hardware keeps reading a bound table after the call that
/// bound it returns, so the tables live apart from [`OutputStreams`] in
/// storage that is never moved or freed: [`OutputStreams::new()`] takes
/// them as `&'static mut`.
///
/// ```ignore
/// static TABLES: StaticCell<OutputTables> = StaticCell::new();
///
/// let outputs = OutputStreams::new(
///     dac_driver,
///     TABLES.init(OutputTables::new()),
///     Synthesizer::default(),
///     TransferConfig::default(),
/// );
/// ```
pub struct OutputTables<const N: usize = DEFAULT_TABLE_LEN> {
    banks: [TableBank<N>; 2],
}

impl<const N: usize> OutputTables<N> {
    pub const fn new() -> Self {
        Self {
            banks: [TableBank::new(), TableBank::new()],
        }
    }
}

impl<const N: usize> Default for OutputTables<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Owner of both output channels' continuous transfers.
///
/// # Lifecycle
///
/// 1. [`OutputStreams::new()`] — no driver traffic.
/// 2. [`configure()`](Self::configure) or [`retune()`](Self::retune) each
///    channel — binds a table and programs the channel timer.
/// 3. [`start()`](Self::start) — releases both channels on one trigger.
/// 4. [`hot_swap()`](Self::hot_swap) / [`retune()`](Self::retune) — replace a
///    running channel's table without stopping the other.
/// 5. [`service_faults()`](Self::service_faults) — once per main-loop pass.
///
/// The bound tables are borrowed from [`OutputTables`], so the streams
/// themselves may be moved freely.
pub struct OutputStreams<O, const N: usize = DEFAULT_TABLE_LEN> {
    driver: O,
    synth: Synthesizer,
    config: TransferConfig,
    tables: &'static mut OutputTables<N>,
    running: bool,
    fault_count: u32,
    swap_count: u32,
}

impl<O, const N: usize> OutputStreams<O, N>
where
    O: OutputDriver,
{
    /// Construct without touching the driver.
    pub fn new(
        driver: O,
        tables: &'static mut OutputTables<N>,
        synth: Synthesizer,
        config: TransferConfig,
    ) -> Self {
        Self {
            driver,
            synth,
            config,
            tables,
            running: false,
            fault_count: 0,
            swap_count: 0,
        }
    }

    /// Bind a copy of `table` to `channel` at `rate_hz`.
    ///
    /// Safe to call before [`start()`](Self::start) and idempotent: calling
    /// it again with the same arguments leaves the same table bound. On a
    /// running channel this performs a [`hot_swap()`](Self::hot_swap) that
    /// also changes the rate.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroRate`] / [`ConfigError::RateTooHigh`] are returned
    /// before any state changes.
    pub fn configure(
        &mut self,
        channel: ChannelId,
        table: &WaveformTable<N>,
        rate_hz: u32,
    ) -> Result<(), TransferError<O::Error>> {
        self.check_rate(rate_hz)?;

        if self.running && self.tables.banks[channel.index()].is_bound() {
            return self.swap_in(channel, Some(rate_hz), |_, scratch| *scratch = *table);
        }

        let bank = &mut self.tables.banks[channel.index()];
        bank.tables[bank.active] = *table;

        self.driver
            .set_sample_rate(channel, rate_hz)
            .map_err(TransferError::Driver)?;
        self.driver
            .configure_continuous_output(
                channel,
                bank.tables[bank.active].as_slice(),
                RepeatMode::Circular,
            )
            .map_err(TransferError::Driver)?;

        bank.rate_hz = Some(rate_hz);
        Ok(())
    }

    /// Replace the table a configured channel streams, keeping its rate.
    ///
    /// The new codes are copied into the channel's idle table first; the
    /// transfer is then paused, retargeted and resumed. If the driver fails
    /// to retarget, the previous table stays active.
    pub fn hot_swap(
        &mut self,
        channel: ChannelId,
        table: &WaveformTable<N>,
    ) -> Result<(), TransferError<O::Error>> {
        if !self.tables.banks[channel.index()].is_bound() {
            return Err(ConfigError::ChannelNotConfigured.into());
        }
        self.swap_in(channel, None, |_, scratch| *scratch = *table)
    }

    /// Regenerate a channel from its parameters and swap table and rate in
    /// one step.
    ///
    /// Parameters are validated before anything is written. An unconfigured
    /// channel is configured instead.
    pub fn retune(
        &mut self,
        channel: ChannelId,
        params: &ChannelParameters,
    ) -> Result<(), TransferError<O::Error>> {
        params.validate()?;
        let rate_hz = params.output_rate_hz(N);
        self.check_rate(rate_hz)?;

        let bank = &self.tables.banks[channel.index()];
        if !bank.is_bound() {
            let table = self.synth.synthesize_channel(params);
            return self.configure(channel, &table, rate_hz);
        }

        let new_rate = (bank.rate_hz != Some(rate_hz)).then_some(rate_hz);
        self.swap_in(channel, new_rate, |synth, scratch| {
            synth.fill(scratch, params.amplitude_volts, params.phase_degrees)
        })
    }

    /// Release both channels on the shared master trigger.
    pub fn start(&mut self) -> Result<(), TransferError<O::Error>> {
        if !self.tables.banks.iter().all(TableBank::is_bound) {
            return Err(ConfigError::ChannelNotConfigured.into());
        }
        self.driver.start_synchronized().map_err(TransferError::Driver)?;
        self.running = true;
        Ok(())
    }

    /// Restart every channel whose driver reports a transfer fault.
    ///
    /// A faulted channel is restarted from the beginning of its active
    /// table. Returns the number of channels restarted.
    pub fn service_faults(&mut self) -> u32 {
        let mut restarted = 0;
        for channel in ChannelId::ALL {
            if !self.driver.take_fault(channel) {
                continue;
            }
            let bank = &self.tables.banks[channel.index()];
            self.driver.pause(channel);
            if let Err(_e) = self.driver.retarget(channel, bank.tables[bank.active].as_slice()) {
                #[cfg(feature = "defmt")]
                defmt::error!("Output {} restart retarget failed", channel);
            }
            self.driver.resume(channel);

            self.fault_count = self.fault_count.wrapping_add(1);
            restarted += 1;

            #[cfg(feature = "defmt")]
            defmt::warn!(
                "Output {} transfer fault, restarted (total {})",
                channel,
                self.fault_count
            );
        }
        restarted
    }

    /// Table currently streamed by `channel`, or `None` if unconfigured.
    pub fn active_table(&self, channel: ChannelId) -> Option<&WaveformTable<N>> {
        let bank = &self.tables.banks[channel.index()];
        bank.is_bound().then(|| &bank.tables[bank.active])
    }

    /// Programmed sample rate of `channel`, or `None` if unconfigured.
    pub fn rate_hz(&self, channel: ChannelId) -> Option<u32> {
        self.tables.banks[channel.index()].rate_hz
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of transfer faults recovered since construction.
    pub fn fault_count(&self) -> u32 {
        self.fault_count
    }

    /// Number of completed hot-swaps since construction.
    pub fn swap_count(&self) -> u32 {
        self.swap_count
    }

    pub fn synthesizer(&self) -> &Synthesizer {
        &self.synth
    }

    pub fn driver(&self) -> &O {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut O {
        &mut self.driver
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn check_rate(&self, rate_hz: u32) -> Result<(), ConfigError> {
        if rate_hz == 0 {
            return Err(ConfigError::ZeroRate);
        }
        if rate_hz > self.config.max_output_rate_hz {
            return Err(ConfigError::RateTooHigh);
        }
        Ok(())
    }

    /// Fill the idle table, then pause → (rate) → retarget → resume.
    ///
    /// On failure the previous table stays bound and the channel timer is
    /// put back on the rate recorded for it.
    fn swap_in(
        &mut self,
        channel: ChannelId,
        rate_hz: Option<u32>,
        fill: impl FnOnce(&Synthesizer, &mut WaveformTable<N>),
    ) -> Result<(), TransferError<O::Error>> {
        let bank = &mut self.tables.banks[channel.index()];
        let scratch = bank.scratch();
        fill(&self.synth, &mut bank.tables[scratch]);

        self.driver.pause(channel);
        let result = match rate_hz {
            Some(rate) => self.driver.set_sample_rate(channel, rate),
            None => Ok(()),
        };
        let rate_applied = rate_hz.is_some() && result.is_ok();
        let result = result.and_then(|()| {
            self.driver.retarget(channel, bank.tables[scratch].as_slice())
        });

        if result.is_ok() {
            bank.active = scratch;
            if rate_hz.is_some() {
                bank.rate_hz = rate_hz;
            }
            self.swap_count = self.swap_count.wrapping_add(1);
        } else if rate_applied {
            if let Some(previous) = bank.rate_hz {
                if self.driver.set_sample_rate(channel, previous).is_err() {
                    // The timer kept the new rate.
                    bank.rate_hz = rate_hz;
                }
            }
        }
        self.driver.resume(channel);

        result.map_err(|e| {
            #[cfg(feature = "defmt")]
            defmt::warn!("Hot-swap of {} failed, previous table kept", channel);
            TransferError::Driver(e)
        })
    }
}
