//! The cooperative main loop.

use duoscope::clock::Clock;
use duoscope::input::{InputDecoder, InputSnapshot};
use duoscope::synth::DEFAULT_TABLE_LEN;
use duoscope::trace::{TraceAccumulator, DEFAULT_TRACE_CAPACITY};
use duoscope::transfer::{ChannelId, OutputDriver, OutputStreams};
use duoscope::ui::{StepOutcome, UiMachine};
use duoscope::TransferError;
use duoscope_oled_display_rs::{DisplayConfig, FrameComposer, FrameProducer};

/// Hardware-facing resources handed to [`MainLoop::new()`].
pub struct MainLoopParts<'a, O, C, const N: usize, const M: usize> {
    pub outputs: OutputStreams<O, N>,
    pub producer: FrameProducer<'a>,
    pub trace: &'a TraceAccumulator<M>,
    pub clock: C,
}

/// What one [`MainLoop::run_iteration()`] did.
#[derive(Debug)]
pub struct IterationReport<E> {
    pub ui: StepOutcome,
    /// Result of applying committed parameters; `None` if nothing was
    /// committed this iteration.
    pub applied: Option<Result<(), TransferError<E>>>,
    /// Output channels restarted after a transfer fault.
    pub faults_restarted: u32,
    /// A frame was composed and published (false if the free slot was
    /// still being transmitted).
    pub frame_published: bool,
}

/// Owner of everything the main loop mutates.
///
/// Each [`run_iteration()`](Self::run_iteration) performs, in order:
///
/// 1. decode the control snapshot into UI events;
/// 2. step the UI state machine;
/// 3. on commit, retune both output channels (the only reconfiguration
///    point while running);
/// 4. restart any faulted output transfer;
/// 5. compose the next frame into the free slot.
pub struct MainLoop<
    'a,
    O,
    C,
    const N: usize = DEFAULT_TABLE_LEN,
    const M: usize = DEFAULT_TRACE_CAPACITY,
> {
    ui: UiMachine,
    input: InputDecoder,
    outputs: OutputStreams<O, N>,
    composer: FrameComposer,
    producer: FrameProducer<'a>,
    trace: &'a TraceAccumulator<M>,
    clock: C,
    iterations: u32,
}

impl<'a, O, C, const N: usize, const M: usize> MainLoop<'a, O, C, N, M>
where
    O: OutputDriver,
    C: Clock,
{
    /// Construct with the default UI state. No driver traffic.
    pub fn new(parts: MainLoopParts<'a, O, C, N, M>, display: DisplayConfig) -> Self {
        Self::with_ui(parts, display, UiMachine::default())
    }

    pub fn with_ui(
        parts: MainLoopParts<'a, O, C, N, M>,
        display: DisplayConfig,
        ui: UiMachine,
    ) -> Self {
        Self {
            ui,
            input: InputDecoder::new(),
            outputs: parts.outputs,
            composer: FrameComposer::new(display),
            producer: parts.producer,
            trace: parts.trace,
            clock: parts.clock,
            iterations: 0,
        }
    }

    /// Configure both output channels from the UI's parameters and start
    /// them on one trigger.
    pub fn init(&mut self) -> Result<(), TransferError<O::Error>> {
        for channel in ChannelId::ALL {
            self.outputs.retune(channel, self.ui.parameters(channel))?;
        }
        self.outputs.start()?;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Outputs started at {} Hz / {} Hz",
            self.outputs.rate_hz(ChannelId::Ch1),
            self.outputs.rate_hz(ChannelId::Ch2)
        );
        Ok(())
    }

    /// Run one pass of the loop. Never blocks.
    pub fn run_iteration(&mut self, snapshot: InputSnapshot) -> IterationReport<O::Error> {
        // ── Step 1: controls → events ────────────────────────────────
        let events = self.input.decode(snapshot);
        self.ui.post(events);

        // ── Step 2: UI transition ────────────────────────────────────
        let outcome = self.ui.step(&self.clock);

        // ── Step 3: apply committed parameters ───────────────────────
        let applied = outcome.committed.then(|| self.apply_parameters());

        // ── Step 4: transfer fault recovery ──────────────────────────
        let faults_restarted = self.outputs.service_faults();

        // ── Step 5: compose into the free slot ───────────────────────
        let view = self.ui.view();
        let composer = &self.composer;
        let grid = self.trace.grid();
        let frame_published = self
            .producer
            .compose(|frame| composer.compose(frame, &view, grid));

        self.iterations = self.iterations.wrapping_add(1);

        IterationReport {
            ui: outcome,
            applied,
            faults_restarted,
            frame_published,
        }
    }

    pub fn ui(&self) -> &UiMachine {
        &self.ui
    }

    pub fn outputs(&self) -> &OutputStreams<O, N> {
        &self.outputs
    }

    pub fn outputs_mut(&mut self) -> &mut OutputStreams<O, N> {
        &mut self.outputs
    }

    pub fn producer(&self) -> &FrameProducer<'a> {
        &self.producer
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Retune every channel; the first failure is returned, but the other
    /// channel is still attempted.
    fn apply_parameters(&mut self) -> Result<(), TransferError<O::Error>> {
        let mut result = Ok(());
        for channel in ChannelId::ALL {
            if let Err(e) = self.outputs.retune(channel, self.ui.parameters(channel)) {
                #[cfg(feature = "defmt")]
                defmt::warn!("Retune of {} failed", channel);
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duoscope::clock::ManualClock;
    use duoscope::transfer::{RepeatMode, TransferConfig};
    use duoscope::ui::UiState;
    use duoscope::{ConfigError, OutputTables, Synthesizer};
    use duoscope_oled_display_rs::FrameSlots;

    extern crate std;

    #[derive(Default)]
    struct FakeOutput {
        rates: [Option<u32>; 2],
        bound_len: [usize; 2],
        starts: u32,
        retargets: u32,
        faults: [bool; 2],
    }

    impl OutputDriver for FakeOutput {
        type Error = ();

        fn configure_continuous_output(
            &mut self,
            channel: ChannelId,
            table: &[u16],
            _mode: RepeatMode,
        ) -> Result<(), ()> {
            self.bound_len[channel.index()] = table.len();
            Ok(())
        }

        fn retarget(&mut self, channel: ChannelId, table: &[u16]) -> Result<(), ()> {
            self.bound_len[channel.index()] = table.len();
            self.retargets += 1;
            Ok(())
        }

        fn set_sample_rate(&mut self, channel: ChannelId, rate_hz: u32) -> Result<(), ()> {
            self.rates[channel.index()] = Some(rate_hz);
            Ok(())
        }

        fn pause(&mut self, _channel: ChannelId) {}

        fn resume(&mut self, _channel: ChannelId) {}

        fn start_synchronized(&mut self) -> Result<(), ()> {
            self.starts += 1;
            Ok(())
        }

        fn take_fault(&mut self, channel: ChannelId) -> bool {
            core::mem::take(&mut self.faults[channel.index()])
        }
    }

    fn outputs() -> OutputStreams<FakeOutput> {
        OutputStreams::new(
            FakeOutput::default(),
            std::boxed::Box::leak(std::boxed::Box::new(OutputTables::new())),
            Synthesizer::default(),
            TransferConfig::default(),
        )
    }

    fn select() -> InputSnapshot {
        InputSnapshot {
            select_clicked: true,
            ..InputSnapshot::default()
        }
    }

    fn rotary(position: u16) -> InputSnapshot {
        InputSnapshot {
            rotary_position: position,
            ..InputSnapshot::default()
        }
    }

    #[test]
    fn init_configures_both_channels_then_starts() {
        let trace = TraceAccumulator::<16>::new();
        let mut slots = FrameSlots::new();
        let (producer, _consumer) = slots.split();
        let clock = ManualClock::new();
        let mut main_loop = MainLoop::new(
            MainLoopParts { outputs: outputs(), producer, trace: &trace, clock: &clock },
            DisplayConfig::default(),
        );

        main_loop.init().unwrap();

        let driver = main_loop.outputs().driver();
        assert_eq!(driver.rates, [Some(64_000), Some(64_000)]);
        assert_eq!(driver.bound_len, [64, 64]);
        assert_eq!(driver.starts, 1);
        assert!(main_loop.outputs().is_running());
    }

    #[test]
    fn idle_iteration_publishes_without_committing() {
        let trace = TraceAccumulator::<16>::new();
        let mut slots = FrameSlots::new();
        let (producer, consumer) = slots.split();
        let clock = ManualClock::new();
        let mut main_loop = MainLoop::new(
            MainLoopParts { outputs: outputs(), producer, trace: &trace, clock: &clock },
            DisplayConfig::default(),
        );
        main_loop.init().unwrap();

        let report = main_loop.run_iteration(InputSnapshot::default());

        assert_eq!(report.ui.state, UiState::Browse);
        assert!(!report.ui.committed);
        assert!(report.applied.is_none());
        assert_eq!(report.faults_restarted, 0);
        assert!(report.frame_published);
        assert!(consumer.ready_index().is_some());
        assert_eq!(main_loop.producer().published(), 1);
        assert_eq!(main_loop.iterations(), 1);
    }

    #[test]
    fn values_apply_only_on_commit() {
        let trace = TraceAccumulator::<16>::new();
        let mut slots = FrameSlots::new();
        let (producer, _consumer) = slots.split();
        let clock = ManualClock::new();
        let mut main_loop = MainLoop::new(
            MainLoopParts { outputs: outputs(), producer, trace: &trace, clock: &clock },
            DisplayConfig::default(),
        );
        main_loop.init().unwrap();

        // Enter edit on the CH1 frequency field.
        let report = main_loop.run_iteration(select());
        assert_eq!(report.ui.state, UiState::Edit);

        // One detent raises the value but leaves the output untouched.
        let report = main_loop.run_iteration(rotary(4));
        assert!(report.applied.is_none());
        assert_eq!(main_loop.ui().parameters(ChannelId::Ch1).frequency_khz, 1.5);
        assert_eq!(main_loop.outputs().rate_hz(ChannelId::Ch1), Some(64_000));

        let report = main_loop.run_iteration(InputSnapshot { rotary_position: 4, ..select() });
        assert!(report.ui.committed);
        assert!(matches!(report.applied, Some(Ok(()))));
        assert_eq!(main_loop.outputs().rate_hz(ChannelId::Ch1), Some(96_000));
        assert_eq!(main_loop.outputs().rate_hz(ChannelId::Ch2), Some(64_000));
    }

    #[test]
    fn invalid_parameters_are_reported_not_applied() {
        let trace = TraceAccumulator::<16>::new();
        let mut slots = FrameSlots::new();
        let (producer, _consumer) = slots.split();
        let clock = ManualClock::new();
        let bad = duoscope::ChannelParameters {
            frequency_khz: 9.0,
            ..Default::default()
        };
        let ui = UiMachine::new([Default::default(), bad], Default::default());
        let mut main_loop = MainLoop::with_ui(
            MainLoopParts { outputs: outputs(), producer, trace: &trace, clock: &clock },
            DisplayConfig::default(),
            ui,
        );

        let err = main_loop.init().unwrap_err();
        assert_eq!(err, TransferError::Config(ConfigError::FrequencyOutOfRange));
        assert!(!main_loop.outputs().is_running());
        assert_eq!(main_loop.outputs().driver().starts, 0);
    }

    #[test]
    fn faulted_channel_is_restarted_each_iteration() {
        let trace = TraceAccumulator::<16>::new();
        let mut slots = FrameSlots::new();
        let (producer, _consumer) = slots.split();
        let clock = ManualClock::new();
        let mut main_loop = MainLoop::new(
            MainLoopParts { outputs: outputs(), producer, trace: &trace, clock: &clock },
            DisplayConfig::default(),
        );
        main_loop.init().unwrap();

        main_loop.outputs_mut().driver_mut().faults = [false, true];
        let report = main_loop.run_iteration(InputSnapshot::default());
        assert_eq!(report.faults_restarted, 1);
        assert_eq!(main_loop.outputs().fault_count(), 1);

        let report = main_loop.run_iteration(InputSnapshot::default());
        assert_eq!(report.faults_restarted, 0);
    }
}
