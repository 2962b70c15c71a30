//! duoscope-app
//!
//! Wires the signal pipeline and the display crate into the three execution
//! contexts of the instrument:
//!
//! 1. **Main loop** ([`MainLoop`]) — decodes the controls, steps the UI,
//!    retunes the output channels when an edit is committed, recovers
//!    faulted transfers and composes the next frame.
//! 2. **Acquisition timer interrupt** ([`AcquisitionService`]) — lands the
//!    newest input sample pair and adds it to the persistence trace.
//! 3. **Display timer interrupt** ([`DisplayHandoff`]) — pushes the latest
//!    completed frame whenever the panel link is idle.
//!
//! ```text
//!            ┌──────────── TRACE (static) ◄──────── AcquisitionService
//!            ▼                                         (acquisition ISR)
//!   MainLoop ──compose──► FrameSlots ──ready slot──► DisplayHandoff
//!      │                                                (display ISR)
//!      └──retune──► OutputStreams ──► output converter
//! ```
//!
//! # Static storage
//!
//! The trace accumulator is shared by reference with the acquisition
//! interrupt and must live in a `static`. The output tables are read by
//! the transfer hardware for as long as the channels run, so they are
//! placed in a `StaticCell` as well:
//!
//! ```ignore
//! static TRACE: TraceAccumulator = TraceAccumulator::new();
//! static TABLES: StaticCell<OutputTables> = StaticCell::new();
//! static SLOTS: StaticCell<FrameSlots> = StaticCell::new();
//!
//! let outputs = OutputStreams::new(
//!     dac_driver,
//!     TABLES.init(OutputTables::new()),
//!     Synthesizer::default(),
//!     TransferConfig::default(),
//! );
//! let (producer, consumer) = SLOTS.init(FrameSlots::new()).split();
//! let mut main_loop = MainLoop::new(
//!     MainLoopParts { outputs, producer, trace: &TRACE, clock },
//!     DisplayConfig::default(),
//! );
//! main_loop.init()?;
//! loop {
//!     main_loop.run_iteration(read_controls());
//! }
//! ```
//!
//! [`DisplayHandoff`]: duoscope_oled_display_rs::DisplayHandoff

#![no_std]

pub mod acquisition;
pub mod main_loop;

pub use acquisition::AcquisitionService;
pub use main_loop::{IterationReport, MainLoop, MainLoopParts};
