//! Control core of a dual-channel signal generator and XY oscilloscope.
//!
//! Everything here is hardware-independent: converters, timers and
//! transfer engines sit behind the driver traits in [`transfer`], so the
//! whole pipeline runs (and is tested) on the host.
//!
//! ```text
//!  controls ──► input ──► ui ──commit──► synth ──► transfer (2 × output)
//!                          │                              │
//!                          ▼                              ▼  analog loop-back
//!                     frame composer ◄──── trace ◄── transfer (acquisition)
//! ```
//!
//! - [`channel`] — per-channel parameters and the six editable fields.
//! - [`synth`] — sine table synthesis.
//! - [`transfer`] — continuous output streams with hot-swap, and the
//!   acquisition stream.
//! - [`trace`] — persistence ring and hit grid shared with the acquisition
//!   interrupt.
//! - [`ui`] — state machine, selection animation.
//! - [`input`] — rotary/key decoding into UI events.
//! - [`clock`] — monotonic time and soft timers.
//!
//! # Crate Features
//!
//! - **`defmt`** — structured logging via [`defmt`](https://docs.rs/defmt).
//! - **`embassy-time`** — [`clock::EmbassyClock`] backed by the embassy
//!   time driver.

#![no_std]

pub mod channel;
pub mod clock;
pub mod error;
pub mod input;
pub mod synth;
pub mod trace;
pub mod transfer;
pub mod ui;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use channel::{ChannelParameters, FieldIndex};
pub use error::{ConfigError, TransferError};
pub use synth::{SynthConfig, Synthesizer, WaveformTable};
pub use trace::{TraceAccumulator, TraceMapping, TracePoint};
pub use transfer::{ChannelId, OutputStreams, OutputTables, SamplePair, TransferConfig};
