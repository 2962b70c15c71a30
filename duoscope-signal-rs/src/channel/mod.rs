//! Output channel parameters and the six editable fields.
//!
//! This module provides [`ChannelParameters`], the per-channel settings
//! consumed by the waveform synthesizer and the transfer controller, and
//! [`FieldIndex`], the selection cursor the UI moves over them.
//!
//! # Layout
//!
//! The six fields are arranged as a 3 × 2 grid on the display, one column
//! per channel. [`FieldIndex`] enumerates them row-major, matching the
//! order the selection cursor walks:
//!
//! ```text
//!              CH1            CH2
//! Frequency  [0] 1.0kHz     [1] 1.0kHz
//! Amplitude  [2] 3.3V       [3] 3.3V
//! Phase      [4] 0deg       [5] 0deg
//! ```
//!
//! # Edit rules
//!
//! Every field has an inclusive `[min, max]` range and a step (see
//! [`FREQUENCY_BOUNDS`], [`AMPLITUDE_BOUNDS`], [`PHASE_BOUNDS`]). Add and
//! subtract move the value by exactly one step and **saturate** at the
//! bound instead of wrapping.

mod field;
mod parameter;

pub use field::{Field, FieldIndex, StepDirection};
pub use parameter::{Bounds, ChannelParameters};

/// Number of output channels.
pub const CHANNEL_COUNT: usize = 2;

/// Number of editable fields across both channels.
pub const FIELD_COUNT: usize = CHANNEL_COUNT * 3;

/// Frequency range in kHz: `[1.0, 6.0]`, step 0.5.
pub const FREQUENCY_BOUNDS: Bounds<f32> = Bounds {
    min: 1.0,
    max: 6.0,
    step: 0.5,
};

/// Amplitude range in volts: `[1.5, 3.3]`, step 0.3.
pub const AMPLITUDE_BOUNDS: Bounds<f32> = Bounds {
    min: 1.5,
    max: 3.3,
    step: 0.3,
};

/// Phase range in degrees: `[0, 180]`, step 15.
pub const PHASE_BOUNDS: Bounds<u16> = Bounds {
    min: 0,
    max: 180,
    step: 15,
};

/// Short label for each field row, used by the display background.
pub const FIELD_LABELS: [&str; 3] = ["FRQ", "AMP", "PHS"];

/// Column header for each channel.
pub const CHANNEL_NAMES: [&str; CHANNEL_COUNT] = ["CH1", "CH2"];
