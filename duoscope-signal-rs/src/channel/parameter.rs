use super::field::{Field, StepDirection};
use super::{AMPLITUDE_BOUNDS, FREQUENCY_BOUNDS, PHASE_BOUNDS};
use crate::error::ConfigError;

/// Tolerance used when comparing stepped float values against their bounds.
const FLOAT_TOLERANCE: f32 = 1e-4;

/// Inclusive range and edit step of one field.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bounds<T> {
    /// Minimum allowed value (inclusive).
    pub min: T,
    /// Maximum allowed value (inclusive).
    pub max: T,
    /// Amount a single add/sub edit moves the value.
    pub step: T,
}

impl Bounds<f32> {
    /// Returns `true` if `value` lies within `[min, max]` (NaN never does).
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min - FLOAT_TOLERANCE && value <= self.max + FLOAT_TOLERANCE
    }

    /// Move `value` by one step, saturating at the bound.
    ///
    /// The result is snapped onto the `min + k * step` grid so repeated
    /// edits do not accumulate rounding error.
    pub fn step_value(&self, value: f32, direction: StepDirection) -> f32 {
        let candidate = match direction {
            StepDirection::Add => value + self.step,
            StepDirection::Sub => value - self.step,
        };
        if candidate > self.max + FLOAT_TOLERANCE {
            return self.max;
        }
        if candidate < self.min - FLOAT_TOLERANCE {
            return self.min;
        }
        let steps = libm::roundf((candidate - self.min) / self.step);
        (self.min + steps * self.step).clamp(self.min, self.max)
    }
}

impl Bounds<u16> {
    pub fn contains(&self, value: u16) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Move `value` by one step, saturating at the bound.
    pub fn step_value(&self, value: u16, direction: StepDirection) -> u16 {
        match direction {
            StepDirection::Add => value.saturating_add(self.step).min(self.max),
            StepDirection::Sub => value.saturating_sub(self.step).max(self.min),
        }
    }
}

/// Settings of one output channel.
///
/// Amplitude and phase shape the waveform table; frequency sets the rate at
/// which the table is streamed (see [`output_rate_hz()`](Self::output_rate_hz)).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelParameters {
    /// Output frequency in kHz, within [`FREQUENCY_BOUNDS`](super::FREQUENCY_BOUNDS).
    pub frequency_khz: f32,
    /// Peak-to-peak amplitude in volts, within [`AMPLITUDE_BOUNDS`](super::AMPLITUDE_BOUNDS).
    pub amplitude_volts: f32,
    /// Phase offset in degrees, within [`PHASE_BOUNDS`](super::PHASE_BOUNDS).
    pub phase_degrees: u16,
}

impl Default for ChannelParameters {
    fn default() -> Self {
        Self {
            frequency_khz: 1.0,
            amplitude_volts: 3.3,
            phase_degrees: 0,
        }
    }
}

impl ChannelParameters {
    /// Check every field against its bounds.
    ///
    /// Invalid parameters are rejected at the call site and never applied.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !FREQUENCY_BOUNDS.contains(self.frequency_khz) {
            return Err(ConfigError::FrequencyOutOfRange);
        }
        if !AMPLITUDE_BOUNDS.contains(self.amplitude_volts) {
            return Err(ConfigError::AmplitudeOutOfRange);
        }
        if !PHASE_BOUNDS.contains(self.phase_degrees) {
            return Err(ConfigError::PhaseOutOfRange);
        }
        Ok(())
    }

    /// Apply one add/sub edit to `field`, saturating at its bound.
    ///
    /// # Examples
    ///
    /// ```
    /// use duoscope::channel::{ChannelParameters, Field, StepDirection};
    ///
    /// let mut params = ChannelParameters::default();
    /// params.step_field(Field::Phase, StepDirection::Add);
    /// assert_eq!(params.phase_degrees, 15);
    ///
    /// // Amplitude starts at its maximum, so adding saturates.
    /// params.step_field(Field::Amplitude, StepDirection::Add);
    /// assert_eq!(params.amplitude_volts, 3.3);
    /// ```
    pub fn step_field(&mut self, field: Field, direction: StepDirection) {
        match field {
            Field::Frequency => {
                self.frequency_khz = FREQUENCY_BOUNDS.step_value(self.frequency_khz, direction);
            }
            Field::Amplitude => {
                self.amplitude_volts = AMPLITUDE_BOUNDS.step_value(self.amplitude_volts, direction);
            }
            Field::Phase => {
                self.phase_degrees = PHASE_BOUNDS.step_value(self.phase_degrees, direction);
            }
        }
    }

    /// Sample rate that plays one `table_len`-sample cycle at the channel
    /// frequency.
    pub fn output_rate_hz(&self, table_len: usize) -> u32 {
        libm::roundf(self.frequency_khz * 1000.0 * table_len as f32) as u32
    }
}
