//! Sine waveform table synthesis.
//!
//! [`Synthesizer`] turns an amplitude and a phase into one full sine cycle
//! of quantized converter codes. It is a pure function of its inputs: the
//! same arguments always produce a byte-identical [`WaveformTable`], so it
//! is tested entirely off-target.

use core::f32::consts::PI;
use core::ops::Deref;

use crate::channel::ChannelParameters;

/// Default number of samples in one waveform cycle.
pub const DEFAULT_TABLE_LEN: usize = 64;

/// Converter configuration used to scale volts into codes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SynthConfig {
    /// Largest code the output converter accepts. Default: 4095 (12-bit).
    pub code_max: u16,
    /// Voltage produced by `code_max`. Default: 3.3.
    pub full_scale_volts: f32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            code_max: 4095,
            full_scale_volts: 3.3,
        }
    }
}

/// One cycle of output codes, `N` samples long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveformTable<const N: usize> {
    codes: [u16; N],
}

impl<const N: usize> WaveformTable<N> {
    const NON_EMPTY: () = assert!(N > 0, "waveform table length must be non-zero");

    /// An all-zero table.
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_EMPTY;
        Self { codes: [0; N] }
    }

    /// Build a table from raw codes.
    pub const fn from_codes(codes: [u16; N]) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_EMPTY;
        Self { codes }
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.codes
    }

    pub(crate) fn codes_mut(&mut self) -> &mut [u16; N] {
        &mut self.codes
    }
}

impl<const N: usize> Default for WaveformTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Deref for WaveformTable<N> {
    type Target = [u16];

    fn deref(&self) -> &[u16] {
        &self.codes
    }
}

/// Sine table generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Synthesizer {
    config: SynthConfig,
}

impl Synthesizer {
    pub const fn new(config: SynthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Regenerate `table` in place.
    ///
    /// Sample `i` is `(sin(2π·i/N + phase) + 1) · (amplitude / full_scale)
    /// · code_max / 2`, clamped to `[0, code_max]` and truncated.
    pub fn fill<const N: usize>(
        &self,
        table: &mut WaveformTable<N>,
        amplitude_volts: f32,
        phase_degrees: u16,
    ) {
        let phase_rad = phase_degrees as f32 * PI / 180.0;
        let code_max = self.config.code_max as f32;
        let scale = (amplitude_volts / self.config.full_scale_volts) * code_max / 2.0;

        for (i, code) in table.codes_mut().iter_mut().enumerate() {
            let angle = 2.0 * PI * i as f32 / N as f32 + phase_rad;
            let scaled = (libm::sinf(angle) + 1.0) * scale;
            *code = scaled.clamp(0.0, code_max) as u16;
        }
    }

    /// Generate a new table.
    ///
    /// # Examples
    ///
    /// ```
    /// use duoscope::synth::{Synthesizer, WaveformTable};
    ///
    /// let synth = Synthesizer::default();
    /// let table: WaveformTable<64> = synth.synthesize(3.3, 0);
    ///
    /// // Angle 0 sits at mid-scale, a quarter cycle later at full scale.
    /// assert!((table[0] as i32 - 2047).abs() <= 1);
    /// assert!(table[16] >= 4094);
    /// ```
    pub fn synthesize<const N: usize>(
        &self,
        amplitude_volts: f32,
        phase_degrees: u16,
    ) -> WaveformTable<N> {
        let mut table = WaveformTable::new();
        self.fill(&mut table, amplitude_volts, phase_degrees);
        table
    }

    /// Generate the table for a channel's amplitude and phase.
    pub fn synthesize_channel<const N: usize>(
        &self,
        params: &ChannelParameters,
    ) -> WaveformTable<N> {
        self.synthesize(params.amplitude_volts, params.phase_degrees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{AMPLITUDE_BOUNDS, PHASE_BOUNDS};

    const CODE_MAX: u16 = 4095;

    #[test]
    fn quarter_points_of_full_amplitude_cycle() {
        let table: WaveformTable<64> = Synthesizer::default().synthesize(3.3, 0);
        assert!((table[0] as i32 - (CODE_MAX / 2) as i32).abs() <= 1);
        assert!(table[16] >= CODE_MAX - 1);
        assert!((table[32] as i32 - (CODE_MAX / 2) as i32).abs() <= 1);
        assert!(table[48] <= 1);
    }

    #[test]
    fn every_code_in_range_for_all_valid_settings() {
        let synth = Synthesizer::default();
        let mut amplitude = AMPLITUDE_BOUNDS.min;
        while amplitude <= AMPLITUDE_BOUNDS.max + 1e-4 {
            let mut phase = PHASE_BOUNDS.min;
            while phase <= PHASE_BOUNDS.max {
                let table: WaveformTable<64> = synth.synthesize(amplitude, phase);
                assert!(table.iter().all(|&c| c <= CODE_MAX));
                phase += PHASE_BOUNDS.step;
            }
            amplitude += AMPLITUDE_BOUNDS.step;
        }
    }

    #[test]
    fn over_range_amplitude_clamps_instead_of_overflowing() {
        let table: WaveformTable<32> = Synthesizer::default().synthesize(10.0, 0);
        assert_eq!(table.iter().copied().max(), Some(CODE_MAX));
        let table: WaveformTable<32> = Synthesizer::default().synthesize(-3.3, 0);
        assert_eq!(table.iter().copied().max(), Some(0));
    }

    #[test]
    fn synthesis_is_deterministic() {
        let synth = Synthesizer::default();
        let a: WaveformTable<128> = synth.synthesize(2.1, 45);
        let b: WaveformTable<128> = synth.synthesize(2.1, 45);
        assert_eq!(a, b);
    }

    #[test]
    fn phase_shifts_the_cycle() {
        let table: WaveformTable<64> = Synthesizer::default().synthesize(3.3, 90);
        assert!(table[0] >= CODE_MAX - 1);
    }

    #[test]
    fn lower_amplitude_scales_peak() {
        let table: WaveformTable<64> = Synthesizer::default().synthesize(1.65, 0);
        let peak = table.iter().copied().max().unwrap();
        assert!((peak as i32 - 2047).abs() <= 1);
    }

    #[test]
    fn fill_matches_synthesize() {
        let synth = Synthesizer::default();
        let params = ChannelParameters {
            amplitude_volts: 2.4,
            phase_degrees: 30,
            ..ChannelParameters::default()
        };
        let mut table = WaveformTable::<64>::new();
        synth.fill(&mut table, params.amplitude_volts, params.phase_degrees);
        assert_eq!(table, synth.synthesize_channel::<64>(&params));
    }
}
