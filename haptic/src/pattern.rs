//! Vibration requests and the waveforms sent to the motor.

use crate::HapticError;
use std::time::Duration;

/// Duration of a one-shot vibration when none is given.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(400);

/// Raw amplitude value meaning "the device's default strength".
///
/// Matches Android's `VibrationEffect.DEFAULT_AMPLITUDE`.
pub const DEFAULT_AMPLITUDE: i32 = -1;

/// Vibration strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Amplitude {
    /// The device's default strength.
    #[default]
    Default,
    /// An explicit strength; `255` is the strongest.
    Level(u8),
}

impl Amplitude {
    /// Parse a raw amplitude: [`DEFAULT_AMPLITUDE`] or `0..=255`.
    ///
    /// # Errors
    /// Returns [`HapticError::InvalidPattern`] for any other value.
    pub fn from_raw(raw: i32) -> Result<Self, HapticError> {
        if raw == DEFAULT_AMPLITUDE {
            return Ok(Self::Default);
        }
        u8::try_from(raw)
            .map(Self::Level)
            .map_err(|_| HapticError::InvalidPattern(format!("amplitude {raw} out of range")))
    }

    /// The raw value platforms expect.
    #[must_use]
    pub fn raw(self) -> i32 {
        match self {
            Self::Default => DEFAULT_AMPLITUDE,
            Self::Level(level) => i32::from(level),
        }
    }
}

/// A sequence of alternating off/on segments.
///
/// The first timing is a pause before the motor starts, the second how long
/// it runs, and so on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VibrationPattern {
    timings: Vec<Duration>,
    amplitude: Amplitude,
    repeat: Option<usize>,
}

impl VibrationPattern {
    /// Create a non-repeating pattern at the default amplitude.
    #[must_use]
    pub fn new(timings: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            timings: timings.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Create a pattern from millisecond timings.
    #[must_use]
    pub fn from_millis(timings: impl IntoIterator<Item = u64>) -> Self {
        Self::new(timings.into_iter().map(Duration::from_millis))
    }

    /// Set the strength of the "on" segments.
    #[must_use]
    pub const fn amplitude(mut self, amplitude: Amplitude) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Loop from segment `index` once the pattern ends.
    ///
    /// # Errors
    /// Returns [`HapticError::InvalidPattern`] if `index` is outside the
    /// pattern.
    pub fn repeat_from(mut self, index: usize) -> Result<Self, HapticError> {
        if index >= self.timings.len() {
            return Err(HapticError::InvalidPattern(format!(
                "repeat index {index} outside pattern of {} segments",
                self.timings.len()
            )));
        }
        self.repeat = Some(index);
        Ok(self)
    }

    /// Apply a raw repeat index: `-1` for none, otherwise a segment index.
    ///
    /// # Errors
    /// Returns [`HapticError::InvalidPattern`] for a negative index other than
    /// `-1` or one outside the pattern.
    pub fn repeat_raw(self, repeat: i32) -> Result<Self, HapticError> {
        if repeat == -1 {
            return Ok(Self {
                repeat: None,
                ..self
            });
        }
        let index = usize::try_from(repeat)
            .map_err(|_| HapticError::InvalidPattern(format!("repeat index {repeat}")))?;
        self.repeat_from(index)
    }

    /// Segment timings.
    #[must_use]
    pub fn timings(&self) -> &[Duration] {
        &self.timings
    }

    /// Requested strength.
    #[must_use]
    pub const fn strength(&self) -> Amplitude {
        self.amplitude
    }

    /// Segment to loop from, if any.
    #[must_use]
    pub const fn repeat(&self) -> Option<usize> {
        self.repeat
    }

    /// Build the waveform for a motor with or without amplitude control.
    ///
    /// With amplitude control, "off" segments (even indices) get amplitude 0
    /// and "on" segments the requested strength.
    #[must_use]
    pub fn waveform(&self, amplitude_control: bool) -> Waveform {
        let amplitudes = amplitude_control.then(|| {
            (0..self.timings.len())
                .map(|index| if index % 2 == 0 { 0 } else { self.amplitude.raw() })
                .collect()
        });
        Waveform {
            timings: self.timings.clone(),
            amplitudes,
            repeat: self.repeat,
        }
    }
}

/// A pattern ready to hand to the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waveform {
    /// Segment timings.
    pub timings: Vec<Duration>,
    /// Per-segment raw amplitudes, present when the motor supports them.
    pub amplitudes: Option<Vec<i32>>,
    /// Segment to loop from, if any.
    pub repeat: Option<usize>,
}

impl Waveform {
    /// Timings in whole milliseconds, saturating.
    #[must_use]
    pub fn timings_millis(&self) -> Vec<i64> {
        self.timings
            .iter()
            .map(|timing| i64::try_from(timing.as_millis()).unwrap_or(i64::MAX))
            .collect()
    }

    /// Repeat index in the platform's convention, `-1` meaning none.
    #[must_use]
    pub fn repeat_raw(&self) -> i32 {
        self.repeat
            .and_then(|index| i32::try_from(index).ok())
            .unwrap_or(-1)
    }
}

/// A complete vibration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VibrationSpec {
    /// A single vibration at the default amplitude.
    OneShot(Duration),
    /// A timed pattern.
    Pattern(VibrationPattern),
}

impl Default for VibrationSpec {
    fn default() -> Self {
        Self::OneShot(DEFAULT_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amplitudes_alternate_starting_with_off() {
        let pattern = VibrationPattern::from_millis([0, 100, 50, 200, 50])
            .amplitude(Amplitude::Level(180));
        let waveform = pattern.waveform(true);
        assert_eq!(waveform.amplitudes, Some(vec![0, 180, 0, 180, 0]));
        assert_eq!(waveform.timings_millis(), vec![0, 100, 50, 200, 50]);
    }

    #[test]
    fn default_amplitude_is_passed_through() {
        let waveform = VibrationPattern::from_millis([10, 20]).waveform(true);
        assert_eq!(waveform.amplitudes, Some(vec![0, DEFAULT_AMPLITUDE]));
    }

    #[test]
    fn no_amplitudes_without_control() {
        let waveform = VibrationPattern::from_millis([10, 20]).waveform(false);
        assert_eq!(waveform.amplitudes, None);
        assert_eq!(waveform.repeat_raw(), -1);
    }

    #[test]
    fn raw_repeat() {
        let pattern = VibrationPattern::from_millis([10, 20, 30]);
        assert_eq!(pattern.clone().repeat_raw(-1).unwrap().repeat(), None);
        assert_eq!(pattern.clone().repeat_raw(1).unwrap().repeat(), Some(1));
        assert!(pattern.clone().repeat_raw(3).is_err());
        assert!(pattern.repeat_raw(-2).is_err());
    }

    #[test]
    fn raw_amplitude() {
        assert_eq!(Amplitude::from_raw(-1), Ok(Amplitude::Default));
        assert_eq!(Amplitude::from_raw(255), Ok(Amplitude::Level(255)));
        assert!(Amplitude::from_raw(256).is_err());
        assert!(Amplitude::from_raw(-5).is_err());
    }

    #[test]
    fn default_spec_is_400ms() {
        assert_eq!(
            VibrationSpec::default(),
            VibrationSpec::OneShot(Duration::from_millis(400))
        );
    }
}
