//! Platform-specific vibrator backends.

/// Android platform implementation.
#[cfg(target_os = "android")]
pub mod android;

use crate::{Amplitude, HapticBackend, HapticError, Waveform};
use std::time::Duration;

/// Backend for devices without a vibration motor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

impl HapticBackend for Unsupported {
    fn has_vibrator(&self) -> bool {
        false
    }

    fn has_amplitude_control(&self) -> bool {
        false
    }

    fn vibrate_once(&self, _duration: Duration, _amplitude: Amplitude) -> Result<(), HapticError> {
        Err(HapticError::NotSupported)
    }

    fn vibrate_waveform(&self, _waveform: &Waveform) -> Result<(), HapticError> {
        Err(HapticError::NotSupported)
    }

    fn cancel(&self) -> Result<(), HapticError> {
        Err(HapticError::NotSupported)
    }
}
