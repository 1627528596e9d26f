//! One-shot and pattern vibration.
//!
//! The motor is reached through [`HapticBackend`]; [`sys::android`] provides
//! the Android `Vibrator` implementation and [`sys::Unsupported`] stands in on
//! platforms without a motor.

#![warn(missing_docs)]

mod pattern;
/// Platform-specific implementations.
pub mod sys;

pub use pattern::{
    Amplitude, DEFAULT_AMPLITUDE, DEFAULT_DURATION, VibrationPattern, VibrationSpec, Waveform,
};

use log::debug;
use std::sync::Arc;
use std::time::Duration;

/// Errors that can occur when driving the vibration motor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HapticError {
    /// The device has no vibration motor.
    #[error("device doesn't have vibrator")]
    NoVibrator,
    /// The pattern or amplitude would be rejected by the platform.
    #[error("invalid vibration pattern: {0}")]
    InvalidPattern(String),
    /// Vibration is not supported on this platform.
    #[error("vibration not supported")]
    NotSupported,
    /// The platform vibrator service failed.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Access to the platform's vibration motor.
pub trait HapticBackend: Send + Sync {
    /// Whether the device has a vibration motor.
    fn has_vibrator(&self) -> bool;

    /// Whether the motor supports explicit amplitudes.
    fn has_amplitude_control(&self) -> bool;

    /// Vibrate once for `duration`.
    ///
    /// # Errors
    /// Returns a [`HapticError`] if the platform call fails.
    fn vibrate_once(&self, duration: Duration, amplitude: Amplitude) -> Result<(), HapticError>;

    /// Play `waveform`.
    ///
    /// # Errors
    /// Returns a [`HapticError`] if the platform call fails.
    fn vibrate_waveform(&self, waveform: &Waveform) -> Result<(), HapticError>;

    /// Stop any ongoing vibration.
    ///
    /// # Errors
    /// Returns a [`HapticError`] if the platform call fails.
    fn cancel(&self) -> Result<(), HapticError>;
}

impl<T: HapticBackend + ?Sized> HapticBackend for Arc<T> {
    fn has_vibrator(&self) -> bool {
        (**self).has_vibrator()
    }

    fn has_amplitude_control(&self) -> bool {
        (**self).has_amplitude_control()
    }

    fn vibrate_once(&self, duration: Duration, amplitude: Amplitude) -> Result<(), HapticError> {
        (**self).vibrate_once(duration, amplitude)
    }

    fn vibrate_waveform(&self, waveform: &Waveform) -> Result<(), HapticError> {
        (**self).vibrate_waveform(waveform)
    }

    fn cancel(&self) -> Result<(), HapticError> {
        (**self).cancel()
    }
}

/// Checks motor capabilities and issues vibration requests.
#[derive(Clone)]
pub struct HapticManager {
    backend: Arc<dyn HapticBackend>,
}

impl std::fmt::Debug for HapticManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HapticManager").finish_non_exhaustive()
    }
}

impl HapticManager {
    /// Create a manager over `backend`.
    pub fn new(backend: impl HapticBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Create a manager over an already shared backend.
    #[must_use]
    pub fn from_shared(backend: Arc<dyn HapticBackend>) -> Self {
        Self { backend }
    }

    /// Whether the device has a vibration motor.
    #[must_use]
    pub fn has_vibrator(&self) -> bool {
        self.backend.has_vibrator()
    }

    fn require_vibrator(&self) -> Result<(), HapticError> {
        if self.has_vibrator() {
            Ok(())
        } else {
            Err(HapticError::NoVibrator)
        }
    }

    /// Vibrate once for `duration` at the default amplitude.
    ///
    /// # Errors
    /// Returns [`HapticError::NoVibrator`] if the device has no motor.
    pub fn vibrate(&self, duration: Duration) -> Result<(), HapticError> {
        self.require_vibrator()?;
        debug!("vibrating for {duration:?}");
        self.backend.vibrate_once(duration, Amplitude::Default)
    }

    /// Play `pattern`, with per-segment amplitudes when the motor has
    /// amplitude control.
    ///
    /// # Errors
    /// Returns [`HapticError::NoVibrator`] if the device has no motor.
    pub fn vibrate_pattern(&self, pattern: &VibrationPattern) -> Result<(), HapticError> {
        self.require_vibrator()?;
        let waveform = pattern.waveform(self.backend.has_amplitude_control());
        debug!(
            "vibrating pattern of {} segments (repeat {:?})",
            waveform.timings.len(),
            waveform.repeat
        );
        self.backend.vibrate_waveform(&waveform)
    }

    /// Play any vibration request.
    ///
    /// # Errors
    /// Returns [`HapticError::NoVibrator`] if the device has no motor.
    pub fn play(&self, spec: &VibrationSpec) -> Result<(), HapticError> {
        match spec {
            VibrationSpec::OneShot(duration) => self.vibrate(*duration),
            VibrationSpec::Pattern(pattern) => self.vibrate_pattern(pattern),
        }
    }

    /// Stop any ongoing vibration.
    ///
    /// # Errors
    /// Returns [`HapticError::NoVibrator`] if the device has no motor.
    pub fn cancel(&self) -> Result<(), HapticError> {
        self.require_vibrator()?;
        debug!("cancelling vibration");
        self.backend.cancel()
    }
}
