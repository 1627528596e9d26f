//! Normalized per-stream volume control.
//!
//! This crate exposes the platform's per-stream volume as a level in
//! `[0.0, 1.0]` and notifies a single subscriber whenever the system volume
//! changes. The platform itself is reached through [`VolumeBackend`], so hosts
//! can plug in the Android `AudioManager` backend from [`sys::android`] or
//! their own implementation.
//!
//! # Usage
//!
//! ```ignore
//! use resonance_volume::{StreamCategory, VolumeManager};
//!
//! let manager = VolumeManager::new(backend);
//! let level = manager.current_level(StreamCategory::Music.tag())?;
//! manager.set_level(StreamCategory::Music.tag(), 0.5, false)?;
//! ```

#![warn(missing_docs)]

mod category;
mod level;
/// Platform-specific implementations.
pub mod sys;
mod watcher;

pub use category::{StreamCategory, validate};
pub use level::{REPORTED_DECIMALS, VolumeLevel, denormalize, normalize, round_half_down, round2};
pub use watcher::{ChangeCallback, VolumeObserver, VolumeStream, VolumeWatcher};

use log::debug;
use std::sync::Arc;

/// Level reported for a stream at its maximum step.
pub const MAX_LEVEL: VolumeLevel = 1.0;

/// Level reported for a muted stream.
pub const MUTED_LEVEL: VolumeLevel = 0.0;

/// Errors that can occur when reading or changing the volume.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VolumeError {
    /// The stream type tag does not name a known [`StreamCategory`].
    #[error("bad stream type: {0}")]
    InvalidStreamType(i32),
    /// Volume control is not supported on this platform.
    #[error("volume control not supported")]
    NotSupported,
    /// The platform audio service failed.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Access to the platform's native volume steps.
///
/// Steps are integers in `0..=max_step(category)`; the maximum depends on the
/// stream and the device.
pub trait VolumeBackend: Send + Sync {
    /// Current step of `category`.
    ///
    /// # Errors
    /// Returns a [`VolumeError`] if the platform query fails.
    fn current_step(&self, category: StreamCategory) -> Result<u32, VolumeError>;

    /// Highest step of `category`.
    ///
    /// # Errors
    /// Returns a [`VolumeError`] if the platform query fails.
    fn max_step(&self, category: StreamCategory) -> Result<u32, VolumeError>;

    /// Set `category` to `step`, optionally showing the system volume UI.
    ///
    /// # Errors
    /// Returns a [`VolumeError`] if the platform rejects the change.
    fn set_step(&self, category: StreamCategory, step: u32, show_ui: bool)
    -> Result<(), VolumeError>;
}

impl<T: VolumeBackend + ?Sized> VolumeBackend for Arc<T> {
    fn current_step(&self, category: StreamCategory) -> Result<u32, VolumeError> {
        (**self).current_step(category)
    }

    fn max_step(&self, category: StreamCategory) -> Result<u32, VolumeError> {
        (**self).max_step(category)
    }

    fn set_step(
        &self,
        category: StreamCategory,
        step: u32,
        show_ui: bool,
    ) -> Result<(), VolumeError> {
        (**self).set_step(category, step, show_ui)
    }
}

/// Reads and writes normalized stream volumes.
///
/// Every operation takes the raw integer stream tag a host sends and validates
/// it before touching the backend, so an unknown tag never reaches the
/// platform.
#[derive(Clone)]
pub struct VolumeManager {
    backend: Arc<dyn VolumeBackend>,
}

impl std::fmt::Debug for VolumeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VolumeManager").finish_non_exhaustive()
    }
}

impl VolumeManager {
    /// Create a manager over `backend`.
    pub fn new(backend: impl VolumeBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Create a manager over an already shared backend.
    #[must_use]
    pub fn from_shared(backend: Arc<dyn VolumeBackend>) -> Self {
        Self { backend }
    }

    /// The backend this manager drives.
    #[must_use]
    pub fn backend(&self) -> Arc<dyn VolumeBackend> {
        Arc::clone(&self.backend)
    }

    /// Create a watcher reporting levels of [`StreamCategory::Music`].
    #[must_use]
    pub fn watcher(&self, observer: impl VolumeObserver + 'static) -> VolumeWatcher {
        VolumeWatcher::new(self.backend(), Arc::new(observer))
    }

    /// Current level of the stream tagged `tag`.
    ///
    /// # Errors
    /// Returns [`VolumeError::InvalidStreamType`] for an unknown tag, or the
    /// backend's error.
    pub fn current_level(&self, tag: i32) -> Result<VolumeLevel, VolumeError> {
        let category = validate(tag)?;
        let step = self.backend.current_step(category)?;
        let max = self.backend.max_step(category)?;
        Ok(normalize(step, max))
    }

    /// Maximum level of the stream tagged `tag`.
    ///
    /// The maximum step normalized against itself, so always [`MAX_LEVEL`]
    /// for a valid tag.
    ///
    /// # Errors
    /// Returns [`VolumeError::InvalidStreamType`] for an unknown tag, or the
    /// backend's error.
    pub fn max_level(&self, tag: i32) -> Result<VolumeLevel, VolumeError> {
        let category = validate(tag)?;
        self.backend.max_step(category)?;
        Ok(MAX_LEVEL)
    }

    /// Set the stream tagged `tag` to the step closest to `level`.
    ///
    /// Returns the level actually applied, which may differ from `level` by
    /// the device's step granularity.
    ///
    /// # Errors
    /// Returns [`VolumeError::InvalidStreamType`] for an unknown tag, or the
    /// backend's error.
    pub fn set_level(
        &self,
        tag: i32,
        level: VolumeLevel,
        show_ui: bool,
    ) -> Result<VolumeLevel, VolumeError> {
        let category = validate(tag)?;
        let max = self.backend.max_step(category)?;
        let step = denormalize(level, max);
        debug!("setting {category:?} volume to step {step}/{max} (requested {level})");
        self.backend.set_step(category, step, show_ui)?;
        Ok(normalize(step, max))
    }

    /// Set the stream tagged `tag` to its maximum step.
    ///
    /// # Errors
    /// Returns [`VolumeError::InvalidStreamType`] for an unknown tag, or the
    /// backend's error.
    pub fn set_max_level(&self, tag: i32, show_ui: bool) -> Result<VolumeLevel, VolumeError> {
        let category = validate(tag)?;
        let max = self.backend.max_step(category)?;
        debug!("setting {category:?} volume to max step {max}");
        self.backend.set_step(category, max, show_ui)?;
        Ok(MAX_LEVEL)
    }

    /// Mute the stream tagged `tag` by setting it to step zero.
    ///
    /// # Errors
    /// Returns [`VolumeError::InvalidStreamType`] for an unknown tag, or the
    /// backend's error.
    pub fn set_mute_level(&self, tag: i32, show_ui: bool) -> Result<VolumeLevel, VolumeError> {
        let category = validate(tag)?;
        debug!("muting {category:?}");
        self.backend.set_step(category, 0, show_ui)?;
        Ok(MUTED_LEVEL)
    }
}
