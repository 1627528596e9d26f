//! Platform-specific volume backends.

/// Android platform implementation.
#[cfg(target_os = "android")]
pub mod android;

use crate::{ChangeCallback, StreamCategory, VolumeBackend, VolumeError, VolumeObserver};

/// Backend for platforms without per-stream volume control.
///
/// Every call fails with [`VolumeError::NotSupported`], including starting
/// change observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

impl VolumeBackend for Unsupported {
    fn current_step(&self, _category: StreamCategory) -> Result<u32, VolumeError> {
        Err(VolumeError::NotSupported)
    }

    fn max_step(&self, _category: StreamCategory) -> Result<u32, VolumeError> {
        Err(VolumeError::NotSupported)
    }

    fn set_step(
        &self,
        _category: StreamCategory,
        _step: u32,
        _show_ui: bool,
    ) -> Result<(), VolumeError> {
        Err(VolumeError::NotSupported)
    }
}

impl VolumeObserver for Unsupported {
    fn start(&self, _on_change: ChangeCallback) -> Result<(), VolumeError> {
        Err(VolumeError::NotSupported)
    }

    fn stop(&self) {}
}
