//! Method dispatch.

use crate::config::PluginConfig;
use crate::event::{EventSink, Inline, UiThread, VolumeEvents};
use crate::platform::platform_version;
use crate::{ChannelError, MethodCall, MethodResult};
use log::{debug, warn};
use resonance_haptic::{
    Amplitude, DEFAULT_AMPLITUDE, HapticBackend, HapticError, HapticManager, VibrationPattern,
};
use resonance_volume::{
    VolumeBackend, VolumeError, VolumeLevel, VolumeManager, VolumeObserver, VolumeStream,
    VolumeWatcher, sys::Unsupported,
};
use std::sync::Arc;
use std::time::Duration;

/// Argument names sent by hosts.
pub mod args {
    /// Stream category tag.
    pub const STREAM_TYPE: &str = "stream_type";
    /// Requested level in `[0, 1]`.
    pub const VOLUME_VALUE: &str = "volume_value";
    /// `1` to show the system volume UI.
    pub const SHOW_VOLUME_UI: &str = "show_volume_ui";
    /// One-shot vibration length in milliseconds.
    pub const VIBRATION_DURATION: &str = "vibration_duration";
    /// Off/on timings in milliseconds.
    pub const VIBRATION_PATTERN: &str = "vibration_pattern";
    /// Strength of the "on" segments.
    pub const VIBRATION_AMPLITUDE: &str = "vibration_amplitude";
    /// Segment to loop from, `-1` for none.
    pub const VIBRATION_REPEAT: &str = "vibration_repeat";
}

/// Stream tag used when a call carries none; never valid.
const MISSING_STREAM: i32 = -1;

const BAD_STREAM_TYPE: &str = "Bad Stream Type";
const NO_VIBRATOR: &str = "Device doesn't have vibrator";

/// Every operation the plugin answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `volumeGetCurrentLevel`
    VolumeGetCurrentLevel,
    /// `volumeGetMaxLevel`
    VolumeGetMaxLevel,
    /// `volumeSetLevel`
    VolumeSetLevel,
    /// `volumeSetMaxLevel`
    VolumeSetMaxLevel,
    /// `volumeSetMuteLevel`
    VolumeSetMuteLevel,
    /// `vibrate`
    Vibrate,
    /// `vibratePattern`
    VibratePattern,
    /// `vibrationCancel`
    VibrationCancel,
    /// `getPlatformVersion`
    GetPlatformVersion,
}

impl Operation {
    /// Every operation, in table order.
    pub const ALL: [Self; 9] = [
        Self::VolumeGetCurrentLevel,
        Self::VolumeGetMaxLevel,
        Self::VolumeSetLevel,
        Self::VolumeSetMaxLevel,
        Self::VolumeSetMuteLevel,
        Self::Vibrate,
        Self::VibratePattern,
        Self::VibrationCancel,
        Self::GetPlatformVersion,
    ];

    /// The method name hosts use.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::VolumeGetCurrentLevel => "volumeGetCurrentLevel",
            Self::VolumeGetMaxLevel => "volumeGetMaxLevel",
            Self::VolumeSetLevel => "volumeSetLevel",
            Self::VolumeSetMaxLevel => "volumeSetMaxLevel",
            Self::VolumeSetMuteLevel => "volumeSetMuteLevel",
            Self::Vibrate => "vibrate",
            Self::VibratePattern => "vibratePattern",
            Self::VibrationCancel => "vibrationCancel",
            Self::GetPlatformVersion => "getPlatformVersion",
        }
    }

    /// Look up an operation by method name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|operation| operation.name() == name)
    }

    /// Error code reported when the operation's own precondition fails: a bad
    /// stream type for volume operations, a missing motor for vibration.
    #[must_use]
    pub const fn error_code(self) -> Option<&'static str> {
        match self {
            Self::VolumeGetCurrentLevel => Some("801"),
            Self::VolumeGetMaxLevel => Some("802"),
            Self::VolumeSetLevel => Some("803"),
            Self::VolumeSetMaxLevel => Some("804"),
            Self::VolumeSetMuteLevel => Some("805"),
            Self::Vibrate => Some("901"),
            Self::VibratePattern => Some("902"),
            Self::VibrationCancel => Some("903"),
            Self::GetPlatformVersion => None,
        }
    }

    fn failure(self, message: &str) -> MethodResult {
        MethodResult::error(self.error_code().unwrap_or("ERROR"), message)
    }
}

fn stream_type(call: &MethodCall) -> i32 {
    call.argument(args::STREAM_TYPE).unwrap_or(MISSING_STREAM)
}

fn show_volume_ui(call: &MethodCall) -> bool {
    call.required::<i32>(args::SHOW_VOLUME_UI) == 1
}

fn volume_reply(operation: Operation, level: Result<VolumeLevel, VolumeError>) -> MethodResult {
    match level {
        Ok(level) => MethodResult::success(level),
        Err(VolumeError::InvalidStreamType(_)) => operation.failure(BAD_STREAM_TYPE),
        Err(e @ VolumeError::NotSupported) => MethodResult::error("UNSUPPORTED", e.to_string()),
        Err(e @ VolumeError::Platform(_)) => MethodResult::error("PLATFORM", e.to_string()),
    }
}

fn vibration_reply(operation: Operation, outcome: Result<(), HapticError>) -> MethodResult {
    match outcome {
        Ok(()) => MethodResult::success(true),
        Err(HapticError::NoVibrator) => operation.failure(NO_VIBRATOR),
        Err(e @ HapticError::InvalidPattern(_)) => {
            MethodResult::error("INVALID_PATTERN", e.to_string())
        }
        Err(e @ HapticError::NotSupported) => MethodResult::error("UNSUPPORTED", e.to_string()),
        Err(e @ HapticError::Platform(_)) => MethodResult::error("PLATFORM", e.to_string()),
    }
}

/// Answers method calls and volume event subscriptions from a host.
///
/// Each call runs to completion on the calling thread; the only state shared
/// between calls is the single volume event subscription.
pub struct ResonancePlugin {
    config: PluginConfig,
    volume: VolumeManager,
    haptics: HapticManager,
    events: VolumeEvents,
}

impl std::fmt::Debug for ResonancePlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResonancePlugin")
            .field("config", &self.config)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl ResonancePlugin {
    /// Start building a plugin.
    #[must_use]
    pub fn builder() -> ResonancePluginBuilder {
        ResonancePluginBuilder::new()
    }

    /// The plugin's configuration.
    #[must_use]
    pub const fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// The volume manager behind the volume operations.
    #[must_use]
    pub const fn volume(&self) -> &VolumeManager {
        &self.volume
    }

    /// The haptic manager behind the vibration operations.
    #[must_use]
    pub const fn haptics(&self) -> &HapticManager {
        &self.haptics
    }

    /// Handle one method call.
    ///
    /// # Panics
    /// Panics if a required argument is missing or malformed; see
    /// [`MethodCall::required`].
    #[must_use]
    pub fn on_method_call(&self, call: &MethodCall) -> MethodResult {
        let Some(operation) = Operation::from_name(&call.method) else {
            debug!("no handler for `{}`", call.method);
            return MethodResult::NotImplemented;
        };
        debug!("handling `{}`", operation.name());

        let result = match operation {
            Operation::VolumeGetCurrentLevel => {
                volume_reply(operation, self.volume.current_level(stream_type(call)))
            }
            Operation::VolumeGetMaxLevel => {
                volume_reply(operation, self.volume.max_level(stream_type(call)))
            }
            Operation::VolumeSetLevel => volume_reply(operation, self.set_level(call)),
            Operation::VolumeSetMaxLevel => volume_reply(
                operation,
                self.volume
                    .set_max_level(stream_type(call), show_volume_ui(call)),
            ),
            Operation::VolumeSetMuteLevel => volume_reply(
                operation,
                self.volume
                    .set_mute_level(stream_type(call), show_volume_ui(call)),
            ),
            Operation::Vibrate => vibration_reply(operation, self.vibrate(call)),
            Operation::VibratePattern => vibration_reply(operation, self.vibrate_pattern(call)),
            Operation::VibrationCancel => vibration_reply(operation, self.haptics.cancel()),
            Operation::GetPlatformVersion => MethodResult::success(platform_version()),
        };

        if let MethodResult::Error { code, message, .. } = &result {
            warn!("`{}` failed with {code}: {message}", operation.name());
        }
        result
    }

    fn set_level(&self, call: &MethodCall) -> Result<VolumeLevel, VolumeError> {
        let tag = stream_type(call);
        let requested: f64 = call.required(args::VOLUME_VALUE);
        self.volume.set_level(tag, requested, show_volume_ui(call))
    }

    fn vibrate(&self, call: &MethodCall) -> Result<(), HapticError> {
        let duration = call
            .argument::<u64>(args::VIBRATION_DURATION)
            .map_or_else(|| self.config.default_vibration(), Duration::from_millis);
        self.haptics.vibrate(duration)
    }

    /// A missing motor is reported before a malformed pattern.
    fn vibrate_pattern(&self, call: &MethodCall) -> Result<(), HapticError> {
        let timings: Vec<u64> = call.required(args::VIBRATION_PATTERN);
        let amplitude: i32 = call
            .argument(args::VIBRATION_AMPLITUDE)
            .unwrap_or(DEFAULT_AMPLITUDE);
        let repeat: i32 = call.required(args::VIBRATION_REPEAT);

        if !self.haptics.has_vibrator() {
            return Err(HapticError::NoVibrator);
        }
        let pattern = VibrationPattern::from_millis(timings)
            .amplitude(Amplitude::from_raw(amplitude)?)
            .repeat_raw(repeat)?;
        self.haptics.vibrate_pattern(&pattern)
    }

    /// Start forwarding volume changes to `sink`, replacing any previous
    /// listener.
    ///
    /// # Errors
    /// Returns the observer's error if observation cannot start.
    pub fn on_listen(&self, sink: Arc<dyn EventSink>) -> Result<(), VolumeError> {
        self.events.on_listen(sink)
    }

    /// Stop forwarding volume changes.
    pub fn on_cancel(&self) {
        self.events.on_cancel();
    }

    /// Subscribe to volume changes as a stream, replacing any listener.
    ///
    /// # Errors
    /// Returns the observer's error if observation cannot start.
    pub fn watch_volume(&self) -> Result<VolumeStream, VolumeError> {
        self.events.watch()
    }
}

/// Builder for a [`ResonancePlugin`].
///
/// Backends default to [`Unsupported`] and the UI thread to [`Inline`].
pub struct ResonancePluginBuilder {
    config: PluginConfig,
    volume: Arc<dyn VolumeBackend>,
    haptics: Arc<dyn HapticBackend>,
    observer: Arc<dyn VolumeObserver>,
    ui: Arc<dyn UiThread>,
}

impl std::fmt::Debug for ResonancePluginBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResonancePluginBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for ResonancePluginBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResonancePluginBuilder {
    /// Create a builder with default configuration and unsupported backends.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: PluginConfig::default(),
            volume: Arc::new(Unsupported),
            haptics: Arc::new(resonance_haptic::sys::Unsupported),
            observer: Arc::new(Unsupported),
            ui: Arc::new(Inline),
        }
    }

    /// Use `config`.
    #[must_use]
    pub fn config(mut self, config: PluginConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `backend` for volume operations.
    #[must_use]
    pub fn volume_backend(mut self, backend: impl VolumeBackend + 'static) -> Self {
        self.volume = Arc::new(backend);
        self
    }

    /// Use `backend` for vibration operations.
    #[must_use]
    pub fn haptic_backend(mut self, backend: impl HapticBackend + 'static) -> Self {
        self.haptics = Arc::new(backend);
        self
    }

    /// Use `observer` to learn about system volume changes.
    #[must_use]
    pub fn volume_observer(mut self, observer: impl VolumeObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    /// Deliver volume events through `ui`.
    #[must_use]
    pub fn ui_thread(mut self, ui: impl UiThread + 'static) -> Self {
        self.ui = Arc::new(ui);
        self
    }

    /// Build the plugin.
    ///
    /// # Errors
    /// Returns [`ChannelError::Stream`] if the configured watched stream is
    /// not a known category.
    pub fn build(self) -> Result<ResonancePlugin, ChannelError> {
        let category = self.config.watched_category()?;
        let volume = VolumeManager::from_shared(self.volume);
        let watcher = VolumeWatcher::for_category(volume.backend(), self.observer, category);
        debug!(
            "resonance plugin ready on `{}` / `{}`",
            self.config.method_channel, self.config.event_channel
        );
        Ok(ResonancePlugin {
            config: self.config,
            volume,
            haptics: HapticManager::from_shared(self.haptics),
            events: VolumeEvents::new(watcher, self.ui),
        })
    }
}
