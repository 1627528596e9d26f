//! Plugin configuration.

use crate::ChannelError;
use resonance_haptic::DEFAULT_DURATION;
use resonance_volume::{StreamCategory, validate};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Channel name prefix used when none is configured.
pub const DEFAULT_CHANNEL_PREFIX: &str = "com.astaria.resonance";

/// Settings for a [`ResonancePlugin`](crate::ResonancePlugin).
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use resonance_channel::PluginConfig;
///
/// let config = PluginConfig::from_json(r#"{ "default_vibration_ms": 250 }"#).unwrap();
/// assert_eq!(config.method_channel, "com.astaria.resonance.method");
/// assert_eq!(config.default_vibration().as_millis(), 250);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Name of the method channel.
    pub method_channel: String,
    /// Name of the volume change event channel.
    pub event_channel: String,
    /// One-shot vibration length when a call gives none.
    pub default_vibration_ms: u64,
    /// Stream tag whose level is emitted on volume changes.
    pub watched_stream: i32,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default_with_prefix(DEFAULT_CHANNEL_PREFIX)
    }

    fn default_with_prefix(prefix: &str) -> Self {
        Self {
            method_channel: format!("{prefix}.method"),
            event_channel: format!("{prefix}.event"),
            default_vibration_ms: u64::try_from(DEFAULT_DURATION.as_millis()).unwrap_or(400),
            watched_stream: StreamCategory::Music.tag(),
        }
    }

    /// Parse a JSON configuration and validate it.
    ///
    /// # Errors
    /// Returns [`ChannelError::Config`] for malformed JSON or
    /// [`ChannelError::Stream`] for an unknown watched stream.
    pub fn from_json(json: &str) -> Result<Self, ChannelError> {
        let config: Self = serde_json::from_str(json)?;
        config.watched_category()?;
        Ok(config)
    }

    /// Derive both channel names from `prefix`.
    #[must_use]
    pub fn channel_prefix(mut self, prefix: &str) -> Self {
        let named = Self::default_with_prefix(prefix);
        self.method_channel = named.method_channel;
        self.event_channel = named.event_channel;
        self
    }

    /// Set the default one-shot vibration length.
    #[must_use]
    pub fn default_vibration_duration(mut self, duration: Duration) -> Self {
        self.default_vibration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the stream whose level is emitted on volume changes.
    #[must_use]
    pub const fn watch(mut self, category: StreamCategory) -> Self {
        self.watched_stream = category.tag();
        self
    }

    /// Default one-shot vibration length.
    #[must_use]
    pub const fn default_vibration(&self) -> Duration {
        Duration::from_millis(self.default_vibration_ms)
    }

    /// The watched stream category.
    ///
    /// # Errors
    /// Returns [`ChannelError::Stream`] if `watched_stream` is not a known tag.
    pub fn watched_category(&self) -> Result<StreamCategory, ChannelError> {
        Ok(validate(self.watched_stream)?)
    }
}
