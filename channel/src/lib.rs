//! Method and event channel dispatcher for resonance.
//!
//! A host forwards each [`MethodCall`] to [`ResonancePlugin::on_method_call`]
//! and gets back a [`MethodResult`]. Volume change notifications are pushed to
//! an [`EventSink`] after [`ResonancePlugin::on_listen`].
//!
//! ```
//! use resonance_channel::{MethodCall, MethodResult, ResonancePlugin};
//!
//! let plugin = ResonancePlugin::builder().build().unwrap();
//! let reply = plugin.on_method_call(&MethodCall::new("noSuchMethod"));
//! assert_eq!(reply, MethodResult::NotImplemented);
//! ```

mod call;
mod config;
mod event;
mod platform;
mod plugin;

pub use call::{MethodCall, MethodResult};
pub use config::{DEFAULT_CHANNEL_PREFIX, PluginConfig};
pub use event::{EventSink, Inline, UiTask, UiThread, VolumeEvents};
pub use platform::{os_name, platform_version};
pub use plugin::{Operation, ResonancePlugin, ResonancePluginBuilder, args};

use resonance_volume::VolumeError;

/// Errors raised while setting up a plugin.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// The configuration names an unknown stream.
    #[error(transparent)]
    Stream(#[from] VolumeError),
}

/// Route `log` output to logcat under the `resonance` tag.
///
/// Safe to call more than once. Does nothing off Android, where the host
/// installs its own logger.
pub fn init_logging() {
    #[cfg(target_os = "android")]
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag("resonance"),
    );
}
