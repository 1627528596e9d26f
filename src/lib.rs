//! # Resonance
//!
//! Device volume and vibration control for cross-platform GUI hosts.
//!
//! Resonance sits between a host framework's method channel and the platform's
//! audio and vibration services. Enable only the pieces you need:
//!
//! - `volume`: normalized per-stream volume control and change notifications.
//! - `haptic`: one-shot and pattern vibration.
//! - `channel`: the method/event channel dispatcher that ties both together.
//!
//! Use the `full` feature (the default) to enable everything.
//!
//! ## Example
//!
//! ```toml
//! [dependencies]
//! resonance = { version = "0.1", default-features = false, features = ["volume"] }
//! ```
//!
//! ```rust
//! use resonance::volume::{normalize, round2};
//!
//! assert_eq!(normalize(5, 10), 0.5);
//! assert_eq!(round2(0.25), 0.2);
//! ```

#![warn(missing_docs)]

#[cfg(feature = "volume")]
pub use resonance_volume as volume;

#[cfg(feature = "haptic")]
pub use resonance_haptic as haptic;

#[cfg(feature = "channel")]
pub use resonance_channel as channel;

#[cfg(feature = "channel")]
pub use resonance_channel::{MethodCall, MethodResult, ResonancePlugin};
