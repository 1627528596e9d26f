//! System volume change notifications.
//!
//! A [`VolumeWatcher`] owns a single delivery slot. Subscribing fills the slot
//! and starts the platform observer; subscribing again replaces the previous
//! subscriber, whose stream then ends. Unsubscribing empties the slot and
//! stops the observer.

use crate::{StreamCategory, VolumeBackend, VolumeError, VolumeLevel, normalize};
use async_channel::Sender;
use futures::Stream;
use log::{debug, warn};
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// A boxed stream of volume levels.
pub type VolumeStream = Pin<Box<dyn Stream<Item = VolumeLevel> + Send>>;

/// Callback an observer invokes on every system volume change.
pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;

type LevelSink = Arc<dyn Fn(VolumeLevel) + Send + Sync>;

/// Platform hook that reports system volume changes.
///
/// Implementations register an OS-level observation in [`start`](Self::start)
/// and release it in [`stop`](Self::stop). The callback may be invoked from any
/// thread, including during `start`.
pub trait VolumeObserver: Send + Sync {
    /// Begin invoking `on_change` on every volume change.
    ///
    /// # Errors
    /// Returns a [`VolumeError`] if the observation cannot be registered.
    fn start(&self, on_change: ChangeCallback) -> Result<(), VolumeError>;

    /// Stop invoking the callback and release the observation.
    fn stop(&self);
}

impl<T: VolumeObserver + ?Sized> VolumeObserver for Arc<T> {
    fn start(&self, on_change: ChangeCallback) -> Result<(), VolumeError> {
        (**self).start(on_change)
    }

    fn stop(&self) {
        (**self).stop();
    }
}

enum Delivery {
    Stream(Sender<VolumeLevel>),
    Sink(LevelSink),
}

impl Delivery {
    fn close(&self) {
        if let Self::Stream(sender) = self {
            sender.close();
        }
    }
}

#[derive(Default)]
struct Slot {
    delivery: Option<Delivery>,
    observing: bool,
}

struct Shared {
    backend: Arc<dyn VolumeBackend>,
    category: StreamCategory,
    slot: Mutex<Slot>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_level(&self) -> Result<VolumeLevel, VolumeError> {
        let step = self.backend.current_step(self.category)?;
        let max = self.backend.max_step(self.category)?;
        Ok(normalize(step, max))
    }

    fn emit(&self) {
        let sink = {
            let slot = self.lock();
            match &slot.delivery {
                None => return,
                Some(Delivery::Sink(sink)) => Some(Arc::clone(sink)),
                Some(Delivery::Stream(_)) => None,
            }
        };

        let level = match self.read_level() {
            Ok(level) => level,
            Err(e) => {
                warn!("failed to read {:?} volume: {e}", self.category);
                return;
            }
        };

        if let Some(sink) = sink {
            sink(level);
            return;
        }

        let slot = self.lock();
        if let Some(Delivery::Stream(sender)) = &slot.delivery {
            if sender.try_send(level).is_err() {
                debug!("volume stream receiver is gone");
            }
        }
    }
}

/// Single-subscriber source of system volume changes.
///
/// Every change reported by the [`VolumeObserver`] yields one level of the
/// watched category (music by default), whatever the subscriber queried last.
/// Dropping the watcher unsubscribes.
pub struct VolumeWatcher {
    shared: Arc<Shared>,
    observer: Arc<dyn VolumeObserver>,
}

impl std::fmt::Debug for VolumeWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VolumeWatcher")
            .field("category", &self.shared.category)
            .field("subscribed", &self.is_subscribed())
            .finish_non_exhaustive()
    }
}

impl VolumeWatcher {
    /// Create a watcher reporting [`StreamCategory::Music`] levels.
    #[must_use]
    pub fn new(backend: Arc<dyn VolumeBackend>, observer: Arc<dyn VolumeObserver>) -> Self {
        Self::for_category(backend, observer, StreamCategory::Music)
    }

    /// Create a watcher reporting levels of `category`.
    #[must_use]
    pub fn for_category(
        backend: Arc<dyn VolumeBackend>,
        observer: Arc<dyn VolumeObserver>,
        category: StreamCategory,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                backend,
                category,
                slot: Mutex::new(Slot::default()),
            }),
            observer,
        }
    }

    /// The category whose level is emitted.
    #[must_use]
    pub fn category(&self) -> StreamCategory {
        self.shared.category
    }

    /// Whether a subscriber currently occupies the slot.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.shared.lock().delivery.is_some()
    }

    /// Subscribe with a stream of levels.
    ///
    /// The stream is lazy and only ends when it is replaced by another
    /// subscription or the watcher unsubscribes.
    ///
    /// # Errors
    /// Returns the observer's error if observation cannot start.
    pub fn watch(&self) -> Result<VolumeStream, VolumeError> {
        let (sender, receiver) = async_channel::unbounded();
        self.install(Delivery::Stream(sender))?;
        Ok(Box::pin(receiver))
    }

    /// Subscribe with a callback invoked once per change.
    ///
    /// The callback runs on whatever thread the observer reports from.
    ///
    /// # Errors
    /// Returns the observer's error if observation cannot start.
    pub fn watch_with<F>(&self, sink: F) -> Result<(), VolumeError>
    where
        F: Fn(VolumeLevel) + Send + Sync + 'static,
    {
        self.install(Delivery::Sink(Arc::new(sink)))
    }

    /// Remove the current subscriber and stop observing.
    pub fn unwatch(&self) {
        let was_observing = {
            let mut slot = self.shared.lock();
            if let Some(previous) = slot.delivery.take() {
                previous.close();
            }
            std::mem::replace(&mut slot.observing, false)
        };
        if was_observing {
            debug!("stopping volume observation");
            self.observer.stop();
        }
    }

    fn install(&self, delivery: Delivery) -> Result<(), VolumeError> {
        let needs_start = {
            let mut slot = self.shared.lock();
            if let Some(previous) = slot.delivery.replace(delivery) {
                debug!("replacing volume subscriber");
                previous.close();
            }
            !std::mem::replace(&mut slot.observing, true)
        };

        if needs_start {
            debug!("starting volume observation");
            let shared: Weak<Shared> = Arc::downgrade(&self.shared);
            let on_change: ChangeCallback = Arc::new(move || {
                if let Some(shared) = shared.upgrade() {
                    shared.emit();
                }
            });

            if let Err(e) = self.observer.start(on_change) {
                let mut slot = self.shared.lock();
                if let Some(delivery) = slot.delivery.take() {
                    delivery.close();
                }
                slot.observing = false;
                return Err(e);
            }
        }
        Ok(())
    }
}

impl Drop for VolumeWatcher {
    fn drop(&mut self) {
        self.unwatch();
    }
}
