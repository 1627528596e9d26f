//! Event channel bridge for volume change notifications.
//!
//! Platform observers report changes on arbitrary threads, while the host's
//! sink may only be used on its UI thread. Every emission is therefore handed
//! to a [`UiThread`] before it reaches the [`EventSink`].

use log::debug;
use resonance_volume::{VolumeError, VolumeLevel, VolumeStream, VolumeWatcher};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A unit of work posted to the UI thread.
pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

/// The host's UI-bound execution context.
pub trait UiThread: Send + Sync {
    /// Run `task` on the UI thread.
    fn run(&self, task: UiTask);
}

impl<T: UiThread + ?Sized> UiThread for Arc<T> {
    fn run(&self, task: UiTask) {
        (**self).run(task);
    }
}

/// Runs tasks immediately on the calling thread.
///
/// Suitable for hosts whose sink is thread-safe, and for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inline;

impl UiThread for Inline {
    fn run(&self, task: UiTask) {
        task();
    }
}

/// The host's receiving end of an event channel.
pub trait EventSink: Send + Sync {
    /// Deliver one event.
    fn success(&self, event: Value);
}

/// The sink currently attached, tagged with the subscription it belongs to.
#[derive(Default)]
struct Listener {
    generation: u64,
    sink: Option<Arc<dyn EventSink>>,
}

type SharedListener = Arc<Mutex<Listener>>;

fn lock(listener: &Mutex<Listener>) -> MutexGuard<'_, Listener> {
    listener.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Forwards volume changes from a [`VolumeWatcher`] to a host sink.
///
/// The sink is looked up again when a posted task runs on the UI thread, so
/// levels still queued when the listener is cancelled or replaced are
/// dropped.
pub struct VolumeEvents {
    watcher: VolumeWatcher,
    ui: Arc<dyn UiThread>,
    listener: SharedListener,
}

impl std::fmt::Debug for VolumeEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VolumeEvents")
            .field("watcher", &self.watcher)
            .field("generation", &lock(&self.listener).generation)
            .finish_non_exhaustive()
    }
}

impl VolumeEvents {
    /// Bridge `watcher` to sinks through `ui`.
    #[must_use]
    pub fn new(watcher: VolumeWatcher, ui: Arc<dyn UiThread>) -> Self {
        Self {
            watcher,
            ui,
            listener: SharedListener::default(),
        }
    }

    /// The underlying watcher.
    #[must_use]
    pub const fn watcher(&self) -> &VolumeWatcher {
        &self.watcher
    }

    /// Start delivering levels to `sink`, replacing any previous listener.
    ///
    /// # Errors
    /// Returns the observer's error if observation cannot start.
    pub fn on_listen(&self, sink: Arc<dyn EventSink>) -> Result<(), VolumeError> {
        debug!("volume event listener attached");
        let generation = {
            let mut listener = lock(&self.listener);
            listener.generation = listener.generation.wrapping_add(1);
            listener.sink = Some(sink);
            listener.generation
        };

        let ui = Arc::clone(&self.ui);
        let shared = Arc::clone(&self.listener);
        let watched = self.watcher.watch_with(move |level: VolumeLevel| {
            let shared = Arc::clone(&shared);
            ui.run(Box::new(move || {
                let sink = {
                    let listener = lock(&shared);
                    if listener.generation != generation {
                        return;
                    }
                    listener.sink.clone()
                };
                match sink {
                    Some(sink) => sink.success(Value::from(level)),
                    None => debug!("dropping volume event for a cancelled listener"),
                }
            }));
        });

        if watched.is_err() {
            let mut listener = lock(&self.listener);
            if listener.generation == generation {
                listener.sink = None;
            }
        }
        watched
    }

    /// Subscribe with a stream instead of a sink, detaching any sink.
    ///
    /// # Errors
    /// Returns the observer's error if observation cannot start.
    pub fn watch(&self) -> Result<VolumeStream, VolumeError> {
        lock(&self.listener).sink = None;
        self.watcher.watch()
    }

    /// Stop delivering levels and release the platform observer.
    ///
    /// Levels already posted to the UI thread are dropped.
    pub fn on_cancel(&self) {
        debug!("volume event listener detached");
        lock(&self.listener).sink = None;
        self.watcher.unwatch();
    }
}
