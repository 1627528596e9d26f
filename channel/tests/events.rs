mod common;

use common::{FakeAudio, ManualObserver, QueuedUi, RecordingSink};
use futures::StreamExt;
use resonance_channel::{ChannelError, PluginConfig, ResonancePlugin};
use resonance_volume::StreamCategory;
use serde_json::json;
use std::sync::Arc;

struct Harness {
    audio: Arc<FakeAudio>,
    observer: Arc<ManualObserver>,
    ui: Arc<QueuedUi>,
    plugin: ResonancePlugin,
}

fn harness(config: PluginConfig) -> Harness {
    let audio = Arc::new(FakeAudio::default());
    let observer = Arc::new(ManualObserver::default());
    let ui = Arc::new(QueuedUi::default());
    let plugin = ResonancePlugin::builder()
        .config(config)
        .volume_backend(Arc::clone(&audio))
        .volume_observer(Arc::clone(&observer))
        .ui_thread(Arc::clone(&ui))
        .build()
        .unwrap();
    Harness {
        audio,
        observer,
        ui,
        plugin,
    }
}

#[test]
fn events_wait_for_ui_thread() {
    let h = harness(PluginConfig::default());
    let sink = Arc::new(RecordingSink::default());
    h.plugin.on_listen(sink.clone()).unwrap();
    assert!(h.observer.is_registered());

    h.audio.press(StreamCategory::Music, 4);
    h.observer.fire();
    assert_eq!(h.ui.pending(), 1);
    assert!(sink.events().is_empty());

    h.ui.drain();
    assert_eq!(sink.events(), vec![json!(0.4)]);
}

#[test]
fn one_event_per_change_in_order() {
    let h = harness(PluginConfig::default());
    let sink = Arc::new(RecordingSink::default());
    h.plugin.on_listen(sink.clone()).unwrap();

    for step in [2, 9, 10] {
        h.audio.press(StreamCategory::Music, step);
        h.observer.fire();
    }
    h.ui.drain();
    assert_eq!(sink.events(), vec![json!(0.2), json!(0.9), json!(1.0)]);
}

#[test]
fn cancel_stops_events() {
    let h = harness(PluginConfig::default());
    let sink = Arc::new(RecordingSink::default());
    h.plugin.on_listen(sink.clone()).unwrap();

    h.plugin.on_cancel();
    assert!(!h.observer.is_registered());

    h.observer.fire();
    h.ui.drain();
    assert!(sink.events().is_empty());
}

#[test]
fn cancel_drops_queued_events() {
    let h = harness(PluginConfig::default());
    let sink = Arc::new(RecordingSink::default());
    h.plugin.on_listen(sink.clone()).unwrap();

    h.audio.press(StreamCategory::Music, 4);
    h.observer.fire();
    assert_eq!(h.ui.pending(), 1);

    h.plugin.on_cancel();
    h.ui.drain();
    assert!(sink.events().is_empty());
}

#[test]
fn relisten_drops_events_queued_for_old_sink() {
    let h = harness(PluginConfig::default());
    let first = Arc::new(RecordingSink::default());
    let second = Arc::new(RecordingSink::default());
    h.plugin.on_listen(first.clone()).unwrap();

    h.audio.press(StreamCategory::Music, 4);
    h.observer.fire();
    h.plugin.on_listen(second.clone()).unwrap();

    h.audio.press(StreamCategory::Music, 8);
    h.observer.fire();
    h.ui.drain();

    assert!(first.events().is_empty());
    assert_eq!(second.events(), vec![json!(0.8)]);
}

#[test]
fn relisten_same_sink_after_cancel() {
    let h = harness(PluginConfig::default());
    let sink = Arc::new(RecordingSink::default());
    h.plugin.on_listen(sink.clone()).unwrap();
    h.observer.fire();
    h.plugin.on_cancel();
    h.plugin.on_listen(sink.clone()).unwrap();

    h.audio.press(StreamCategory::Music, 1);
    h.observer.fire();
    h.ui.drain();
    assert_eq!(sink.events(), vec![json!(0.1)]);
}

#[test]
fn new_listener_replaces_old() {
    let h = harness(PluginConfig::default());
    let first = Arc::new(RecordingSink::default());
    let second = Arc::new(RecordingSink::default());
    h.plugin.on_listen(first.clone()).unwrap();
    h.plugin.on_listen(second.clone()).unwrap();

    h.audio.press(StreamCategory::Music, 5);
    h.observer.fire();
    h.ui.drain();

    assert!(first.events().is_empty());
    assert_eq!(second.events(), vec![json!(0.5)]);
}

#[test]
fn watches_configured_stream() {
    let h = harness(PluginConfig::new().watch(StreamCategory::Ring));
    let sink = Arc::new(RecordingSink::default());
    h.plugin.on_listen(sink.clone()).unwrap();

    h.audio.press(StreamCategory::Music, 10);
    h.audio.press(StreamCategory::Ring, 3);
    h.observer.fire();
    h.ui.drain();
    assert_eq!(sink.events(), vec![json!(0.3)]);
}

#[test]
fn unknown_watched_stream_fails_build() {
    let config = PluginConfig {
        watched_stream: 7,
        ..PluginConfig::default()
    };
    let result = ResonancePlugin::builder().config(config).build();
    assert!(matches!(result, Err(ChannelError::Stream(_))));
}

#[test]
fn listening_without_observer_is_an_error() {
    let plugin = ResonancePlugin::builder().build().unwrap();
    assert!(plugin.on_listen(Arc::new(RecordingSink::default())).is_err());
}

#[tokio::test]
async fn stream_replaces_sink_listener() {
    let h = harness(PluginConfig::default());
    let sink = Arc::new(RecordingSink::default());
    h.plugin.on_listen(sink.clone()).unwrap();

    h.observer.fire();
    let mut levels = h.plugin.watch_volume().unwrap();
    h.audio.press(StreamCategory::Music, 6);
    h.observer.fire();
    assert_eq!(levels.next().await, Some(0.6));

    h.plugin.on_cancel();
    assert_eq!(levels.next().await, None);

    h.ui.drain();
    assert!(sink.events().is_empty());
}
