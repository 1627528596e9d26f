#![allow(dead_code)]

use resonance_channel::{EventSink, UiTask, UiThread};
use resonance_haptic::{Amplitude, HapticBackend, HapticError, Waveform};
use resonance_volume::{
    ChangeCallback, StreamCategory, VolumeBackend, VolumeError, VolumeObserver,
};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// Audio service with ten steps per stream.
#[derive(Debug, Default)]
pub struct FakeAudio {
    steps: Mutex<HashMap<StreamCategory, u32>>,
    pub writes: Mutex<Vec<(StreamCategory, u32, bool)>>,
}

impl FakeAudio {
    pub const MAX: u32 = 10;

    pub fn press(&self, category: StreamCategory, step: u32) {
        self.steps.lock().unwrap().insert(category, step);
    }

    pub fn step(&self, category: StreamCategory) -> u32 {
        self.steps.lock().unwrap().get(&category).copied().unwrap_or(0)
    }

    pub fn writes(&self) -> Vec<(StreamCategory, u32, bool)> {
        self.writes.lock().unwrap().clone()
    }
}

impl VolumeBackend for FakeAudio {
    fn current_step(&self, category: StreamCategory) -> Result<u32, VolumeError> {
        Ok(self.step(category))
    }

    fn max_step(&self, _category: StreamCategory) -> Result<u32, VolumeError> {
        Ok(Self::MAX)
    }

    fn set_step(
        &self,
        category: StreamCategory,
        step: u32,
        show_ui: bool,
    ) -> Result<(), VolumeError> {
        self.writes.lock().unwrap().push((category, step, show_ui));
        self.press(category, step);
        Ok(())
    }
}

/// Observer fired by hand.
#[derive(Default)]
pub struct ManualObserver {
    callback: Mutex<Option<ChangeCallback>>,
}

impl ManualObserver {
    pub fn fire(&self) {
        let callback = self.callback.lock().unwrap().clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    pub fn is_registered(&self) -> bool {
        self.callback.lock().unwrap().is_some()
    }
}

impl VolumeObserver for ManualObserver {
    fn start(&self, on_change: ChangeCallback) -> Result<(), VolumeError> {
        *self.callback.lock().unwrap() = Some(on_change);
        Ok(())
    }

    fn stop(&self) {
        *self.callback.lock().unwrap() = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MotorCall {
    Once(Duration, Amplitude),
    Waveform(Waveform),
    Cancel,
}

/// Vibration motor that records requests.
#[derive(Debug)]
pub struct FakeMotor {
    present: bool,
    amplitude_control: bool,
    calls: Mutex<Vec<MotorCall>>,
}

impl FakeMotor {
    pub fn new(amplitude_control: bool) -> Self {
        Self {
            present: true,
            amplitude_control,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn absent() -> Self {
        Self {
            present: false,
            ..Self::new(false)
        }
    }

    pub fn calls(&self) -> Vec<MotorCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl HapticBackend for FakeMotor {
    fn has_vibrator(&self) -> bool {
        self.present
    }

    fn has_amplitude_control(&self) -> bool {
        self.amplitude_control
    }

    fn vibrate_once(&self, duration: Duration, amplitude: Amplitude) -> Result<(), HapticError> {
        self.calls
            .lock()
            .unwrap()
            .push(MotorCall::Once(duration, amplitude));
        Ok(())
    }

    fn vibrate_waveform(&self, waveform: &Waveform) -> Result<(), HapticError> {
        self.calls
            .lock()
            .unwrap()
            .push(MotorCall::Waveform(waveform.clone()));
        Ok(())
    }

    fn cancel(&self) -> Result<(), HapticError> {
        self.calls.lock().unwrap().push(MotorCall::Cancel);
        Ok(())
    }
}

/// Sink that records every event.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Value>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<Value> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn success(&self, event: Value) {
        self.events.lock().unwrap().push(event);
    }
}

/// UI thread whose tasks only run when the test drains the queue.
#[derive(Default)]
pub struct QueuedUi {
    tasks: Mutex<VecDeque<UiTask>>,
}

impl QueuedUi {
    pub fn pending(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    pub fn drain(&self) {
        loop {
            let task = self.tasks.lock().unwrap().pop_front();
            match task {
                Some(task) => task(),
                None => break,
            }
        }
    }
}

impl UiThread for QueuedUi {
    fn run(&self, task: UiTask) {
        self.tasks.lock().unwrap().push_back(task);
    }
}
