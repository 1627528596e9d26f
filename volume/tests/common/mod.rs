#![allow(dead_code)]

use resonance_volume::{
    ChangeCallback, StreamCategory, VolumeBackend, VolumeError, VolumeObserver,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory audio service with a fixed max step per category.
#[derive(Debug)]
pub struct FakeAudio {
    max: u32,
    steps: Mutex<HashMap<StreamCategory, u32>>,
    pub writes: Mutex<Vec<(StreamCategory, u32, bool)>>,
}

impl FakeAudio {
    pub fn new(max: u32) -> Self {
        Self {
            max,
            steps: Mutex::new(HashMap::new()),
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Change a step without going through the backend API, as hardware
    /// buttons would.
    pub fn press(&self, category: StreamCategory, step: u32) {
        self.steps.lock().unwrap().insert(category, step);
    }

    pub fn step(&self, category: StreamCategory) -> u32 {
        self.steps.lock().unwrap().get(&category).copied().unwrap_or(0)
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }
}

impl VolumeBackend for FakeAudio {
    fn current_step(&self, category: StreamCategory) -> Result<u32, VolumeError> {
        Ok(self.step(category))
    }

    fn max_step(&self, _category: StreamCategory) -> Result<u32, VolumeError> {
        Ok(self.max)
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

/// Observer whose change events are fired by the test.
#[derive(Default)]
pub struct ManualObserver {
    callback: Mutex<Option<ChangeCallback>>,
    pub starts: Mutex<usize>,
    pub stops: Mutex<usize>,
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

    pub fn start_count(&self) -> usize {
        *self.starts.lock().unwrap()
    }

    pub fn stop_count(&self) -> usize {
        *self.stops.lock().unwrap()
    }
}

impl VolumeObserver for ManualObserver {
    fn start(&self, on_change: ChangeCallback) -> Result<(), VolumeError> {
        *self.starts.lock().unwrap() += 1;
        *self.callback.lock().unwrap() = Some(on_change);
        Ok(())
    }

    fn stop(&self) {
        *self.stops.lock().unwrap() += 1;
        *self.callback.lock().unwrap() = None;
    }
}
