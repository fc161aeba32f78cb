use std::sync::{Arc, Mutex};
use std::time::Duration;

mod effect_test;
mod event_test;
mod sample_test;
mod stream_ext_test;

/// Collects whatever a subscriber sees, in order.
#[derive(Clone)]
pub struct Recorder<T> {
    seen: Arc<Mutex<Vec<T>>>,
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self {
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T: Clone> Recorder<T> {
    pub fn push(&self, value: T) {
        self.seen.lock().unwrap().push(value);
    }

    pub fn seen(&self) -> Vec<T> {
        self.seen.lock().unwrap().clone()
    }
}

/// Resolves with `value` after `millis` milliseconds.
pub async fn delayed<T>(millis: u64, value: T) -> T {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    value
}
