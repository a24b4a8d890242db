use smi_exporter_core::NormalizedReading;
use std::sync::{Arc, PoisonError, RwLock};

/// Holds the latest normalized reading. Writers swap the whole snapshot;
/// readers get a cheap `Arc` clone that stays valid while they gather.
#[derive(Debug, Default)]
pub struct ReadingStore {
    current: RwLock<Arc<NormalizedReading>>,
}

impl ReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Arc<NormalizedReading> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn replace(&self, reading: NormalizedReading) -> Arc<NormalizedReading> {
        let reading = Arc::new(reading);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = reading.clone();
        reading
    }
}
