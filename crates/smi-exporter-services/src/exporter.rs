use crate::collector::ReadingSource;
use crate::registry::MetricsRegistry;
use crate::store::ReadingStore;
use smi_exporter_core::{NormalizedReading, Result};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Ties a reading source to the snapshot store and the gauge registry.
pub struct Exporter {
    source: Arc<dyn ReadingSource>,
    store: Arc<ReadingStore>,
    registry: MetricsRegistry,
    scrape_lock: Mutex<()>,
}

impl Exporter {
    pub fn new(source: Arc<dyn ReadingSource>) -> Result<Self> {
        let store = Arc::new(ReadingStore::new());
        let registry = MetricsRegistry::for_gpu(store.clone())?;
        info!(gauges = smi_exporter_core::GPU_GAUGES.len(), "Metrics registry ready");

        Ok(Self {
            source,
            store,
            registry,
            scrape_lock: Mutex::new(()),
        })
    }

    /// Collect a fresh reading and make it the current snapshot. On error the
    /// previous snapshot is left untouched.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Arc<NormalizedReading>> {
        let raw = self.source.collect().await?;
        let reading = NormalizedReading::from_raw(&raw);
        debug!(labels = reading.len(), "Reading normalized");
        Ok(self.store.replace(reading))
    }

    /// Refresh, then render every gauge. Scrapes are serialized so each
    /// response reflects its own refresh.
    pub async fn scrape(&self) -> Result<String> {
        let _guard = self.scrape_lock.lock().await;
        self.refresh().await?;
        self.registry.render()
    }

    pub fn reading(&self) -> Arc<NormalizedReading> {
        self.store.current()
    }

    pub fn content_type(&self) -> &'static str {
        self.registry.content_type()
    }
}
