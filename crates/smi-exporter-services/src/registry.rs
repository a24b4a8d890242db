//! Prometheus registry whose gauges pull their value when gathered.

use crate::store::ReadingStore;
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, Gauge, Registry, TextEncoder};
use smi_exporter_core::{ExporterError, GaugeSpec, Result, GPU_GAUGES};
use std::sync::Arc;

/// Supplies a gauge's value at gather time.
pub trait CurrentValueProvider: Send + Sync {
    fn value(&self) -> f64;
}

/// Reads one key from the latest snapshot.
///
/// A key missing from the reading, or holding a non-numeric sample, yields
/// `NaN` so the gauge stays present in the exposition.
pub struct SnapshotValue {
    store: Arc<ReadingStore>,
    key: &'static str,
}

impl SnapshotValue {
    pub fn new(store: Arc<ReadingStore>, key: &'static str) -> Self {
        Self { store, key }
    }
}

impl CurrentValueProvider for SnapshotValue {
    fn value(&self) -> f64 {
        self.store.current().value_of(self.key).unwrap_or(f64::NAN)
    }
}

impl<F> CurrentValueProvider for F
where
    F: Fn() -> f64 + Send + Sync,
{
    fn value(&self) -> f64 {
        self()
    }
}

struct ProviderGauge {
    gauge: Gauge,
    provider: Box<dyn CurrentValueProvider>,
}

impl Collector for ProviderGauge {
    fn desc(&self) -> Vec<&Desc> {
        self.gauge.desc()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        self.gauge.set(self.provider.value());
        self.gauge.collect()
    }
}

#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Registry,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    /// Registry with one gauge per entry of `GPU_GAUGES`, all backed by `store`.
    pub fn for_gpu(store: Arc<ReadingStore>) -> Result<Self> {
        let registry = Self::new();
        for spec in GPU_GAUGES {
            registry.register(spec, SnapshotValue::new(store.clone(), spec.key))?;
        }
        Ok(registry)
    }

    pub fn register(
        &self,
        spec: GaugeSpec,
        provider: impl CurrentValueProvider + 'static,
    ) -> Result<()> {
        let gauge = Gauge::new(spec.key, spec.help)
            .map_err(|e| ExporterError::Registry(format!("gauge {}: {}", spec.key, e)))?;

        self.registry
            .register(Box::new(ProviderGauge {
                gauge,
                provider: Box::new(provider),
            }))
            .map_err(|e| ExporterError::Registry(format!("gauge {}: {}", spec.key, e)))
    }

    /// Gather every gauge, pulling fresh values, and encode as exposition text.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| ExporterError::Encode(format!("Failed to encode metrics: {}", e)))?;

        String::from_utf8(buffer)
            .map_err(|e| ExporterError::Encode(format!("Failed to convert metrics to string: {}", e)))
    }

    pub fn content_type(&self) -> &'static str {
        prometheus::TEXT_FORMAT
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}
