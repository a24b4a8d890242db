mod collector;
mod exporter;
mod registry;
mod store;

pub use collector::{ReadingSource, SmiCollector};
pub use exporter::Exporter;
pub use registry::{CurrentValueProvider, MetricsRegistry, SnapshotValue};
pub use store::ReadingStore;

// Re-export core types so binaries only import from services
pub use smi_exporter_core::{
    ExporterConfig, ExporterError, GaugeSpec, NormalizedReading, RawReading, Result, SampleValue,
    SmiConfig, GPU_GAUGES,
};
