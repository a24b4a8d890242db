pub mod config;
pub mod error;
pub mod gauges;
pub mod reading;
pub mod sanitize;

pub use config::{ExporterConfig, SmiConfig, DEFAULT_PORT, DEFAULT_QUERY_FIELDS};
pub use error::{ExporterError, Result};
pub use gauges::{GaugeSpec, GPU_GAUGES};
pub use reading::{NormalizedReading, RawReading, SampleValue};
pub use sanitize::{sanitize_label, sanitize_value};
