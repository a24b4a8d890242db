use crate::error::{ExporterError, Result};
use crate::sanitize::{sanitize_label, sanitize_value};
use serde::Serialize;
use std::collections::HashMap;

/// The two CSV rows emitted by `nvidia-smi --format=csv`, split on commas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawReading {
    pub header: Vec<String>,
    pub values: Vec<String>,
}

impl RawReading {
    pub fn new(header: Vec<String>, values: Vec<String>) -> Self {
        Self { header, values }
    }

    /// Split tool output into the header row and the first data row.
    /// Rows after the first sample are ignored.
    pub fn from_csv(output: &str) -> Result<Self> {
        let mut lines = output.split('\n');

        let header = lines
            .next()
            .filter(|line| !line.trim().is_empty())
            .ok_or_else(|| ExporterError::MalformedOutput("missing header row".to_string()))?;
        let values = lines
            .next()
            .filter(|line| !line.trim().is_empty())
            .ok_or_else(|| ExporterError::MalformedOutput("missing values row".to_string()))?;

        Ok(Self {
            header: split_row(header),
            values: split_row(values),
        })
    }
}

fn split_row(line: &str) -> Vec<String> {
    line.split(',').map(str::to_string).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SampleValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl SampleValue {
    /// Numeric view used by gauges. Text samples have none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SampleValue::Integer(v) => Some(*v as f64),
            SampleValue::Float(v) => Some(*v),
            SampleValue::Text(_) => None,
        }
    }
}

impl std::fmt::Display for SampleValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleValue::Integer(v) => write!(f, "{}", v),
            SampleValue::Float(v) => write!(f, "{}", v),
            SampleValue::Text(s) => f.write_str(s),
        }
    }
}

/// Sanitized labels and values of one reading, aligned by position.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizedReading {
    labels: Vec<String>,
    data: Vec<SampleValue>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl NormalizedReading {
    /// Build from already sanitized columns. The longer side is truncated so
    /// every label has exactly one value.
    pub fn new(mut labels: Vec<String>, mut data: Vec<SampleValue>) -> Self {
        let len = labels.len().min(data.len());
        labels.truncate(len);
        data.truncate(len);

        let mut index = HashMap::with_capacity(len);
        for (i, label) in labels.iter().enumerate() {
            index.entry(label.clone()).or_insert(i);
        }

        Self {
            labels,
            data,
            index,
        }
    }

    pub fn from_raw(raw: &RawReading) -> Self {
        let labels = raw
            .header
            .iter()
            .map(|field| sanitize_label(&strip_line_breaks(field)))
            .collect();
        let data = raw
            .values
            .iter()
            .map(|field| sanitize_value(&strip_line_breaks(field)))
            .collect();

        Self::new(labels, data)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn data(&self) -> &[SampleValue] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// First value recorded under `key`.
    pub fn get(&self, key: &str) -> Option<&SampleValue> {
        self.index.get(key).map(|&i| &self.data[i])
    }

    pub fn value_of(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(SampleValue::as_f64)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SampleValue)> {
        self.labels.iter().map(String::as_str).zip(self.data.iter())
    }
}

fn strip_line_breaks(field: &str) -> String {
    field.replace(|c| c == '\n' || c == '\r', "")
}
