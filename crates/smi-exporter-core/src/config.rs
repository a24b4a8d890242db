use crate::error::{ExporterError, Result};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 9999;

pub const DEFAULT_QUERY_FIELDS: [&str; 13] = [
    "timestamp",
    "name",
    "pci.bus_id",
    "driver_version",
    "pstate",
    "pcie.link.gen.max",
    "pcie.link.gen.current",
    "temperature.gpu",
    "utilization.gpu",
    "utilization.memory",
    "memory.total",
    "memory.free",
    "memory.used",
];

#[derive(Debug, Clone)]
pub struct ExporterConfig {
    pub port: u16,
    pub smi: SmiConfig,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            smi: SmiConfig::default(),
        }
    }
}

impl ExporterConfig {
    /// Read `PROMETHEUS_PORT` and the `NVIDIA_SMI_*` overrides from the
    /// process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        // an empty value counts as unset
        if let Some(port) = lookup("PROMETHEUS_PORT").filter(|p| !p.trim().is_empty()) {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ExporterError::Config(format!("invalid PROMETHEUS_PORT: {}", port)))?;
        }

        if let Some(program) = lookup("NVIDIA_SMI_PATH").filter(|p| !p.trim().is_empty()) {
            config.smi.program = program;
        }

        if let Some(query) = lookup("NVIDIA_SMI_QUERY") {
            let fields: Vec<String> = query
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect();
            if fields.is_empty() {
                return Err(ExporterError::Config("NVIDIA_SMI_QUERY is empty".to_string()));
            }
            config.smi.query_fields = fields;
        }

        if let Some(secs) = lookup("NVIDIA_SMI_TIMEOUT_SECS") {
            let secs = secs.trim().parse().map_err(|_| {
                ExporterError::Config(format!("invalid NVIDIA_SMI_TIMEOUT_SECS: {}", secs))
            })?;
            config.smi.timeout_secs = Some(secs);
        }

        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct SmiConfig {
    pub program: String,
    pub query_fields: Vec<String>,
    pub timeout_secs: Option<u64>,
}

impl Default for SmiConfig {
    fn default() -> Self {
        Self {
            program: "nvidia-smi".to_string(),
            query_fields: DEFAULT_QUERY_FIELDS.iter().map(|f| f.to_string()).collect(),
            timeout_secs: None,
        }
    }
}

impl SmiConfig {
    pub fn args(&self) -> Vec<String> {
        vec![
            format!("--query-gpu={}", self.query_fields.join(",")),
            "--format=csv".to_string(),
        ]
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ExporterConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 9999);
        assert_eq!(config.smi.program, "nvidia-smi");
        assert_eq!(config.smi.timeout(), None);
        assert_eq!(
            config.smi.args(),
            vec![
                "--query-gpu=timestamp,name,pci.bus_id,driver_version,pstate,pcie.link.gen.max,\
                 pcie.link.gen.current,temperature.gpu,utilization.gpu,utilization.memory,\
                 memory.total,memory.free,memory.used"
                    .to_string(),
                "--format=csv".to_string(),
            ]
        );
    }

    #[test]
    fn test_env_overrides() {
        let config = ExporterConfig::from_lookup(lookup(&[
            ("PROMETHEUS_PORT", "9400"),
            ("NVIDIA_SMI_PATH", "/usr/local/bin/nvidia-smi"),
            ("NVIDIA_SMI_QUERY", "temperature.gpu, utilization.gpu"),
            ("NVIDIA_SMI_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9400);
        assert_eq!(config.smi.program, "/usr/local/bin/nvidia-smi");
        assert_eq!(config.smi.query_fields, vec!["temperature.gpu", "utilization.gpu"]);
        assert_eq!(config.smi.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_empty_port_falls_back_to_default() {
        let config = ExporterConfig::from_lookup(lookup(&[("PROMETHEUS_PORT", "")])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);

        let config = ExporterConfig::from_lookup(lookup(&[("PROMETHEUS_PORT", "  ")])).unwrap();
        assert_eq!(config.port, 9999);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = ExporterConfig::from_lookup(lookup(&[("PROMETHEUS_PORT", "http")])).unwrap_err();
        assert!(matches!(err, ExporterError::Config(_)));

        let err = ExporterConfig::from_lookup(lookup(&[("NVIDIA_SMI_QUERY", " , ")])).unwrap_err();
        assert!(matches!(err, ExporterError::Config(_)));
    }
}
