use async_trait::async_trait;
use smi_exporter_core::{ExporterError, RawReading, Result, SmiConfig};
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, error, instrument, warn};

/// Something that can produce one raw GPU reading on demand.
#[async_trait]
pub trait ReadingSource: Send + Sync {
    async fn collect(&self) -> Result<RawReading>;
}

/// Runs `nvidia-smi --query-gpu=... --format=csv` and captures its output.
#[derive(Debug, Clone)]
pub struct SmiCollector {
    config: SmiConfig,
}

impl SmiCollector {
    pub fn new(config: SmiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SmiConfig {
        &self.config
    }

    async fn run(&self) -> Result<Output> {
        let program = &self.config.program;
        let mut command = Command::new(program);
        command.args(self.config.args()).kill_on_drop(true);
        let output = command.output();

        let output = match self.config.timeout() {
            Some(limit) => tokio::time::timeout(limit, output)
                .await
                .map_err(|_| ExporterError::Timeout {
                    program: program.clone(),
                    secs: limit.as_secs(),
                })?,
            None => output.await,
        };

        output.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                error!("{} not found", program);
                ExporterError::ToolNotFound {
                    program: program.clone(),
                    source: e,
                }
            } else {
                error!("{} execution failed: {}", program, e);
                ExporterError::Io(e)
            }
        })
    }
}

impl Default for SmiCollector {
    fn default() -> Self {
        Self::new(SmiConfig::default())
    }
}

#[async_trait]
impl ReadingSource for SmiCollector {
    #[instrument(skip(self), fields(program = %self.config.program))]
    async fn collect(&self) -> Result<RawReading> {
        debug!("Fetching GPU reading");
        let output = self.run().await?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();

        if !output.status.success() {
            return Err(ExporterError::ToolFailed {
                program: self.config.program.clone(),
                status: output.status.to_string(),
                stderr: stderr.to_string(),
            });
        }

        if !stderr.is_empty() {
            warn!(stderr, "GPU query wrote to stderr");
        }

        let reading = RawReading::from_csv(&String::from_utf8_lossy(&output.stdout))?;
        debug!(fields = reading.header.len(), "GPU reading captured");
        Ok(reading)
    }
}
