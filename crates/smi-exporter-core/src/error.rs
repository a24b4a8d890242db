use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExporterError {
    #[error("{program} not found - is the NVIDIA driver installed?")]
    ToolNotFound {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    ToolFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("{program} did not finish within {secs}s")]
    Timeout { program: String, secs: u64 },

    #[error("Malformed tool output: {0}")]
    MalformedOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Encoding error: {0}")]
    Encode(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ExporterError>;
