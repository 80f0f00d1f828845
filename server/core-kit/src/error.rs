use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GestureError {
    #[error("unsupported config file type: {0}")]
    UnsupportedConfig(PathBuf),
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("invalid config value `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
    #[error("failed to parse frame at line {line}: {source}")]
    TraceParse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read trace: {0}")]
    TraceIo(#[from] std::io::Error),
}
