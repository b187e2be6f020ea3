use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("plan payload is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("payload of {size} bytes exceeds the store quota of {quota} bytes")]
    QuotaExceeded { size: usize, quota: usize },
    #[error("no home directory to place the plan store in")]
    NoHome,
    #[error("invalid store key '{0}'")]
    InvalidKey(String),
}
