use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BoosterError {
    #[error("failed to read model {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed model json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported booster: {0}")]
    UnsupportedBooster(String),
    #[error("unsupported objective: {0}")]
    UnsupportedObjective(String),
    #[error("invalid model parameter {name}: {value}")]
    InvalidParam { name: &'static str, value: String },
    #[error("tree {tree}: {reason}")]
    InvalidTree { tree: usize, reason: String },
    #[error("feature schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error("feature shape mismatch, expected: {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },
}
