use std::path::PathBuf;

use thiserror::Error;

use crate::descriptor::UnsupportedKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("type `{rendered}` has no fields and cannot become a model")]
    NotComposite { rendered: String },

    #[error("type of kind `{0}` cannot become a model")]
    Unsupported(UnsupportedKind),

    /// Two different shapes mapped to one id. Indicates a broken descriptor
    /// (e.g. two hand-written descriptors claiming the same unit and name).
    #[error("model id `{id}` claimed by two shapes: `{existing}` and `{incoming}`")]
    IdCollision { id: String, existing: String, incoming: String },
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("route {method} {path}: {source}")]
    Route {
        method: String,
        path: String,
        #[source]
        source: CompileError,
    },

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path} at {at}: {message}")]
    Parse { path: PathBuf, at: String, message: String },
}
