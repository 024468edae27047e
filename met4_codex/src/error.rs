// Error type for the codex's fallible edges.
//
// The pipeline stages themselves are total functions; only loading data
// (JSON profiles, ontology files) and compiling name patterns can fail.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CodexError {
    #[error("malformed codex JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid entity pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CodexError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CodexError::Io {
            path: path.into(),
            source,
        }
    }
}
