use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InimergeError {
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
