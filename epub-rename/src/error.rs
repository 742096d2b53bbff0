use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Not an epub container: {}", path.display())]
    NotAContainer { path: PathBuf },

    #[error("Cannot read metadata from {}: {reason}", path.display())]
    MetadataUnavailable { path: PathBuf, reason: String },

    #[error("No author found in {}", path.display())]
    NoAuthor { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    pub(crate) fn unavailable(path: &std::path::Path, reason: impl Into<String>) -> Self {
        Self::MetadataUnavailable {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
