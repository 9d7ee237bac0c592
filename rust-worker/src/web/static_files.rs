//! Static asset lookup for the landing page.

use std::path::PathBuf;

use thiserror::Error;

/// Name of the page served on `GET /`.
pub const INDEX_FILE: &str = "index.html";

#[derive(Debug, Error)]
pub enum StaticFileError {
    #[error("invalid static file name: {0:?}")]
    InvalidName(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads files by bare name from a single directory.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Read a file as UTF-8 text. Names may not contain path separators.
    pub async fn read(&self, name: &str) -> Result<String, StaticFileError> {
        if name.is_empty() || name.contains(&['/', '\\'][..]) || name == "." || name == ".." {
            return Err(StaticFileError::InvalidName(name.to_string()));
        }

        let path = self.root.join(name);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| StaticFileError::Io { path, source })
    }
}
