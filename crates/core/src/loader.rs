use std::path::PathBuf;

use thiserror::Error;

/// Why a dataset could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("dataset not found (HTTP 404)")]
    NotFound,
    #[error("could not load dataset (HTTP {status})")]
    Http { status: u16 },
    #[error("could not read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("network error: {0}")]
    Network(String),
}

impl FetchError {
    /// Error for a non-success HTTP response.
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => Self::NotFound,
            status => Self::Http { status },
        }
    }
}

/// Supplies the raw text of a dataset. Implemented by whatever knows how to
/// reach the data: a local directory, an HTTP client, a JS `fetch` bridge.
pub trait DatasetLoader {
    fn load(&self, path: &str) -> Result<String, FetchError>;
}

impl<F> DatasetLoader for F
where
    F: Fn(&str) -> Result<String, FetchError>,
{
    fn load(&self, path: &str) -> Result<String, FetchError> {
        self(path)
    }
}

/// Reads datasets from the local filesystem, relative to `root`.
#[derive(Debug, Clone, Default)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DatasetLoader for FsLoader {
    fn load(&self, path: &str) -> Result<String, FetchError> {
        Ok(std::fs::read_to_string(self.root.join(path))?)
    }
}
