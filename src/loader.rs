use std::path::{Path, PathBuf};

use crate::error::LoadError;

/// Where the raw sales CSV lives.
///
/// The dashboard normally reads from disk, but a client that cannot reach the
/// endpoint fetches the same file over HTTP and runs the identical transform,
/// so both carriers live behind one type.
#[derive(Debug, Clone)]
pub enum SalesSource {
    File(PathBuf),
    Url(String),
}

impl SalesSource {
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// Returns the complete raw text of the source.
    pub async fn load(&self) -> Result<String, LoadError> {
        match self {
            Self::File(path) => Ok(tokio::fs::read_to_string(path).await?),
            Self::Url(url) => fetch_text(url).await,
        }
    }
}

async fn fetch_text(url: &str) -> Result<String, LoadError> {
    let response = reqwest::get(url).await?.error_for_status()?;
    Ok(response.text().await?)
}
