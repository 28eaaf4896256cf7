//! Cover image retrieval

use crate::error::ResourceError;
use std::path::Path;
use std::time::Duration;

/// Source of raw cover image bytes
pub trait CoverSource: Send + Sync {
    /// Fetch the image behind `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::CoverUnavailable`] when the image cannot be
    /// retrieved or is empty.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ResourceError>;
}

/// Fetches covers over HTTP(S); `file://` URLs and bare paths are read from disk
#[derive(Debug, Clone)]
pub struct HttpCoverSource {
    connect_timeout: Duration,
    timeout: Duration,
}

impl HttpCoverSource {
    pub fn new(connect_timeout: Duration, timeout: Duration) -> Self {
        Self {
            connect_timeout,
            timeout,
        }
    }

    fn fetch_http(&self, url: &str) -> Result<Vec<u8>, String> {
        // Built per fetch: a blocking client must not outlive the calling thread's runtime
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .build()
            .map_err(|e| e.to_string())?;

        let response = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| e.to_string())?;

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| e.to_string())
    }
}

impl Default for HttpCoverSource {
    fn default() -> Self {
        Self::new(Duration::from_secs(15), Duration::from_secs(60))
    }
}

impl CoverSource for HttpCoverSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ResourceError> {
        let unavailable = |reason: String| ResourceError::CoverUnavailable {
            url: url.to_string(),
            reason,
        };

        let bytes = if url.starts_with("http://") || url.starts_with("https://") {
            self.fetch_http(url).map_err(unavailable)?
        } else {
            let path = url.strip_prefix("file://").unwrap_or(url);
            std::fs::read(Path::new(path)).map_err(|e| unavailable(e.to_string()))?
        };

        if bytes.is_empty() {
            return Err(unavailable("empty image".to_string()));
        }

        tracing::debug!("Fetched cover from {} ({} bytes)", url, bytes.len());
        Ok(bytes)
    }
}
