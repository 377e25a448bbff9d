use crate::core::WorkbookSource;
use crate::utils::error::{CoverageError, Result};
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

/// Where the published workbook lives when nothing else is configured.
pub const DEFAULT_SOURCE: &str = "public/2025IBMTechnologyCoverageData.xlsx";

/// One GET against a static URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: String,
    timeout: Option<Duration>,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl WorkbookSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        tracing::debug!("Requesting workbook from: {}", self.url);

        let mut request = self.client.get(&self.url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await?;

        tracing::debug!("Response status: {}", response.status());
        if !response.status().is_success() {
            return Err(CoverageError::Transport {
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl WorkbookSource for FileSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        tracing::debug!("Reading workbook from: {}", self.path.display());
        let data = tokio::fs::read(&self.path).await?;
        Ok(data)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Source picked from a location string: URLs go over HTTP, anything else is a file.
#[derive(Debug, Clone)]
pub enum Source {
    Http(HttpSource),
    File(FileSource),
}

impl Source {
    pub fn from_location(location: &str, timeout: Option<Duration>) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Source::Http(HttpSource::new(location).with_timeout(timeout))
        } else {
            Source::File(FileSource::new(location))
        }
    }
}

impl WorkbookSource for Source {
    async fn fetch(&self) -> Result<Vec<u8>> {
        match self {
            Source::Http(source) => source.fetch().await,
            Source::File(source) => source.fetch().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            Source::Http(source) => source.describe(),
            Source::File(source) => source.describe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_http_source_returns_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/coverage.xlsx");
            then.status(200).body("workbook-bytes");
        });

        let source = HttpSource::new(server.url("/coverage.xlsx"));
        let bytes = source.fetch().await.unwrap();

        mock.assert();
        assert_eq!(bytes, b"workbook-bytes");
    }

    #[tokio::test]
    async fn test_http_source_non_success_is_transport_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing.xlsx");
            then.status(404);
        });

        let source = HttpSource::new(server.url("/missing.xlsx"));
        let err = source.fetch().await.unwrap_err();

        assert!(matches!(err, CoverageError::Transport { status: 404 }));
        assert_eq!(err.to_string(), "HTTP error! status: 404");
    }

    #[tokio::test]
    async fn test_file_source_reads_bytes() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();

        let source = Source::from_location(file.path().to_str().unwrap(), None);
        assert!(matches!(source, Source::File(_)));
        assert_eq!(source.fetch().await.unwrap(), b"abc");
    }

    #[test]
    fn test_location_selects_http() {
        let source = Source::from_location("https://example.com/c.xlsx", None);
        assert!(matches!(source, Source::Http(_)));
        assert_eq!(source.describe(), "https://example.com/c.xlsx");
    }
}
