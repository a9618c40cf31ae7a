//! HTTP retrieval of the discovery index and per-API description documents.

use crate::{Error, Result};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::info;

/// HTTP client used for every network retrieval in a run.
///
/// One instance is constructed at run start and shared by reference; all
/// retrievals are blocking awaits in call order, there is no fan-out.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a new fetcher with the default request timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Creates a new fetcher with a custom request timeout (primarily for tests).
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("outfitter-disco/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self { client })
    }

    /// Fetches a URL, returning the response body as text.
    ///
    /// Non-success statuses become errors; 404 maps to [`Error::NotFound`]
    /// for a clearer message.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            if status == StatusCode::NOT_FOUND {
                return Err(Error::NotFound(format!("no document at '{url}'")));
            }

            match response.error_for_status() {
                Ok(_) => unreachable!("status should be an error"),
                Err(err) => return Err(Error::Network(err)),
            }
        }

        let content = response.text().await?;
        info!("fetched {} bytes from {}", content.len(), url);
        Ok(content)
    }
}

// Note: Default is not implemented as Fetcher::new() can fail.
// Use Fetcher::new() directly and handle the Result.

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetch_returns_body_on_success() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doc"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"name":"books"}"#))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new()?;
        let body = fetcher.fetch(&format!("{}/doc", server.uri())).await?;
        assert_eq!(body, r#"{"name":"books"}"#);
        Ok(())
    }

    #[tokio::test]
    async fn fetch_maps_404_to_not_found() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new()?;
        let err = fetcher
            .fetch(&format!("{}/missing", server.uri()))
            .await
            .expect_err("404 should error");
        assert!(err.is_retrieval_failure());
        match err {
            Error::NotFound(msg) => assert!(msg.contains("/missing")),
            other => panic!("expected NotFound, got {other}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn fetch_maps_server_errors_to_network() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new()?;
        let err = fetcher
            .fetch(&format!("{}/broken", server.uri()))
            .await
            .expect_err("500 should error");
        assert!(matches!(err, Error::Network(_)));
        assert!(err.is_retrieval_failure());
        Ok(())
    }
}
