//! Remote asset fetching (clinic logos).

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to fetch asset: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("asset request returned status {0}")]
    Status(u16),
    #[error("asset response was empty")]
    Empty,
}

/// Something that can download the raw bytes behind a URL.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError>;
}

/// Adds an `https://` scheme to URLs typed without one (the logo field accepts `clinic.org/logo.png`).
pub fn normalise_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// HTTP implementation of [`AssetFetcher`].
#[derive(Clone, Debug, Default)]
pub struct HttpAssetFetcher {
    http: reqwest::Client,
}

impl HttpAssetFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl AssetFetcher for HttpAssetFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        let url = normalise_url(url);
        tracing::debug!(%url, "fetching asset");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AssetError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(AssetError::Empty);
        }
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_normalise_url_adds_https_scheme() {
        assert_eq!(
            normalise_url("clinic.org/logo.png"),
            "https://clinic.org/logo.png"
        );
        assert_eq!(
            normalise_url("http://clinic.org/logo.png"),
            "http://clinic.org/logo.png"
        );
    }

    #[tokio::test]
    async fn test_fetch_returns_body_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/logo.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
            .mount(&server)
            .await;

        let fetcher = HttpAssetFetcher::new();
        let bytes = fetcher
            .fetch(&format!("{}/logo.png", server.uri()))
            .await
            .unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_fetch_reports_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpAssetFetcher::new();
        let err = fetcher
            .fetch(&format!("{}/missing.png", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, AssetError::Status(404)));
    }

    #[tokio::test]
    async fn test_fetch_rejects_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let fetcher = HttpAssetFetcher::new();
        let err = fetcher
            .fetch(&format!("{}/blank.png", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, AssetError::Empty));
    }
}
