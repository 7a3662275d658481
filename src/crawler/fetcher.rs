//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests, including:
//! - Building the HTTP client with a proper user agent string
//! - GET requests returning the page body
//! - Classifying failures into [`TransportError`] variants
//!
//! There is no retry here. A caller that wants retries or deadlines wraps
//! [`HttpFetcher::fetch`] and maps its own failures to a `TransportError`.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::TransportError;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawler` - Transport settings (timeout, https-only)
///
/// # Example
///
/// ```no_run
/// use devpost_export::config::{CrawlerConfig, UserAgentConfig};
/// use devpost_export::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(user_agent.header_value())
        .https_only(crawler.https_only)
        .gzip(true)
        .brotli(true);

    if let Some(secs) = crawler.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Fetches raw page content over HTTP
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetches a URL and returns its body
    ///
    /// # Error Classification
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | HTTP 404 | `NotFound` |
    /// | HTTP 5xx | `Server` |
    /// | Any other non-2xx | `Status` |
    /// | Connect/timeout/body error | `Network` |
    pub async fn fetch(&self, url: &str) -> Result<String, TransportError> {
        tracing::debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_network_error(url, &e))?;

        check_status(url, response.status())?;

        response
            .text()
            .await
            .map_err(|e| classify_network_error(url, &e))
    }
}

/// Maps a non-success status code to a transport error
pub fn check_status(url: &str, status: StatusCode) -> Result<(), TransportError> {
    if status.is_success() {
        return Ok(());
    }

    let url = url.to_string();
    if status == StatusCode::NOT_FOUND {
        Err(TransportError::NotFound { url })
    } else if status.is_server_error() {
        Err(TransportError::Server {
            url,
            status: status.as_u16(),
        })
    } else {
        Err(TransportError::Status {
            url,
            status: status.as_u16(),
        })
    }
}

fn classify_network_error(url: &str, error: &reqwest::Error) -> TransportError {
    let message = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        "Connection refused".to_string()
    } else {
        error.to_string()
    };

    TransportError::Network {
        url: url.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&UserAgentConfig::default(), &CrawlerConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_http_client_with_timeout() {
        let crawler = CrawlerConfig {
            request_timeout_secs: Some(5),
            ..CrawlerConfig::default()
        };
        assert!(build_http_client(&UserAgentConfig::default(), &crawler).is_ok());
    }

    #[test]
    fn test_check_status_success() {
        assert!(check_status("https://x.test/", StatusCode::OK).is_ok());
        assert!(check_status("https://x.test/", StatusCode::NO_CONTENT).is_ok());
    }

    #[test]
    fn test_check_status_classification() {
        assert_eq!(
            check_status("https://x.test/a", StatusCode::NOT_FOUND),
            Err(TransportError::NotFound {
                url: "https://x.test/a".to_string()
            })
        );
        assert!(matches!(
            check_status("https://x.test/a", StatusCode::BAD_GATEWAY),
            Err(TransportError::Server { status: 502, .. })
        ));
        assert!(matches!(
            check_status("https://x.test/a", StatusCode::FORBIDDEN),
            Err(TransportError::Status { status: 403, .. })
        ));
    }

    #[test]
    fn test_transport_error_status() {
        let err = TransportError::Network {
            url: "https://x.test/".to_string(),
            message: "Connection refused".to_string(),
        };
        assert_eq!(err.status(), None);
        assert_eq!(
            TransportError::NotFound {
                url: String::new()
            }
            .status(),
            Some(404)
        );
    }
}
