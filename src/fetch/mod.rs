// src/fetch/mod.rs
// =============================================================================
// This module downloads the pages we inspect.
//
// Key functionality:
// - One reqwest Client, reused for every URL (connection pooling)
// - Validates the URL before any network traffic
// - Sorts failures into three kinds, because the driver reacts differently
//   to each: invalid URL, unknown host, anything else
//
// Rust concepts:
// - thiserror: derive Display/Error for our own error enum
// - Error::source(): walking the chain of underlying causes
// =============================================================================

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;
use url::Url;

// Settings for the HTTP client
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Per-request timeout (default: 30s)
    pub timeout: Duration,
    /// Maximum number of redirects to follow (default: 10)
    pub max_redirects: usize,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_redirects: 10,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

// Why a page could not be fetched
#[derive(Debug, Error)]
pub enum FetchError {
    /// Not an absolute http(s) URL
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The host name could not be resolved
    #[error("could not resolve host for '{url}': {cause}")]
    UnknownHost { url: String, cause: String },

    /// Timeouts, refused or reset connections, bad status, wrong content type...
    #[error("failed to fetch '{url}': {cause}")]
    Io { url: String, cause: String },
}

// Fetches pages with a shared HTTP client
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }

    /// GETs `url` and returns the body as text.
    ///
    /// The URL is checked first, so a malformed argument never reaches the
    /// network. Non-success statuses and non-HTML content types are reported
    /// as `FetchError::Io`.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = validate_url(url)?;

        tracing::debug!(url, "fetching page");

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| categorize_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Io {
                url: url.to_string(),
                cause: format!("HTTP {}", status.as_u16()),
            });
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_supported_content_type(content_type) {
                return Err(FetchError::Io {
                    url: url.to_string(),
                    cause: format!("unsupported content type '{}'", content_type),
                });
            }
        }

        let body = response.text().await.map_err(|e| categorize_error(url, e))?;

        tracing::debug!(url, bytes = body.len(), "page fetched");

        Ok(body)
    }
}

// Checks that the argument is an absolute http or https URL
fn validate_url(url: &str) -> Result<Url, FetchError> {
    let invalid = |reason: String| FetchError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}

// Only markup is parsed; images, PDFs and the like are rejected.
// The media type is matched without its parameters ("; charset=...").
fn is_supported_content_type(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    media_type.starts_with("text/")
        || media_type == "application/xml"
        || (media_type.starts_with("application/") && media_type.ends_with("+xml"))
}

// Sorts a reqwest error into one of our three kinds
//
// A DNS failure is a connect error with "dns error" somewhere in its cause chain.
fn categorize_error(url: &str, error: reqwest::Error) -> FetchError {
    let cause = error_chain(&error);

    if error.is_builder() {
        FetchError::InvalidUrl { url: url.to_string(), reason: cause }
    } else if error.is_connect() && cause.to_ascii_lowercase().contains("dns") {
        FetchError::UnknownHost { url: url.to_string(), cause }
    } else {
        FetchError::Io { url: url.to_string(), cause }
    }
}

// Joins an error and all of its sources: "outer: inner: innermost"
fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(inner) = source {
        let text = inner.to_string();
        // reqwest 0.11 already appends its direct source to its own message
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = inner.source();
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn fetcher() -> Fetcher {
        let config = FetchConfig {
            timeout: Duration::from_secs(5),
            ..FetchConfig::default()
        };
        Fetcher::new(&config).unwrap()
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("https://example.com/a?b=c").is_ok());
        assert!(matches!(validate_url("example.com"), Err(FetchError::InvalidUrl { .. })));
        assert!(matches!(validate_url("not a url"), Err(FetchError::InvalidUrl { .. })));
        assert!(matches!(validate_url("ftp://example.com"), Err(FetchError::InvalidUrl { .. })));
        assert!(matches!(validate_url(""), Err(FetchError::InvalidUrl { .. })));
    }

    #[test]
    fn test_supported_content_types() {
        assert!(is_supported_content_type("text/html"));
        assert!(is_supported_content_type("text/html; charset=utf-8"));
        assert!(is_supported_content_type("TEXT/HTML"));
        assert!(is_supported_content_type("application/xhtml+xml"));
        assert!(is_supported_content_type("application/xml"));
        assert!(!is_supported_content_type("application/json"));
        assert!(!is_supported_content_type("image/png"));
        assert!(!is_supported_content_type(""));
    }

    #[test]
    fn test_default_config() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("extlinks/"));
    }

    #[tokio::test]
    async fn test_fetch_html_page() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/page");
                then.status(200)
                    .header("content-type", "text/html; charset=utf-8")
                    .body("<a href=\"http://other.com\">x</a>");
            })
            .await;

        let body = fetcher().fetch(&server.url("/page")).await.unwrap();

        mock.assert_async().await;
        assert!(body.contains("http://other.com"));
    }

    #[tokio::test]
    async fn test_not_found_is_io_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/missing");
                then.status(404).body("nope");
            })
            .await;

        let err = fetcher().fetch(&server.url("/missing")).await.unwrap_err();
        match err {
            FetchError::Io { cause, .. } => assert_eq!(cause, "HTTP 404"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unsupported_content_type_is_io_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/logo.png");
                then.status(200).header("content-type", "image/png").body("PNG");
            })
            .await;

        let err = fetcher().fetch(&server.url("/logo.png")).await.unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
    }

    #[tokio::test]
    async fn test_invalid_url_makes_no_request() {
        let err = fetcher().fetch("htp:/broken").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_unresolvable_host() {
        // .invalid is reserved and never resolves
        let err = fetcher().fetch("http://no-such-host.invalid/").await.unwrap_err();
        assert!(matches!(err, FetchError::UnknownHost { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_refused_connection_is_io_error() {
        // Bind to learn a free port, then release it
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let err = fetcher()
            .fetch(&format!("http://127.0.0.1:{}/", port))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }), "got {err:?}");
    }
}
