use crate::extractor::default::DEFAULT_UA;
use crate::media::StreamDescriptor;

use super::error::ExtractorError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use tracing::debug;

/// Base request helper shared by every provider.
///
/// Wraps a `reqwest::Client` and injects a fixed set of default headers into
/// each request. Per-call headers passed to [`PageFetcher::fetch_page_text`]
/// override the defaults.
///
/// # Example Usage
///
/// ```rust,no_run
/// # use reqwest::Client;
/// # use platforms_parser::extractor::platform_extractor::{Extractor, PageFetcher};
/// #
/// # async fn doc_test() -> Result<(), Box<dyn std::error::Error>> {
/// let mut extractor = Extractor::new("gogoanime", Client::new());
/// extractor.set_referer("https://gogoanime3.co/");
///
/// let html = extractor
///     .fetch_page_text("https://gogoanime3.co/search.html?keyword=naruto", &[])
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Extractor {
    // name of the provider, e.g., "gogoanime", "anilist"...
    pub platform_name: String,
    pub client: Client,
    platform_headers: HeaderMap,
}

impl Extractor {
    pub fn new<S: Into<String>>(platform_name: S, client: Client) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_static(DEFAULT_UA),
        );
        default_headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        default_headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.5"),
        );
        // Do not set `Accept-Encoding` here.
        // Reqwest auto-adds it (and auto-decompresses) when the corresponding
        // crate features are enabled, as long as we don't override the header.

        Self {
            platform_name: platform_name.into(),
            client,
            platform_headers: default_headers,
        }
    }

    pub fn set_referer<V: AsRef<str>>(&mut self, referer: V) {
        self.add_header_typed(reqwest::header::REFERER, referer);
    }

    pub fn set_user_agent<V: AsRef<str>>(&mut self, user_agent: V) {
        self.add_header_typed(reqwest::header::USER_AGENT, user_agent);
    }

    pub fn add_header_typed<K: Into<HeaderName>, V: AsRef<str>>(&mut self, key: K, value: V) {
        match HeaderValue::from_str(value.as_ref()) {
            Ok(value) => {
                self.platform_headers.insert(key.into(), value);
            }
            Err(e) => {
                debug!(error = %e, "Invalid header value; skipping");
            }
        }
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.request(Method::POST, url)
    }

    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .headers(self.platform_headers.clone())
    }

    /// Sends `request` and returns the body when the status is a success.
    pub async fn send_text(&self, request: RequestBuilder) -> Result<String, ExtractorError> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().to_string();
        if !status.is_success() {
            return Err(ExtractorError::RequestFailure {
                url,
                reason: format!("HTTP {status}"),
            });
        }
        Ok(response.text().await?)
    }
}

/// Source of raw page text.
///
/// Extraction and scraping code depends on this trait rather than on a
/// concrete HTTP client so that it can run against in-memory fixtures.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page_text(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<String, ExtractorError>;
}

#[async_trait]
impl PageFetcher for Extractor {
    async fn fetch_page_text(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<String, ExtractorError> {
        debug!(platform = %self.platform_name, url, "fetching page");
        let mut request = self.get(url);
        for (key, value) in headers {
            request = request.header(*key, *value);
        }
        self.send_text(request).await
    }
}

/// Turns an embed-player page URL into a playable stream description.
#[async_trait]
pub trait StreamExtractor: Send + Sync {
    fn name(&self) -> &str;

    async fn extract(&self, page_url: &str) -> Result<StreamDescriptor, ExtractorError>;
}
