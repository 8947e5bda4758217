//! Mojira API client implementation.
//!
//! This module provides the client for the tracker's search endpoint.
//! It handles request/response processing, error mapping, and retry logic.

use std::time::Duration;

use reqwest::{header, Client, Response, StatusCode};
use tracing::{debug, info, instrument, warn};

use super::error::{ApiError, Result};
use super::types::{JqlSearchRequest, SearchResponse};
use crate::config::Config;
use crate::pager::{Page, PageKey, PAGE_SIZE};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum number of attempts for transient failures.
const MAX_RETRIES: u32 = 3;

/// Base delay between retries in milliseconds.
const RETRY_DELAY_MS: u64 = 1000;

/// Path of the search endpoint, relative to the base URL.
const SEARCH_PATH: &str = "/api/jql-search-post";

/// The Mojira API client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct MojiraClient {
    /// The HTTP client.
    client: Client,
    /// The base URL of the tracker.
    base_url: String,
}

impl MojiraClient {
    /// Create a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is malformed or the HTTP client
    /// cannot be built.
    #[instrument(skip(config), fields(base_url = %config.base_url))]
    pub fn new(config: &Config) -> Result<Self> {
        info!("Creating Mojira client");
        Self::with_timeout(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        if !base_url.starts_with("https://") && !base_url.starts_with("http://") {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mojira/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
        })
    }

    /// Run a search request against the tracker.
    #[instrument(skip(self, request), fields(project = %request.project, start_at = request.start_at))]
    pub async fn search(&self, request: &JqlSearchRequest) -> Result<SearchResponse> {
        debug!(
            "Searching issues: startAt={}, maxResults={}",
            request.start_at, request.max_results
        );

        let url = format!("{}{}", self.base_url, SEARCH_PATH);
        let response: SearchResponse = self.post(&url, request).await?;

        debug!("Received {} issues", response.issues.len());
        Ok(response)
    }

    /// Fetch one page of results for a fetch key.
    ///
    /// The returned page never holds more than [`PAGE_SIZE`] issues.
    #[instrument(skip(self, key), fields(page = key.page))]
    pub async fn fetch_page(&self, key: &PageKey) -> Result<Page> {
        let request = key.search_request();
        let mut response = self.search(&request).await?;

        if response.issues.len() > PAGE_SIZE as usize {
            warn!(
                received = response.issues.len(),
                "Server returned more issues than requested, truncating"
            );
            response.issues.truncate(PAGE_SIZE as usize);
        }

        Ok(Page {
            number: key.page,
            issues: response.issues,
            request,
        })
    }

    /// Web URL for viewing an issue in the browser.
    pub fn issue_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.base_url, key)
    }

    /// Perform a POST request with retry logic for transient failures.
    async fn post<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let mut attempts = 0;
        let mut last_error: Option<ApiError> = None;

        while attempts < MAX_RETRIES {
            attempts += 1;
            debug!("Request attempt {}/{}", attempts, MAX_RETRIES);

            match self.execute_post::<B, T>(url, body).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if Self::is_retryable(&e) && attempts < MAX_RETRIES {
                        let delay = Self::calculate_retry_delay(attempts);
                        warn!(
                            "Request failed (attempt {}), retrying in {}ms: {}",
                            attempts, delay, e
                        );
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                        last_error = Some(e);
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(last_error.unwrap_or(ApiError::ServerError("Max retries exceeded".to_string())))
    }

    /// Execute a single POST request.
    async fn execute_post<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Check the status and parse the JSON body.
    async fn handle_response<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let url = response.url().to_string();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
        } else {
            let error_body = response.text().await.unwrap_or_default();
            debug!("Error response body: {}", error_body);

            Err(Self::error_from_response(status, &url, &error_body))
        }
    }

    /// Create an error from an HTTP response, preferring the server's own messages.
    fn error_from_response(status: StatusCode, url: &str, body: &str) -> ApiError {
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
            let messages: Vec<&str> = json
                .get("errorMessages")
                .and_then(|m| m.as_array())
                .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
                .unwrap_or_default();
            if !messages.is_empty() {
                return ApiError::from_status(status, &messages.join(", "));
            }

            if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
                return ApiError::from_status(status, message);
            }
        }

        ApiError::from_status(status, url)
    }

    /// Check if an error is retryable.
    fn is_retryable(error: &ApiError) -> bool {
        matches!(
            error,
            ApiError::RateLimited | ApiError::ServerError(_) | ApiError::Network(_)
        )
    }

    /// Calculate retry delay with exponential backoff.
    fn calculate_retry_delay(attempt: u32) -> u64 {
        RETRY_DELAY_MS * 2u64.pow(attempt - 1)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Normalize the base URL by removing trailing slashes.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim_end_matches('/');

    if !url.starts_with("https://") && !url.contains("localhost") {
        warn!("URL does not use HTTPS: {}", url);
    }

    url.to_string()
}
