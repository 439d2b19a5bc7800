//! Glance registry API client.
//!
//! Async HTTP client using `reqwest` with Bearer token authentication.

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::ApiError;
use crate::types::{NextRunInfo, OpenRunRequest, OpenRunResponse, QueryRunInfoRequest};

const DEFAULT_BASE_URL: &str = "https://api.useglance.dev/v1";

/// Glance registry API client.
///
/// Holds one keep-alive `reqwest::Client`; a single instance is meant to
/// be reused for every call of an invocation.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a new client authenticated with the given API token.
    pub fn new(api_token: &str) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_token}")).map_err(|_| ApiError::Auth)?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Overrides the API endpoint (tests, self-hosted registries).
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Performs an authenticated POST request with a JSON body.
    async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        let resp = self.http.post(&url).json(body).send().await?;
        let status = resp.status();
        tracing::debug!(endpoint, status = status.as_u16(), "registry response");

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Auth);
        }

        let bytes = resp.bytes().await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            return Err(match_remote_error(status.as_u16(), body));
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Queries the registry for per-platform binary info and the index the
    /// next run would get. One batched request for all tested platforms.
    pub async fn query_run_info(
        &self,
        request: &QueryRunInfoRequest,
    ) -> Result<NextRunInfo, ApiError> {
        self.post("/runs/next-info", request).await
    }

    /// Opens a test run and returns its record.
    pub async fn open_run(&self, request: &OpenRunRequest) -> Result<OpenRunResponse, ApiError> {
        self.post("/runs/open", request).await
    }
}

/// Maps well-known registry error bodies to dedicated variants.
fn match_remote_error(status: u16, body: String) -> ApiError {
    if body.contains("snapshotsLimitIsExceeded") {
        ApiError::SnapshotsLimitExceeded
    } else if body.contains("planIsInactive") {
        ApiError::PlanInactive
    } else {
        ApiError::Api { status, body }
    }
}
