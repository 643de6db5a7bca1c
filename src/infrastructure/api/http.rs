//! # HTTP Platform API
//!
//! HTTP implementation of [`PlatformApi`] against the hosted document store.
//!
//! The backend is a plain JSON CRUD service. Every record family lives under
//! its own collection path and records travel as full documents:
//!
//! ```text
//! GET  {base}/proposals/{id}         one record, 404 when absent
//! PUT  {base}/proposals/{id}         full-document upsert
//! GET  {base}/proposals?module=M2    all records in a module
//! ```
//!
//! Non-success responses carry an `{"error": "..."}` body which is surfaced
//! in [`ApiError::Backend`].
//!
//! # Examples
//!
//! ```ignore
//! use recimat::infrastructure::api::http::HttpPlatformApi;
//!
//! let api = HttpPlatformApi::new("https://backend.example.com/v1", 5000)?;
//! let listing = api.get_proposal(&id).await?;
//! ```

use crate::domain::entities::{Commitment, Proposal, Response as DomainResponse, User};
use crate::domain::value_objects::{EntityId, TradeModule, UserId};
use crate::infrastructure::api::error::{ApiError, ApiResult};
use crate::infrastructure::api::traits::PlatformApi;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Error body returned by the backend on rejected requests.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP implementation of [`PlatformApi`].
///
/// Wraps a shared [`reqwest::Client`] with the configured timeout and maps
/// transport failures and backend rejections onto [`ApiError`].
#[derive(Debug, Clone)]
pub struct HttpPlatformApi {
    /// Inner reqwest client.
    client: Client,
    /// Backend base URL without a trailing slash.
    base_url: String,
    /// Request timeout in milliseconds.
    timeout_ms: u64,
}

impl HttpPlatformApi {
    /// Creates a new HTTP platform API client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Backend base URL. A trailing slash is stripped.
    /// * `timeout_ms` - Request timeout in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if the base URL is empty and
    /// `ApiError::Unknown` if the client cannot be created.
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> ApiResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            return Err(ApiError::invalid_url("base url must not be empty"));
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| ApiError::unknown(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            timeout_ms,
        })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Returns the backend base URL.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(segment);
        }
        url
    }

    /// Fetches one record, treating 404 as absence rather than an error.
    async fn fetch_optional<T: DeserializeOwned>(&self, url: String) -> ApiResult<Option<T>> {
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let record = self.handle_response(response).await?;
        Ok(Some(record))
    }

    /// Fetches a collection, optionally narrowed by query parameters.
    async fn fetch_list<T: DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, &str)],
    ) -> ApiResult<Vec<T>> {
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    /// Upserts one record as a full JSON document.
    async fn put_record<B: Serialize + ?Sized>(&self, url: String, body: &B) -> ApiResult<()> {
        let response = self
            .client
            .put(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let error_body = response.text().await.unwrap_or_default();
            Err(self.backend_error(status, &error_body))
        }
    }

    /// Handles the HTTP response, checking status and deserializing JSON.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        let status = response.status();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::decode(format!("Failed to parse response: {}", e)))
        } else {
            let error_body = response.text().await.unwrap_or_default();
            Err(self.backend_error(status, &error_body))
        }
    }

    /// Maps a reqwest error to an ApiError.
    fn map_reqwest_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::timeout_with_duration("Request timed out", self.timeout_ms)
        } else if error.is_connect() {
            ApiError::connection(format!("Connection failed: {}", error))
        } else {
            ApiError::connection(format!("HTTP request failed: {}", error))
        }
    }

    /// Maps a non-success status and its body to an ApiError.
    ///
    /// The backend reports failures as `{"error": "..."}`. Bodies that do not
    /// follow that shape are carried verbatim.
    fn backend_error(&self, status: StatusCode, body: &str) -> ApiError {
        let message = serde_json::from_str::<ErrorBody>(body).map_or_else(
            |_| {
                if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_owned()
                } else {
                    body.to_owned()
                }
            },
            |parsed| parsed.error,
        );
        ApiError::backend(status.as_u16(), message)
    }
}

#[async_trait]
impl PlatformApi for HttpPlatformApi {
    async fn save_proposal(&self, proposal: &Proposal) -> ApiResult<()> {
        self.put_record(self.url(&["proposals", proposal.id().as_str()]), proposal)
            .await
    }

    async fn get_proposal(&self, id: &EntityId) -> ApiResult<Option<Proposal>> {
        self.fetch_optional(self.url(&["proposals", id.as_str()]))
            .await
    }

    async fn list_proposals(&self, module: TradeModule) -> ApiResult<Vec<Proposal>> {
        self.fetch_list(
            self.url(&["proposals"]),
            &[("module", module.id_prefix())],
        )
        .await
    }

    async fn save_response(&self, response: &DomainResponse) -> ApiResult<()> {
        self.put_record(self.url(&["responses", response.id().as_str()]), response)
            .await
    }

    async fn get_response(&self, id: &EntityId) -> ApiResult<Option<DomainResponse>> {
        self.fetch_optional(self.url(&["responses", id.as_str()]))
            .await
    }

    async fn list_responses(&self, module: TradeModule) -> ApiResult<Vec<DomainResponse>> {
        self.fetch_list(
            self.url(&["responses"]),
            &[("module", module.id_prefix())],
        )
        .await
    }

    async fn find_responses_for(&self, proposal_id: &EntityId) -> ApiResult<Vec<DomainResponse>> {
        self.fetch_list(
            self.url(&["responses"]),
            &[("proposal", proposal_id.as_str())],
        )
        .await
    }

    async fn save_commitment(&self, commitment: &Commitment) -> ApiResult<()> {
        self.put_record(
            self.url(&["commitments", commitment.id().as_str()]),
            commitment,
        )
        .await
    }

    async fn get_commitment(&self, id: &EntityId) -> ApiResult<Option<Commitment>> {
        self.fetch_optional(self.url(&["commitments", id.as_str()]))
            .await
    }

    async fn list_commitments(&self) -> ApiResult<Vec<Commitment>> {
        self.fetch_list(self.url(&["commitments"]), &[]).await
    }

    async fn save_user(&self, user: &User) -> ApiResult<()> {
        self.put_record(self.url(&["users", user.id().as_str()]), user)
            .await
    }

    async fn get_user(&self, id: &UserId) -> ApiResult<Option<User>> {
        self.fetch_optional(self.url(&["users", id.as_str()])).await
    }

    async fn list_users(&self) -> ApiResult<Vec<User>> {
        self.fetch_list(self.url(&["users"]), &[]).await
    }

    async fn find_user_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let matches: Vec<User> = self
            .fetch_list(self.url(&["users"]), &[("email", email)])
            .await?;
        Ok(matches.into_iter().next())
    }
}
