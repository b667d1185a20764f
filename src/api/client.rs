//! HTTP client for the RouteCall operator backend.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests against the itinerary and attendance-session endpoints. Requests
//! are single-shot; retry policy lives in [`super::ResilientClient`].

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::models::{
    AttendanceSession, ItineraryRosterResponse, OpenSessionResponse, PresenceSubmission,
    RosterEntry, SessionStatus, StatusChangeRequest,
};

use super::{ApiError, AttendanceApi};

// ============================================================================
// Constants
// ============================================================================

/// Default base URL for the operator backend
const DEFAULT_BASE_URL: &str = "https://backend.routecall.app/api";

/// HTTP request timeout in seconds.
/// 30s allows for slow backend responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the operator backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client against the default backend
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a new API client against a specific backend base URL
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(), // Cheap clone, shares connection pool
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| ApiError::InvalidResponse(e.to_string()))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, classifying the failure if not.
    /// A 401 surfaces as `Unauthorized` so the layer above can discard the
    /// credential and re-enter authentication; it is never handled here.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Backend returned non-success status");
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        debug!(url, "GET request");
        let response = self
            .client
            .get(url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", url, e)))
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!(url, "POST request");
        let response = self
            .client
            .post(url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", url, e)))
    }

    /// POST where the backend returns no body beyond success/failure
    async fn post_no_content<B: Serialize>(&self, url: &str, body: &B) -> Result<(), ApiError> {
        debug!(url, "POST request");
        let response = self
            .client
            .post(url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Self::check_response(response).await?;
        Ok(())
    }
}

#[async_trait]
impl AttendanceApi for ApiClient {
    async fn fetch_roster(&self, itinerary_id: &str) -> Result<Vec<RosterEntry>, ApiError> {
        let url = format!("{}/itineraries/{}/roster", self.base_url, itinerary_id);
        let response: ItineraryRosterResponse = self.get(&url).await?;
        debug!(
            itinerary_id,
            count = response.passengers.len(),
            "Roster response received"
        );
        Ok(response.passengers.iter().map(|p| p.to_entry()).collect())
    }

    async fn open_session(&self, itinerary_id: &str) -> Result<AttendanceSession, ApiError> {
        let url = format!(
            "{}/itineraries/{}/attendance-sessions",
            self.base_url, itinerary_id
        );
        let response: OpenSessionResponse = self.post(&url, &serde_json::json!({})).await?;
        debug!(itinerary_id, session_id = %response.id, "Session opened");

        Ok(AttendanceSession {
            id: response.id,
            itinerary_id: itinerary_id.to_string(),
            status: SessionStatus::InProgress,
            opened_at: response.opened_at,
            closed_at: None,
        })
    }

    async fn change_session_status(
        &self,
        session_id: &str,
        status: SessionStatus,
    ) -> Result<(), ApiError> {
        let url = format!("{}/attendance-sessions/{}/status", self.base_url, session_id);
        let body = StatusChangeRequest {
            status: status.api_token(),
        };
        self.post_no_content(&url, &body).await?;
        debug!(session_id, status = %status, "Session status changed");
        Ok(())
    }

    async fn submit_presence(
        &self,
        session_id: &str,
        marks: &BTreeMap<String, &'static str>,
    ) -> Result<(), ApiError> {
        let url = format!(
            "{}/attendance-sessions/{}/presence",
            self.base_url, session_id
        );
        let body = PresenceSubmission { marks };
        self.post_no_content(&url, &body).await?;
        debug!(session_id, count = marks.len(), "Presence submitted");
        Ok(())
    }
}
