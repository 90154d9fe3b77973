//! API client for the divvy backend.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests against the bill-splitting REST API: login, token refresh,
//! and the group/transaction/user/category/debt endpoints.
//!
//! The backend origin is injected as a value at construction (it is
//! discovered out-of-band and persisted in `Config`, not hardcoded).
//! The bearer token is read fresh from the `TokenManager` on every
//! request build; the header value is never cached across calls.

use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::auth::bootstrap::{RefreshTokens, TokenPair};
use crate::auth::TokenManager;
use crate::models::{CalculateDebtResponse, Category, Group, SettleUpRequest, Transaction, User};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(rename = "refreshToken")]
    refresh_token: String,
    #[serde(rename = "userUuid")]
    user_uuid: String,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    #[serde(rename = "refreshToken")]
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(rename = "accessToken")]
    access_token: Option<String>,
    #[serde(rename = "refreshToken")]
    refresh_token: Option<String>,
}

/// API client for the divvy backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: TokenManager,
}

impl ApiClient {
    /// Create a new API client against the given origin.
    pub fn new(base_url: impl Into<String>, tokens: TokenManager) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self {
            client,
            base_url,
            tokens,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if a response is successful, decoding the error body if not.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Authenticated GET. The bearer token is read at call time; a failed
    /// call surfaces once - there is no retry.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        let mut request = self.client.get(&url);
        if let Some(token) = self.tokens.access_token() {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let response = Self::check(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", url, e)))
    }

    /// Authenticated POST with a JSON body. Single-shot, like `get`.
    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let mut request = self.client.post(&url).json(body);
        if let Some(token) = self.tokens.access_token() {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let response = Self::check(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", url, e)))
    }

    // ===== Auth =====

    /// Log in with credentials. On success the full session (access token,
    /// refresh token, user uuid) is persisted through the token manager.
    /// Returns the authenticated user's uuid.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let url = self.url("/auth/login");
        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let response = Self::check(response).await?;
        let login: LoginResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("login: {}", e)))?;

        if let Err(e) = self.tokens.save_session(
            &login.access_token,
            &login.refresh_token,
            &login.user_uuid,
        ) {
            warn!(error = %e, "Failed to persist session after login");
        }
        info!("Logged in");
        Ok(login.user_uuid)
    }

    // ===== Data fetching =====

    /// Fetch the groups a user belongs to
    pub async fn fetch_groups(&self, user_uuid: &str) -> Result<Vec<Group>, ApiError> {
        self.get(&format!("/api/group/getGroupsByUser/{}", user_uuid))
            .await
    }

    /// Fetch all transactions recorded in a group
    pub async fn fetch_transactions(&self, group_id: i64) -> Result<Vec<Transaction>, ApiError> {
        self.get(&format!("/api/transaction/getTransactionsByGroup/{}", group_id))
            .await
    }

    /// Fetch a user's profile
    pub async fn fetch_user(&self, user_uuid: &str) -> Result<User, ApiError> {
        self.get(&format!("/api/user/getUserByUuid/{}", user_uuid))
            .await
    }

    /// Fetch the expense category catalog (with subcategories)
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get("/api/category/getCategories").await
    }

    /// Fetch the backend-computed debt summary for a group
    pub async fn fetch_debt_summary(&self, group_id: i64) -> Result<CalculateDebtResponse, ApiError> {
        self.get(&format!("/api/debt/calculateDebt/{}", group_id))
            .await
    }

    /// Record a settle-up payment between two group members
    pub async fn settle_up(&self, request: &SettleUpRequest) -> Result<Transaction, ApiError> {
        self.post("/api/transaction/settleUp", request).await
    }
}

impl RefreshTokens for ApiClient {
    /// Exchange the refresh token for a new access token. A 2xx body with
    /// no access token counts as a failure; the stored session is never
    /// touched here - the bootstrapper persists on success.
    async fn request_token_refresh(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let url = self.url("/auth/refreshToken");
        let response = self
            .client
            .post(&url)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;
        let response = Self::check(response).await?;
        let refreshed: RefreshResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("refresh: {}", e)))?;

        match refreshed.access_token {
            Some(access_token) if !access_token.is_empty() => {
                debug!(rotated = refreshed.refresh_token.is_some(), "Access token refreshed");
                Ok(TokenPair {
                    access_token,
                    refresh_token: refreshed.refresh_token.filter(|t| !t.is_empty()),
                })
            }
            _ => Err(ApiError::InvalidResponse(
                "Refresh response carried no access token".into(),
            )),
        }
    }
}
