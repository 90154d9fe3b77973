//! Startup session check.
//!
//! Evaluated once when the app launches, before any screen renders:
//! decide whether the cached session is still usable, expired but
//! refreshable, or dead. Offline is reported as its own outcome so the
//! UI can say "check your connection" instead of forcing a re-login.

use std::future::Future;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::api::ApiError;
use crate::auth::TokenManager;

/// Connect timeout for the reachability probe
const PROBE_TIMEOUT_SECS: u64 = 3;

/// Outcome of the startup session check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// Access token is still live; proceed into the app.
    Valid,
    /// Access token was expired but a refresh succeeded; proceed.
    Refreshed,
    /// No usable session; route to login.
    Dead,
    /// No transport reachable; nothing was attempted.
    Offline,
}

impl BootstrapOutcome {
    /// True when the session can be used without re-authenticating.
    pub fn is_usable(&self) -> bool {
        matches!(self, BootstrapOutcome::Valid | BootstrapOutcome::Refreshed)
    }

    /// Message for the login/retry affordance. Dead and Offline read
    /// differently so the user knows whether to log in again or check
    /// their connection.
    pub fn user_message(&self) -> Option<String> {
        match self {
            BootstrapOutcome::Valid | BootstrapOutcome::Refreshed => None,
            BootstrapOutcome::Dead => Some(ApiError::SessionExpired.user_message()),
            BootstrapOutcome::Offline => Some(ApiError::Offline.user_message()),
        }
    }
}

/// New tokens minted by a refresh call. The refresh token is only present
/// when the backend rotated it.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// The wire half of a token refresh. Implemented by `ApiClient`; tests
/// substitute a fake to observe call counts.
pub trait RefreshTokens {
    fn request_token_refresh(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = Result<TokenPair, ApiError>> + Send;
}

/// Reachability precondition checked before any startup network call.
pub trait ConnectivityProbe {
    fn is_online(&self) -> impl Future<Output = bool> + Send;
}

/// Probe that attempts a TCP connect to the backend origin.
pub struct TcpProbe {
    host: String,
    port: u16,
}

impl TcpProbe {
    /// Build a probe from an origin URL such as `https://api.example.com`.
    pub fn from_origin(origin: &str) -> Result<Self, ApiError> {
        let url = reqwest::Url::parse(origin)
            .map_err(|e| ApiError::InvalidResponse(format!("Bad origin URL: {}", e)))?;
        let host = url
            .host_str()
            .ok_or_else(|| ApiError::InvalidResponse("Origin URL has no host".into()))?
            .to_string();
        let port = url.port_or_known_default().unwrap_or(443);
        Ok(Self { host, port })
    }

    fn probe_blocking(host: &str, port: u16) -> bool {
        let addrs = match (host, port).to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                debug!(host, error = %e, "DNS resolution failed in probe");
                return false;
            }
        };
        for addr in addrs {
            if TcpStream::connect_timeout(&addr, Duration::from_secs(PROBE_TIMEOUT_SECS)).is_ok() {
                return true;
            }
        }
        false
    }
}

impl ConnectivityProbe for TcpProbe {
    /// The connect itself blocks, so it runs on the blocking pool instead
    /// of stalling the async executor for up to the probe timeout.
    async fn is_online(&self) -> bool {
        let host = self.host.clone();
        let port = self.port;
        tokio::task::spawn_blocking(move || Self::probe_blocking(&host, port))
            .await
            .unwrap_or(false)
    }
}

/// One-shot startup state machine over the token store.
pub struct SessionBootstrapper<'a> {
    tokens: &'a TokenManager,
}

impl<'a> SessionBootstrapper<'a> {
    pub fn new(tokens: &'a TokenManager) -> Self {
        Self { tokens }
    }

    /// Run the startup check. Makes at most one network call (the refresh).
    pub async fn run(
        &self,
        probe: &impl ConnectivityProbe,
        auth: &impl RefreshTokens,
    ) -> BootstrapOutcome {
        if !probe.is_online().await {
            info!("No network transport reachable, skipping session check");
            return BootstrapOutcome::Offline;
        }

        let now = Utc::now().timestamp_millis();
        if now <= self.tokens.access_expiry() {
            debug!("Access token still live");
            return BootstrapOutcome::Valid;
        }

        if now <= self.tokens.refresh_expiry() {
            return self.try_refresh(auth).await;
        }

        info!("Both tokens expired, session is dead");
        BootstrapOutcome::Dead
    }

    async fn try_refresh(&self, auth: &impl RefreshTokens) -> BootstrapOutcome {
        let Some(refresh_token) = self.tokens.refresh_token() else {
            warn!("Refresh window open but no refresh token stored");
            return BootstrapOutcome::Dead;
        };

        match auth.request_token_refresh(&refresh_token).await {
            Ok(pair) => {
                let persisted = match pair.refresh_token {
                    // Rotated refresh token: rewrite both tokens. The user
                    // uuid is left untouched either way.
                    Some(ref rotated) => self.tokens.update_tokens(&pair.access_token, rotated),
                    None => self.tokens.update_access_token(&pair.access_token),
                };
                if let Err(e) = persisted {
                    warn!(error = %e, "Failed to persist refreshed tokens");
                    return BootstrapOutcome::Dead;
                }
                info!("Session refreshed");
                BootstrapOutcome::Refreshed
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed");
                BootstrapOutcome::Dead
            }
        }
    }
}
