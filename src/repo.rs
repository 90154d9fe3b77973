//! Cache-aware data access.
//!
//! `Repository` sits between the API client and the local cache: fresh
//! cache entries are served without a network call, stale or missing
//! entries trigger a fetch, and when the network is down a stale entry is
//! still better than nothing, so transport failures fall back to whatever
//! the cache holds.

use anyhow::Result;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::CredentialStore;
use crate::cache::manager::{CATEGORY_STALE_MINUTES, GROUP_STALE_MINUTES, USER_STALE_MINUTES};
use crate::cache::CacheManager;
use crate::models::{CalculateDebtResponse, Category, Group, SettleUpRequest, Transaction, User};

/// Maximum concurrent per-group transaction fetches during a full refresh.
/// Keeps a refresh quick without flooding the backend.
const MAX_CONCURRENT_REQUESTS: usize = 4;

pub struct Repository {
    client: ApiClient,
    cache: CacheManager,
}

impl Repository {
    pub fn new(client: ApiClient, cache: CacheManager) -> Self {
        Self { client, cache }
    }

    /// Log in with credentials. With `remember` set, the credentials are
    /// stored in the OS keychain after a successful login so the next
    /// launch can use [`Repository::login_with_saved_credentials`] with
    /// the email kept in `Config::last_email`. Returns the user's uuid.
    pub async fn login(&self, email: &str, password: &str, remember: bool) -> Result<String> {
        let user_uuid = self.client.login(email, password).await?;
        if remember {
            if let Err(e) = CredentialStore::store(email, password) {
                warn!(error = %e, "Failed to store credentials in keychain");
            }
        }
        Ok(user_uuid)
    }

    /// Log in with the keychain password remembered for `email`.
    pub async fn login_with_saved_credentials(&self, email: &str) -> Result<String> {
        let password = CredentialStore::get_password(email)?;
        Ok(self.client.login(email, &password).await?)
    }

    /// A user's profile: cache within 24h, otherwise refetch.
    pub async fn user(&self, uuid: &str) -> Result<User> {
        if let Some(cached) = self.cache.load_user(uuid)? {
            if !cached.is_stale_after(USER_STALE_MINUTES) {
                debug!(uuid, "Serving user from cache");
                return Ok(cached.data);
            }
        }
        match self.client.fetch_user(uuid).await {
            Ok(user) => {
                self.cache.save_user(&user)?;
                Ok(user)
            }
            Err(e) if e.is_transport() => self.stale_user_fallback(uuid, e),
            Err(e) => Err(e.into()),
        }
    }

    fn stale_user_fallback(&self, uuid: &str, err: ApiError) -> Result<User> {
        match self.cache.load_user(uuid)? {
            Some(cached) => {
                warn!(uuid, error = %err, "Network down, serving stale user from cache");
                Ok(cached.data)
            }
            None => Err(err.into()),
        }
    }

    /// The category catalog: slow-changing, cached for 7 days.
    pub async fn categories(&self) -> Result<Vec<Category>> {
        if let Some(cached) = self.cache.load_categories()? {
            if !cached.is_stale_after(CATEGORY_STALE_MINUTES) {
                debug!("Serving categories from cache");
                return Ok(cached.data);
            }
        }
        match self.client.fetch_categories().await {
            Ok(categories) => {
                self.cache.save_categories(&categories)?;
                Ok(categories)
            }
            Err(e) if e.is_transport() => match self.cache.load_categories()? {
                Some(cached) => {
                    warn!(error = %e, "Network down, serving stale categories from cache");
                    Ok(cached.data)
                }
                None => Err(e.into()),
            },
            Err(e) => Err(e.into()),
        }
    }

    /// A user's groups: cached for an hour.
    pub async fn groups(&self, user_uuid: &str) -> Result<Vec<Group>> {
        if let Some(cached) = self.cache.load_groups(user_uuid)? {
            if !cached.is_stale_after(GROUP_STALE_MINUTES) {
                debug!(user_uuid, "Serving groups from cache");
                return Ok(cached.data);
            }
        }
        match self.client.fetch_groups(user_uuid).await {
            Ok(groups) => {
                self.cache.save_groups(user_uuid, &groups)?;
                Ok(groups)
            }
            Err(e) if e.is_transport() => match self.cache.load_groups(user_uuid)? {
                Some(cached) => {
                    warn!(user_uuid, error = %e, "Network down, serving stale groups from cache");
                    Ok(cached.data)
                }
                None => Err(e.into()),
            },
            Err(e) => Err(e.into()),
        }
    }

    /// A group's transactions: cached for an hour.
    pub async fn transactions(&self, group_id: i64) -> Result<Vec<Transaction>> {
        if let Some(cached) = self.cache.load_transactions(group_id)? {
            if !cached.is_stale_after(GROUP_STALE_MINUTES) {
                debug!(group_id, "Serving transactions from cache");
                return Ok(cached.data);
            }
        }
        match self.client.fetch_transactions(group_id).await {
            Ok(transactions) => {
                self.cache.save_transactions(group_id, &transactions)?;
                Ok(transactions)
            }
            Err(e) if e.is_transport() => match self.cache.load_transactions(group_id)? {
                Some(cached) => {
                    warn!(group_id, error = %e, "Network down, serving stale transactions from cache");
                    Ok(cached.data)
                }
                None => Err(e.into()),
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Debt summaries are computed on the backend and always fetched live.
    pub async fn debt_summary(&self, group_id: i64) -> Result<CalculateDebtResponse> {
        Ok(self.client.fetch_debt_summary(group_id).await?)
    }

    /// Record a settle-up payment and fold it into the cached transactions.
    pub async fn settle_up(&self, request: &SettleUpRequest) -> Result<Transaction> {
        let transaction = self.client.settle_up(request).await?;
        if let Some(cached) = self.cache.load_transactions(request.group_id)? {
            let mut transactions = cached.data;
            transactions.push(transaction.clone());
            self.cache.save_transactions(request.group_id, &transactions)?;
        }
        Ok(transaction)
    }

    /// Refresh everything for a user: groups and profile together, then
    /// each group's transactions with bounded concurrency. Per-group
    /// failures are logged and skipped so one bad group does not abort
    /// the whole refresh.
    pub async fn refresh_all(&self, user_uuid: &str) -> Result<()> {
        let (groups, user) = tokio::try_join!(
            self.client.fetch_groups(user_uuid),
            self.client.fetch_user(user_uuid),
        )?;
        self.cache.save_groups(user_uuid, &groups)?;
        self.cache.save_user(&user)?;
        info!(user_uuid, groups = groups.len(), "Refreshed groups and profile");

        let results: Vec<(i64, Result<Vec<Transaction>, ApiError>)> =
            stream::iter(groups.iter().map(|g| g.group_id))
                .map(|group_id| {
                    let client = self.client.clone();
                    async move { (group_id, client.fetch_transactions(group_id).await) }
                })
                .buffer_unordered(MAX_CONCURRENT_REQUESTS)
                .collect()
                .await;

        for (group_id, result) in results {
            match result {
                Ok(transactions) => self.cache.save_transactions(group_id, &transactions)?,
                Err(e) => warn!(group_id, error = %e, "Failed to refresh group transactions"),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenManager;
    use crate::cache::CachedData;
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    /// Origin nothing listens on: any real call fails fast with a
    /// connect error, which is exactly what the fallback paths expect.
    const DEAD_ORIGIN: &str = "http://127.0.0.1:9";

    fn repo(dir: &tempfile::TempDir) -> Repository {
        let tokens = TokenManager::new(dir.path().join("session")).expect("store");
        let client = ApiClient::new(DEAD_ORIGIN, tokens).expect("client");
        let cache = CacheManager::new(dir.path().join("cache")).expect("cache");
        Repository::new(client, cache)
    }

    fn sample_user() -> User {
        User {
            uuid: "5f3a".into(),
            name: Some("Asha".into()),
            email: Some("asha@example.com".into()),
        }
    }

    #[tokio::test]
    async fn test_fresh_cache_is_served_without_network() {
        let dir = tempdir().expect("tempdir");
        let repo = repo(&dir);
        repo.cache.save_user(&sample_user()).expect("seed");

        // The client points at a dead origin, so this only passes if the
        // cache short-circuits before any request is built.
        let user = repo.user("5f3a").await.expect("user");
        assert_eq!(user.name.as_deref(), Some("Asha"));
    }

    #[tokio::test]
    async fn test_stale_cache_survives_network_failure() {
        let dir = tempdir().expect("tempdir");
        let repo = repo(&dir);

        // Seed a cache entry backdated past the user TTL.
        let stale = CachedData {
            data: sample_user(),
            cached_at: Utc::now() - Duration::minutes(USER_STALE_MINUTES + 5),
        };
        let path = dir.path().join("cache").join("user_5f3a.json");
        std::fs::write(&path, serde_json::to_string(&stale).expect("json")).expect("seed");

        let user = repo.user("5f3a").await.expect("stale fallback");
        assert_eq!(user.uuid, "5f3a");
    }

    #[tokio::test]
    async fn test_failed_login_surfaces_error() {
        // Dead origin: the login call itself fails, so nothing is ever
        // written to the keychain.
        let dir = tempdir().expect("tempdir");
        let repo = repo(&dir);
        assert!(repo.login("asha@example.com", "pw", false).await.is_err());
    }

    #[tokio::test]
    async fn test_saved_credentials_login_errors_without_entry() {
        let dir = tempdir().expect("tempdir");
        let repo = repo(&dir);
        // No keychain entry exists for this email, so the keychain lookup
        // fails before any network call is attempted.
        let result = repo
            .login_with_saved_credentials("nobody-c4e71b@example.invalid")
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_no_cache_and_no_network_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let repo = repo(&dir);
        assert!(repo.user("5f3a").await.is_err());
        assert!(repo.categories().await.is_err());
    }
}
