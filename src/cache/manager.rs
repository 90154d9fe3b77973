use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::models::{Category, Group, Transaction, User};

/// Staleness threshold for user profiles (24 hours)
pub const USER_STALE_MINUTES: i64 = 24 * 60;

/// Staleness threshold for the category catalog (7 days)
pub const CATEGORY_STALE_MINUTES: i64 = 7 * 24 * 60;

/// Staleness threshold for groups and transactions (1 hour)
pub const GROUP_STALE_MINUTES: i64 = 60;

/// A cached value with the time it was written, the local mirror of the
/// backend's `lastUpdated` column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    /// TTL query: has this entry outlived the given threshold?
    pub fn is_stale_after(&self, minutes: i64) -> bool {
        self.age_minutes() > minutes
    }
}

/// JSON-file cache mirroring remote entities for offline reads.
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let path = self.cache_path(name);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&path, contents)?;
        Ok(())
    }

    // ===== User =====

    pub fn load_user(&self, uuid: &str) -> Result<Option<CachedData<User>>> {
        self.load(&format!("user_{}", uuid))
    }

    pub fn save_user(&self, user: &User) -> Result<()> {
        self.save(&format!("user_{}", user.uuid), user)
    }

    // ===== Categories =====

    pub fn load_categories(&self) -> Result<Option<CachedData<Vec<Category>>>> {
        self.load("categories")
    }

    pub fn save_categories(&self, categories: &[Category]) -> Result<()> {
        self.save("categories", &categories)
    }

    // ===== Groups =====

    pub fn load_groups(&self, user_uuid: &str) -> Result<Option<CachedData<Vec<Group>>>> {
        self.load(&format!("groups_{}", user_uuid))
    }

    pub fn save_groups(&self, user_uuid: &str, groups: &[Group]) -> Result<()> {
        self.save(&format!("groups_{}", user_uuid), &groups)
    }

    // ===== Transactions =====

    pub fn load_transactions(&self, group_id: i64) -> Result<Option<CachedData<Vec<Transaction>>>> {
        self.load(&format!("transactions_{}", group_id))
    }

    pub fn save_transactions(&self, group_id: i64, transactions: &[Transaction]) -> Result<()> {
        self.save(&format!("transactions_{}", group_id), &transactions)
    }
}
