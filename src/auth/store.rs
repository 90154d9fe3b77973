//! Persisted session token store.
//!
//! Tokens are kept in a flat JSON document in the app config directory and
//! mirrored in memory behind a lock. Both expiry timestamps are computed at
//! save time as wall-clock milliseconds (access: 5 hours, refresh: 30 days);
//! an unset expiry reads as 0, which callers must treat as already expired.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

/// Session file name in the config directory
const SESSION_FILE: &str = "session.json";

/// Access token lifetime in hours
const ACCESS_TOKEN_TTL_HOURS: i64 = 5;

/// Refresh token lifetime in days
const REFRESH_TOKEN_TTL_DAYS: i64 = 30;

/// On-disk shape of the session store. Field names double as the flat
/// key namespace the backend client contract specifies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionData {
    pub auth_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user_uuid: Option<String>,
    #[serde(default)]
    pub auth_token_saved_time: i64,
    #[serde(default)]
    pub auth_token_expiry_time: i64,
    #[serde(default)]
    pub refresh_token_saved_time: i64,
    #[serde(default)]
    pub refresh_token_expiry_time: i64,
}

/// Shared handle to the session store.
///
/// Clone is cheap - all clones see the same in-memory state and the same
/// file. Construct one per process and pass it around; do not rebuild a
/// manager per screen against the same file.
#[derive(Clone)]
pub struct TokenManager {
    path: PathBuf,
    data: Arc<Mutex<SessionData>>,
}

impl TokenManager {
    /// Open (or create) the session store under `dir`.
    pub fn new(dir: PathBuf) -> Result<Self> {
        let path = dir.join(SESSION_FILE);
        let data = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .context("Failed to read session file")?;
            serde_json::from_str(&contents).context("Failed to parse session file")?
        } else {
            SessionData::default()
        };
        Ok(Self {
            path,
            data: Arc::new(Mutex::new(data)),
        })
    }

    /// A poisoned lock only means another thread panicked mid-write; the
    /// store data itself is always a coherent snapshot, so recover it.
    fn lock(&self) -> MutexGuard<'_, SessionData> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Persist all session fields, computing both expiries from now.
    /// Overwrites any previous session.
    pub fn save_session(
        &self,
        access_token: &str,
        refresh_token: &str,
        user_uuid: &str,
    ) -> Result<()> {
        let now = Utc::now().timestamp_millis();
        let mut data = self.lock();
        data.auth_token = Some(access_token.to_string());
        data.refresh_token = Some(refresh_token.to_string());
        data.user_uuid = Some(user_uuid.to_string());
        data.auth_token_saved_time = now;
        data.auth_token_expiry_time = now + Duration::hours(ACCESS_TOKEN_TTL_HOURS).num_milliseconds();
        data.refresh_token_saved_time = now;
        data.refresh_token_expiry_time = now + Duration::days(REFRESH_TOKEN_TTL_DAYS).num_milliseconds();
        self.persist(&data)
    }

    /// Rewrite only the access token and its timestamps.
    /// The refresh token and its expiry are preserved.
    pub fn update_access_token(&self, access_token: &str) -> Result<()> {
        let now = Utc::now().timestamp_millis();
        let mut data = self.lock();
        data.auth_token = Some(access_token.to_string());
        data.auth_token_saved_time = now;
        data.auth_token_expiry_time = now + Duration::hours(ACCESS_TOKEN_TTL_HOURS).num_milliseconds();
        self.persist(&data)
    }

    /// Rewrite both tokens and their timestamps, leaving the stored user
    /// uuid untouched (absent stays absent). Used when the backend rotates
    /// the refresh token during a renewal.
    pub fn update_tokens(&self, access_token: &str, refresh_token: &str) -> Result<()> {
        let now = Utc::now().timestamp_millis();
        let mut data = self.lock();
        data.auth_token = Some(access_token.to_string());
        data.refresh_token = Some(refresh_token.to_string());
        data.auth_token_saved_time = now;
        data.auth_token_expiry_time = now + Duration::hours(ACCESS_TOKEN_TTL_HOURS).num_milliseconds();
        data.refresh_token_saved_time = now;
        data.refresh_token_expiry_time = now + Duration::days(REFRESH_TOKEN_TTL_DAYS).num_milliseconds();
        self.persist(&data)
    }

    /// Remove the access token and its timestamps.
    ///
    /// The refresh token and its expiry are deliberately left in place;
    /// see DESIGN.md for the open product question around this.
    pub fn clear_session(&self) -> Result<()> {
        let mut data = self.lock();
        data.auth_token = None;
        data.auth_token_saved_time = 0;
        data.auth_token_expiry_time = 0;
        self.persist(&data)
    }

    pub fn access_token(&self) -> Option<String> {
        self.lock().auth_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.lock().refresh_token.clone()
    }

    pub fn user_uuid(&self) -> Option<String> {
        self.lock().user_uuid.clone()
    }

    /// Access token expiry in epoch milliseconds, 0 if never set.
    pub fn access_expiry(&self) -> i64 {
        self.lock().auth_token_expiry_time
    }

    /// Refresh token expiry in epoch milliseconds, 0 if never set.
    pub fn refresh_expiry(&self) -> i64 {
        self.lock().refresh_token_expiry_time
    }

    fn persist(&self, data: &SessionData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.path, contents).context("Failed to write session file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn manager() -> (tempfile::TempDir, TokenManager) {
        let dir = tempdir().expect("tempdir");
        let mgr = TokenManager::new(dir.path().to_path_buf()).expect("store");
        (dir, mgr)
    }

    #[test]
    fn test_unset_store_reads_empty() {
        let (_dir, mgr) = manager();
        assert_eq!(mgr.access_token(), None);
        assert_eq!(mgr.refresh_token(), None);
        assert_eq!(mgr.user_uuid(), None);
        assert_eq!(mgr.access_expiry(), 0);
        assert_eq!(mgr.refresh_expiry(), 0);
    }

    #[test]
    fn test_save_session_computes_expiries() {
        let (_dir, mgr) = manager();
        let before = Utc::now().timestamp_millis();
        mgr.save_session("at", "rt", "uuid-1").expect("save");
        let after = Utc::now().timestamp_millis();

        let five_hours = Duration::hours(5).num_milliseconds();
        let thirty_days = Duration::days(30).num_milliseconds();
        assert!(mgr.access_expiry() >= before + five_hours);
        assert!(mgr.access_expiry() <= after + five_hours);
        assert!(mgr.refresh_expiry() >= before + thirty_days);
        assert!(mgr.refresh_expiry() <= after + thirty_days);

        assert_eq!(mgr.access_token().as_deref(), Some("at"));
        assert_eq!(mgr.refresh_token().as_deref(), Some("rt"));
        assert_eq!(mgr.user_uuid().as_deref(), Some("uuid-1"));
    }

    #[test]
    fn test_update_access_token_preserves_refresh() {
        let (_dir, mgr) = manager();
        mgr.save_session("at1", "rt1", "uuid-1").expect("save");
        let refresh_expiry = mgr.refresh_expiry();

        mgr.update_access_token("at2").expect("update");
        assert_eq!(mgr.access_token().as_deref(), Some("at2"));
        assert_eq!(mgr.refresh_token().as_deref(), Some("rt1"));
        assert_eq!(mgr.refresh_expiry(), refresh_expiry);
    }

    #[test]
    fn test_clear_session_leaves_refresh_token() {
        let (_dir, mgr) = manager();
        mgr.save_session("at", "rt", "uuid-1").expect("save");
        mgr.clear_session().expect("clear");

        assert_eq!(mgr.access_token(), None);
        assert_eq!(mgr.access_expiry(), 0);
        // Documented current behavior: the refresh token survives a clear.
        assert_eq!(mgr.refresh_token().as_deref(), Some("rt"));
        assert!(mgr.refresh_expiry() > 0);
    }

    #[test]
    fn test_store_round_trips_through_file() {
        let dir = tempdir().expect("tempdir");
        {
            let mgr = TokenManager::new(dir.path().to_path_buf()).expect("store");
            mgr.save_session("at", "rt", "uuid-1").expect("save");
        }
        let reopened = TokenManager::new(dir.path().to_path_buf()).expect("reopen");
        assert_eq!(reopened.access_token().as_deref(), Some("at"));
        assert_eq!(reopened.refresh_token().as_deref(), Some("rt"));
        assert_eq!(reopened.user_uuid().as_deref(), Some("uuid-1"));
        assert!(reopened.access_expiry() > 0);
    }

    #[test]
    fn test_save_session_overwrites_previous() {
        let (_dir, mgr) = manager();
        mgr.save_session("at1", "rt1", "uuid-1").expect("save");
        mgr.save_session("at2", "rt2", "uuid-2").expect("save");
        assert_eq!(mgr.access_token().as_deref(), Some("at2"));
        assert_eq!(mgr.refresh_token().as_deref(), Some("rt2"));
        assert_eq!(mgr.user_uuid().as_deref(), Some("uuid-2"));
    }

    #[test]
    fn test_update_tokens_preserves_user_uuid() {
        let (_dir, mgr) = manager();
        mgr.save_session("at1", "rt1", "uuid-1").expect("save");
        mgr.update_tokens("at2", "rt2").expect("update");
        assert_eq!(mgr.access_token().as_deref(), Some("at2"));
        assert_eq!(mgr.refresh_token().as_deref(), Some("rt2"));
        assert_eq!(mgr.user_uuid().as_deref(), Some("uuid-1"));
    }

    #[test]
    fn test_update_tokens_leaves_absent_uuid_absent() {
        let (_dir, mgr) = manager();
        mgr.update_tokens("at", "rt").expect("update");
        assert_eq!(mgr.user_uuid(), None);
        assert_eq!(mgr.access_token().as_deref(), Some("at"));
    }

    #[test]
    fn test_poisoned_lock_recovers() {
        let (_dir, mgr) = manager();
        mgr.save_session("at", "rt", "uuid-1").expect("save");

        let other = mgr.clone();
        let _ = std::thread::spawn(move || {
            let _guard = other.data.lock().expect("lock");
            panic!("poison the store lock");
        })
        .join();

        // Reads and writes keep working after the panic above.
        assert_eq!(mgr.access_token().as_deref(), Some("at"));
        mgr.update_access_token("at2").expect("update");
        assert_eq!(mgr.access_token().as_deref(), Some("at2"));
    }

    #[test]
    fn test_clones_share_state() {
        let (_dir, mgr) = manager();
        let other = mgr.clone();
        mgr.save_session("at", "rt", "uuid-1").expect("save");
        assert_eq!(other.access_token().as_deref(), Some("at"));
    }
}
