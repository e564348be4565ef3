use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::User;

use super::Store;

/// Store key of the single cached user record.
pub const USER_CACHE_KEY: &str = "user";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    /// Missing when the record was stored as the bare entity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_at: Option<DateTime<Utc>>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Some(Utc::now()),
        }
    }

    pub fn age_minutes(&self) -> Option<i64> {
        let cached_at = self.cached_at?;
        Some((Utc::now() - cached_at).num_minutes())
    }

    pub fn age_display(&self) -> Option<String> {
        let minutes = self.age_minutes()?;
        let display = if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                // Round up: 1h 30m+ becomes 2h
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        };
        Some(display)
    }
}

/// On-disk shapes accepted for a cache record: the timestamped wrapper this
/// crate writes, or the entity serialized on its own.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredRecord<T> {
    Stamped(CachedData<T>),
    Bare(T),
}

impl<T> From<StoredRecord<T>> for CachedData<T> {
    fn from(record: StoredRecord<T>) -> Self {
        match record {
            StoredRecord::Stamped(cached) => cached,
            StoredRecord::Bare(data) => CachedData {
                data,
                cached_at: None,
            },
        }
    }
}

/// Typed access to the cached user record.
#[derive(Clone)]
pub struct CacheManager {
    store: Arc<dyn Store>,
}

impl CacheManager {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<CachedData<T>>> {
        let Some(contents) = self
            .store
            .get(key)
            .with_context(|| format!("Failed to read cache record: {}", key))?
        else {
            return Ok(None);
        };

        let record: StoredRecord<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache record: {}", key))?;

        Ok(Some(record.into()))
    }

    fn save<T: Serialize>(&self, key: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let contents = serde_json::to_string_pretty(&cached)?;
        self.store
            .set(key, &contents)
            .with_context(|| format!("Failed to write cache record: {}", key))?;
        Ok(())
    }

    // ===== User =====

    pub fn load_user(&self) -> Result<Option<CachedData<User>>> {
        self.load(USER_CACHE_KEY)
    }

    pub fn save_user(&self, user: &User) -> Result<()> {
        self.save(USER_CACHE_KEY, user)
    }

    pub fn clear_user(&self) -> Result<()> {
        self.store
            .remove(USER_CACHE_KEY)
            .with_context(|| format!("Failed to remove cache record: {}", USER_CACHE_KEY))?;
        Ok(())
    }

    // ===== Cache Age Information =====

    /// Age of the cached user for display; errors are logged and hidden
    pub fn user_age(&self) -> Option<String> {
        match self.load_user() {
            Ok(Some(cached)) => cached.age_display(),
            Ok(None) => None,
            Err(e) => {
                debug!(cache = USER_CACHE_KEY, error = %e, "Failed to load cache for age display");
                None
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use chrono::Duration;

    fn manager() -> (Arc<MemoryStore>, CacheManager) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), CacheManager::new(store))
    }

    #[test]
    fn test_cached_data_age_display() {
        let mut cached = CachedData::new(1);
        assert_eq!(cached.age_display().as_deref(), Some("just now"));

        cached.cached_at = Some(Utc::now() - Duration::minutes(5));
        assert_eq!(cached.age_display().as_deref(), Some("5m ago"));

        cached.cached_at = Some(Utc::now() - Duration::minutes(95));
        assert_eq!(cached.age_display().as_deref(), Some("2h ago"));

        cached.cached_at = Some(Utc::now() - Duration::days(3) - Duration::hours(1));
        assert_eq!(cached.age_display().as_deref(), Some("3d ago"));

        // Clock skew
        cached.cached_at = Some(Utc::now() + Duration::minutes(10));
        assert_eq!(cached.age_display().as_deref(), Some("just now"));

        cached.cached_at = None;
        assert_eq!(cached.age_display(), None);
    }

    #[test]
    fn test_user_round_trip() {
        let (_, cache) = manager();
        let user = User::new("Mr", "Alex", "Doe", "a@x.com");

        assert!(cache.load_user().unwrap().is_none());
        cache.save_user(&user).unwrap();

        let cached = cache.load_user().unwrap().unwrap();
        assert_eq!(cached.data, user);
        assert_eq!(cache.user_age().as_deref(), Some("just now"));
    }

    #[test]
    fn test_bare_user_record_is_read() {
        let (store, cache) = manager();
        let user = User::new("Mr", "Alex", "Doe", "a@x.com");
        store
            .set(USER_CACHE_KEY, &serde_json::to_string(&user).unwrap())
            .unwrap();

        let cached = cache.load_user().unwrap().unwrap();
        assert_eq!(cached.data, user);
        assert_eq!(cached.cached_at, None);
        // No timestamp to show, but the record is still usable
        assert_eq!(cache.user_age(), None);
    }

    #[test]
    fn test_saved_record_carries_timestamp() {
        let (store, cache) = manager();
        cache.save_user(&User::new("Ms", "Jane", "Roe", "j@x.com")).unwrap();

        let raw = store.get(USER_CACHE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["data"]["firstName"], "Jane");
        assert!(value["cached_at"].is_string());
    }

    #[test]
    fn test_corrupt_record_is_an_error() {
        let (store, cache) = manager();
        store.set(USER_CACHE_KEY, "{not json").unwrap();

        assert!(cache.load_user().is_err());
        assert_eq!(cache.user_age(), None);
    }

    #[test]
    fn test_clear_user_is_idempotent() {
        let (store, cache) = manager();
        cache.save_user(&User::new("Ms", "Jane", "Roe", "j@x.com")).unwrap();

        cache.clear_user().unwrap();
        cache.clear_user().unwrap();
        assert_eq!(store.get(USER_CACHE_KEY).unwrap(), None);
    }
}
