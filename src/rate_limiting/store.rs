use std::fmt::{self, Debug, Display, Formatter};

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use super::action::RateLimitAction;

/// Key of one counter: an action plus the identifier it throttles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateLimitKey(String);

impl RateLimitKey {
    pub fn new(action: &RateLimitAction, identifier: &str) -> Self {
        Self(format!("{}:{identifier}", action.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RateLimitKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Attempts counted within one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub attempts: u32,
    pub window_start: DateTime<Utc>,
    pub reset_time: DateTime<Utc>,
}

impl RateLimitEntry {
    pub fn fresh(now: DateTime<Utc>, window: Duration) -> Self {
        Self {
            attempts: 0,
            window_start: now,
            reset_time: now
                .checked_add_signed(window)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.reset_time
    }
}

/// Storage for rate limit counters.
///
/// Implementations only store; check-and-increment atomicity is provided by
/// the caller holding a lock around `get` and `set`.
pub trait RateLimitStore: Send + Sync + Debug {
    fn get(&self, key: &RateLimitKey) -> Option<RateLimitEntry>;

    fn set(&self, key: RateLimitKey, entry: RateLimitEntry);

    /// Remove the entry if its window has passed. Returns true if one was removed.
    fn delete_if_expired(&self, key: &RateLimitKey, now: DateTime<Utc>) -> bool;
}

/// Process-local store. Expired entries are only dropped when their key is
/// touched again.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<RateLimitKey, RateLimitEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RateLimitStore for MemoryStore {
    fn get(&self, key: &RateLimitKey) -> Option<RateLimitEntry> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn set(&self, key: RateLimitKey, entry: RateLimitEntry) {
        self.entries.insert(key, entry);
    }

    fn delete_if_expired(&self, key: &RateLimitKey, now: DateTime<Utc>) -> bool {
        self.entries
            .remove_if(key, |_, entry| entry.is_expired(now))
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_entry_is_removed_lazily() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let key = RateLimitKey::new(&RateLimitAction::new("contact_ip"), "10.0.0.1");

        store.set(key.clone(), RateLimitEntry::fresh(now, Duration::minutes(10)));

        assert!(!store.delete_if_expired(&key, now + Duration::minutes(10)));
        assert_eq!(store.len(), 1);

        assert!(store.delete_if_expired(&key, now + Duration::minutes(11)));
        assert!(store.get(&key).is_none());
    }

    #[test]
    fn test_unbounded_window_never_expires() {
        let now = Utc::now();
        let entry = RateLimitEntry::fresh(now, Duration::MAX);

        assert_eq!(entry.reset_time, DateTime::<Utc>::MAX_UTC);
        assert!(!entry.is_expired(now + Duration::days(365 * 100)));
    }

    #[test]
    fn test_key_combines_action_and_identifier() {
        let key = RateLimitKey::new(&RateLimitAction::new("newsletter_email"), "a@b.co");
        assert_eq!(key.as_str(), "newsletter_email:a@b.co");
    }
}
