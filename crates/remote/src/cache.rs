use std::sync::Arc;
use std::time::Duration;

use common::UserId;
use domain::{User, UserCreate, UserUpdate};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::{Result, store::UserResource};

pub const DEFAULT_USERS_TTL: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct Cached {
    users: Vec<User>,
    expires_at: Instant,
}

/// Time-bounded cache of the user list.
///
/// Owned by whoever serves users; every write made through it invalidates
/// the cached list. Writes made elsewhere are only picked up after the TTL
/// expires or after [`UserCache::invalidate`].
#[derive(Debug)]
pub struct UserCache<R> {
    remote: Arc<R>,
    ttl: Duration,
    cached: RwLock<Option<Cached>>,
}

impl<R: UserResource> UserCache<R> {
    pub fn new(remote: Arc<R>) -> Self {
        Self::with_ttl(remote, DEFAULT_USERS_TTL)
    }

    pub fn with_ttl(remote: Arc<R>, ttl: Duration) -> Self {
        Self {
            remote,
            ttl,
            cached: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the user list, from cache unless it expired or
    /// `force_refresh` is set. A failed fetch leaves the cache untouched.
    #[instrument(skip(self))]
    pub async fn list(&self, force_refresh: bool) -> Result<Vec<User>> {
        if !force_refresh
            && let Some(cached) = self.cached.read().await.as_ref()
            && cached.expires_at > Instant::now()
        {
            metrics::counter!("users_cache_hits_total").increment(1);
            return Ok(cached.users.clone());
        }

        metrics::counter!("users_cache_misses_total").increment(1);
        let users = self.remote.list_users().await?;
        debug!(count = users.len(), "User list refreshed");
        *self.cached.write().await = Some(Cached {
            users: users.clone(),
            expires_at: Instant::now() + self.ttl,
        });
        Ok(users)
    }

    pub async fn invalidate(&self) {
        self.cached.write().await.take();
    }

    pub async fn get(&self, id: UserId) -> Result<User> {
        self.remote.get_user(id).await
    }

    pub async fn create(&self, user: UserCreate) -> Result<User> {
        let created = self.remote.create_user(user).await?;
        self.invalidate().await;
        Ok(created)
    }

    pub async fn update(&self, id: UserId, update: UserUpdate) -> Result<User> {
        let updated = self.remote.update_user(id, update).await?;
        self.invalidate().await;
        Ok(updated)
    }

    pub async fn delete(&self, id: UserId) -> Result<()> {
        self.remote.delete_user(id).await?;
        self.invalidate().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryRemote;

    fn alice() -> UserCreate {
        UserCreate {
            email: "alice@example.com".to_string(),
            full_name: Some("Alice".to_string()),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_list_is_served_from_cache() {
        let remote = Arc::new(InMemoryRemote::new());
        let cache = UserCache::new(remote.clone());

        cache.list(false).await.unwrap();
        cache.list(false).await.unwrap();
        assert_eq!(remote.user_list_count().await, 1);

        cache.list(true).await.unwrap();
        assert_eq!(remote.user_list_count().await, 2);
    }

    #[tokio::test]
    async fn test_writes_invalidate() {
        let remote = Arc::new(InMemoryRemote::new());
        let cache = UserCache::new(remote.clone());
        assert!(cache.list(false).await.unwrap().is_empty());

        let user = cache.create(alice()).await.unwrap();
        let users = cache.list(false).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(remote.user_list_count().await, 2);

        cache.delete(user.id).await.unwrap();
        assert!(cache.list(false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_writes_behind_the_cache_are_stale_until_invalidated() {
        let remote = Arc::new(InMemoryRemote::new());
        let cache = UserCache::new(remote.clone());
        cache.list(false).await.unwrap();

        remote.create_user(alice()).await.unwrap();
        assert!(cache.list(false).await.unwrap().is_empty());

        cache.invalidate().await;
        assert_eq!(cache.list(false).await.unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() {
        let remote = Arc::new(InMemoryRemote::new());
        let cache = UserCache::with_ttl(remote.clone(), Duration::from_secs(60));

        cache.list(false).await.unwrap();
        tokio::time::advance(Duration::from_secs(59)).await;
        cache.list(false).await.unwrap();
        assert_eq!(remote.user_list_count().await, 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        cache.list(false).await.unwrap();
        assert_eq!(remote.user_list_count().await, 2);
    }
}
