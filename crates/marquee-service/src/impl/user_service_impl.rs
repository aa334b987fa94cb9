//! User service implementation.

use crate::cache::{cache_keys, policy, read_through, read_through_found};
use crate::user_service::UserService;
use async_trait::async_trait;
use marquee_cache::CacheStore;
use marquee_core::{MarqueeResult, User};
use marquee_repository::UserRepository;
use std::sync::Arc;
use tracing::debug;

/// User service. Lookups go through the cache policy table, which
/// currently reads users straight from the origin.
pub struct UserServiceImpl {
    repository: Arc<dyn UserRepository>,
    cache: Arc<dyn CacheStore>,
}

impl UserServiceImpl {
    /// Creates a new user service.
    pub fn new(repository: Arc<dyn UserRepository>, cache: Arc<dyn CacheStore>) -> Self {
        Self { repository, cache }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn get_user_by_username(&self, username: &str) -> MarqueeResult<Option<User>> {
        debug!("Getting user by username: {}", username);

        read_through_found(
            self.cache.as_ref(),
            policy::USER_BY_USERNAME,
            || cache_keys::user_by_username(username),
            || self.repository.find_by_username(username),
        )
        .await
    }

    async fn search_users(&self, query: &str, limit: u32) -> MarqueeResult<Vec<User>> {
        debug!("Searching users: query={}", query);

        read_through(
            self.cache.as_ref(),
            policy::USERS_SEARCH,
            || cache_keys::users_search(query, limit),
            || self.repository.search(query, limit),
        )
        .await
    }
}

impl std::fmt::Debug for UserServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceImpl").finish_non_exhaustive()
    }
}
