//! User service trait definition.

use async_trait::async_trait;
use marquee_core::{Interface, MarqueeResult, User};

/// User service trait.
#[async_trait]
pub trait UserService: Interface + Send + Sync {
    /// Gets a user by username.
    async fn get_user_by_username(&self, username: &str) -> MarqueeResult<Option<User>>;

    /// Searches users by name or username.
    async fn search_users(&self, query: &str, limit: u32) -> MarqueeResult<Vec<User>>;
}
