//! PostgreSQL user repository implementation.

use super::{contains_pattern, parse_column};
use crate::{traits::UserRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use marquee_core::{MarqueeError, MarqueeResult, User, UserId};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// PostgreSQL user repository implementation.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgUserRepository {
    /// Creates a new PostgreSQL user repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    name: String,
    username: String,
    email: String,
    image: Option<String>,
    about: Option<String>,
    role: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = MarqueeError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::new(row.id),
            name: row.name,
            username: row.username,
            email: row.email,
            image: row.image,
            about: row.about,
            role: parse_column("role", &row.role)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_username(&self, username: &str) -> MarqueeResult<Option<User>> {
        debug!("Finding user by username: {}", username);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, username, email, image, about, role, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn search(&self, query: &str, limit: u32) -> MarqueeResult<Vec<User>> {
        debug!("Searching users: query={}", query);

        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, username, email, image, about, role, created_at, updated_at
            FROM users
            WHERE name ILIKE $1 OR username ILIKE $1
            ORDER BY updated_at DESC NULLS LAST
            LIMIT $2
            "#,
        )
        .bind(contains_pattern(query))
        .bind(i64::from(limit))
        .fetch_all(self.pool.inner())
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }
}
