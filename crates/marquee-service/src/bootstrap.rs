//! Wiring of repositories, cache and services.

use crate::article_service::ArticleService;
use crate::movie_service::MovieService;
use crate::r#impl::{ArticleServiceImpl, MovieServiceImpl, UserServiceImpl};
use crate::user_service::UserService;
use marquee_cache::{CacheClient, CacheStore, RedisCacheStore};
use marquee_config::AppConfig;
use marquee_core::MarqueeResult;
use marquee_repository::{
    create_pool, ArticleRepository, DatabasePool, DatabasePoolInterface, MovieRepository,
    PgArticleRepository, PgMovieRepository, PgUserRepository, UserRepository,
};
use std::sync::Arc;
use tracing::info;

/// Handle to the query services of a running site.
///
/// Cheap to clone; every clone shares the same pools.
#[derive(Clone)]
pub struct Marquee {
    articles: Arc<dyn ArticleService>,
    movies: Arc<dyn MovieService>,
    users: Arc<dyn UserService>,
    cache: Arc<dyn CacheStore>,
    database: Option<Arc<DatabasePool>>,
}

impl Marquee {
    /// Connects to the origin database and prepares the cache client.
    ///
    /// The cache itself connects lazily on first use. Without a cache
    /// endpoint every query reads the origin.
    pub async fn connect(config: &AppConfig) -> MarqueeResult<Self> {
        marquee_cache::metrics::register_metrics();

        let database = create_pool(&config.database).await?;
        let pool: Arc<dyn DatabasePoolInterface> = database.clone();

        let client = Arc::new(CacheClient::new(config.cache.clone()));
        let cache: Arc<dyn CacheStore> = Arc::new(RedisCacheStore::new(client));

        let mut marquee = Self::from_parts(
            Arc::new(PgArticleRepository::new(pool.clone())),
            Arc::new(PgMovieRepository::new(pool.clone())),
            Arc::new(PgUserRepository::new(pool)),
            cache,
        );
        marquee.database = Some(database);

        info!(
            app = %config.app.name,
            environment = %config.app.environment,
            cache_context = ?config.cache.context,
            "Query services ready"
        );
        Ok(marquee)
    }

    /// Wires services over the given repositories and cache store.
    pub fn from_parts(
        articles: Arc<dyn ArticleRepository>,
        movies: Arc<dyn MovieRepository>,
        users: Arc<dyn UserRepository>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            articles: Arc::new(ArticleServiceImpl::new(articles, cache.clone())),
            movies: Arc::new(MovieServiceImpl::new(movies, cache.clone())),
            users: Arc::new(UserServiceImpl::new(users, cache.clone())),
            cache,
            database: None,
        }
    }

    /// Article queries.
    #[must_use]
    pub fn articles(&self) -> &Arc<dyn ArticleService> {
        &self.articles
    }

    /// Movie queries.
    #[must_use]
    pub fn movies(&self) -> &Arc<dyn MovieService> {
        &self.movies
    }

    /// User queries.
    #[must_use]
    pub fn users(&self) -> &Arc<dyn UserService> {
        &self.users
    }

    /// The cache store shared by all services, for manual invalidation.
    #[must_use]
    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    /// Closes the origin database pool, if this handle opened one.
    pub async fn close(&self) {
        if let Some(database) = &self.database {
            database.close().await;
        }
    }
}

impl std::fmt::Debug for Marquee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Marquee")
            .field("database", &self.database)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_cache::{CacheExt, MemoryCacheStore};
    use marquee_core::{Language, PageRequest};
    use marquee_repository::{MockArticleRepository, MockMovieRepository, MockUserRepository};
    use std::time::Duration;

    #[tokio::test]
    async fn test_services_share_one_cache() {
        let mut articles = MockArticleRepository::new();
        articles
            .expect_find_by_language()
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        let mut movies = MockMovieRepository::new();
        movies.expect_count_published().times(1).returning(|| Ok(2));

        let cache = Arc::new(MemoryCacheStore::new());
        let marquee = Marquee::from_parts(
            Arc::new(articles),
            Arc::new(movies),
            Arc::new(MockUserRepository::new()),
            cache.clone(),
        );

        let page = PageRequest::first();
        marquee.articles().get_articles_by_language(Language::En, page).await.unwrap();
        assert_eq!(marquee.movies().count_movies().await.unwrap(), 2);
        marquee.articles().get_articles_by_language(Language::En, page).await.unwrap();

        assert!(cache.contains("articles:lang:en:page:1:per:10"));
        assert!(cache.contains("movies:count"));

        marquee.cache().invalidate_by_pattern("*").await;
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_redis_store_without_endpoint_passes_through() {
        let mut articles = MockArticleRepository::new();
        articles
            .expect_find_by_language()
            .times(2)
            .returning(|_, _| Ok(Vec::new()));

        let marquee = Marquee::from_parts(
            Arc::new(articles),
            Arc::new(MockMovieRepository::new()),
            Arc::new(MockUserRepository::new()),
            Arc::new(RedisCacheStore::disabled()),
        );

        let page = PageRequest::first();
        marquee.articles().get_articles_by_language(Language::En, page).await.unwrap();
        marquee.articles().get_articles_by_language(Language::En, page).await.unwrap();

        marquee.cache().write("k", "v", Duration::from_secs(5)).await;
        assert_eq!(marquee.cache().read::<String>("k").await, None);
        marquee.close().await;
    }
}
