//! Repository trait definitions.
//!
//! Every method is a single read against the origin store. List methods
//! return published rows only, newest `updated_at` first.

use async_trait::async_trait;
use marquee_core::{
    Article, ArticleId, AuthorSummary, EditorSummary, GenreId, GenreSummary, Interface, Language,
    Linked, MarqueeResult, Movie, MovieId, PageRequest, ProductionCompanyId,
    ProductionCompanySummary, SitemapEntry, TopicId, TopicSummary, User, UserId,
};

#[cfg(any(test, feature = "mocks"))]
use mockall::automock;

/// Article repository trait.
#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait ArticleRepository: Interface + Send + Sync {
    /// Finds an article by slug, whatever its status.
    async fn find_by_slug(&self, slug: &str) -> MarqueeResult<Option<Article>>;

    /// Topics attached to an article.
    async fn find_topics(&self, article_id: &ArticleId) -> MarqueeResult<Vec<TopicSummary>>;

    /// Authors attached to an article.
    async fn find_authors(&self, article_id: &ArticleId) -> MarqueeResult<Vec<AuthorSummary>>;

    /// Editors attached to an article.
    async fn find_editors(&self, article_id: &ArticleId) -> MarqueeResult<Vec<EditorSummary>>;

    /// Published articles in one language.
    async fn find_by_language(
        &self,
        language: Language,
        page: PageRequest,
    ) -> MarqueeResult<Vec<Article>>;

    /// Published articles sharing a topic, excluding `current_id`.
    ///
    /// Rows carry their topic links.
    async fn find_related_by_topic(
        &self,
        current_id: &ArticleId,
        topic_id: &TopicId,
        language: Language,
        limit: u32,
    ) -> MarqueeResult<Vec<Linked<Article>>>;

    /// Published articles tagged with a topic. Rows carry their topic links.
    async fn find_by_topic(
        &self,
        topic_id: &TopicId,
        language: Language,
        page: PageRequest,
    ) -> MarqueeResult<Vec<Linked<Article>>>;

    /// Published articles written by a user. Rows carry their author links.
    async fn find_by_author(
        &self,
        author_id: &UserId,
        language: Language,
        page: PageRequest,
    ) -> MarqueeResult<Vec<Linked<Article>>>;

    /// Slug and last-modified time of published articles.
    async fn find_sitemap(
        &self,
        language: Language,
        page: PageRequest,
    ) -> MarqueeResult<Vec<SitemapEntry>>;

    /// Counts all published articles.
    async fn count_published(&self) -> MarqueeResult<u64>;

    /// Counts published articles in one language.
    async fn count_by_language(&self, language: Language) -> MarqueeResult<u64>;

    /// Counts published articles tagged with a topic.
    async fn count_by_topic(&self, topic_id: &TopicId) -> MarqueeResult<u64>;

    /// Counts published articles written by a user.
    async fn count_by_author(&self, author_id: &UserId) -> MarqueeResult<u64>;

    /// Case-insensitive search over title and slug.
    async fn search(
        &self,
        language: Language,
        query: &str,
        limit: u32,
    ) -> MarqueeResult<Vec<Article>>;
}

/// Movie repository trait.
#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait MovieRepository: Interface + Send + Sync {
    /// Finds a movie by slug, whatever its status.
    async fn find_by_slug(&self, slug: &str) -> MarqueeResult<Option<Movie>>;

    /// Overview texts attached to a movie, in overview id order.
    async fn find_overviews(&self, movie_id: &MovieId) -> MarqueeResult<Vec<String>>;

    /// Genres attached to a movie.
    async fn find_genres(&self, movie_id: &MovieId) -> MarqueeResult<Vec<GenreSummary>>;

    /// Production companies attached to a movie.
    async fn find_production_companies(
        &self,
        movie_id: &MovieId,
    ) -> MarqueeResult<Vec<ProductionCompanySummary>>;

    /// Latest published movies.
    async fn find_latest(&self, page: PageRequest) -> MarqueeResult<Vec<Movie>>;

    /// Published movies sharing a genre, excluding `current_id`.
    ///
    /// Rows carry their genre links.
    async fn find_related_by_genre(
        &self,
        current_id: &MovieId,
        genre_id: &GenreId,
        limit: u32,
    ) -> MarqueeResult<Vec<Linked<Movie>>>;

    /// Published movies in a genre. Rows carry their genre links.
    async fn find_by_genre(
        &self,
        genre_id: &GenreId,
        page: PageRequest,
    ) -> MarqueeResult<Vec<Linked<Movie>>>;

    /// Published movies made by a production company.
    ///
    /// Rows carry their production company links.
    async fn find_by_production_company(
        &self,
        company_id: &ProductionCompanyId,
        page: PageRequest,
    ) -> MarqueeResult<Vec<Linked<Movie>>>;

    /// Slug and last-modified time of published movies.
    async fn find_sitemap(&self, page: PageRequest) -> MarqueeResult<Vec<SitemapEntry>>;

    /// Counts all published movies.
    async fn count_published(&self) -> MarqueeResult<u64>;

    /// Counts published movies in a genre.
    async fn count_by_genre(&self, genre_id: &GenreId) -> MarqueeResult<u64>;

    /// Counts published movies made by a production company.
    async fn count_by_production_company(
        &self,
        company_id: &ProductionCompanyId,
    ) -> MarqueeResult<u64>;

    /// Case-insensitive search over title and other title.
    async fn search(&self, query: &str, limit: u32) -> MarqueeResult<Vec<Movie>>;
}

/// User repository trait.
#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Finds a user by username.
    async fn find_by_username(&self, username: &str) -> MarqueeResult<Option<User>>;

    /// Case-insensitive search over name and username.
    async fn search(&self, query: &str, limit: u32) -> MarqueeResult<Vec<User>>;
}
