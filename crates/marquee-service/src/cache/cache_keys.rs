//! Cache key generators for consistent key naming.
//!
//! Single-record keys use the singular entity name (`article:`, `movie:`)
//! and list, count and search keys the plural (`articles:`, `movies:`), so
//! `article*` and `movie*` cover everything one entity caches.

use marquee_core::{
    ArticleId, GenreId, Language, MovieId, PageRequest, ProductionCompanyId, TopicId, UserId,
};

/// Pattern matching every article key.
pub const ARTICLE_PATTERN: &str = "article*";

/// Pattern matching every movie key.
pub const MOVIE_PATTERN: &str = "movie*";

fn paged(prefix: &str, page: PageRequest) -> String {
    format!("{}:page:{}:per:{}", prefix, page.page, page.per_page)
}

// ============ Articles ============

/// Key for an article detail looked up by slug.
#[must_use]
pub fn article_by_slug(slug: &str) -> String {
    format!("article:slug:{}", slug)
}

/// Key for a page of articles in one language.
#[must_use]
pub fn articles_by_language(language: Language, page: PageRequest) -> String {
    paged(&format!("articles:lang:{}", language), page)
}

/// Key for articles related to `current_id` through a topic.
#[must_use]
pub fn related_articles(
    current_id: &ArticleId,
    topic_id: &TopicId,
    language: Language,
    limit: u32,
) -> String {
    format!(
        "articles:related:{}:topic:{}:lang:{}:limit:{}",
        current_id, topic_id, language, limit
    )
}

/// Key for a page of articles tagged with a topic.
#[must_use]
pub fn articles_by_topic(topic_id: &TopicId, language: Language, page: PageRequest) -> String {
    paged(&format!("articles:topic:{}:lang:{}", topic_id, language), page)
}

/// Key for a page of articles written by a user.
#[must_use]
pub fn articles_by_author(author_id: &UserId, language: Language, page: PageRequest) -> String {
    paged(&format!("articles:author:{}:lang:{}", author_id, language), page)
}

/// Key for a page of the article sitemap.
#[must_use]
pub fn articles_sitemap(language: Language, page: PageRequest) -> String {
    paged(&format!("articles:sitemap:lang:{}", language), page)
}

/// Key for the published article count.
#[must_use]
pub fn articles_count() -> String {
    "articles:count".to_string()
}

/// Key for the article count in one language.
#[must_use]
pub fn articles_count_by_language(language: Language) -> String {
    format!("articles:count:lang:{}", language)
}

/// Key for the article count of a topic.
#[must_use]
pub fn articles_count_by_topic(topic_id: &TopicId) -> String {
    format!("articles:count:topic:{}", topic_id)
}

/// Key for the article count of an author.
#[must_use]
pub fn articles_count_by_author(author_id: &UserId) -> String {
    format!("articles:count:author:{}", author_id)
}

/// Key for an article search.
#[must_use]
pub fn articles_search(language: Language, query: &str, limit: u32) -> String {
    format!("articles:search:lang:{}:{}:limit:{}", language, query, limit)
}

// ============ Movies ============

/// Key for a movie detail looked up by slug.
#[must_use]
pub fn movie_by_slug(slug: &str) -> String {
    format!("movie:slug:{}", slug)
}

/// Key for a page of the latest movies.
#[must_use]
pub fn latest_movies(page: PageRequest) -> String {
    paged("movies:latest", page)
}

/// Key for movies related to `current_id` through a genre.
#[must_use]
pub fn related_movies(current_id: &MovieId, genre_id: &GenreId, limit: u32) -> String {
    format!("movies:related:{}:genre:{}:limit:{}", current_id, genre_id, limit)
}

/// Key for a page of movies in a genre.
#[must_use]
pub fn movies_by_genre(genre_id: &GenreId, page: PageRequest) -> String {
    paged(&format!("movies:genre:{}", genre_id), page)
}

/// Key for a page of movies made by a production company.
#[must_use]
pub fn movies_by_production_company(company_id: &ProductionCompanyId, page: PageRequest) -> String {
    paged(&format!("movies:production-company:{}", company_id), page)
}

/// Key for a page of the movie sitemap.
#[must_use]
pub fn movies_sitemap(page: PageRequest) -> String {
    paged("movies:sitemap", page)
}

/// Key for the published movie count.
#[must_use]
pub fn movies_count() -> String {
    "movies:count".to_string()
}

/// Key for the movie count of a genre.
#[must_use]
pub fn movies_count_by_genre(genre_id: &GenreId) -> String {
    format!("movies:count:genre:{}", genre_id)
}

/// Key for the movie count of a production company.
#[must_use]
pub fn movies_count_by_production_company(company_id: &ProductionCompanyId) -> String {
    format!("movies:count:production-company:{}", company_id)
}

/// Key for a movie search.
#[must_use]
pub fn movies_search(query: &str, limit: u32) -> String {
    format!("movies:search:{}:limit:{}", query, limit)
}

// ============ Users ============

/// Key for a user looked up by username.
#[must_use]
pub fn user_by_username(username: &str) -> String {
    format!("user:username:{}", username)
}

/// Key for a user search.
#[must_use]
pub fn users_search(query: &str, limit: u32) -> String {
    format!("users:search:{}:limit:{}", query, limit)
}
