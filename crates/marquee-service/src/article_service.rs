//! Article service trait definition.

use async_trait::async_trait;
use marquee_core::{
    Article, ArticleDetail, ArticleId, Interface, Language, Linked, MarqueeResult, PageRequest,
    SitemapEntry, TopicId, UserId,
};

/// Article queries used by the site's pages.
#[async_trait]
pub trait ArticleService: Interface + Send + Sync {
    /// Gets an article with its topics, authors and editors.
    async fn get_article_by_slug(&self, slug: &str) -> MarqueeResult<Option<ArticleDetail>>;

    /// Lists published articles in one language.
    async fn get_articles_by_language(
        &self,
        language: Language,
        page: PageRequest,
    ) -> MarqueeResult<Vec<Article>>;

    /// Lists up to `limit` articles sharing a topic with `current_id`.
    async fn get_related_articles(
        &self,
        current_id: &ArticleId,
        topic_id: &TopicId,
        language: Language,
        limit: u32,
    ) -> MarqueeResult<Vec<Linked<Article>>>;

    /// Lists published articles tagged with a topic.
    async fn get_articles_by_topic_id(
        &self,
        topic_id: &TopicId,
        language: Language,
        page: PageRequest,
    ) -> MarqueeResult<Vec<Linked<Article>>>;

    /// Lists published articles written by a user.
    async fn get_articles_by_author_id(
        &self,
        author_id: &UserId,
        language: Language,
        page: PageRequest,
    ) -> MarqueeResult<Vec<Linked<Article>>>;

    /// Lists sitemap entries for published articles.
    async fn get_articles_sitemap(
        &self,
        language: Language,
        page: PageRequest,
    ) -> MarqueeResult<Vec<SitemapEntry>>;

    /// Counts published articles.
    async fn count_articles(&self) -> MarqueeResult<u64>;

    /// Counts published articles in one language.
    async fn count_articles_by_language(&self, language: Language) -> MarqueeResult<u64>;

    /// Counts published articles tagged with a topic.
    async fn count_articles_by_topic_id(&self, topic_id: &TopicId) -> MarqueeResult<u64>;

    /// Counts published articles written by a user.
    async fn count_articles_by_author_id(&self, author_id: &UserId) -> MarqueeResult<u64>;

    /// Searches published articles by title or slug.
    async fn search_articles(
        &self,
        language: Language,
        query: &str,
        limit: u32,
    ) -> MarqueeResult<Vec<Article>>;

    /// Drops every cached article query.
    async fn invalidate_all(&self);

    /// Drops the cached detail of one article.
    async fn invalidate_by_slug(&self, slug: &str);
}
