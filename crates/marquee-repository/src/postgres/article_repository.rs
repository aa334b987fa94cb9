//! PostgreSQL article repository implementation.

use super::{attach_links, count_to_u64, parse_column, LinkRow, SitemapRow};
use crate::{traits::ArticleRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use marquee_core::{
    Article, ArticleId, AuthorSummary, EditorSummary, Language, Linked, MarqueeError,
    MarqueeResult, PageRequest, RelationLink, SitemapEntry, TopicId, TopicSummary, UserId,
};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// PostgreSQL article repository implementation.
#[derive(Clone)]
pub struct PgArticleRepository {
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgArticleRepository {
    /// Creates a new PostgreSQL article repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    async fn topic_links(&self, articles: &[Article]) -> MarqueeResult<Vec<RelationLink>> {
        if articles.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = articles.iter().map(|a| a.id.to_string()).collect();
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT atp.article_id AS parent_id, t.id AS related_id
            FROM article_topics atp
            LEFT JOIN topics t ON t.id = atp.topic_id
            WHERE atp.article_id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(RelationLink::from).collect())
    }

    async fn author_links(&self, articles: &[Article]) -> MarqueeResult<Vec<RelationLink>> {
        if articles.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = articles.iter().map(|a| a.id.to_string()).collect();
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT aa.article_id AS parent_id, u.id AS related_id
            FROM article_authors aa
            LEFT JOIN users u ON u.id = aa.user_id
            WHERE aa.article_id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(RelationLink::from).collect())
    }
}

/// Database row representation of an article.
#[derive(Debug, FromRow)]
struct ArticleRow {
    id: String,
    language: String,
    title: String,
    slug: String,
    content: String,
    excerpt: Option<String>,
    meta_title: Option<String>,
    meta_description: Option<String>,
    status: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<ArticleRow> for Article {
    type Error = MarqueeError;

    fn try_from(row: ArticleRow) -> Result<Self, Self::Error> {
        Ok(Article {
            id: ArticleId::new(row.id),
            language: parse_column("language", &row.language)?,
            title: row.title,
            slug: row.slug,
            content: row.content,
            excerpt: row.excerpt,
            meta_title: row.meta_title,
            meta_description: row.meta_description,
            status: parse_column("status", &row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct TopicRow {
    id: String,
    title: String,
    slug: String,
}

#[derive(Debug, FromRow)]
struct AuthorRow {
    id: String,
    name: String,
    username: String,
}

#[derive(Debug, FromRow)]
struct EditorRow {
    id: String,
    name: String,
}

fn into_articles(rows: Vec<ArticleRow>) -> MarqueeResult<Vec<Article>> {
    rows.into_iter().map(Article::try_from).collect()
}

fn article_id(article: &Article) -> &str {
    article.id.as_str()
}

#[async_trait]
impl ArticleRepository for PgArticleRepository {
    async fn find_by_slug(&self, slug: &str) -> MarqueeResult<Option<Article>> {
        debug!("Finding article by slug: {}", slug);

        let row = sqlx::query_as::<_, ArticleRow>(
            r#"
            SELECT id, language, title, slug, content, excerpt, meta_title,
                   meta_description, status, created_at, updated_at
            FROM articles
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(Article::try_from).transpose()
    }

    async fn find_topics(&self, article_id: &ArticleId) -> MarqueeResult<Vec<TopicSummary>> {
        let rows = sqlx::query_as::<_, TopicRow>(
            r#"
            SELECT t.id, t.title, t.slug
            FROM article_topics atp
            INNER JOIN topics t ON t.id = atp.topic_id
            WHERE atp.article_id = $1
            "#,
        )
        .bind(article_id.as_str())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| TopicSummary {
                id: TopicId::new(row.id),
                title: row.title,
                slug: row.slug,
            })
            .collect())
    }

    async fn find_authors(&self, article_id: &ArticleId) -> MarqueeResult<Vec<AuthorSummary>> {
        let rows = sqlx::query_as::<_, AuthorRow>(
            r#"
            SELECT u.id, u.name, u.username
            FROM article_authors aa
            INNER JOIN users u ON u.id = aa.user_id
            WHERE aa.article_id = $1
            "#,
        )
        .bind(article_id.as_str())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| AuthorSummary {
                id: UserId::new(row.id),
                name: row.name,
                username: row.username,
            })
            .collect())
    }

    async fn find_editors(&self, article_id: &ArticleId) -> MarqueeResult<Vec<EditorSummary>> {
        let rows = sqlx::query_as::<_, EditorRow>(
            r#"
            SELECT u.id, u.name
            FROM article_editors ae
            INNER JOIN users u ON u.id = ae.user_id
            WHERE ae.article_id = $1
            "#,
        )
        .bind(article_id.as_str())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| EditorSummary {
                id: UserId::new(row.id),
                name: row.name,
            })
            .collect())
    }

    async fn find_by_language(
        &self,
        language: Language,
        page: PageRequest,
    ) -> MarqueeResult<Vec<Article>> {
        debug!("Listing articles: lang={}, page={}", language, page.page);

        let rows = sqlx::query_as::<_, ArticleRow>(
            r#"
            SELECT id, language, title, slug, content, excerpt, meta_title,
                   meta_description, status, created_at, updated_at
            FROM articles
            WHERE language = $1 AND status = 'published'
            ORDER BY updated_at DESC NULLS LAST
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(language.code())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.inner())
        .await?;

        into_articles(rows)
    }

    async fn find_related_by_topic(
        &self,
        current_id: &ArticleId,
        topic_id: &TopicId,
        language: Language,
        limit: u32,
    ) -> MarqueeResult<Vec<Linked<Article>>> {
        debug!("Listing articles related to {} by topic {}", current_id, topic_id);

        let rows = sqlx::query_as::<_, ArticleRow>(
            r#"
            SELECT id, language, title, slug, content, excerpt, meta_title,
                   meta_description, status, created_at, updated_at
            FROM articles
            WHERE language = $1
              AND status = 'published'
              AND id <> $2
              AND id IN (SELECT article_id FROM article_topics WHERE topic_id = $3)
            ORDER BY updated_at DESC NULLS LAST
            LIMIT $4
            "#,
        )
        .bind(language.code())
        .bind(current_id.as_str())
        .bind(topic_id.as_str())
        .bind(i64::from(limit))
        .fetch_all(self.pool.inner())
        .await?;

        let articles = into_articles(rows)?;
        let links = self.topic_links(&articles).await?;
        Ok(attach_links(articles, links, article_id))
    }

    async fn find_by_topic(
        &self,
        topic_id: &TopicId,
        language: Language,
        page: PageRequest,
    ) -> MarqueeResult<Vec<Linked<Article>>> {
        debug!("Listing articles by topic {}: lang={}, page={}", topic_id, language, page.page);

        let rows = sqlx::query_as::<_, ArticleRow>(
            r#"
            SELECT id, language, title, slug, content, excerpt, meta_title,
                   meta_description, status, created_at, updated_at
            FROM articles
            WHERE language = $1
              AND status = 'published'
              AND id IN (SELECT article_id FROM article_topics WHERE topic_id = $2)
            ORDER BY updated_at DESC NULLS LAST
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(language.code())
        .bind(topic_id.as_str())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.inner())
        .await?;

        let articles = into_articles(rows)?;
        let links = self.topic_links(&articles).await?;
        Ok(attach_links(articles, links, article_id))
    }

    async fn find_by_author(
        &self,
        author_id: &UserId,
        language: Language,
        page: PageRequest,
    ) -> MarqueeResult<Vec<Linked<Article>>> {
        debug!("Listing articles by author {}: lang={}, page={}", author_id, language, page.page);

        let rows = sqlx::query_as::<_, ArticleRow>(
            r#"
            SELECT id, language, title, slug, content, excerpt, meta_title,
                   meta_description, status, created_at, updated_at
            FROM articles
            WHERE language = $1
              AND status = 'published'
              AND id IN (SELECT article_id FROM article_authors WHERE user_id = $2)
            ORDER BY updated_at DESC NULLS LAST
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(language.code())
        .bind(author_id.as_str())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.inner())
        .await?;

        let articles = into_articles(rows)?;
        let links = self.author_links(&articles).await?;
        Ok(attach_links(articles, links, article_id))
    }

    async fn find_sitemap(
        &self,
        language: Language,
        page: PageRequest,
    ) -> MarqueeResult<Vec<SitemapEntry>> {
        let rows = sqlx::query_as::<_, SitemapRow>(
            r#"
            SELECT slug, updated_at
            FROM articles
            WHERE language = $1 AND status = 'published'
            ORDER BY updated_at DESC NULLS LAST
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(language.code())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(SitemapEntry::from).collect())
    }

    async fn count_published(&self) -> MarqueeResult<u64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM articles WHERE status = 'published'")
                .fetch_one(self.pool.inner())
                .await?;

        count_to_u64(count.0)
    }

    async fn count_by_language(&self, language: Language) -> MarqueeResult<u64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM articles WHERE language = $1 AND status = 'published'",
        )
        .bind(language.code())
        .fetch_one(self.pool.inner())
        .await?;

        count_to_u64(count.0)
    }

    async fn count_by_topic(&self, topic_id: &TopicId) -> MarqueeResult<u64> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM articles a
            INNER JOIN article_topics atp ON atp.article_id = a.id
            WHERE atp.topic_id = $1 AND a.status = 'published'
            "#,
        )
        .bind(topic_id.as_str())
        .fetch_one(self.pool.inner())
        .await?;

        count_to_u64(count.0)
    }

    async fn count_by_author(&self, author_id: &UserId) -> MarqueeResult<u64> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM articles a
            INNER JOIN article_authors aa ON aa.article_id = a.id
            WHERE aa.user_id = $1 AND a.status = 'published'
            "#,
        )
        .bind(author_id.as_str())
        .fetch_one(self.pool.inner())
        .await?;

        count_to_u64(count.0)
    }

    async fn search(
        &self,
        language: Language,
        query: &str,
        limit: u32,
    ) -> MarqueeResult<Vec<Article>> {
        debug!("Searching articles: lang={}, query={}", language, query);

        let rows = sqlx::query_as::<_, ArticleRow>(
            r#"
            SELECT id, language, title, slug, content, excerpt, meta_title,
                   meta_description, status, created_at, updated_at
            FROM articles
            WHERE language = $1
              AND status = 'published'
              AND (title ILIKE $2 OR slug ILIKE $2)
            ORDER BY updated_at DESC NULLS LAST
            LIMIT $3
            "#,
        )
        .bind(language.code())
        .bind(super::contains_pattern(query))
        .bind(i64::from(limit))
        .fetch_all(self.pool.inner())
        .await?;

        into_articles(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::PublishStatus;

    fn row(language: &str, status: &str) -> ArticleRow {
        ArticleRow {
            id: "a1".to_string(),
            language: language.to_string(),
            title: "Hello".to_string(),
            slug: "hello".to_string(),
            content: "<p>hi</p>".to_string(),
            excerpt: None,
            meta_title: None,
            meta_description: Some("greeting".to_string()),
            status: status.to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_row_conversion() {
        let article = Article::try_from(row("en", "published")).unwrap();
        assert_eq!(article.id.as_str(), "a1");
        assert_eq!(article.language, Language::En);
        assert_eq!(article.status, PublishStatus::Published);
        assert_eq!(article.meta_description.as_deref(), Some("greeting"));
    }

    #[test]
    fn test_row_conversion_rejects_unknown_language() {
        let err = Article::try_from(row("fr", "published")).unwrap_err();
        assert!(matches!(err, MarqueeError::Database(_)));
    }
}
