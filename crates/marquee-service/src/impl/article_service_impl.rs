//! Article service implementation.

use super::retain_linked;
use crate::article_service::ArticleService;
use crate::cache::{cache_keys, policy, read_through, read_through_found};
use async_trait::async_trait;
use marquee_cache::{CacheExt, CacheStore};
use marquee_core::{
    Article, ArticleDetail, ArticleId, Language, Linked, MarqueeResult, PageRequest,
    SitemapEntry, TopicId, UserId,
};
use marquee_repository::ArticleRepository;
use std::sync::Arc;
use tracing::{debug, info};

/// Article service backed by an origin repository and a cache store.
pub struct ArticleServiceImpl {
    repository: Arc<dyn ArticleRepository>,
    cache: Arc<dyn CacheStore>,
}

impl ArticleServiceImpl {
    /// Creates a new article service.
    pub fn new(repository: Arc<dyn ArticleRepository>, cache: Arc<dyn CacheStore>) -> Self {
        Self { repository, cache }
    }

    async fn load_detail(&self, slug: &str) -> MarqueeResult<Option<ArticleDetail>> {
        let Some(article) = self.repository.find_by_slug(slug).await? else {
            return Ok(None);
        };

        let (topics, authors, editors) = futures::try_join!(
            self.repository.find_topics(&article.id),
            self.repository.find_authors(&article.id),
            self.repository.find_editors(&article.id),
        )?;

        Ok(Some(ArticleDetail {
            article,
            topics,
            authors,
            editors,
        }))
    }
}

#[async_trait]
impl ArticleService for ArticleServiceImpl {
    async fn get_article_by_slug(&self, slug: &str) -> MarqueeResult<Option<ArticleDetail>> {
        debug!("Getting article by slug: {}", slug);

        read_through_found(
            self.cache.as_ref(),
            policy::ARTICLE_BY_SLUG,
            || cache_keys::article_by_slug(slug),
            || self.load_detail(slug),
        )
        .await
    }

    async fn get_articles_by_language(
        &self,
        language: Language,
        page: PageRequest,
    ) -> MarqueeResult<Vec<Article>> {
        debug!("Listing articles: lang={}, page={}, per_page={}", language, page.page, page.per_page);

        read_through(
            self.cache.as_ref(),
            policy::ARTICLES_BY_LANGUAGE,
            || cache_keys::articles_by_language(language, page),
            || self.repository.find_by_language(language, page),
        )
        .await
    }

    async fn get_related_articles(
        &self,
        current_id: &ArticleId,
        topic_id: &TopicId,
        language: Language,
        limit: u32,
    ) -> MarqueeResult<Vec<Linked<Article>>> {
        debug!("Listing articles related to {} by topic {}", current_id, topic_id);

        read_through(
            self.cache.as_ref(),
            policy::RELATED_ARTICLES,
            || cache_keys::related_articles(current_id, topic_id, language, limit),
            || async move {
                self.repository
                    .find_related_by_topic(current_id, topic_id, language, limit)
                    .await
                    .map(|rows| retain_linked(rows, topic_id.as_str()))
            },
        )
        .await
    }

    async fn get_articles_by_topic_id(
        &self,
        topic_id: &TopicId,
        language: Language,
        page: PageRequest,
    ) -> MarqueeResult<Vec<Linked<Article>>> {
        debug!("Listing articles by topic {}: lang={}, page={}", topic_id, language, page.page);

        read_through(
            self.cache.as_ref(),
            policy::ARTICLES_BY_TOPIC,
            || cache_keys::articles_by_topic(topic_id, language, page),
            || async move {
                self.repository
                    .find_by_topic(topic_id, language, page)
                    .await
                    .map(|rows| retain_linked(rows, topic_id.as_str()))
            },
        )
        .await
    }

    async fn get_articles_by_author_id(
        &self,
        author_id: &UserId,
        language: Language,
        page: PageRequest,
    ) -> MarqueeResult<Vec<Linked<Article>>> {
        debug!("Listing articles by author {}: lang={}, page={}", author_id, language, page.page);

        read_through(
            self.cache.as_ref(),
            policy::ARTICLES_BY_AUTHOR,
            || cache_keys::articles_by_author(author_id, language, page),
            || async move {
                self.repository
                    .find_by_author(author_id, language, page)
                    .await
                    .map(|rows| retain_linked(rows, author_id.as_str()))
            },
        )
        .await
    }

    async fn get_articles_sitemap(
        &self,
        language: Language,
        page: PageRequest,
    ) -> MarqueeResult<Vec<SitemapEntry>> {
        read_through(
            self.cache.as_ref(),
            policy::ARTICLES_SITEMAP,
            || cache_keys::articles_sitemap(language, page),
            || self.repository.find_sitemap(language, page),
        )
        .await
    }

    async fn count_articles(&self) -> MarqueeResult<u64> {
        read_through(
            self.cache.as_ref(),
            policy::ARTICLES_COUNT,
            cache_keys::articles_count,
            || self.repository.count_published(),
        )
        .await
    }

    async fn count_articles_by_language(&self, language: Language) -> MarqueeResult<u64> {
        read_through(
            self.cache.as_ref(),
            policy::ARTICLES_COUNT_BY_LANGUAGE,
            || cache_keys::articles_count_by_language(language),
            || self.repository.count_by_language(language),
        )
        .await
    }

    async fn count_articles_by_topic_id(&self, topic_id: &TopicId) -> MarqueeResult<u64> {
        read_through(
            self.cache.as_ref(),
            policy::ARTICLES_COUNT_BY_TOPIC,
            || cache_keys::articles_count_by_topic(topic_id),
            || self.repository.count_by_topic(topic_id),
        )
        .await
    }

    async fn count_articles_by_author_id(&self, author_id: &UserId) -> MarqueeResult<u64> {
        read_through(
            self.cache.as_ref(),
            policy::ARTICLES_COUNT_BY_AUTHOR,
            || cache_keys::articles_count_by_author(author_id),
            || self.repository.count_by_author(author_id),
        )
        .await
    }

    async fn search_articles(
        &self,
        language: Language,
        query: &str,
        limit: u32,
    ) -> MarqueeResult<Vec<Article>> {
        debug!("Searching articles: lang={}, query={}", language, query);

        read_through(
            self.cache.as_ref(),
            policy::ARTICLES_SEARCH,
            || cache_keys::articles_search(language, query, limit),
            || self.repository.search(language, query, limit),
        )
        .await
    }

    async fn invalidate_all(&self) {
        self.cache
            .invalidate_by_pattern(cache_keys::ARTICLE_PATTERN)
            .await;
        info!("Invalidated cached article queries");
    }

    async fn invalidate_by_slug(&self, slug: &str) {
        self.cache.remove(&cache_keys::article_by_slug(slug)).await;
        info!("Invalidated cached article: {}", slug);
    }
}

impl std::fmt::Debug for ArticleServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleServiceImpl").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use marquee_cache::MemoryCacheStore;
    use marquee_core::{
        AuthorSummary, EditorSummary, MarqueeError, PublishStatus, RelationLink, TopicSummary,
    };
    use marquee_repository::MockArticleRepository;
    use std::time::Duration;

    fn article(id: &str, slug: &str) -> Article {
        Article {
            id: ArticleId::new(id),
            language: Language::En,
            title: slug.replace('-', " "),
            slug: slug.to_string(),
            content: "<p>body</p>".to_string(),
            excerpt: None,
            meta_title: None,
            meta_description: None,
            status: PublishStatus::Published,
            created_at: Some(Utc.with_ymd_and_hms(2024, 4, 30, 12, 0, 0).unwrap()),
            updated_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap()),
        }
    }

    fn linked(id: &str, related: &[Option<&str>]) -> Linked<Article> {
        let links = related
            .iter()
            .map(|related_id| RelationLink {
                parent_id: id.to_string(),
                related_id: related_id.map(str::to_string),
            })
            .collect();
        Linked::new(article(id, &format!("article-{id}")), links)
    }

    fn service(repo: MockArticleRepository) -> (ArticleServiceImpl, Arc<MemoryCacheStore>) {
        let cache = Arc::new(MemoryCacheStore::new());
        let service = ArticleServiceImpl::new(Arc::new(repo), cache.clone());
        (service, cache)
    }

    #[tokio::test]
    async fn test_list_by_language_is_served_from_cache_on_second_call() {
        let mut repo = MockArticleRepository::new();
        repo.expect_find_by_language()
            .withf(|language, page| *language == Language::En && page.page == 1 && page.per_page == 10)
            .times(1)
            .returning(|_, _| Ok(vec![article("a1", "first"), article("a2", "second")]));
        let (service, cache) = service(repo);

        let page = PageRequest::new(1, 10);
        let first = service.get_articles_by_language(Language::En, page).await.unwrap();
        let second = service.get_articles_by_language(Language::En, page).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].updated_at, article("a1", "first").updated_at);
        assert_eq!(
            cache.ttl("articles:lang:en:page:1:per:10"),
            Some(Duration::from_secs(1800))
        );
    }

    #[tokio::test]
    async fn test_article_detail_joins_relations_and_caches() {
        let mut repo = MockArticleRepository::new();
        repo.expect_find_by_slug()
            .withf(|slug| slug == "why-dune-works")
            .times(1)
            .returning(|_| Ok(Some(article("a1", "why-dune-works"))));
        repo.expect_find_topics().times(1).returning(|_| {
            Ok(vec![TopicSummary {
                id: TopicId::new("t1"),
                title: "Cinema".to_string(),
                slug: "cinema".to_string(),
            }])
        });
        repo.expect_find_authors().times(1).returning(|_| {
            Ok(vec![AuthorSummary {
                id: UserId::new("u1"),
                name: "Ayu Lestari".to_string(),
                username: "ayu".to_string(),
            }])
        });
        repo.expect_find_editors().times(1).returning(|_| {
            Ok(vec![EditorSummary {
                id: UserId::new("u2"),
                name: "Budi Santoso".to_string(),
            }])
        });
        let (service, cache) = service(repo);

        let detail = service.get_article_by_slug("why-dune-works").await.unwrap().unwrap();
        assert_eq!(detail.article.slug, "why-dune-works");
        assert_eq!(detail.topics[0].slug, "cinema");
        assert_eq!(detail.authors[0].username, "ayu");
        assert_eq!(detail.editors[0].name, "Budi Santoso");
        assert_eq!(cache.ttl("article:slug:why-dune-works"), Some(Duration::from_secs(3600)));

        let again = service.get_article_by_slug("why-dune-works").await.unwrap();
        assert_eq!(again, Some(detail));
    }

    #[tokio::test]
    async fn test_missing_article_is_not_cached() {
        let mut repo = MockArticleRepository::new();
        repo.expect_find_by_slug().times(2).returning(|_| Ok(None));
        repo.expect_find_topics().never();
        let (service, cache) = service(repo);

        assert!(service.get_article_by_slug("missing").await.unwrap().is_none());
        assert!(service.get_article_by_slug("missing").await.unwrap().is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_topic_list_keeps_only_rows_linked_to_topic() {
        let mut repo = MockArticleRepository::new();
        repo.expect_find_by_topic().times(2).returning(|_, _, _| {
            Ok(vec![
                linked("a1", &[Some("t1"), Some("t2")]),
                linked("a2", &[Some("t2")]),
                linked("a3", &[None]),
                linked("a4", &[]),
            ])
        });
        let (service, cache) = service(repo);

        for _ in 0..2 {
            let rows = service
                .get_articles_by_topic_id(&TopicId::new("t1"), Language::En, PageRequest::first())
                .await
                .unwrap();

            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].entity.id.as_str(), "a1");
        }
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_related_and_author_lists_are_filtered_and_read_origin() {
        let mut repo = MockArticleRepository::new();
        repo.expect_find_related_by_topic()
            .withf(|current, topic, _, limit| {
                current.as_str() == "a1" && topic.as_str() == "t1" && *limit == 3
            })
            .times(2)
            .returning(|_, _, _, _| Ok(vec![linked("a2", &[Some("t1")]), linked("a3", &[None])]));
        repo.expect_find_by_author()
            .times(2)
            .returning(|_, _, _| Ok(vec![linked("a5", &[Some("u9")]), linked("a6", &[Some("u1")])]));
        let (service, cache) = service(repo);

        for _ in 0..2 {
            let related = service
                .get_related_articles(&ArticleId::new("a1"), &TopicId::new("t1"), Language::En, 3)
                .await
                .unwrap();
            assert_eq!(related.len(), 1);
            assert_eq!(related[0].entity.id.as_str(), "a2");

            let by_author = service
                .get_articles_by_author_id(&UserId::new("u1"), Language::En, PageRequest::first())
                .await
                .unwrap();
            assert_eq!(by_author.len(), 1);
            assert_eq!(by_author[0].entity.id.as_str(), "a6");
        }
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_counts_read_origin_every_time() {
        let mut repo = MockArticleRepository::new();
        repo.expect_count_published().times(2).returning(|| Ok(12));
        repo.expect_count_by_language().times(2).returning(|_| Ok(7));
        repo.expect_count_by_topic().times(2).returning(|_| Ok(0));
        repo.expect_count_by_author().times(2).returning(|_| Ok(3));
        let (service, cache) = service(repo);
        let topic = TopicId::new("t1");
        let author = UserId::new("u1");

        for _ in 0..2 {
            assert_eq!(service.count_articles().await.unwrap(), 12);
            assert_eq!(service.count_articles_by_language(Language::Id).await.unwrap(), 7);
            assert_eq!(service.count_articles_by_topic_id(&topic).await.unwrap(), 0);
            assert_eq!(service.count_articles_by_author_id(&author).await.unwrap(), 3);
        }
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_sitemap_and_search_always_hit_origin() {
        let mut repo = MockArticleRepository::new();
        repo.expect_find_sitemap().times(2).returning(|_, _| Ok(Vec::new()));
        repo.expect_search()
            .withf(|_, query, limit| query == "dune" && *limit == 5)
            .times(2)
            .returning(|_, _, _| Ok(vec![article("a1", "why-dune-works")]));
        let (service, cache) = service(repo);

        for _ in 0..2 {
            service
                .get_articles_sitemap(Language::En, PageRequest::first())
                .await
                .unwrap();
            let found = service.search_articles(Language::En, "dune", 5).await.unwrap();
            assert_eq!(found.len(), 1);
        }

        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_origin_errors_propagate_and_are_not_cached() {
        let mut repo = MockArticleRepository::new();
        repo.expect_find_by_language()
            .times(1)
            .returning(|_, _| Err(MarqueeError::Database("connection reset".to_string())));
        let (service, cache) = service(repo);

        let err = service
            .get_articles_by_language(Language::En, PageRequest::first())
            .await
            .unwrap_err();

        assert!(matches!(err, MarqueeError::Database(_)));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_cache_passes_through() {
        let mut repo = MockArticleRepository::new();
        repo.expect_find_by_language()
            .times(2)
            .returning(|_, _| Ok(vec![article("a1", "first")]));
        let cache = Arc::new(MemoryCacheStore::disabled());
        let service = ArticleServiceImpl::new(Arc::new(repo), cache.clone());

        let page = PageRequest::first();
        for _ in 0..2 {
            let rows = service.get_articles_by_language(Language::En, page).await.unwrap();
            assert_eq!(rows.len(), 1);
        }
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_invalidation() {
        let mut repo = MockArticleRepository::new();
        repo.expect_find_by_language().returning(|_, _| Ok(Vec::new()));
        let (service, cache) = service(repo);

        service
            .get_articles_by_language(Language::En, PageRequest::first())
            .await
            .unwrap();
        cache
            .write("article:slug:hello", &article("a1", "hello"), Duration::from_secs(60))
            .await;
        cache.write("movies:count", &4_u64, Duration::from_secs(60)).await;

        service.invalidate_by_slug("hello").await;
        assert!(!cache.contains("article:slug:hello"));
        assert!(cache.contains("articles:lang:en:page:1:per:10"));

        service.invalidate_all().await;
        assert!(!cache.contains("articles:lang:en:page:1:per:10"));
        assert!(cache.contains("movies:count"));
    }
}
