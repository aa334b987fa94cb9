//! Movie service implementation.

use super::retain_linked;
use crate::cache::{cache_keys, policy, read_through, read_through_found};
use crate::movie_service::MovieService;
use async_trait::async_trait;
use marquee_cache::{CacheExt, CacheStore};
use marquee_core::{
    GenreId, Linked, MarqueeResult, Movie, MovieDetail, MovieId, PageRequest,
    ProductionCompanyId, SitemapEntry,
};
use marquee_repository::MovieRepository;
use std::sync::Arc;
use tracing::{debug, info};

/// Movie service backed by an origin repository and a cache store.
pub struct MovieServiceImpl {
    repository: Arc<dyn MovieRepository>,
    cache: Arc<dyn CacheStore>,
}

impl MovieServiceImpl {
    /// Creates a new movie service.
    pub fn new(repository: Arc<dyn MovieRepository>, cache: Arc<dyn CacheStore>) -> Self {
        Self { repository, cache }
    }

    async fn load_detail(&self, slug: &str) -> MarqueeResult<Option<MovieDetail>> {
        let Some(movie) = self.repository.find_by_slug(slug).await? else {
            return Ok(None);
        };

        let (overviews, genres, production_companies) = futures::try_join!(
            self.repository.find_overviews(&movie.id),
            self.repository.find_genres(&movie.id),
            self.repository.find_production_companies(&movie.id),
        )?;

        Ok(Some(MovieDetail {
            movie,
            overview: overviews.into_iter().next(),
            genres,
            production_companies,
        }))
    }
}

#[async_trait]
impl MovieService for MovieServiceImpl {
    async fn get_movie_by_slug(&self, slug: &str) -> MarqueeResult<Option<MovieDetail>> {
        debug!("Getting movie by slug: {}", slug);

        read_through_found(
            self.cache.as_ref(),
            policy::MOVIE_BY_SLUG,
            || cache_keys::movie_by_slug(slug),
            || self.load_detail(slug),
        )
        .await
    }

    async fn get_latest_movies(&self, page: PageRequest) -> MarqueeResult<Vec<Movie>> {
        debug!("Listing latest movies: page={}, per_page={}", page.page, page.per_page);

        read_through(
            self.cache.as_ref(),
            policy::LATEST_MOVIES,
            || cache_keys::latest_movies(page),
            || self.repository.find_latest(page),
        )
        .await
    }

    async fn get_related_movies(
        &self,
        current_id: &MovieId,
        genre_id: &GenreId,
        limit: u32,
    ) -> MarqueeResult<Vec<Linked<Movie>>> {
        debug!("Listing movies related to {} by genre {}", current_id, genre_id);

        read_through(
            self.cache.as_ref(),
            policy::RELATED_MOVIES,
            || cache_keys::related_movies(current_id, genre_id, limit),
            || async move {
                self.repository
                    .find_related_by_genre(current_id, genre_id, limit)
                    .await
                    .map(|rows| retain_linked(rows, genre_id.as_str()))
            },
        )
        .await
    }

    async fn get_movies_by_genre_id(
        &self,
        genre_id: &GenreId,
        page: PageRequest,
    ) -> MarqueeResult<Vec<Linked<Movie>>> {
        debug!("Listing movies by genre {}: page={}", genre_id, page.page);

        read_through(
            self.cache.as_ref(),
            policy::MOVIES_BY_GENRE,
            || cache_keys::movies_by_genre(genre_id, page),
            || async move {
                self.repository
                    .find_by_genre(genre_id, page)
                    .await
                    .map(|rows| retain_linked(rows, genre_id.as_str()))
            },
        )
        .await
    }

    async fn get_movies_by_production_company_id(
        &self,
        company_id: &ProductionCompanyId,
        page: PageRequest,
    ) -> MarqueeResult<Vec<Linked<Movie>>> {
        debug!("Listing movies by production company {}: page={}", company_id, page.page);

        read_through(
            self.cache.as_ref(),
            policy::MOVIES_BY_PRODUCTION_COMPANY,
            || cache_keys::movies_by_production_company(company_id, page),
            || async move {
                self.repository
                    .find_by_production_company(company_id, page)
                    .await
                    .map(|rows| retain_linked(rows, company_id.as_str()))
            },
        )
        .await
    }

    async fn get_movies_sitemap(&self, page: PageRequest) -> MarqueeResult<Vec<SitemapEntry>> {
        read_through(
            self.cache.as_ref(),
            policy::MOVIES_SITEMAP,
            || cache_keys::movies_sitemap(page),
            || self.repository.find_sitemap(page),
        )
        .await
    }

    async fn count_movies(&self) -> MarqueeResult<u64> {
        read_through(
            self.cache.as_ref(),
            policy::MOVIES_COUNT,
            cache_keys::movies_count,
            || self.repository.count_published(),
        )
        .await
    }

    async fn count_movies_by_genre_id(&self, genre_id: &GenreId) -> MarqueeResult<u64> {
        read_through(
            self.cache.as_ref(),
            policy::MOVIES_COUNT_BY_GENRE,
            || cache_keys::movies_count_by_genre(genre_id),
            || self.repository.count_by_genre(genre_id),
        )
        .await
    }

    async fn count_movies_by_production_company_id(
        &self,
        company_id: &ProductionCompanyId,
    ) -> MarqueeResult<u64> {
        read_through(
            self.cache.as_ref(),
            policy::MOVIES_COUNT_BY_PRODUCTION_COMPANY,
            || cache_keys::movies_count_by_production_company(company_id),
            || self.repository.count_by_production_company(company_id),
        )
        .await
    }

    async fn search_movies(&self, query: &str, limit: u32) -> MarqueeResult<Vec<Movie>> {
        debug!("Searching movies: query={}", query);

        read_through(
            self.cache.as_ref(),
            policy::MOVIES_SEARCH,
            || cache_keys::movies_search(query, limit),
            || self.repository.search(query, limit),
        )
        .await
    }

    async fn invalidate_all(&self) {
        self.cache
            .invalidate_by_pattern(cache_keys::MOVIE_PATTERN)
            .await;
        info!("Invalidated cached movie queries");
    }

    async fn invalidate_by_slug(&self, slug: &str) {
        self.cache.remove(&cache_keys::movie_by_slug(slug)).await;
        info!("Invalidated cached movie: {}", slug);
    }
}

impl std::fmt::Debug for MovieServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovieServiceImpl").finish_non_exhaustive()
    }
}
