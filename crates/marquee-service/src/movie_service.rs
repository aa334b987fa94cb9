//! Movie service trait definition.

use async_trait::async_trait;
use marquee_core::{
    GenreId, Interface, Linked, MarqueeResult, Movie, MovieDetail, MovieId, PageRequest,
    ProductionCompanyId, SitemapEntry,
};

/// Movie queries used by the site's pages.
#[async_trait]
pub trait MovieService: Interface + Send + Sync {
    /// Gets a movie with its overview, genres and production companies.
    async fn get_movie_by_slug(&self, slug: &str) -> MarqueeResult<Option<MovieDetail>>;

    /// Lists the latest published movies.
    async fn get_latest_movies(&self, page: PageRequest) -> MarqueeResult<Vec<Movie>>;

    /// Lists up to `limit` movies sharing a genre with `current_id`.
    async fn get_related_movies(
        &self,
        current_id: &MovieId,
        genre_id: &GenreId,
        limit: u32,
    ) -> MarqueeResult<Vec<Linked<Movie>>>;

    /// Lists published movies in a genre.
    async fn get_movies_by_genre_id(
        &self,
        genre_id: &GenreId,
        page: PageRequest,
    ) -> MarqueeResult<Vec<Linked<Movie>>>;

    /// Lists published movies made by a production company.
    async fn get_movies_by_production_company_id(
        &self,
        company_id: &ProductionCompanyId,
        page: PageRequest,
    ) -> MarqueeResult<Vec<Linked<Movie>>>;

    /// Lists sitemap entries for published movies.
    async fn get_movies_sitemap(&self, page: PageRequest) -> MarqueeResult<Vec<SitemapEntry>>;

    /// Counts published movies.
    async fn count_movies(&self) -> MarqueeResult<u64>;

    /// Counts published movies in a genre.
    async fn count_movies_by_genre_id(&self, genre_id: &GenreId) -> MarqueeResult<u64>;

    /// Counts published movies made by a production company.
    async fn count_movies_by_production_company_id(
        &self,
        company_id: &ProductionCompanyId,
    ) -> MarqueeResult<u64>;

    /// Searches published movies by title or other title.
    async fn search_movies(&self, query: &str, limit: u32) -> MarqueeResult<Vec<Movie>>;

    /// Drops every cached movie query.
    async fn invalidate_all(&self);

    /// Drops the cached detail of one movie.
    async fn invalidate_by_slug(&self, slug: &str);
}
