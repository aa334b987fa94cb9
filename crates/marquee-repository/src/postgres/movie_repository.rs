//! PostgreSQL movie repository implementation.

use super::{attach_links, contains_pattern, count_to_u64, parse_column, LinkRow, SitemapRow};
use crate::{traits::MovieRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use marquee_core::{
    GenreId, GenreSummary, Linked, MarqueeError, MarqueeResult, Movie, MovieId, PageRequest,
    ProductionCompanyId, ProductionCompanySummary, RelationLink, SitemapEntry,
};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// PostgreSQL movie repository implementation.
#[derive(Clone)]
pub struct PgMovieRepository {
    pool: Arc<dyn DatabasePoolInterface>,
}

/// Join table to read links from when listing by relation.
#[derive(Debug, Clone, Copy)]
enum MovieRelation {
    Genre,
    ProductionCompany,
}

impl PgMovieRepository {
    /// Creates a new PostgreSQL movie repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    async fn links(
        &self,
        relation: MovieRelation,
        movies: &[Movie],
    ) -> MarqueeResult<Vec<RelationLink>> {
        if movies.is_empty() {
            return Ok(Vec::new());
        }

        let sql = match relation {
            MovieRelation::Genre => {
                r#"
                SELECT mg.movie_id AS parent_id, g.id AS related_id
                FROM movie_genres mg
                LEFT JOIN genres g ON g.id = mg.genre_id
                WHERE mg.movie_id = ANY($1)
                "#
            }
            MovieRelation::ProductionCompany => {
                r#"
                SELECT mpc.movie_id AS parent_id, pc.id AS related_id
                FROM movie_production_companies mpc
                LEFT JOIN production_companies pc ON pc.id = mpc.production_company_id
                WHERE mpc.movie_id = ANY($1)
                "#
            }
        };

        let ids: Vec<String> = movies.iter().map(|m| m.id.to_string()).collect();
        let rows = sqlx::query_as::<_, LinkRow>(sql)
            .bind(&ids)
            .fetch_all(self.pool.inner())
            .await?;

        Ok(rows.into_iter().map(RelationLink::from).collect())
    }

    async fn linked(
        &self,
        relation: MovieRelation,
        rows: Vec<MovieRow>,
    ) -> MarqueeResult<Vec<Linked<Movie>>> {
        let movies = into_movies(rows)?;
        let links = self.links(relation, &movies).await?;
        Ok(attach_links(movies, links, |movie| movie.id.as_str()))
    }
}

/// Database row representation of a movie.
#[derive(Debug, FromRow)]
struct MovieRow {
    id: String,
    imdb_id: Option<String>,
    tmdb_id: Option<String>,
    title: String,
    other_title: Option<String>,
    tagline: Option<String>,
    slug: String,
    original_language: Option<String>,
    release_date: Option<String>,
    runtime: Option<i32>,
    budget: Option<i64>,
    revenue: Option<i64>,
    poster: Option<String>,
    backdrop: Option<String>,
    status: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<MovieRow> for Movie {
    type Error = MarqueeError;

    fn try_from(row: MovieRow) -> Result<Self, Self::Error> {
        Ok(Movie {
            id: MovieId::new(row.id),
            imdb_id: row.imdb_id,
            tmdb_id: row.tmdb_id,
            title: row.title,
            other_title: row.other_title,
            tagline: row.tagline,
            slug: row.slug,
            original_language: row.original_language,
            release_date: row.release_date,
            runtime: row.runtime,
            budget: row.budget,
            revenue: row.revenue,
            poster: row.poster,
            backdrop: row.backdrop,
            status: parse_column("status", &row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct GenreRow {
    id: String,
    title: String,
    slug: String,
}

#[derive(Debug, FromRow)]
struct CompanyRow {
    id: String,
    name: String,
    logo: Option<String>,
    slug: String,
}

fn into_movies(rows: Vec<MovieRow>) -> MarqueeResult<Vec<Movie>> {
    rows.into_iter().map(Movie::try_from).collect()
}

#[async_trait]
impl MovieRepository for PgMovieRepository {
    async fn find_by_slug(&self, slug: &str) -> MarqueeResult<Option<Movie>> {
        debug!("Finding movie by slug: {}", slug);

        let row = sqlx::query_as::<_, MovieRow>(
            r#"
            SELECT id, imdb_id, tmdb_id, title, other_title, tagline, slug,
                   original_language, to_char(release_date, 'YYYY-MM-DD') AS release_date,
                   runtime, budget, revenue, poster, backdrop, status,
                   created_at, updated_at
            FROM movies
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(Movie::try_from).transpose()
    }

    async fn find_overviews(&self, movie_id: &MovieId) -> MarqueeResult<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT o.content
            FROM movie_overviews mo
            INNER JOIN overviews o ON o.id = mo.overview_id
            WHERE mo.movie_id = $1
            ORDER BY o.id
            "#,
        )
        .bind(movie_id.as_str())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(|(content,)| content).collect())
    }

    async fn find_genres(&self, movie_id: &MovieId) -> MarqueeResult<Vec<GenreSummary>> {
        let rows = sqlx::query_as::<_, GenreRow>(
            r#"
            SELECT g.id, g.title, g.slug
            FROM movie_genres mg
            INNER JOIN genres g ON g.id = mg.genre_id
            WHERE mg.movie_id = $1
            "#,
        )
        .bind(movie_id.as_str())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| GenreSummary {
                id: GenreId::new(row.id),
                title: row.title,
                slug: row.slug,
            })
            .collect())
    }

    async fn find_production_companies(
        &self,
        movie_id: &MovieId,
    ) -> MarqueeResult<Vec<ProductionCompanySummary>> {
        let rows = sqlx::query_as::<_, CompanyRow>(
            r#"
            SELECT pc.id, pc.name, pc.logo, pc.slug
            FROM movie_production_companies mpc
            INNER JOIN production_companies pc ON pc.id = mpc.production_company_id
            WHERE mpc.movie_id = $1
            "#,
        )
        .bind(movie_id.as_str())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ProductionCompanySummary {
                id: ProductionCompanyId::new(row.id),
                name: row.name,
                logo: row.logo,
                slug: row.slug,
            })
            .collect())
    }

    async fn find_latest(&self, page: PageRequest) -> MarqueeResult<Vec<Movie>> {
        debug!("Listing latest movies: page={}", page.page);

        let rows = sqlx::query_as::<_, MovieRow>(
            r#"
            SELECT id, imdb_id, tmdb_id, title, other_title, tagline, slug,
                   original_language, to_char(release_date, 'YYYY-MM-DD') AS release_date,
                   runtime, budget, revenue, poster, backdrop, status,
                   created_at, updated_at
            FROM movies
            WHERE status = 'published'
            ORDER BY updated_at DESC NULLS LAST
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.inner())
        .await?;

        into_movies(rows)
    }

    async fn find_related_by_genre(
        &self,
        current_id: &MovieId,
        genre_id: &GenreId,
        limit: u32,
    ) -> MarqueeResult<Vec<Linked<Movie>>> {
        debug!("Listing movies related to {} by genre {}", current_id, genre_id);

        let rows = sqlx::query_as::<_, MovieRow>(
            r#"
            SELECT id, imdb_id, tmdb_id, title, other_title, tagline, slug,
                   original_language, to_char(release_date, 'YYYY-MM-DD') AS release_date,
                   runtime, budget, revenue, poster, backdrop, status,
                   created_at, updated_at
            FROM movies
            WHERE status = 'published'
              AND id <> $1
              AND id IN (SELECT movie_id FROM movie_genres WHERE genre_id = $2)
            ORDER BY updated_at DESC NULLS LAST
            LIMIT $3
            "#,
        )
        .bind(current_id.as_str())
        .bind(genre_id.as_str())
        .bind(i64::from(limit))
        .fetch_all(self.pool.inner())
        .await?;

        self.linked(MovieRelation::Genre, rows).await
    }

    async fn find_by_genre(
        &self,
        genre_id: &GenreId,
        page: PageRequest,
    ) -> MarqueeResult<Vec<Linked<Movie>>> {
        debug!("Listing movies by genre {}: page={}", genre_id, page.page);

        let rows = sqlx::query_as::<_, MovieRow>(
            r#"
            SELECT id, imdb_id, tmdb_id, title, other_title, tagline, slug,
                   original_language, to_char(release_date, 'YYYY-MM-DD') AS release_date,
                   runtime, budget, revenue, poster, backdrop, status,
                   created_at, updated_at
            FROM movies
            WHERE status = 'published'
              AND id IN (SELECT movie_id FROM movie_genres WHERE genre_id = $1)
            ORDER BY updated_at DESC NULLS LAST
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(genre_id.as_str())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.inner())
        .await?;

        self.linked(MovieRelation::Genre, rows).await
    }

    async fn find_by_production_company(
        &self,
        company_id: &ProductionCompanyId,
        page: PageRequest,
    ) -> MarqueeResult<Vec<Linked<Movie>>> {
        debug!("Listing movies by production company {}: page={}", company_id, page.page);

        let rows = sqlx::query_as::<_, MovieRow>(
            r#"
            SELECT id, imdb_id, tmdb_id, title, other_title, tagline, slug,
                   original_language, to_char(release_date, 'YYYY-MM-DD') AS release_date,
                   runtime, budget, revenue, poster, backdrop, status,
                   created_at, updated_at
            FROM movies
            WHERE status = 'published'
              AND id IN (
                  SELECT movie_id FROM movie_production_companies
                  WHERE production_company_id = $1
              )
            ORDER BY updated_at DESC NULLS LAST
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(company_id.as_str())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.inner())
        .await?;

        self.linked(MovieRelation::ProductionCompany, rows).await
    }

    async fn find_sitemap(&self, page: PageRequest) -> MarqueeResult<Vec<SitemapEntry>> {
        let rows = sqlx::query_as::<_, SitemapRow>(
            r#"
            SELECT slug, updated_at
            FROM movies
            WHERE status = 'published'
            ORDER BY updated_at DESC NULLS LAST
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(SitemapEntry::from).collect())
    }

    async fn count_published(&self) -> MarqueeResult<u64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM movies WHERE status = 'published'")
                .fetch_one(self.pool.inner())
                .await?;

        count_to_u64(count.0)
    }

    async fn count_by_genre(&self, genre_id: &GenreId) -> MarqueeResult<u64> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM movies m
            INNER JOIN movie_genres mg ON mg.movie_id = m.id
            WHERE mg.genre_id = $1 AND m.status = 'published'
            "#,
        )
        .bind(genre_id.as_str())
        .fetch_one(self.pool.inner())
        .await?;

        count_to_u64(count.0)
    }

    async fn count_by_production_company(
        &self,
        company_id: &ProductionCompanyId,
    ) -> MarqueeResult<u64> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM movies m
            INNER JOIN movie_production_companies mpc ON mpc.movie_id = m.id
            WHERE mpc.production_company_id = $1 AND m.status = 'published'
            "#,
        )
        .bind(company_id.as_str())
        .fetch_one(self.pool.inner())
        .await?;

        count_to_u64(count.0)
    }

    async fn search(&self, query: &str, limit: u32) -> MarqueeResult<Vec<Movie>> {
        debug!("Searching movies: query={}", query);

        let rows = sqlx::query_as::<_, MovieRow>(
            r#"
            SELECT id, imdb_id, tmdb_id, title, other_title, tagline, slug,
                   original_language, to_char(release_date, 'YYYY-MM-DD') AS release_date,
                   runtime, budget, revenue, poster, backdrop, status,
                   created_at, updated_at
            FROM movies
            WHERE status = 'published'
              AND (title ILIKE $1 OR slug ILIKE $1)
            ORDER BY updated_at DESC NULLS LAST
            LIMIT $2
            "#,
        )
        .bind(contains_pattern(query))
        .bind(i64::from(limit))
        .fetch_all(self.pool.inner())
        .await?;

        into_movies(rows)
    }
}
