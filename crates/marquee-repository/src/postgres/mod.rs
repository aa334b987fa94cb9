//! PostgreSQL implementations of the repository traits.

mod article_repository;
mod movie_repository;
mod user_repository;

pub use article_repository::PgArticleRepository;
pub use movie_repository::PgMovieRepository;
pub use user_repository::PgUserRepository;

use marquee_core::{Linked, MarqueeError, MarqueeResult, RelationLink, SitemapEntry};
use std::collections::HashMap;
use std::str::FromStr;

/// Database row for a join-table link.
#[derive(Debug, sqlx::FromRow)]
struct LinkRow {
    parent_id: String,
    related_id: Option<String>,
}

impl From<LinkRow> for RelationLink {
    fn from(row: LinkRow) -> Self {
        Self {
            parent_id: row.parent_id,
            related_id: row.related_id,
        }
    }
}

/// Database row for a sitemap entry.
#[derive(Debug, sqlx::FromRow)]
struct SitemapRow {
    slug: String,
    updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<SitemapRow> for SitemapEntry {
    fn from(row: SitemapRow) -> Self {
        Self {
            slug: row.slug,
            updated_at: row.updated_at,
        }
    }
}

/// Builds an `ILIKE` pattern matching `query` anywhere in the column.
///
/// `%`, `_` and `\` in the query match literally.
pub(crate) fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Converts a `COUNT(*)` result.
pub(crate) fn count_to_u64(count: i64) -> MarqueeResult<u64> {
    u64::try_from(count)
        .map_err(|_| MarqueeError::Database(format!("Negative row count: {}", count)))
}

/// Parses a text column holding an enum value.
pub(crate) fn parse_column<T>(column: &str, raw: &str) -> MarqueeResult<T>
where
    T: FromStr,
{
    raw.parse()
        .map_err(|_| MarqueeError::Database(format!("Invalid {} in row: {}", column, raw)))
}

/// Pairs each entity with the link rows whose parent is that entity.
///
/// Entity order is kept; entities without link rows get an empty list.
pub(crate) fn attach_links<E>(
    entities: Vec<E>,
    links: Vec<RelationLink>,
    id_of: impl Fn(&E) -> &str,
) -> Vec<Linked<E>> {
    let mut by_parent: HashMap<String, Vec<RelationLink>> = HashMap::new();
    for link in links {
        by_parent
            .entry(link.parent_id.clone())
            .or_default()
            .push(link);
    }

    entities
        .into_iter()
        .map(|entity| {
            let links = by_parent.remove(id_of(&entity)).unwrap_or_default();
            Linked::new(entity, links)
        })
        .collect()
}
