//! Cache policy per query.
//!
//! `Some(ttl)` caches the query result for `ttl`; `None` always reads the
//! origin. Single-record lookups live longest, lists and counts half as
//! long, and search results the shortest. Articles cache only the detail
//! page and the language listing.

use std::time::Duration;

const DETAIL: Option<Duration> = Some(Duration::from_secs(3600));
const LIST: Option<Duration> = Some(Duration::from_secs(1800));
const SEARCH: Option<Duration> = Some(Duration::from_secs(900));
const UNCACHED: Option<Duration> = None;

// ============ Articles ============

pub const ARTICLE_BY_SLUG: Option<Duration> = DETAIL;
pub const ARTICLES_BY_LANGUAGE: Option<Duration> = LIST;
pub const RELATED_ARTICLES: Option<Duration> = UNCACHED;
pub const ARTICLES_BY_TOPIC: Option<Duration> = UNCACHED;
pub const ARTICLES_BY_AUTHOR: Option<Duration> = UNCACHED;
pub const ARTICLES_SITEMAP: Option<Duration> = UNCACHED;
pub const ARTICLES_COUNT: Option<Duration> = UNCACHED;
pub const ARTICLES_COUNT_BY_LANGUAGE: Option<Duration> = UNCACHED;
pub const ARTICLES_COUNT_BY_TOPIC: Option<Duration> = UNCACHED;
pub const ARTICLES_COUNT_BY_AUTHOR: Option<Duration> = UNCACHED;
pub const ARTICLES_SEARCH: Option<Duration> = UNCACHED;

// ============ Movies ============

pub const MOVIE_BY_SLUG: Option<Duration> = DETAIL;
pub const LATEST_MOVIES: Option<Duration> = LIST;
pub const RELATED_MOVIES: Option<Duration> = LIST;
pub const MOVIES_BY_GENRE: Option<Duration> = LIST;
pub const MOVIES_BY_PRODUCTION_COMPANY: Option<Duration> = LIST;
pub const MOVIES_SITEMAP: Option<Duration> = DETAIL;
pub const MOVIES_COUNT: Option<Duration> = LIST;
pub const MOVIES_COUNT_BY_GENRE: Option<Duration> = LIST;
pub const MOVIES_COUNT_BY_PRODUCTION_COMPANY: Option<Duration> = LIST;
pub const MOVIES_SEARCH: Option<Duration> = SEARCH;

// ============ Users ============

pub const USER_BY_USERNAME: Option<Duration> = UNCACHED;
pub const USERS_SEARCH: Option<Duration> = UNCACHED;

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(policy: Option<Duration>) -> Option<u64> {
        policy.map(|ttl| ttl.as_secs())
    }

    #[test]
    fn test_article_policy() {
        assert_eq!(secs(ARTICLE_BY_SLUG), Some(3600));
        assert_eq!(secs(ARTICLES_BY_LANGUAGE), Some(1800));

        for uncached in [
            RELATED_ARTICLES,
            ARTICLES_BY_TOPIC,
            ARTICLES_BY_AUTHOR,
            ARTICLES_SITEMAP,
            ARTICLES_COUNT,
            ARTICLES_COUNT_BY_LANGUAGE,
            ARTICLES_COUNT_BY_TOPIC,
            ARTICLES_COUNT_BY_AUTHOR,
            ARTICLES_SEARCH,
        ] {
            assert_eq!(uncached, None);
        }
    }

    #[test]
    fn test_movie_policy() {
        assert_eq!(secs(MOVIE_BY_SLUG), Some(3600));
        assert_eq!(secs(MOVIES_SITEMAP), Some(3600));
        assert_eq!(secs(MOVIES_BY_GENRE), Some(1800));
        assert_eq!(secs(MOVIES_SEARCH), Some(900));
    }

    #[test]
    fn test_users_are_uncached() {
        assert_eq!(USER_BY_USERNAME, None);
        assert_eq!(USERS_SEARCH, None);
    }
}
