//! Value objects shared by several entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::MarqueeError;

/// Content language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Indonesian.
    #[default]
    Id,
    /// English.
    En,
}

impl Language {
    /// Returns the language code as stored and as used in cache keys.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::En => "en",
        }
    }

    /// Returns all languages.
    #[must_use]
    pub const fn all() -> &'static [Language] {
        &[Self::Id, Self::En]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = MarqueeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "en" => Ok(Self::En),
            other => Err(MarqueeError::validation(format!("Unknown language: {other}"))),
        }
    }
}

/// Publication status of an article or movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PublishStatus {
    /// Not visible on the site.
    #[default]
    Draft,
    /// Visible on the site.
    Published,
}

impl PublishStatus {
    /// Returns the status as stored in the origin.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }

    /// Returns true if the record is publicly visible.
    #[must_use]
    pub const fn is_published(&self) -> bool {
        matches!(self, Self::Published)
    }
}

impl fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PublishStatus {
    type Err = MarqueeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            other => Err(MarqueeError::validation(format!("Unknown status: {other}"))),
        }
    }
}

/// A sitemap row: the slug and when it last changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    pub slug: String,
    #[serde(with = "crate::timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One join-table row linking a parent record to a related record.
///
/// `related_id` is `None` when the join row points at nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationLink {
    pub parent_id: String,
    pub related_id: Option<String>,
}

/// A list row together with its raw join rows for one relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Linked<E> {
    #[serde(flatten)]
    pub entity: E,
    pub links: Vec<RelationLink>,
}

impl<E> Linked<E> {
    /// Wraps an entity with its links.
    pub fn new(entity: E, links: Vec<RelationLink>) -> Self {
        Self { entity, links }
    }

    /// Returns true if any link points at `related_id`.
    #[must_use]
    pub fn links_to(&self, related_id: &str) -> bool {
        self.links
            .iter()
            .any(|link| link.related_id.as_deref() == Some(related_id))
    }
}
