//! Article records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{Language, PublishStatus};
use crate::id::{ArticleId, TopicId, UserId};

/// An article row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    pub language: Language,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: PublishStatus,
    #[serde(with = "crate::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Topic attached to an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub id: TopicId,
    pub title: String,
    pub slug: String,
}

/// Author attached to an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: UserId,
    pub name: String,
    pub username: String,
}

/// Editor attached to an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorSummary {
    pub id: UserId,
    pub name: String,
}

/// An article with its topics, authors and editors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub article: Article,
    pub topics: Vec<TopicSummary>,
    pub authors: Vec<AuthorSummary>,
    pub editors: Vec<EditorSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn article() -> Article {
        Article {
            id: ArticleId::new("a1"),
            language: Language::En,
            title: "Hello".into(),
            slug: "hello".into(),
            content: "Body".into(),
            excerpt: None,
            meta_title: None,
            meta_description: None,
            status: PublishStatus::Published,
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            updated_at: None,
        }
    }

    #[test]
    fn test_detail_flattens_article_fields() {
        let detail = ArticleDetail {
            article: article(),
            topics: vec![TopicSummary {
                id: TopicId::new("t1"),
                title: "Tech".into(),
                slug: "tech".into(),
            }],
            authors: Vec::new(),
            editors: Vec::new(),
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["slug"], "hello");
        assert_eq!(json["createdAt"], "2024-01-01T00:00:00Z");
        assert_eq!(json["topics"][0]["slug"], "tech");
        assert!(json["authors"].as_array().unwrap().is_empty());
    }
}
