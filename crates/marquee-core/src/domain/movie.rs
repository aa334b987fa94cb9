//! Movie records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::PublishStatus;
use crate::id::{GenreId, MovieId, ProductionCompanyId};

/// A movie row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: MovieId,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<String>,
    pub title: String,
    pub other_title: Option<String>,
    pub tagline: Option<String>,
    pub slug: String,
    pub original_language: Option<String>,
    /// Release date as written by the origin (`YYYY-MM-DD`).
    pub release_date: Option<String>,
    pub runtime: Option<i32>,
    pub budget: Option<i64>,
    pub revenue: Option<i64>,
    pub poster: Option<String>,
    pub backdrop: Option<String>,
    pub status: PublishStatus,
    #[serde(with = "crate::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Genre attached to a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreSummary {
    pub id: GenreId,
    pub title: String,
    pub slug: String,
}

/// Production company attached to a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCompanySummary {
    pub id: ProductionCompanyId,
    pub name: String,
    pub logo: Option<String>,
    pub slug: String,
}

/// A movie with its overview, genres and production companies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    /// Content of the first related overview.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    pub genres: Vec<GenreSummary>,
    pub production_companies: Vec<ProductionCompanySummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie() -> Movie {
        Movie {
            id: MovieId::new("m1"),
            imdb_id: Some("tt0111161".into()),
            tmdb_id: None,
            title: "The Shawshank Redemption".into(),
            other_title: None,
            tagline: None,
            slug: "the-shawshank-redemption".into(),
            original_language: Some("en".into()),
            release_date: Some("1994-09-23".into()),
            runtime: Some(142),
            budget: None,
            revenue: None,
            poster: None,
            backdrop: None,
            status: PublishStatus::Published,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_detail_uses_camel_case_relations() {
        let detail = MovieDetail {
            movie: movie(),
            overview: None,
            genres: Vec::new(),
            production_companies: vec![ProductionCompanySummary {
                id: ProductionCompanyId::new("pc1"),
                name: "Castle Rock".into(),
                logo: None,
                slug: "castle-rock".into(),
            }],
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["productionCompanies"][0]["name"], "Castle Rock");
        assert_eq!(json["imdbId"], "tt0111161");
        assert!(json.get("overview").is_none());
    }

    #[test]
    fn test_detail_overview_present() {
        let detail = MovieDetail {
            movie: movie(),
            overview: Some("Two imprisoned men bond".into()),
            genres: Vec::new(),
            production_companies: Vec::new(),
        };

        let json = serde_json::to_string(&detail).unwrap();
        let parsed: MovieDetail = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.overview.as_deref(), Some("Two imprisoned men bond"));
    }
}
