//! Domain records returned by the query layer.
//!
//! These are plain data structures: they are built from origin rows, stored
//! in the cache and handed to callers without further behaviour.

mod article;
mod common;
mod movie;
mod user;

pub use article::{Article, ArticleDetail, AuthorSummary, EditorSummary, TopicSummary};
pub use common::{Language, Linked, PublishStatus, RelationLink, SitemapEntry};
pub use movie::{GenreSummary, Movie, MovieDetail, ProductionCompanySummary};
pub use user::{User, UserRole};
