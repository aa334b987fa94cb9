//! # Marquee Service
//!
//! Read-through query services for articles, movies and users.
//!
//! Each query either goes through the cache (read the key, or load from
//! the origin and store the result with the query's TTL) or always reads
//! the origin. Which one is decided by [`cache::policy`].

pub mod article_service;
pub mod bootstrap;
pub mod cache;
pub mod r#impl;
pub mod movie_service;
pub mod user_service;

pub use article_service::*;
pub use bootstrap::Marquee;
pub use cache::cache_keys;
pub use movie_service::*;
pub use r#impl::{ArticleServiceImpl, MovieServiceImpl, UserServiceImpl};
pub use user_service::*;
