//! # Marquee Repository
//!
//! Read-only access to the origin store.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn ArticleRepository>   (domain interface)
//! PgArticleRepository               (PostgreSQL / SQLx)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! PostgreSQL
//! ```
//!
//! List methods that filter by a relation return [`Linked`](marquee_core::Linked)
//! rows so callers can see which join rows matched.
//!
//! With the `mocks` feature, `MockArticleRepository`, `MockMovieRepository`
//! and `MockUserRepository` are generated for downstream tests.

pub mod pool;
pub mod postgres;
pub mod traits;

pub use pool::*;
pub use postgres::*;
pub use traits::*;
