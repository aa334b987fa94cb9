//! Service implementations.
//!
//! Trait definitions live in the parent module (e.g. `article_service.rs`).

pub mod article_service_impl;
pub mod movie_service_impl;
pub mod user_service_impl;

pub use article_service_impl::ArticleServiceImpl;
pub use movie_service_impl::MovieServiceImpl;
pub use user_service_impl::UserServiceImpl;

use marquee_core::Linked;

/// Keeps the rows that have a link to `related_id`.
///
/// Rows whose only links are dangling (no related id) are dropped too.
pub(crate) fn retain_linked<E>(rows: Vec<Linked<E>>, related_id: &str) -> Vec<Linked<E>> {
    rows.into_iter()
        .filter(|row| row.links_to(related_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::RelationLink;

    fn row(id: u32, related: &[Option<&str>]) -> Linked<u32> {
        let links = related
            .iter()
            .map(|related_id| RelationLink {
                parent_id: id.to_string(),
                related_id: related_id.map(str::to_string),
            })
            .collect();
        Linked::new(id, links)
    }

    #[test]
    fn test_retain_linked() {
        let rows = vec![
            row(1, &[Some("g1")]),
            row(2, &[Some("g2"), Some("g1")]),
            row(3, &[None]),
            row(4, &[]),
            row(5, &[Some("g2")]),
        ];

        let kept: Vec<u32> = retain_linked(rows, "g1").into_iter().map(|r| r.entity).collect();
        assert_eq!(kept, vec![1, 2]);
    }
}
