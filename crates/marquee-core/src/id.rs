//! Typed ID wrappers for domain entities.
//!
//! Identifiers are opaque text keys assigned by the content store.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

macro_rules! text_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an ID from its text form.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

text_id!(
    /// Article identifier.
    ArticleId
);
text_id!(
    /// Movie identifier.
    MovieId
);
text_id!(
    /// User identifier.
    UserId
);
text_id!(
    /// Topic identifier.
    TopicId
);
text_id!(
    /// Genre identifier.
    GenreId
);
text_id!(
    /// Production company identifier.
    ProductionCompanyId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_as_str() {
        let id = ArticleId::new("art_01");
        assert_eq!(id.to_string(), "art_01");
        assert_eq!(id.as_str(), "art_01");
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = GenreId::from("drama");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"drama\"");

        let parsed: GenreId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_id_from_string() {
        let id = MovieId::from(String::from("m-42"));
        assert_eq!(id.into_inner(), "m-42");
    }
}
