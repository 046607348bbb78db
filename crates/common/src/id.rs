//! Identifier types.
//!
//! Users, films and reviews are owned by an external entity store; the core only
//! ever holds their numeric primary keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary key of a user.
pub type UserId = i64;

/// Primary key of a film.
pub type FilmId = i64;

/// Primary key of a review.
pub type ReviewId = i64;

/// Primary key of a genre.
pub type GenreId = i64;

/// Primary key of a feed event, assigned by the event log on append.
pub type EventId = i64;

/// Kinds of externally owned entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A registered user.
    User,
    /// A film in the catalog.
    Film,
    /// A film review.
    Review,
}

impl EntityKind {
    /// Returns the lowercase name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Film => "film",
            Self::Review => "review",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
