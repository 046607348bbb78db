//! Database entities.

#![allow(missing_docs)]

pub mod deleted_review;
pub mod feed_event;
pub mod film_like;
pub mod friendship;
pub mod review_mark;

pub use deleted_review::Entity as DeletedReview;
pub use feed_event::Entity as FeedEvent;
pub use film_like::Entity as FilmLike;
pub use friendship::Entity as Friendship;
pub use review_mark::Entity as ReviewMark;
