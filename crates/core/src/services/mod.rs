//! Business logic services.

pub mod activity_feed;
pub mod entity_store;
pub mod friendship;
pub mod like;
pub mod recommendation;
pub mod review_mark;

pub use activity_feed::{ActivityFeedService, Event, EventOperation, EventSubject, NewEvent};
pub use entity_store::{EntityStore, InMemoryEntityStore};
pub use friendship::{FriendshipService, FriendshipState, FriendshipTransition};
pub use like::{FilmPopularity, LikeService, PopularityQuery};
pub use recommendation::RecommendationService;
pub use review_mark::{MarkTransition, ReviewMarkService, ReviewUsefulness};
