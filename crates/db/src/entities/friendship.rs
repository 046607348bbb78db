//! Friendship entity (invite/confirm relationship between two users).
//!
//! One row per unordered pair of users. The pair is stored normalized so that
//! `user_low < user_high`, which lets the primary key reject a second edge in the
//! opposite direction.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "friendship")]
pub struct Model {
    /// Smaller user id of the pair
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_low: i64,

    /// Larger user id of the pair
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_high: i64,

    /// The user who sent the invitation
    pub inviter_id: i64,

    /// Whether the other party has invited back
    pub confirmed: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Normalizes two user ids into the `(user_low, user_high)` key.
#[must_use]
pub const fn pair_key(a: i64, b: i64) -> (i64, i64) {
    if a < b { (a, b) } else { (b, a) }
}

impl Model {
    /// The user who received the invitation.
    #[must_use]
    pub const fn acceptor_id(&self) -> i64 {
        if self.inviter_id == self.user_low {
            self.user_high
        } else {
            self.user_low
        }
    }

    /// The member of the pair that is not `user_id`.
    #[must_use]
    pub const fn other_party(&self, user_id: i64) -> i64 {
        if self.user_low == user_id {
            self.user_high
        } else {
            self.user_low
        }
    }
}
