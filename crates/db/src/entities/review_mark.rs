//! Review mark entity (a user's usefulness judgment on a review).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "review_mark")]
pub struct Model {
    /// The user who marked the review
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,

    /// The marked review
    #[sea_orm(primary_key, auto_increment = false)]
    pub review_id: i64,

    /// `true` for useful, `false` for not useful
    pub is_useful: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
