//! Film like entity (a user likes a film).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "film_like")]
pub struct Model {
    /// The user who liked the film
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,

    /// The liked film
    #[sea_orm(primary_key, auto_increment = false)]
    pub film_id: i64,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
