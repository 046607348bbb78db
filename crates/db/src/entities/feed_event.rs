//! Feed event entity (append-only activity log).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What kind of thing the event is about.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventSubject {
    /// A friendship between two users.
    #[sea_orm(string_value = "FRIEND")]
    Friend,
    /// A like on a film.
    #[sea_orm(string_value = "LIKE")]
    Like,
    /// A review or a usefulness mark on a review.
    #[sea_orm(string_value = "REVIEW")]
    Review,
}

/// What happened to the subject.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventOperation {
    #[sea_orm(string_value = "ADD")]
    Add,
    #[sea_orm(string_value = "REMOVE")]
    Remove,
    #[sea_orm(string_value = "UPDATE")]
    Update,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "feed_event")]
pub struct Model {
    /// Event id, assigned by the database on insert
    #[sea_orm(primary_key)]
    pub id: i64,

    /// The user whose action produced the event
    pub actor_id: i64,

    /// The film, friend or review the action targets
    pub entity_id: i64,

    pub occurred_on: DateTimeWithTimeZone,

    pub subject: EventSubject,

    pub operation: EventOperation,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
