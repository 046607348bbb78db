//! Create feed event table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FeedEvent::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeedEvent::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FeedEvent::ActorId).big_integer().not_null())
                    .col(ColumnDef::new(FeedEvent::EntityId).big_integer().not_null())
                    .col(
                        ColumnDef::new(FeedEvent::OccurredOn)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeedEvent::Subject).string_len(16).not_null())
                    .col(ColumnDef::new(FeedEvent::Operation).string_len(16).not_null())
                    .to_owned(),
            )
            .await?;

        // Index: actor_id (feed assembly)
        manager
            .create_index(
                Index::create()
                    .name("idx_feed_event_actor_id")
                    .table(FeedEvent::Table)
                    .col(FeedEvent::ActorId)
                    .to_owned(),
            )
            .await?;

        // Index: occurred_on DESC (newest first)
        manager
            .create_index(
                Index::create()
                    .name("idx_feed_event_occurred_on")
                    .table(FeedEvent::Table)
                    .col((FeedEvent::OccurredOn, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FeedEvent::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FeedEvent {
    Table,
    Id,
    ActorId,
    EntityId,
    OccurredOn,
    Subject,
    Operation,
}
