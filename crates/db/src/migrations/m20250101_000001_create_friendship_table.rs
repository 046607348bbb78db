//! Create friendship table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Friendship::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Friendship::UserLow).big_integer().not_null())
                    .col(ColumnDef::new(Friendship::UserHigh).big_integer().not_null())
                    .col(ColumnDef::new(Friendship::InviterId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Friendship::Confirmed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Friendship::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // Unordered pair: one edge per two users regardless of direction
                    .primary_key(
                        Index::create()
                            .name("pk_friendship")
                            .col(Friendship::UserLow)
                            .col(Friendship::UserHigh),
                    )
                    .check(Expr::col(Friendship::UserLow).lt(Expr::col(Friendship::UserHigh)))
                    .to_owned(),
            )
            .await?;

        // Index: user_high (lookups from the larger id's side)
        manager
            .create_index(
                Index::create()
                    .name("idx_friendship_user_high")
                    .table(Friendship::Table)
                    .col(Friendship::UserHigh)
                    .to_owned(),
            )
            .await?;

        // Index: inviter_id (outgoing pending invites)
        manager
            .create_index(
                Index::create()
                    .name("idx_friendship_inviter_id")
                    .table(Friendship::Table)
                    .col(Friendship::InviterId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Friendship::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Friendship {
    Table,
    UserLow,
    UserHigh,
    InviterId,
    Confirmed,
    CreatedAt,
}
