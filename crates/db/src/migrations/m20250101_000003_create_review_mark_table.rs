//! Create review mark table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReviewMark::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ReviewMark::UserId).big_integer().not_null())
                    .col(ColumnDef::new(ReviewMark::ReviewId).big_integer().not_null())
                    .col(ColumnDef::new(ReviewMark::IsUseful).boolean().not_null())
                    .col(
                        ColumnDef::new(ReviewMark::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_review_mark")
                            .col(ReviewMark::UserId)
                            .col(ReviewMark::ReviewId),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: review_id (usefulness score)
        manager
            .create_index(
                Index::create()
                    .name("idx_review_mark_review_id")
                    .table(ReviewMark::Table)
                    .col(ReviewMark::ReviewId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReviewMark::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ReviewMark {
    Table,
    UserId,
    ReviewId,
    IsUseful,
    CreatedAt,
}
