//! Create film like table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FilmLike::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FilmLike::UserId).big_integer().not_null())
                    .col(ColumnDef::new(FilmLike::FilmId).big_integer().not_null())
                    .col(
                        ColumnDef::new(FilmLike::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_film_like")
                            .col(FilmLike::UserId)
                            .col(FilmLike::FilmId),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: film_id (likers of a film, popularity counts)
        manager
            .create_index(
                Index::create()
                    .name("idx_film_like_film_id")
                    .table(FilmLike::Table)
                    .col(FilmLike::FilmId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FilmLike::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FilmLike {
    Table,
    UserId,
    FilmId,
    CreatedAt,
}
