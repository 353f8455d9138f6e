//! Create hashtags table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Hashtags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Hashtags::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Hashtags::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Hashtags::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: name (normalized, lowercase)
        manager
            .create_index(
                Index::create()
                    .name("idx_hashtags_name")
                    .table(Hashtags::Table)
                    .col(Hashtags::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Hashtags::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Hashtags {
    Table,
    Id,
    Name,
    CreatedAt,
}
