use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `providers` table and its columns.
#[derive(DeriveIden)]
enum Providers {
    Table,
    Id,
    UserId,
    Email,
    Name,
    Category,
    WhatsappNumber,
    Bio,
    AvatarUrl,
    City,
    Features,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Providers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Providers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    // One provider row per auth user; upserts use this as the conflict target.
                    .col(
                        ColumnDef::new(Providers::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Providers::Email).string().null())
                    .col(ColumnDef::new(Providers::Name).string().not_null())
                    .col(
                        ColumnDef::new(Providers::Category)
                            .string()
                            .not_null()
                            .default("Jasa Umum"),
                    )
                    .col(ColumnDef::new(Providers::WhatsappNumber).string().null())
                    .col(ColumnDef::new(Providers::Bio).text().null())
                    .col(ColumnDef::new(Providers::AvatarUrl).text().null())
                    .col(ColumnDef::new(Providers::City).string().null())
                    .col(
                        ColumnDef::new(Providers::Features)
                            .array(ColumnType::Text)
                            .not_null()
                            .default(Expr::cust("'{}'::text[]")),
                    )
                    .col(
                        ColumnDef::new(Providers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Providers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Providers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Providers::Table).to_owned())
            .await
    }
}
