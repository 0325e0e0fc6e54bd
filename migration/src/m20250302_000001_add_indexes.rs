use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Reviews {
    Table,
    ProviderId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Portfolio {
    Table,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Providers {
    Table,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Profile pages list a provider's reviews newest first.
        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_provider_created")
                    .table(Reviews::Table)
                    .col(Reviews::ProviderId)
                    .col(Reviews::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Gallery listing per owner, newest first.
        manager
            .create_index(
                Index::create()
                    .name("idx_portfolio_user_created")
                    .table(Portfolio::Table)
                    .col(Portfolio::UserId)
                    .col(Portfolio::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Home page shows the newest providers.
        manager
            .create_index(
                Index::create()
                    .name("idx_providers_created_at")
                    .table(Providers::Table)
                    .col(Providers::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_reviews_provider_created").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_portfolio_user_created").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_providers_created_at").to_owned())
            .await?;

        Ok(())
    }
}
