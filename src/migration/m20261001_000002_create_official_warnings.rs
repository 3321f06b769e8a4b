//! Migration: Create official_warnings table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE official_warnings (
                    id UUID PRIMARY KEY,
                    title VARCHAR(255) NOT NULL CHECK (length(trim(title)) > 0),
                    message TEXT NOT NULL CHECK (length(trim(message)) > 0),
                    verified BOOLEAN NOT NULL DEFAULT TRUE,
                    admin_id VARCHAR(128) NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_official_warnings_created_at
                    ON official_warnings(created_at DESC);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS official_warnings;")
            .await?;

        Ok(())
    }
}
