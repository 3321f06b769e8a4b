//! Migration: Create hazard_reports table and the shared updated_at trigger.

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
                CREATE OR REPLACE FUNCTION update_updated_at_column()
                RETURNS TRIGGER AS $$
                BEGIN
                    NEW.updated_at = NOW();
                    RETURN NEW;
                END;
                $$ LANGUAGE plpgsql;

                CREATE TABLE hazard_reports (
                    -- UUIDv7 for live submissions, short ids for copied seed records
                    id VARCHAR(64) PRIMARY KEY,
                    persistent_mock_id VARCHAR(128) NOT NULL,
                    reporter_role VARCHAR(32) NOT NULL
                        CHECK (reporter_role IN ('Coastal Guard', 'Disaster Manager',
                            'General Volunteer', 'Coastal Resident', 'Administrator')),
                    status VARCHAR(16) NOT NULL DEFAULT 'received'
                        CHECK (status IN ('received', 'review', 'verified', 'false')),
                    hazard_type VARCHAR(16) NOT NULL
                        CHECK (hazard_type IN ('flooding', 'erosion', 'pollution', 'others')),
                    extra_hazard_type VARCHAR(128),
                    description TEXT,

                    lat DOUBLE PRECISION NOT NULL CHECK (lat >= -90 AND lat <= 90),
                    lng DOUBLE PRECISION NOT NULL CHECK (lng >= -180 AND lng <= 180),
                    location_name VARCHAR(255),

                    -- [{name, size_bytes}]
                    media_files JSONB NOT NULL DEFAULT '[]'::jsonb,

                    created_at TIMESTAMPTZ,
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_hazard_reports_owner ON hazard_reports(persistent_mock_id);
                CREATE INDEX idx_hazard_reports_status ON hazard_reports(status);
                CREATE INDEX idx_hazard_reports_created_at ON hazard_reports(created_at DESC);

                CREATE TRIGGER update_hazard_reports_updated_at
                    BEFORE UPDATE ON hazard_reports
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TRIGGER IF EXISTS update_hazard_reports_updated_at ON hazard_reports;
                DROP TABLE IF EXISTS hazard_reports CASCADE;
                DROP FUNCTION IF EXISTS update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }
}
