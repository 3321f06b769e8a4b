//! Database module providing connection management, migrations, and queries.

pub mod hazard_reports;
pub mod official_warnings;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::migration::Migrator;

/// Connection pool wrapper.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

/// Attach context to a database error without hiding connection failures.
pub(crate) fn db_error(context: &str, err: DbErr) -> AppError {
    match AppError::from(err) {
        AppError::Database(msg) => AppError::Database(format!("Failed to {}: {}", context, msg)),
        other => other,
    }
}

impl DbPool {
    /// Connect to PostgreSQL using the configured URL and pool size.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut options = ConnectOptions::new(config.database_url.clone());
        options
            .max_connections(config.db_max_connections)
            .connect_timeout(Duration::from_secs(5))
            .acquire_timeout(Duration::from_secs(5))
            .sqlx_logging(false);

        let conn = Database::connect(options)
            .await
            .map_err(|e| AppError::StoreUnavailable(format!("Failed to connect: {}", e)))?;

        info!(
            max_connections = config.db_max_connections,
            "Connected to PostgreSQL"
        );
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Apply pending migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(&self.conn, None)
            .await
            .map_err(|e| AppError::StoreUnavailable(format!("Failed to run migrations: {}", e)))?;
        info!("Database migrations applied");
        Ok(())
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.conn
            .ping()
            .await
            .map_err(|e| AppError::StoreUnavailable(format!("Database ping failed: {}", e)))
    }
}
