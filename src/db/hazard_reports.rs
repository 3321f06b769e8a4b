//! Database queries for hazard reports.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, EntityTrait, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};

use crate::entity::hazard_report::{self, ActiveModel, Entity as HazardReport};
use crate::error::{AppError, AppResult};
use crate::models::{HazardType, Location, MediaFile, Report, ReportStatus, ReporterRole};
use crate::services::verification::check_edge;

use super::{DbPool, db_error};

impl TryFrom<hazard_report::Model> for Report {
    type Error = AppError;

    fn try_from(model: hazard_report::Model) -> AppResult<Self> {
        let corrupt = |field: &str, value: &str| {
            AppError::Database(format!(
                "hazard report {} has invalid {} '{}'",
                model.id, field, value
            ))
        };

        let status =
            ReportStatus::parse(&model.status).ok_or_else(|| corrupt("status", &model.status))?;
        let reporter_role = ReporterRole::parse(&model.reporter_role)
            .ok_or_else(|| corrupt("reporter_role", &model.reporter_role))?;
        let hazard_type = HazardType::parse(&model.hazard_type)
            .ok_or_else(|| corrupt("hazard_type", &model.hazard_type))?;
        let media_files: Vec<MediaFile> = serde_json::from_value(model.media_files.clone())
            .map_err(|e| corrupt("media_files", &e.to_string()))?;

        Ok(Report {
            id: model.id,
            persistent_mock_id: model.persistent_mock_id,
            reporter_role,
            status,
            hazard_type,
            extra_hazard_type: model.extra_hazard_type,
            description: model.description,
            location: Location {
                lat: model.lat,
                lng: model.lng,
                name: model.location_name,
            },
            media_files,
            created_at: model.created_at,
        })
    }
}

fn active_model(report: &Report) -> AppResult<ActiveModel> {
    Ok(ActiveModel {
        id: Set(report.id.clone()),
        persistent_mock_id: Set(report.persistent_mock_id.clone()),
        reporter_role: Set(report.reporter_role.as_str().to_string()),
        status: Set(report.status.as_str().to_string()),
        hazard_type: Set(report.hazard_type.as_str().to_string()),
        extra_hazard_type: Set(report.extra_hazard_type.clone()),
        description: Set(report.description.clone()),
        lat: Set(report.location.lat),
        lng: Set(report.location.lng),
        location_name: Set(report.location.name.clone()),
        media_files: Set(serde_json::to_value(&report.media_files)?),
        created_at: Set(report.created_at),
        updated_at: Set(Utc::now()),
    })
}

impl DbPool {
    /// Insert a new hazard report.
    pub async fn insert_hazard_report(&self, report: &Report) -> AppResult<()> {
        let model = active_model(report)?;

        if let Err(e) = model.insert(self.connection()).await {
            if let Some(SqlErr::UniqueConstraintViolation(_)) = e.sql_err() {
                return Err(AppError::Conflict(format!(
                    "report id {} already exists",
                    report.id
                )));
            }
            return Err(db_error("insert hazard report", e));
        }

        Ok(())
    }

    /// Get a hazard report by ID.
    pub async fn get_hazard_report(&self, id: &str) -> AppResult<Option<Report>> {
        HazardReport::find_by_id(id.to_string())
            .one(self.connection())
            .await
            .map_err(|e| db_error("get hazard report", e))?
            .map(Report::try_from)
            .transpose()
    }

    /// All hazard reports, newest first.
    pub async fn list_hazard_reports(&self) -> AppResult<Vec<Report>> {
        HazardReport::find()
            .order_by_desc(hazard_report::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| db_error("list hazard reports", e))?
            .into_iter()
            .map(Report::try_from)
            .collect()
    }

    /// Change a report's status inside a transaction holding the row lock,
    /// so the edge check sees the status it overwrites.
    pub async fn update_hazard_report_status(
        &self,
        id: &str,
        to: ReportStatus,
    ) -> AppResult<(ReportStatus, Report)> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;

        let model = HazardReport::find_by_id(id.to_string())
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| db_error("lock hazard report", e))?
            .ok_or_else(|| AppError::NotFound(format!("Report {}", id)))?;

        let from = ReportStatus::parse(&model.status).ok_or_else(|| {
            AppError::Database(format!(
                "hazard report {} has invalid status '{}'",
                id, model.status
            ))
        })?;
        check_edge(id, from, to)?;

        let mut active: ActiveModel = model.into();
        active.status = Set(to.as_str().to_string());
        active.updated_at = Set(Utc::now());

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| db_error("update hazard report status", e))?;

        txn.commit()
            .await
            .map_err(|e| db_error("commit status change", e))?;

        Ok((from, Report::try_from(updated)?))
    }
}
