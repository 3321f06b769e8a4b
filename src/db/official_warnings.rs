//! Database queries for official warnings.

use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

use crate::entity::official_warning::{self, ActiveModel, Entity as Warning};
use crate::error::AppResult;
use crate::models::OfficialWarning;

use super::{DbPool, db_error};

impl From<official_warning::Model> for OfficialWarning {
    fn from(model: official_warning::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            message: model.message,
            verified: model.verified,
            admin_id: model.admin_id,
            created_at: model.created_at,
        }
    }
}

impl DbPool {
    pub async fn insert_warning(&self, warning: &OfficialWarning) -> AppResult<()> {
        let model = ActiveModel {
            id: Set(warning.id),
            title: Set(warning.title.clone()),
            message: Set(warning.message.clone()),
            verified: Set(warning.verified),
            admin_id: Set(warning.admin_id.clone()),
            created_at: Set(warning.created_at),
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| db_error("insert warning", e))?;

        Ok(())
    }

    /// All warnings, newest first.
    pub async fn list_warnings(&self) -> AppResult<Vec<OfficialWarning>> {
        let warnings = Warning::find()
            .order_by_desc(official_warning::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| db_error("list warnings", e))?;

        Ok(warnings.into_iter().map(OfficialWarning::from).collect())
    }
}
