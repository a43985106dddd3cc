//! SQLx implementation of the assessment target repository

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::assessment::entities::AssessmentTarget;
use crate::domain::assessment::repositories::TargetRepository;
use crate::domain::assessment::value_objects::{ProjectId, TargetId};
use crate::domain::errors::DomainError;

use super::db_error;

/// SQLx implementation of the assessment target repository
pub struct SqlxTargetRepository {
    pool: PgPool,
}

impl SqlxTargetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TargetRow {
    id: i64,
    project_id: i64,
    target_name: String,
}

impl From<TargetRow> for AssessmentTarget {
    fn from(row: TargetRow) -> Self {
        AssessmentTarget {
            id: TargetId::from(row.id),
            project_id: ProjectId::from(row.project_id),
            target_name: row.target_name,
        }
    }
}

#[async_trait]
impl TargetRepository for SqlxTargetRepository {
    #[tracing::instrument(skip(self), fields(project_id = %project_id))]
    async fn create(
        &self,
        project_id: ProjectId,
        target_name: String,
    ) -> Result<AssessmentTarget, DomainError> {
        let row = sqlx::query_as::<_, TargetRow>(
            "INSERT INTO assessment_targets (project_id, target_name) \
             VALUES ($1, $2) RETURNING id, project_id, target_name",
        )
        .bind(project_id.as_i64())
        .bind(&target_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_foreign_key_violation()
            {
                return DomainError::not_found("Project", project_id.as_i64());
            }
            db_error(e)
        })?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: TargetId) -> Result<Option<AssessmentTarget>, DomainError> {
        let row = sqlx::query_as::<_, TargetRow>(
            "SELECT id, project_id, target_name FROM assessment_targets WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<AssessmentTarget>, DomainError> {
        let rows = sqlx::query_as::<_, TargetRow>(
            "SELECT id, project_id, target_name FROM assessment_targets \
             WHERE project_id = $1 ORDER BY id",
        )
        .bind(project_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip(self), fields(target_id = %id))]
    async fn update(
        &self,
        id: TargetId,
        target_name: String,
    ) -> Result<AssessmentTarget, DomainError> {
        let row = sqlx::query_as::<_, TargetRow>(
            "UPDATE assessment_targets SET target_name = $2 \
             WHERE id = $1 RETURNING id, project_id, target_name",
        )
        .bind(id.as_i64())
        .bind(&target_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?
        .ok_or_else(|| DomainError::not_found("Assessment target", id.as_i64()))?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self), fields(target_id = %id))]
    async fn delete(&self, id: TargetId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM assessment_targets WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Assessment target", id.as_i64()));
        }
        Ok(())
    }
}
