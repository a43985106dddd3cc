//! SQLx implementation of the assessment scope repository

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::assessment::entities::AssessmentScope;
use crate::domain::assessment::repositories::{NewScope, ScopePatch, ScopeRepository};
use crate::domain::assessment::value_objects::ProjectId;
use crate::domain::errors::DomainError;

use super::db_error;

/// SQLx implementation of the assessment scope repository
pub struct SqlxScopeRepository {
    pool: PgPool,
}

impl SqlxScopeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ScopeRow {
    id: i64,
    project_id: i64,
    subject: String,
    info: String,
}

impl From<ScopeRow> for AssessmentScope {
    fn from(row: ScopeRow) -> Self {
        AssessmentScope {
            id: row.id,
            project_id: ProjectId::from(row.project_id),
            subject: row.subject,
            info: row.info,
        }
    }
}

#[async_trait]
impl ScopeRepository for SqlxScopeRepository {
    #[tracing::instrument(skip(self, fields), fields(project_id = %project_id))]
    async fn create(
        &self,
        project_id: ProjectId,
        fields: NewScope,
    ) -> Result<AssessmentScope, DomainError> {
        let row = sqlx::query_as::<_, ScopeRow>(
            "INSERT INTO assessment_scopes (project_id, subject, info) \
             VALUES ($1, $2, $3) RETURNING id, project_id, subject, info",
        )
        .bind(project_id.as_i64())
        .bind(&fields.subject)
        .bind(&fields.info)
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

    async fn find_by_id(&self, id: i64) -> Result<Option<AssessmentScope>, DomainError> {
        let row = sqlx::query_as::<_, ScopeRow>(
            "SELECT id, project_id, subject, info FROM assessment_scopes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<AssessmentScope>, DomainError> {
        let rows = sqlx::query_as::<_, ScopeRow>(
            "SELECT id, project_id, subject, info FROM assessment_scopes \
             WHERE project_id = $1 ORDER BY id",
        )
        .bind(project_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip(self, patch), fields(scope_id = %id))]
    async fn update(&self, id: i64, patch: ScopePatch) -> Result<AssessmentScope, DomainError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Assessment scope", id))?;

        let subject = patch.subject.unwrap_or(existing.subject);
        let info = patch.info.unwrap_or(existing.info);

        let row = sqlx::query_as::<_, ScopeRow>(
            "UPDATE assessment_scopes SET subject = $2, info = $3 \
             WHERE id = $1 RETURNING id, project_id, subject, info",
        )
        .bind(id)
        .bind(&subject)
        .bind(&info)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self), fields(scope_id = %id))]
    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM assessment_scopes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Assessment scope", id));
        }
        Ok(())
    }
}
