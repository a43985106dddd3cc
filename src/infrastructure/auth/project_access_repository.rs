//! SQLx implementation of the project access grant repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashSet;

use crate::domain::assessment::entities::ProjectAccess;
use crate::domain::assessment::value_objects::ProjectId;
use crate::domain::auth::repositories::ProjectAccessRepository;
use crate::domain::auth::value_objects::UserId;
use crate::domain::errors::DomainError;
use crate::infrastructure::persistence::db_error;

/// SQLx implementation of the project access grant repository
pub struct SqlxProjectAccessRepository {
    pool: PgPool,
}

impl SqlxProjectAccessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AccessRow {
    id: i64,
    user_id: i64,
    project_id: i64,
    has_access: bool,
    granted_by: i64,
    granted_at: DateTime<Utc>,
}

impl From<AccessRow> for ProjectAccess {
    fn from(row: AccessRow) -> Self {
        ProjectAccess {
            id: row.id,
            user_id: UserId::from(row.user_id),
            project_id: ProjectId::from(row.project_id),
            has_access: row.has_access,
            granted_by: UserId::from(row.granted_by),
            granted_at: row.granted_at,
        }
    }
}

const ACCESS_COLUMNS: &str = "id, user_id, project_id, has_access, granted_by, granted_at";

#[async_trait]
impl ProjectAccessRepository for SqlxProjectAccessRepository {
    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn granted_project_ids(
        &self,
        user_id: UserId,
    ) -> Result<HashSet<ProjectId>, DomainError> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "SELECT project_id FROM project_access WHERE user_id = $1 AND has_access = TRUE",
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(|(id,)| ProjectId::from(id)).collect())
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, project_id = %project_id))]
    async fn grant(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        granted_by: UserId,
    ) -> Result<ProjectAccess, DomainError> {
        let row = sqlx::query_as::<_, AccessRow>(&format!(
            "INSERT INTO project_access (user_id, project_id, has_access, granted_by) \
             VALUES ($1, $2, TRUE, $3) \
             ON CONFLICT (user_id, project_id) \
             DO UPDATE SET has_access = TRUE, granted_by = $3, granted_at = now() \
             RETURNING {ACCESS_COLUMNS}"
        ))
        .bind(user_id.as_i64())
        .bind(project_id.as_i64())
        .bind(granted_by.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_foreign_key_violation()
            {
                return DomainError::not_found("Project or user", project_id.as_i64());
            }
            db_error(e)
        })?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, project_id = %project_id))]
    async fn revoke(&self, user_id: UserId, project_id: ProjectId) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE project_access SET has_access = FALSE \
             WHERE user_id = $1 AND project_id = $2",
        )
        .bind(user_id.as_i64())
        .bind(project_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Project access", project_id.as_i64()));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(project_id = %project_id))]
    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<ProjectAccess>, DomainError> {
        let rows = sqlx::query_as::<_, AccessRow>(&format!(
            "SELECT {ACCESS_COLUMNS} FROM project_access WHERE project_id = $1 ORDER BY id"
        ))
        .bind(project_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<ProjectAccess>, DomainError> {
        let rows = sqlx::query_as::<_, AccessRow>(&format!(
            "SELECT {ACCESS_COLUMNS} FROM project_access WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
