//! SQLx implementation of the project repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashSet;

use crate::domain::assessment::entities::Project;
use crate::domain::assessment::repositories::{NewProject, ProjectPatch, ProjectRepository};
use crate::domain::assessment::value_objects::ProjectId;
use crate::domain::errors::DomainError;

use super::db_error;

/// SQLx implementation of the project repository
pub struct SqlxProjectRepository {
    pool: PgPool,
}

impl SqlxProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: i64,
    project_name: String,
    system_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: ProjectId::from(row.id),
            project_name: row.project_name,
            system_name: row.system_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PROJECT_COLUMNS: &str = "id, project_name, system_name, created_at, updated_at";

#[async_trait]
impl ProjectRepository for SqlxProjectRepository {
    #[tracing::instrument(skip(self, fields), fields(project_name = %fields.project_name))]
    async fn create(&self, fields: NewProject) -> Result<Project, DomainError> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "INSERT INTO projects (project_name, system_name) \
             VALUES ($1, $2) RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(&fields.project_name)
        .bind(&fields.system_name)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self), fields(project_id = %id))]
    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, DomainError> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Project>, DomainError> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip(self, ids))]
    async fn list_by_ids(&self, ids: &HashSet<ProjectId>) -> Result<Vec<Project>, DomainError> {
        let id_list: Vec<i64> = ids.iter().map(|id| id.as_i64()).collect();
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ANY($1) ORDER BY id"
        ))
        .bind(&id_list)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip(self, patch), fields(project_id = %id))]
    async fn update(&self, id: ProjectId, patch: ProjectPatch) -> Result<Project, DomainError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Project", id.as_i64()))?;

        let project_name = patch.project_name.unwrap_or(existing.project_name);
        let system_name = patch.system_name.unwrap_or(existing.system_name);

        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "UPDATE projects SET project_name = $2, system_name = $3, updated_at = now() \
             WHERE id = $1 RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(id.as_i64())
        .bind(&project_name)
        .bind(&system_name)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self), fields(project_id = %id))]
    async fn delete(&self, id: ProjectId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Project", id.as_i64()));
        }
        Ok(())
    }

    async fn exists(&self, id: ProjectId) -> Result<bool, DomainError> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM projects WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(row.is_some())
    }
}
