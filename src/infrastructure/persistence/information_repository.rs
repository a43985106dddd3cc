//! SQLx implementation of the collected information repository

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::assessment::entities::CollectedInformation;
use crate::domain::assessment::repositories::InformationRepository;
use crate::domain::assessment::value_objects::ProjectId;
use crate::domain::errors::DomainError;

use super::db_error;

/// SQLx implementation of the collected information repository
pub struct SqlxInformationRepository {
    pool: PgPool,
}

impl SqlxInformationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct InformationRow {
    id: i64,
    project_id: i64,
    information: String,
}

impl From<InformationRow> for CollectedInformation {
    fn from(row: InformationRow) -> Self {
        CollectedInformation {
            id: row.id,
            project_id: ProjectId::from(row.project_id),
            information: row.information,
        }
    }
}

#[async_trait]
impl InformationRepository for SqlxInformationRepository {
    #[tracing::instrument(skip(self, information), fields(project_id = %project_id))]
    async fn create(
        &self,
        project_id: ProjectId,
        information: String,
    ) -> Result<CollectedInformation, DomainError> {
        let row = sqlx::query_as::<_, InformationRow>(
            "INSERT INTO collected_information (project_id, information) \
             VALUES ($1, $2) RETURNING id, project_id, information",
        )
        .bind(project_id.as_i64())
        .bind(&information)
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

    async fn find_by_id(&self, id: i64) -> Result<Option<CollectedInformation>, DomainError> {
        let row = sqlx::query_as::<_, InformationRow>(
            "SELECT id, project_id, information FROM collected_information WHERE id = $1",
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
    ) -> Result<Vec<CollectedInformation>, DomainError> {
        let rows = sqlx::query_as::<_, InformationRow>(
            "SELECT id, project_id, information FROM collected_information \
             WHERE project_id = $1 ORDER BY id",
        )
        .bind(project_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip(self, information), fields(information_id = %id))]
    async fn update(
        &self,
        id: i64,
        information: String,
    ) -> Result<CollectedInformation, DomainError> {
        let row = sqlx::query_as::<_, InformationRow>(
            "UPDATE collected_information SET information = $2 \
             WHERE id = $1 RETURNING id, project_id, information",
        )
        .bind(id)
        .bind(&information)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?
        .ok_or_else(|| DomainError::not_found("Collected information", id))?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self), fields(information_id = %id))]
    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM collected_information WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Collected information", id));
        }
        Ok(())
    }
}
