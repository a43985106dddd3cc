//! SQLx implementation of the vulnerability template catalog

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::str::FromStr;

use crate::domain::assessment::entities::VulnerabilityTemplate;
use crate::domain::assessment::repositories::{NewTemplate, TemplatePatch, TemplateRepository};
use crate::domain::assessment::value_objects::{Severity, TemplateId};
use crate::domain::errors::DomainError;

use super::db_error;

/// SQLx implementation of the vulnerability template catalog
pub struct SqlxTemplateRepository {
    pool: PgPool,
}

impl SqlxTemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TemplateRow {
    id: i64,
    name: String,
    description: String,
    recommendations: Option<String>,
    severity: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl TemplateRow {
    fn into_entity(self) -> Result<VulnerabilityTemplate, DomainError> {
        let severity = self
            .severity
            .as_deref()
            .map(Severity::from_str)
            .transpose()
            .map_err(|_| DomainError::Database {
                message: format!("Corrupt severity column for template {}", self.id),
            })?;
        Ok(VulnerabilityTemplate {
            id: TemplateId::from(self.id),
            name: self.name,
            description: self.description,
            recommendations: self.recommendations,
            severity,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const TEMPLATE_COLUMNS: &str =
    "id, name, description, recommendations, severity, created_at, updated_at";

#[async_trait]
impl TemplateRepository for SqlxTemplateRepository {
    #[tracing::instrument(skip(self, fields), fields(name = %fields.name))]
    async fn create(&self, fields: NewTemplate) -> Result<VulnerabilityTemplate, DomainError> {
        let row = sqlx::query_as::<_, TemplateRow>(&format!(
            "INSERT INTO vulnerability_templates (name, description, recommendations, severity) \
             VALUES ($1, $2, $3, $4) RETURNING {TEMPLATE_COLUMNS}"
        ))
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.recommendations)
        .bind(fields.severity.map(|s| s.as_str()))
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        row.into_entity()
    }

    async fn find_by_id(
        &self,
        id: TemplateId,
    ) -> Result<Option<VulnerabilityTemplate>, DomainError> {
        let row = sqlx::query_as::<_, TemplateRow>(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM vulnerability_templates WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(TemplateRow::into_entity).transpose()
    }

    async fn list(&self) -> Result<Vec<VulnerabilityTemplate>, DomainError> {
        let rows = sqlx::query_as::<_, TemplateRow>(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM vulnerability_templates ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(TemplateRow::into_entity).collect()
    }

    #[tracing::instrument(skip(self, patch), fields(template_id = %id))]
    async fn update(
        &self,
        id: TemplateId,
        patch: TemplatePatch,
    ) -> Result<VulnerabilityTemplate, DomainError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Vulnerability template", id.as_i64()))?;

        let name = patch.name.unwrap_or(existing.name);
        let description = patch.description.unwrap_or(existing.description);
        let recommendations = patch.recommendations.unwrap_or(existing.recommendations);
        let severity = patch.severity.unwrap_or(existing.severity);

        let row = sqlx::query_as::<_, TemplateRow>(&format!(
            "UPDATE vulnerability_templates \
             SET name = $2, description = $3, recommendations = $4, severity = $5, \
             updated_at = now() \
             WHERE id = $1 RETURNING {TEMPLATE_COLUMNS}"
        ))
        .bind(id.as_i64())
        .bind(&name)
        .bind(&description)
        .bind(&recommendations)
        .bind(severity.map(|s| s.as_str()))
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        row.into_entity()
    }

    #[tracing::instrument(skip(self), fields(template_id = %id))]
    async fn delete(&self, id: TemplateId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM vulnerability_templates WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Vulnerability template", id.as_i64()));
        }
        Ok(())
    }
}
