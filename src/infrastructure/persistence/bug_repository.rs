//! SQLx implementation of the bug aggregate repository
//!
//! Covers the bug row and its four child tables. Bulk loads used by the
//! report assembler fetch each child table in one `= ANY(...)` scan keyed
//! by the bug id set.

use async_trait::async_trait;
use sqlx::PgPool;
use std::str::FromStr;

use crate::domain::assessment::entities::{
    AffectedObject, Bug, BugImage, CveRecord, Recommendation,
};
use crate::domain::assessment::repositories::{BugPatch, BugRepository, NewBug};
use crate::domain::assessment::value_objects::{BugCategory, BugId, ProjectId, Severity, TargetId};
use crate::domain::errors::DomainError;

use super::db_error;

/// SQLx implementation of the bug aggregate repository
pub struct SqlxBugRepository {
    pool: PgPool,
}

impl SqlxBugRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// NotFound check shared by the child-row create paths
    async fn require_bug(&self, bug_id: BugId) -> Result<(), DomainError> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM bugs WHERE id = $1")
            .bind(bug_id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        if row.is_none() {
            return Err(DomainError::not_found("Bug", bug_id.as_i64()));
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct BugRow {
    id: i64,
    project_id: i64,
    target_id: i64,
    category: String,
    heading: String,
    severity: String,
    description: String,
    recommendation_content: String,
}

impl BugRow {
    fn into_entity(self) -> Result<Bug, DomainError> {
        let category = BugCategory::from_str(&self.category).map_err(|_| {
            DomainError::Database {
                message: format!("Corrupt category column for bug {}", self.id),
            }
        })?;
        let severity = Severity::from_str(&self.severity).map_err(|_| DomainError::Database {
            message: format!("Corrupt severity column for bug {}", self.id),
        })?;
        Ok(Bug {
            id: BugId::from(self.id),
            project_id: ProjectId::from(self.project_id),
            target_id: TargetId::from(self.target_id),
            category,
            heading: self.heading,
            severity,
            description: self.description,
            recommendation_content: self.recommendation_content,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AffectedObjectRow {
    id: i64,
    bug_id: i64,
    object_url: String,
}

impl From<AffectedObjectRow> for AffectedObject {
    fn from(row: AffectedObjectRow) -> Self {
        AffectedObject {
            id: row.id,
            bug_id: BugId::from(row.bug_id),
            object_url: row.object_url,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RecommendationRow {
    id: i64,
    bug_id: i64,
    recommendation_text: String,
}

impl From<RecommendationRow> for Recommendation {
    fn from(row: RecommendationRow) -> Self {
        Recommendation {
            id: row.id,
            bug_id: BugId::from(row.bug_id),
            recommendation_text: row.recommendation_text,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BugImageRow {
    id: i64,
    bug_id: i64,
    filename: String,
    caption: Option<String>,
}

impl From<BugImageRow> for BugImage {
    fn from(row: BugImageRow) -> Self {
        BugImage {
            id: row.id,
            bug_id: BugId::from(row.bug_id),
            filename: row.filename,
            caption: row.caption,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CveRecordRow {
    id: i64,
    bug_id: i64,
    library: String,
    cve: String,
    latest_version: String,
}

impl From<CveRecordRow> for CveRecord {
    fn from(row: CveRecordRow) -> Self {
        CveRecord {
            id: row.id,
            bug_id: BugId::from(row.bug_id),
            library: row.library,
            cve: row.cve,
            latest_version: row.latest_version,
        }
    }
}

const BUG_COLUMNS: &str =
    "id, project_id, target_id, category, heading, severity, description, recommendation_content";

#[async_trait]
impl BugRepository for SqlxBugRepository {
    #[tracing::instrument(skip(self, fields), fields(project_id = %project_id, target_id = %fields.target_id))]
    async fn create(&self, project_id: ProjectId, fields: NewBug) -> Result<Bug, DomainError> {
        // The target must exist and belong to the same project; a dangling
        // target is NotFound, a foreign one a validation failure.
        let target: Option<(i64,)> =
            sqlx::query_as("SELECT project_id FROM assessment_targets WHERE id = $1")
                .bind(fields.target_id.as_i64())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        match target {
            None => {
                return Err(DomainError::not_found(
                    "Assessment target",
                    fields.target_id.as_i64(),
                ));
            }
            Some((owner,)) if owner != project_id.as_i64() => {
                return Err(DomainError::validation(format!(
                    "Target {} does not belong to project {}",
                    fields.target_id, project_id
                )));
            }
            Some(_) => {}
        }

        let row = sqlx::query_as::<_, BugRow>(&format!(
            "INSERT INTO bugs \
             (project_id, target_id, category, heading, severity, description, recommendation_content) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {BUG_COLUMNS}"
        ))
        .bind(project_id.as_i64())
        .bind(fields.target_id.as_i64())
        .bind(fields.category.as_str())
        .bind(&fields.heading)
        .bind(fields.severity.as_str())
        .bind(&fields.description)
        .bind(&fields.recommendation_content)
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

        row.into_entity()
    }

    async fn find_by_id(&self, id: BugId) -> Result<Option<Bug>, DomainError> {
        let row = sqlx::query_as::<_, BugRow>(&format!(
            "SELECT {BUG_COLUMNS} FROM bugs WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(BugRow::into_entity).transpose()
    }

    #[tracing::instrument(skip(self), fields(project_id = %project_id))]
    async fn list_for_project(&self, project_id: ProjectId) -> Result<Vec<Bug>, DomainError> {
        let rows = sqlx::query_as::<_, BugRow>(&format!(
            "SELECT {BUG_COLUMNS} FROM bugs WHERE project_id = $1 ORDER BY id"
        ))
        .bind(project_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(BugRow::into_entity).collect()
    }

    #[tracing::instrument(skip(self, patch), fields(bug_id = %id))]
    async fn update(&self, id: BugId, patch: BugPatch) -> Result<Bug, DomainError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Bug", id.as_i64()))?;

        let target_id = patch.target_id.unwrap_or(existing.target_id);
        if target_id != existing.target_id {
            let target: Option<(i64,)> =
                sqlx::query_as("SELECT project_id FROM assessment_targets WHERE id = $1")
                    .bind(target_id.as_i64())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(db_error)?;
            match target {
                None => {
                    return Err(DomainError::not_found(
                        "Assessment target",
                        target_id.as_i64(),
                    ));
                }
                Some((owner,)) if owner != existing.project_id.as_i64() => {
                    return Err(DomainError::validation(format!(
                        "Target {} does not belong to project {}",
                        target_id, existing.project_id
                    )));
                }
                Some(_) => {}
            }
        }

        let category = patch.category.unwrap_or(existing.category);
        let heading = patch.heading.unwrap_or(existing.heading);
        let severity = patch.severity.unwrap_or(existing.severity);
        let description = patch.description.unwrap_or(existing.description);
        let recommendation_content = patch
            .recommendation_content
            .unwrap_or(existing.recommendation_content);

        let row = sqlx::query_as::<_, BugRow>(&format!(
            "UPDATE bugs SET target_id = $2, category = $3, heading = $4, severity = $5, \
             description = $6, recommendation_content = $7 \
             WHERE id = $1 RETURNING {BUG_COLUMNS}"
        ))
        .bind(id.as_i64())
        .bind(target_id.as_i64())
        .bind(category.as_str())
        .bind(&heading)
        .bind(severity.as_str())
        .bind(&description)
        .bind(&recommendation_content)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        row.into_entity()
    }

    #[tracing::instrument(skip(self), fields(bug_id = %id))]
    async fn delete(&self, id: BugId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM bugs WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Bug", id.as_i64()));
        }
        Ok(())
    }

    async fn add_affected_object(
        &self,
        bug_id: BugId,
        object_url: String,
    ) -> Result<AffectedObject, DomainError> {
        self.require_bug(bug_id).await?;
        let row = sqlx::query_as::<_, AffectedObjectRow>(
            "INSERT INTO affected_objects (bug_id, object_url) \
             VALUES ($1, $2) RETURNING id, bug_id, object_url",
        )
        .bind(bug_id.as_i64())
        .bind(&object_url)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }

    async fn list_affected_objects(
        &self,
        bug_id: BugId,
    ) -> Result<Vec<AffectedObject>, DomainError> {
        let rows = sqlx::query_as::<_, AffectedObjectRow>(
            "SELECT id, bug_id, object_url FROM affected_objects WHERE bug_id = $1 ORDER BY id",
        )
        .bind(bug_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_affected_object(&self, id: i64) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM affected_objects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Affected object", id));
        }
        Ok(())
    }

    async fn add_recommendation(
        &self,
        bug_id: BugId,
        recommendation_text: String,
    ) -> Result<Recommendation, DomainError> {
        self.require_bug(bug_id).await?;
        let row = sqlx::query_as::<_, RecommendationRow>(
            "INSERT INTO recommendations (bug_id, recommendation_text) \
             VALUES ($1, $2) RETURNING id, bug_id, recommendation_text",
        )
        .bind(bug_id.as_i64())
        .bind(&recommendation_text)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }

    async fn list_recommendations(
        &self,
        bug_id: BugId,
    ) -> Result<Vec<Recommendation>, DomainError> {
        let rows = sqlx::query_as::<_, RecommendationRow>(
            "SELECT id, bug_id, recommendation_text FROM recommendations \
             WHERE bug_id = $1 ORDER BY id",
        )
        .bind(bug_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_recommendation(&self, id: i64) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM recommendations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Recommendation", id));
        }
        Ok(())
    }

    async fn add_image(
        &self,
        bug_id: BugId,
        filename: String,
        caption: Option<String>,
    ) -> Result<BugImage, DomainError> {
        self.require_bug(bug_id).await?;
        let row = sqlx::query_as::<_, BugImageRow>(
            "INSERT INTO bug_images (bug_id, filename, caption) \
             VALUES ($1, $2, $3) RETURNING id, bug_id, filename, caption",
        )
        .bind(bug_id.as_i64())
        .bind(&filename)
        .bind(&caption)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }

    async fn list_images(&self, bug_id: BugId) -> Result<Vec<BugImage>, DomainError> {
        let rows = sqlx::query_as::<_, BugImageRow>(
            "SELECT id, bug_id, filename, caption FROM bug_images WHERE bug_id = $1 ORDER BY id",
        )
        .bind(bug_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_image(&self, id: i64) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM bug_images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Bug image", id));
        }
        Ok(())
    }

    async fn add_cve_record(
        &self,
        bug_id: BugId,
        library: String,
        cve: String,
        latest_version: String,
    ) -> Result<CveRecord, DomainError> {
        self.require_bug(bug_id).await?;
        let row = sqlx::query_as::<_, CveRecordRow>(
            "INSERT INTO cve_records (bug_id, library, cve, latest_version) \
             VALUES ($1, $2, $3, $4) RETURNING id, bug_id, library, cve, latest_version",
        )
        .bind(bug_id.as_i64())
        .bind(&library)
        .bind(&cve)
        .bind(&latest_version)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }

    async fn list_cve_records(&self, bug_id: BugId) -> Result<Vec<CveRecord>, DomainError> {
        let rows = sqlx::query_as::<_, CveRecordRow>(
            "SELECT id, bug_id, library, cve, latest_version FROM cve_records \
             WHERE bug_id = $1 ORDER BY id",
        )
        .bind(bug_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_cve_record(&self, id: i64) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM cve_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("CVE record", id));
        }
        Ok(())
    }

    async fn affected_objects_for_bugs(
        &self,
        bug_ids: &[BugId],
    ) -> Result<Vec<AffectedObject>, DomainError> {
        let ids: Vec<i64> = bug_ids.iter().map(|id| id.as_i64()).collect();
        let rows = sqlx::query_as::<_, AffectedObjectRow>(
            "SELECT id, bug_id, object_url FROM affected_objects \
             WHERE bug_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn recommendations_for_bugs(
        &self,
        bug_ids: &[BugId],
    ) -> Result<Vec<Recommendation>, DomainError> {
        let ids: Vec<i64> = bug_ids.iter().map(|id| id.as_i64()).collect();
        let rows = sqlx::query_as::<_, RecommendationRow>(
            "SELECT id, bug_id, recommendation_text FROM recommendations \
             WHERE bug_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn images_for_bugs(&self, bug_ids: &[BugId]) -> Result<Vec<BugImage>, DomainError> {
        let ids: Vec<i64> = bug_ids.iter().map(|id| id.as_i64()).collect();
        let rows = sqlx::query_as::<_, BugImageRow>(
            "SELECT id, bug_id, filename, caption FROM bug_images \
             WHERE bug_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn cve_records_for_bugs(
        &self,
        bug_ids: &[BugId],
    ) -> Result<Vec<CveRecord>, DomainError> {
        let ids: Vec<i64> = bug_ids.iter().map(|id| id.as_i64()).collect();
        let rows = sqlx::query_as::<_, CveRecordRow>(
            "SELECT id, bug_id, library, cve, latest_version FROM cve_records \
             WHERE bug_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
