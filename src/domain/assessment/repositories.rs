//! Assessment repository traits
//!
//! Explicit per-entity contracts over the relational store. List operations
//! return rows in insertion order. Bulk child loads keyed by bug id sets are
//! part of the bug contract so the report assembler never falls back to
//! per-row traversal.

use async_trait::async_trait;
use std::collections::HashSet;

use super::entities::{
    AffectedObject, AssessmentScope, AssessmentTarget, Bug, BugImage, CollectedInformation,
    CveRecord, Project, Recommendation, VulnerabilityTemplate,
};
use super::value_objects::{BugCategory, BugId, ProjectId, Severity, TargetId, TemplateId};
use crate::domain::errors::DomainError;

/// Fields for creating a project
#[derive(Debug, Clone)]
pub struct NewProject {
    pub project_name: String,
    pub system_name: Option<String>,
}

/// Partial update for a project; None fields retain their prior value
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub project_name: Option<String>,
    pub system_name: Option<Option<String>>,
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, fields: NewProject) -> Result<Project, DomainError>;

    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, DomainError>;

    /// All projects in creation order
    async fn list(&self) -> Result<Vec<Project>, DomainError>;

    /// Projects restricted to the given id set, in creation order
    async fn list_by_ids(&self, ids: &HashSet<ProjectId>) -> Result<Vec<Project>, DomainError>;

    /// Partial update; bumps `updated_at`
    async fn update(&self, id: ProjectId, patch: ProjectPatch) -> Result<Project, DomainError>;

    /// Physical delete; cascades to all child tables
    async fn delete(&self, id: ProjectId) -> Result<(), DomainError>;

    async fn exists(&self, id: ProjectId) -> Result<bool, DomainError>;
}

#[async_trait]
pub trait TargetRepository: Send + Sync {
    /// Fails NotFound when the project does not exist
    async fn create(
        &self,
        project_id: ProjectId,
        target_name: String,
    ) -> Result<AssessmentTarget, DomainError>;

    async fn find_by_id(&self, id: TargetId) -> Result<Option<AssessmentTarget>, DomainError>;

    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<AssessmentTarget>, DomainError>;

    async fn update(&self, id: TargetId, target_name: String)
    -> Result<AssessmentTarget, DomainError>;

    /// Deleting a target cascades to its bugs
    async fn delete(&self, id: TargetId) -> Result<(), DomainError>;
}

/// Fields for creating a scope entry
#[derive(Debug, Clone)]
pub struct NewScope {
    pub subject: String,
    pub info: String,
}

/// Partial update for a scope entry
#[derive(Debug, Clone, Default)]
pub struct ScopePatch {
    pub subject: Option<String>,
    pub info: Option<String>,
}

#[async_trait]
pub trait ScopeRepository: Send + Sync {
    async fn create(
        &self,
        project_id: ProjectId,
        fields: NewScope,
    ) -> Result<AssessmentScope, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<AssessmentScope>, DomainError>;

    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<AssessmentScope>, DomainError>;

    async fn update(&self, id: i64, patch: ScopePatch) -> Result<AssessmentScope, DomainError>;

    async fn delete(&self, id: i64) -> Result<(), DomainError>;
}

#[async_trait]
pub trait InformationRepository: Send + Sync {
    async fn create(
        &self,
        project_id: ProjectId,
        information: String,
    ) -> Result<CollectedInformation, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<CollectedInformation>, DomainError>;

    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<CollectedInformation>, DomainError>;

    async fn update(&self, id: i64, information: String)
    -> Result<CollectedInformation, DomainError>;

    async fn delete(&self, id: i64) -> Result<(), DomainError>;
}

/// Fields for creating a bug
#[derive(Debug, Clone)]
pub struct NewBug {
    pub target_id: TargetId,
    pub category: BugCategory,
    pub heading: String,
    pub severity: Severity,
    pub description: String,
    pub recommendation_content: String,
}

/// Partial update for a bug; None fields retain their prior value
#[derive(Debug, Clone, Default)]
pub struct BugPatch {
    pub target_id: Option<TargetId>,
    pub category: Option<BugCategory>,
    pub heading: Option<String>,
    pub severity: Option<Severity>,
    pub description: Option<String>,
    pub recommendation_content: Option<String>,
}

/// Repository for the bug aggregate: the bug row plus its child tables
/// (affected objects, recommendations, images, CVE records).
#[async_trait]
pub trait BugRepository: Send + Sync {
    /// Fails NotFound when the project or target is absent; fails Validation
    /// when the target belongs to a different project
    async fn create(&self, project_id: ProjectId, fields: NewBug) -> Result<Bug, DomainError>;

    async fn find_by_id(&self, id: BugId) -> Result<Option<Bug>, DomainError>;

    /// Single-scan load of all bugs in a project, in creation order
    async fn list_for_project(&self, project_id: ProjectId) -> Result<Vec<Bug>, DomainError>;

    async fn update(&self, id: BugId, patch: BugPatch) -> Result<Bug, DomainError>;

    async fn delete(&self, id: BugId) -> Result<(), DomainError>;

    // Child rows. Creation fails NotFound when the bug is absent.

    async fn add_affected_object(
        &self,
        bug_id: BugId,
        object_url: String,
    ) -> Result<AffectedObject, DomainError>;

    async fn list_affected_objects(&self, bug_id: BugId)
    -> Result<Vec<AffectedObject>, DomainError>;

    async fn delete_affected_object(&self, id: i64) -> Result<(), DomainError>;

    async fn add_recommendation(
        &self,
        bug_id: BugId,
        recommendation_text: String,
    ) -> Result<Recommendation, DomainError>;

    async fn list_recommendations(&self, bug_id: BugId)
    -> Result<Vec<Recommendation>, DomainError>;

    async fn delete_recommendation(&self, id: i64) -> Result<(), DomainError>;

    async fn add_image(
        &self,
        bug_id: BugId,
        filename: String,
        caption: Option<String>,
    ) -> Result<BugImage, DomainError>;

    async fn list_images(&self, bug_id: BugId) -> Result<Vec<BugImage>, DomainError>;

    async fn delete_image(&self, id: i64) -> Result<(), DomainError>;

    async fn add_cve_record(
        &self,
        bug_id: BugId,
        library: String,
        cve: String,
        latest_version: String,
    ) -> Result<CveRecord, DomainError>;

    async fn list_cve_records(&self, bug_id: BugId) -> Result<Vec<CveRecord>, DomainError>;

    async fn delete_cve_record(&self, id: i64) -> Result<(), DomainError>;

    // Bulk loads for report assembly: one query per child table, keyed by
    // the bug id set, rows in creation order.

    async fn affected_objects_for_bugs(
        &self,
        bug_ids: &[BugId],
    ) -> Result<Vec<AffectedObject>, DomainError>;

    async fn recommendations_for_bugs(
        &self,
        bug_ids: &[BugId],
    ) -> Result<Vec<Recommendation>, DomainError>;

    async fn images_for_bugs(&self, bug_ids: &[BugId]) -> Result<Vec<BugImage>, DomainError>;

    async fn cve_records_for_bugs(&self, bug_ids: &[BugId])
    -> Result<Vec<CveRecord>, DomainError>;
}

/// Fields for creating a vulnerability template
#[derive(Debug, Clone)]
pub struct NewTemplate {
    pub name: String,
    pub description: String,
    pub recommendations: Option<String>,
    pub severity: Option<Severity>,
}

/// Partial update for a vulnerability template
#[derive(Debug, Clone, Default)]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub recommendations: Option<Option<String>>,
    pub severity: Option<Option<Severity>>,
}

#[async_trait]
pub trait TemplateRepository: Send + Sync {
    async fn create(&self, fields: NewTemplate) -> Result<VulnerabilityTemplate, DomainError>;

    async fn find_by_id(&self, id: TemplateId)
    -> Result<Option<VulnerabilityTemplate>, DomainError>;

    async fn list(&self) -> Result<Vec<VulnerabilityTemplate>, DomainError>;

    async fn update(
        &self,
        id: TemplateId,
        patch: TemplatePatch,
    ) -> Result<VulnerabilityTemplate, DomainError>;

    async fn delete(&self, id: TemplateId) -> Result<(), DomainError>;
}
