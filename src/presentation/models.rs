//! API request and response models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::assessment::entities::{
    AffectedObject, AssessmentScope, AssessmentTarget, Bug, BugImage, CollectedInformation,
    CveRecord, Project, ProjectAccess, Recommendation, VulnerabilityTemplate,
};
use crate::domain::assessment::value_objects::{BugCategory, Severity};

/// Standard error payload returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code
    #[schema(example = "NOT_FOUND")]
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error context
    pub details: Option<serde_json::Value>,
    /// Unique request identifier for tracking and support
    pub request_id: Uuid,
    /// Error occurrence timestamp
    pub timestamp: DateTime<Utc>,
}

// Projects

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    #[schema(example = "Q3 Webshop Assessment")]
    pub project_name: String,
    #[schema(example = "Storefront")]
    pub system_name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProjectRequest {
    pub project_name: Option<String>,
    /// Double option: absent = keep, null = clear
    #[serde(default, with = "double_option")]
    pub system_name: Option<Option<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectResponse {
    pub id: i64,
    pub project_name: String,
    pub system_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id.as_i64(),
            project_name: project.project_name,
            system_name: project.system_name,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

// Assessment targets

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTargetRequest {
    #[schema(example = "Web Application")]
    pub target_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TargetResponse {
    pub id: i64,
    pub project_id: i64,
    pub target_name: String,
}

impl From<AssessmentTarget> for TargetResponse {
    fn from(target: AssessmentTarget) -> Self {
        Self {
            id: target.id.as_i64(),
            project_id: target.project_id.as_i64(),
            target_name: target.target_name,
        }
    }
}

// Assessment scope

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateScopeRequest {
    #[schema(example = "Authentication System")]
    pub subject: String,
    #[schema(example = "Login, logout, session management")]
    pub info: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateScopeRequest {
    pub subject: Option<String>,
    pub info: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScopeResponse {
    pub id: i64,
    pub project_id: i64,
    pub subject: String,
    pub info: String,
}

impl From<AssessmentScope> for ScopeResponse {
    fn from(scope: AssessmentScope) -> Self {
        Self {
            id: scope.id,
            project_id: scope.project_id.as_i64(),
            subject: scope.subject,
            info: scope.info,
        }
    }
}

// Collected information

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInformationRequest {
    #[schema(example = "React.js frontend with TypeScript")]
    pub information: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InformationResponse {
    pub id: i64,
    pub project_id: i64,
    pub information: String,
}

impl From<CollectedInformation> for InformationResponse {
    fn from(info: CollectedInformation) -> Self {
        Self {
            id: info.id,
            project_id: info.project_id.as_i64(),
            information: info.information,
        }
    }
}

// Bugs

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBugRequest {
    pub target_id: i64,
    #[schema(example = "application")]
    pub category: String,
    #[schema(example = "SQL Injection in Login Form")]
    pub heading: String,
    #[schema(example = "high")]
    pub severity: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub recommendation_content: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBugRequest {
    pub target_id: Option<i64>,
    pub category: Option<String>,
    pub heading: Option<String>,
    pub severity: Option<String>,
    pub description: Option<String>,
    pub recommendation_content: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BugResponse {
    pub id: i64,
    pub project_id: i64,
    pub target_id: i64,
    pub category: BugCategory,
    pub heading: String,
    pub severity: Severity,
    pub description: String,
    pub recommendation_content: String,
}

impl From<Bug> for BugResponse {
    fn from(bug: Bug) -> Self {
        Self {
            id: bug.id.as_i64(),
            project_id: bug.project_id.as_i64(),
            target_id: bug.target_id.as_i64(),
            category: bug.category,
            heading: bug.heading,
            severity: bug.severity,
            description: bug.description,
            recommendation_content: bug.recommendation_content,
        }
    }
}

// Bug children

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAffectedObjectRequest {
    #[schema(example = "/login")]
    pub object_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AffectedObjectResponse {
    pub id: i64,
    pub bug_id: i64,
    pub object_url: String,
}

impl From<AffectedObject> for AffectedObjectResponse {
    fn from(object: AffectedObject) -> Self {
        Self {
            id: object.id,
            bug_id: object.bug_id.as_i64(),
            object_url: object.object_url,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRecommendationRequest {
    #[schema(example = "Use prepared statements for all database queries")]
    pub recommendation_text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecommendationResponse {
    pub id: i64,
    pub bug_id: i64,
    pub recommendation_text: String,
}

impl From<Recommendation> for RecommendationResponse {
    fn from(recommendation: Recommendation) -> Self {
        Self {
            id: recommendation.id,
            bug_id: recommendation.bug_id.as_i64(),
            recommendation_text: recommendation.recommendation_text,
        }
    }
}

/// Aggregated remediation view for one bug: the summary text plus the
/// ordered step list
#[derive(Debug, Serialize, ToSchema)]
pub struct RecommendationListResponse {
    pub bug_id: i64,
    pub content: String,
    pub list: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBugImageRequest {
    #[schema(example = "poc-sqli.png")]
    pub filename: String,
    pub caption: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BugImageResponse {
    pub id: i64,
    pub bug_id: i64,
    pub filename: String,
    pub caption: Option<String>,
}

impl From<BugImage> for BugImageResponse {
    fn from(image: BugImage) -> Self {
        Self {
            id: image.id,
            bug_id: image.bug_id.as_i64(),
            filename: image.filename,
            caption: image.caption,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCveRecordRequest {
    #[schema(example = "express")]
    pub library: String,
    #[schema(example = "CVE-2022-24999")]
    pub cve: String,
    #[schema(example = "4.18.2")]
    pub latest_version: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CveRecordResponse {
    pub id: i64,
    pub bug_id: i64,
    pub library: String,
    pub cve: String,
    pub latest_version: String,
}

impl From<CveRecord> for CveRecordResponse {
    fn from(record: CveRecord) -> Self {
        Self {
            id: record.id,
            bug_id: record.bug_id.as_i64(),
            library: record.library,
            cve: record.cve,
            latest_version: record.latest_version,
        }
    }
}

// Vulnerability templates

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTemplateRequest {
    #[schema(example = "SQL Injection")]
    pub name: String,
    pub description: String,
    pub recommendations: Option<String>,
    #[schema(example = "high")]
    pub severity: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "double_option")]
    pub recommendations: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub severity: Option<Option<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TemplateResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub recommendations: Option<String>,
    pub severity: Option<Severity>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<VulnerabilityTemplate> for TemplateResponse {
    fn from(template: VulnerabilityTemplate) -> Self {
        Self {
            id: template.id.as_i64(),
            name: template.name,
            description: template.description,
            recommendations: template.recommendations,
            severity: template.severity,
            created_at: template.created_at,
            updated_at: template.updated_at,
        }
    }
}

// Project access grants

#[derive(Debug, Deserialize, ToSchema)]
pub struct GrantAccessRequest {
    pub user_id: i64,
    pub project_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectAccessResponse {
    pub id: i64,
    pub user_id: i64,
    pub project_id: i64,
    pub has_access: bool,
    pub granted_by: i64,
    pub granted_at: DateTime<Utc>,
}

impl From<ProjectAccess> for ProjectAccessResponse {
    fn from(access: ProjectAccess) -> Self {
        Self {
            id: access.id,
            user_id: access.user_id.as_i64(),
            project_id: access.project_id.as_i64(),
            has_access: access.has_access,
            granted_by: access.granted_by.as_i64(),
            granted_at: access.granted_at,
        }
    }
}

/// Serde helper distinguishing an absent field from an explicit null
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
