//! Assessment domain entities
//!
//! Project is the root aggregate; every other entity here belongs to a
//! project directly or through a bug. Child rows are deleted with their
//! parent (cascade), never soft-deleted.

use chrono::{DateTime, Utc};

use super::value_objects::{BugCategory, BugId, ProjectId, Severity, TargetId, TemplateId};
use crate::domain::auth::value_objects::UserId;

/// Project aggregate root: one security-assessment engagement
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: ProjectId,
    pub project_name: String,
    /// Name of the assessed system, if distinct from the project name
    pub system_name: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Set on every update; None until the project is first modified
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    /// Timestamp shown on reports: last update if any, else creation time
    pub fn last_touched(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}

/// A system or component under assessment within a project
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentTarget {
    pub id: TargetId,
    pub project_id: ProjectId,
    pub target_name: String,
}

/// A documented subject-and-description pair bounding the assessment
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentScope {
    pub id: i64,
    pub project_id: ProjectId,
    pub subject: String,
    pub info: String,
}

/// Free-text note collected about the assessed system
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedInformation {
    pub id: i64,
    pub project_id: ProjectId,
    pub information: String,
}

/// One identified vulnerability finding
#[derive(Debug, Clone, PartialEq)]
pub struct Bug {
    pub id: BugId,
    pub project_id: ProjectId,
    pub target_id: TargetId,
    pub category: BugCategory,
    pub heading: String,
    pub severity: Severity,
    pub description: String,
    /// Summarized remediation text; independent of the Recommendation rows
    pub recommendation_content: String,
}

/// URL, path, or file affected by a bug
#[derive(Debug, Clone, PartialEq)]
pub struct AffectedObject {
    pub id: i64,
    pub bug_id: BugId,
    pub object_url: String,
}

/// One remediation step for a bug
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub id: i64,
    pub bug_id: BugId,
    pub recommendation_text: String,
}

/// Stored image attachment for a bug (filename only; upload transport is
/// handled outside this service)
#[derive(Debug, Clone, PartialEq)]
pub struct BugImage {
    pub id: i64,
    pub bug_id: BugId,
    pub filename: String,
    pub caption: Option<String>,
}

/// CVE reference attached to a bug
#[derive(Debug, Clone, PartialEq)]
pub struct CveRecord {
    pub id: i64,
    pub bug_id: BugId,
    pub library: String,
    pub cve: String,
    pub latest_version: String,
}

/// Reusable catalog entry used to pre-fill new bugs; project-independent
#[derive(Debug, Clone, PartialEq)]
pub struct VulnerabilityTemplate {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    pub recommendations: Option<String>,
    pub severity: Option<Severity>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Explicit (user, project) access grant enabling non-admin access
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectAccess {
    pub id: i64,
    pub user_id: UserId,
    pub project_id: ProjectId,
    pub has_access: bool,
    pub granted_by: UserId,
    pub granted_at: DateTime<Utc>,
}
