//! Report document models
//!
//! Field names and nesting of these structs are the external contract handed
//! to rendering and export collaborators; they must stay byte-for-byte
//! stable.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::assessment::value_objects::{ProjectId, Severity, TargetId};

/// The aggregated, nested read-model produced from a project's stored
/// entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Report {
    pub project_id: ProjectId,
    pub project_name: String,
    /// Empty string when the project has no system name
    pub system_name: String,
    /// Last project update (else creation time), RFC 3339
    pub updated_at: String,
    pub targets: Vec<TargetSummary>,
    pub scope: Vec<ScopeSummary>,
    /// Flattened information notes, in creation order
    pub application_info: Vec<String>,
    /// Full information records, kept for compatibility with consumers that
    /// need row ids
    pub collected_information: Vec<CollectedInformationRecord>,
    pub sections_by_category: SectionsByCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TargetSummary {
    pub id: TargetId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScopeSummary {
    pub id: i64,
    pub subject: String,
    pub info: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CollectedInformationRecord {
    pub id: i64,
    pub project_id: ProjectId,
    pub information: String,
}

/// Report sections partitioned by bug category. A target with no bugs in a
/// category has no section there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SectionsByCategory {
    pub application: Vec<ReportSection>,
    pub source_code: Vec<ReportSection>,
}

/// One target's findings within a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReportSection {
    pub target_heading: String,
    pub vulnerabilities: Vec<VulnerabilityDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VulnerabilityDetail {
    pub vulnerability: VulnerabilitySummary,
    pub description: DescriptionBlock,
    pub affected_objects: AffectedObjectsBlock,
    pub recommendations: RecommendationsBlock,
    pub images: Vec<ImageBlock>,
    pub cve: Vec<CveBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VulnerabilitySummary {
    pub heading: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DescriptionBlock {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AffectedObjectsBlock {
    pub list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecommendationsBlock {
    /// The bug's own summary when non-empty, else the individual
    /// recommendation texts joined line by line
    pub content: String,
    pub list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ImageBlock {
    pub filename: String,
    /// Caption, or empty string when none was stored
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CveBlock {
    pub library: String,
    pub cve: String,
    pub latest_version: String,
}
