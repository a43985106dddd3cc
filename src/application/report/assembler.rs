//! Report assembler
//!
//! Pure read/fold over a project's stored entities: bugs and their children
//! are fetched in bulk (one scan per table, keyed by the project or the bug
//! id set), then grouped in memory. No per-row query fan-out, no writes.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::assessment::entities::{
    AffectedObject, AssessmentScope, AssessmentTarget, Bug, BugImage, CollectedInformation,
    CveRecord, Project, Recommendation,
};
use crate::domain::assessment::repositories::{
    BugRepository, InformationRepository, ProjectRepository, ScopeRepository, TargetRepository,
};
use crate::domain::assessment::value_objects::{BugCategory, BugId, ProjectId, TargetId};
use crate::domain::errors::DomainError;

use super::models::{
    AffectedObjectsBlock, CollectedInformationRecord, CveBlock, DescriptionBlock, ImageBlock,
    RecommendationsBlock, Report, ReportSection, ScopeSummary, SectionsByCategory, TargetSummary,
    VulnerabilityDetail, VulnerabilitySummary,
};

/// Child rows of all bugs in a project, grouped by bug id with creation
/// order preserved within each group
#[derive(Debug, Default)]
struct BugChildren {
    affected_objects: HashMap<BugId, Vec<AffectedObject>>,
    recommendations: HashMap<BugId, Vec<Recommendation>>,
    images: HashMap<BugId, Vec<BugImage>>,
    cve_records: HashMap<BugId, Vec<CveRecord>>,
}

impl BugChildren {
    fn group(
        affected_objects: Vec<AffectedObject>,
        recommendations: Vec<Recommendation>,
        images: Vec<BugImage>,
        cve_records: Vec<CveRecord>,
    ) -> Self {
        let mut children = Self::default();
        for object in affected_objects {
            children
                .affected_objects
                .entry(object.bug_id)
                .or_default()
                .push(object);
        }
        for recommendation in recommendations {
            children
                .recommendations
                .entry(recommendation.bug_id)
                .or_default()
                .push(recommendation);
        }
        for image in images {
            children.images.entry(image.bug_id).or_default().push(image);
        }
        for record in cve_records {
            children
                .cve_records
                .entry(record.bug_id)
                .or_default()
                .push(record);
        }
        children
    }
}

/// Builds the nested project report document
pub struct ReportAssembler {
    projects: Arc<dyn ProjectRepository>,
    targets: Arc<dyn TargetRepository>,
    scopes: Arc<dyn ScopeRepository>,
    information: Arc<dyn InformationRepository>,
    bugs: Arc<dyn BugRepository>,
}

impl ReportAssembler {
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        targets: Arc<dyn TargetRepository>,
        scopes: Arc<dyn ScopeRepository>,
        information: Arc<dyn InformationRepository>,
        bugs: Arc<dyn BugRepository>,
    ) -> Self {
        Self {
            projects,
            targets,
            scopes,
            information,
            bugs,
        }
    }

    /// Assemble the full report for a project. The caller is expected to
    /// have authorized access already. Safe to call repeatedly; identical
    /// output absent concurrent mutation.
    #[tracing::instrument(skip(self), fields(project_id = %project_id))]
    pub async fn assemble(&self, project_id: ProjectId) -> Result<Report, DomainError> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Project", project_id.as_i64()))?;

        let targets = self.targets.list_for_project(project_id).await?;
        let scopes = self.scopes.list_for_project(project_id).await?;
        let information = self.information.list_for_project(project_id).await?;

        let bugs = self.bugs.list_for_project(project_id).await?;
        let bug_ids: Vec<BugId> = bugs.iter().map(|b| b.id).collect();

        let children = BugChildren::group(
            self.bugs.affected_objects_for_bugs(&bug_ids).await?,
            self.bugs.recommendations_for_bugs(&bug_ids).await?,
            self.bugs.images_for_bugs(&bug_ids).await?,
            self.bugs.cve_records_for_bugs(&bug_ids).await?,
        );

        Ok(build_report(
            project,
            targets,
            scopes,
            information,
            bugs,
            children,
        ))
    }
}

/// The pure fold: raw rows in, report document out
fn build_report(
    project: Project,
    targets: Vec<AssessmentTarget>,
    scopes: Vec<AssessmentScope>,
    information: Vec<CollectedInformation>,
    bugs: Vec<Bug>,
    children: BugChildren,
) -> Report {
    let target_names: HashMap<TargetId, &str> = targets
        .iter()
        .map(|t| (t.id, t.target_name.as_str()))
        .collect();

    let mut application_sections: Vec<(TargetId, ReportSection)> = Vec::new();
    let mut source_code_sections: Vec<(TargetId, ReportSection)> = Vec::new();

    for bug in &bugs {
        let detail = vulnerability_detail(bug, &children);
        let sections = match bug.category {
            BugCategory::Application => &mut application_sections,
            BugCategory::SourceCode => &mut source_code_sections,
        };
        push_into_section(sections, bug.target_id, &target_names, detail);
    }

    Report {
        project_id: project.id,
        project_name: project.project_name,
        system_name: project.system_name.unwrap_or_default(),
        updated_at: project
            .updated_at
            .unwrap_or(project.created_at)
            .to_rfc3339(),
        targets: targets
            .into_iter()
            .map(|t| TargetSummary {
                id: t.id,
                name: t.target_name,
            })
            .collect(),
        scope: scopes
            .into_iter()
            .map(|s| ScopeSummary {
                id: s.id,
                subject: s.subject,
                info: s.info,
            })
            .collect(),
        application_info: information.iter().map(|i| i.information.clone()).collect(),
        collected_information: information
            .into_iter()
            .map(|i| CollectedInformationRecord {
                id: i.id,
                project_id: i.project_id,
                information: i.information,
            })
            .collect(),
        sections_by_category: SectionsByCategory {
            application: application_sections.into_iter().map(|(_, s)| s).collect(),
            source_code: source_code_sections.into_iter().map(|(_, s)| s).collect(),
        },
    }
}

/// Append a detail to its target's section, creating the section the first
/// time the target is encountered so section order follows bug order
fn push_into_section(
    sections: &mut Vec<(TargetId, ReportSection)>,
    target_id: TargetId,
    target_names: &HashMap<TargetId, &str>,
    detail: VulnerabilityDetail,
) {
    match sections.iter_mut().find(|(id, _)| *id == target_id) {
        Some((_, section)) => section.vulnerabilities.push(detail),
        None => {
            let heading = target_names.get(&target_id).copied().unwrap_or_default();
            sections.push((
                target_id,
                ReportSection {
                    target_heading: heading.to_string(),
                    vulnerabilities: vec![detail],
                },
            ));
        }
    }
}

fn vulnerability_detail(bug: &Bug, children: &BugChildren) -> VulnerabilityDetail {
    let recommendations: Vec<String> = children
        .recommendations
        .get(&bug.id)
        .map(|rows| rows.iter().map(|r| r.recommendation_text.clone()).collect())
        .unwrap_or_default();

    // The bug's own summary wins; the joined rows are the fallback. The two
    // representations are maintained independently on write.
    let content = if bug.recommendation_content.is_empty() {
        recommendations.join("\n")
    } else {
        bug.recommendation_content.clone()
    };

    VulnerabilityDetail {
        vulnerability: VulnerabilitySummary {
            heading: bug.heading.clone(),
            severity: bug.severity,
        },
        description: DescriptionBlock {
            text: bug.description.clone(),
        },
        affected_objects: AffectedObjectsBlock {
            list: children
                .affected_objects
                .get(&bug.id)
                .map(|rows| rows.iter().map(|o| o.object_url.clone()).collect())
                .unwrap_or_default(),
        },
        recommendations: RecommendationsBlock {
            content,
            list: recommendations,
        },
        images: children
            .images
            .get(&bug.id)
            .map(|rows| {
                rows.iter()
                    .map(|i| ImageBlock {
                        filename: i.filename.clone(),
                        description: i.caption.clone().unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        cve: children
            .cve_records
            .get(&bug.id)
            .map(|rows| {
                rows.iter()
                    .map(|c| CveBlock {
                        library: c.library.clone(),
                        cve: c.cve.clone(),
                        latest_version: c.latest_version.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assessment::value_objects::Severity;
    use chrono::{TimeZone, Utc};

    fn project(id: i64) -> Project {
        Project {
            id: ProjectId::new(id),
            project_name: "Demo".to_string(),
            system_name: Some("Storefront".to_string()),
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    fn target(id: i64, project_id: i64, name: &str) -> AssessmentTarget {
        AssessmentTarget {
            id: TargetId::new(id),
            project_id: ProjectId::new(project_id),
            target_name: name.to_string(),
        }
    }

    fn bug(id: i64, target_id: i64, category: BugCategory, heading: &str) -> Bug {
        Bug {
            id: BugId::new(id),
            project_id: ProjectId::new(56),
            target_id: TargetId::new(target_id),
            category,
            heading: heading.to_string(),
            severity: Severity::High,
            description: "desc".to_string(),
            recommendation_content: String::new(),
        }
    }

    #[test]
    fn test_empty_project_yields_empty_sections() {
        let report = build_report(
            project(1),
            vec![target(10, 1, "Web Application")],
            vec![AssessmentScope {
                id: 1,
                project_id: ProjectId::new(1),
                subject: "Authentication".to_string(),
                info: "Login and session handling".to_string(),
            }],
            vec![],
            vec![],
            BugChildren::default(),
        );

        assert!(report.sections_by_category.application.is_empty());
        assert!(report.sections_by_category.source_code.is_empty());
        assert_eq!(report.targets.len(), 1);
        assert_eq!(report.scope.len(), 1);
        assert_eq!(report.system_name, "Storefront");
    }

    #[test]
    fn test_updated_at_falls_back_to_created_at() {
        let p = project(1);
        let created = p.created_at;
        let report = build_report(p, vec![], vec![], vec![], vec![], BugChildren::default());
        assert_eq!(report.updated_at, created.to_rfc3339());

        let mut p = project(1);
        let updated = Utc.with_ymd_and_hms(2025, 4, 2, 12, 30, 0).unwrap();
        p.updated_at = Some(updated);
        let report = build_report(p, vec![], vec![], vec![], vec![], BugChildren::default());
        assert_eq!(report.updated_at, updated.to_rfc3339());
    }

    #[test]
    fn test_bugs_partition_by_category() {
        let targets = vec![target(10, 56, "Web Application"), target(11, 56, "API Server")];
        let bugs = vec![
            bug(1, 10, BugCategory::Application, "SQL Injection"),
            bug(2, 11, BugCategory::SourceCode, "Hardcoded Secret"),
            bug(3, 10, BugCategory::Application, "XSS"),
        ];

        let report = build_report(
            project(56),
            targets,
            vec![],
            vec![],
            bugs,
            BugChildren::default(),
        );

        let application = &report.sections_by_category.application;
        assert_eq!(application.len(), 1);
        assert_eq!(application[0].target_heading, "Web Application");
        assert_eq!(application[0].vulnerabilities.len(), 2);

        let source_code = &report.sections_by_category.source_code;
        assert_eq!(source_code.len(), 1);
        assert_eq!(source_code[0].target_heading, "API Server");
        assert_eq!(source_code[0].vulnerabilities.len(), 1);
        assert_eq!(
            source_code[0].vulnerabilities[0].vulnerability.heading,
            "Hardcoded Secret"
        );
    }

    #[test]
    fn test_sections_preserve_first_encounter_order() {
        let targets = vec![
            target(10, 56, "Web Application"),
            target(11, 56, "Mobile App"),
        ];
        // First bug hits the second target, so its section must come first.
        let bugs = vec![
            bug(1, 11, BugCategory::Application, "A"),
            bug(2, 10, BugCategory::Application, "B"),
            bug(3, 11, BugCategory::Application, "C"),
        ];

        let report = build_report(
            project(56),
            targets,
            vec![],
            vec![],
            bugs,
            BugChildren::default(),
        );

        let sections = &report.sections_by_category.application;
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].target_heading, "Mobile App");
        assert_eq!(sections[0].vulnerabilities.len(), 2);
        assert_eq!(sections[1].target_heading, "Web Application");
    }

    #[test]
    fn test_recommendation_content_fallback_joins_rows() {
        let b = bug(1, 10, BugCategory::Application, "SQL Injection");
        let children = BugChildren::group(
            vec![],
            vec![
                Recommendation {
                    id: 1,
                    bug_id: b.id,
                    recommendation_text: "Use prepared statements".to_string(),
                },
                Recommendation {
                    id: 2,
                    bug_id: b.id,
                    recommendation_text: "Validate input".to_string(),
                },
                Recommendation {
                    id: 3,
                    bug_id: b.id,
                    recommendation_text: "Least-privilege database user".to_string(),
                },
            ],
            vec![],
            vec![],
        );

        let detail = vulnerability_detail(&b, &children);
        assert_eq!(
            detail.recommendations.content,
            "Use prepared statements\nValidate input\nLeast-privilege database user"
        );
        assert_eq!(detail.recommendations.list.len(), 3);
    }

    #[test]
    fn test_recommendation_summary_wins_over_rows() {
        let mut b = bug(1, 10, BugCategory::Application, "XSS");
        b.recommendation_content = "Encode output.".to_string();
        let children = BugChildren::group(
            vec![],
            vec![Recommendation {
                id: 1,
                bug_id: b.id,
                recommendation_text: "Use a templating engine".to_string(),
            }],
            vec![],
            vec![],
        );

        let detail = vulnerability_detail(&b, &children);
        assert_eq!(detail.recommendations.content, "Encode output.");
        assert_eq!(
            detail.recommendations.list,
            vec!["Use a templating engine".to_string()]
        );
    }

    #[test]
    fn test_detail_collects_children_in_order() {
        let b = bug(7, 10, BugCategory::Application, "SQL Injection");
        let children = BugChildren::group(
            vec![
                AffectedObject {
                    id: 1,
                    bug_id: b.id,
                    object_url: "/login".to_string(),
                },
                AffectedObject {
                    id: 2,
                    bug_id: b.id,
                    object_url: "/api/auth".to_string(),
                },
            ],
            vec![],
            vec![
                BugImage {
                    id: 1,
                    bug_id: b.id,
                    filename: "poc.png".to_string(),
                    caption: None,
                },
                BugImage {
                    id: 2,
                    bug_id: b.id,
                    filename: "dump.png".to_string(),
                    caption: Some("Extracted rows".to_string()),
                },
            ],
            vec![CveRecord {
                id: 1,
                bug_id: b.id,
                library: "express".to_string(),
                cve: "CVE-2022-24999".to_string(),
                latest_version: "4.18.2".to_string(),
            }],
        );

        let detail = vulnerability_detail(&b, &children);
        assert_eq!(detail.affected_objects.list, vec!["/login", "/api/auth"]);
        assert_eq!(detail.images[0].description, "");
        assert_eq!(detail.images[1].description, "Extracted rows");
        assert_eq!(detail.cve[0].library, "express");
        // No recommendation rows and no summary: both fields empty.
        assert_eq!(detail.recommendations.content, "");
        assert!(detail.recommendations.list.is_empty());
    }
}
