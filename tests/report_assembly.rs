//! Integration tests for report assembly over the repository contracts

mod common;

use common::factories::{BugFactory, assembler_for};
use common::mocks::InMemoryStore;

use redport::domain::assessment::repositories::{
    BugRepository, InformationRepository, NewProject, NewScope, ProjectRepository,
    ScopeRepository, TargetRepository,
};
use redport::domain::assessment::value_objects::{ProjectId, Severity};
use redport::domain::errors::DomainError;

async fn seed_project(store: &InMemoryStore, name: &str) -> ProjectId {
    ProjectRepository::create(
        store,
        NewProject {
            project_name: name.to_string(),
            system_name: None,
        },
    )
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn test_missing_project_is_not_found() {
    let store = InMemoryStore::new();
    let assembler = assembler_for(&store);

    let err = assembler.assemble(ProjectId::new(999)).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn test_project_without_bugs_keeps_scalar_fields() {
    let store = InMemoryStore::new();
    let project_id = seed_project(&store, "Empty Engagement").await;
    TargetRepository::create(&store, project_id, "Web Application".to_string())
        .await
        .unwrap();
    ScopeRepository::create(
        &store,
        project_id,
        NewScope {
            subject: "Authentication System".to_string(),
            info: "Login, logout, session management".to_string(),
        },
    )
    .await
    .unwrap();
    InformationRepository::create(&store, project_id, "JWT authentication".to_string())
        .await
        .unwrap();

    let report = assembler_for(&store).assemble(project_id).await.unwrap();

    assert!(report.sections_by_category.application.is_empty());
    assert!(report.sections_by_category.source_code.is_empty());
    assert_eq!(report.project_name, "Empty Engagement");
    assert_eq!(report.targets.len(), 1);
    assert_eq!(report.scope.len(), 1);
    assert_eq!(report.scope[0].subject, "Authentication System");
    assert_eq!(report.application_info, vec!["JWT authentication"]);
    assert_eq!(report.collected_information.len(), 1);
}

/// The worked example: one target, one application bug with two affected
/// objects and two recommendations.
#[tokio::test]
async fn test_single_bug_report_shape() {
    let store = InMemoryStore::new();
    let project_id = seed_project(&store, "Demo").await;
    let target = TargetRepository::create(&store, project_id, "Web Application".to_string())
        .await
        .unwrap();

    let bug = BugRepository::create(
        &store,
        project_id,
        BugFactory::application(target.id, "SQL Injection"),
    )
    .await
    .unwrap();

    store
        .add_affected_object(bug.id, "/login".to_string())
        .await
        .unwrap();
    store
        .add_affected_object(bug.id, "/api/auth".to_string())
        .await
        .unwrap();
    store
        .add_recommendation(bug.id, "Use prepared statements".to_string())
        .await
        .unwrap();
    store
        .add_recommendation(bug.id, "Validate input".to_string())
        .await
        .unwrap();

    let report = assembler_for(&store).assemble(project_id).await.unwrap();

    let sections = &report.sections_by_category.application;
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].target_heading, "Web Application");
    assert_eq!(sections[0].vulnerabilities.len(), 1);

    let detail = &sections[0].vulnerabilities[0];
    assert_eq!(detail.vulnerability.heading, "SQL Injection");
    assert_eq!(detail.vulnerability.severity, Severity::High);
    assert_eq!(detail.affected_objects.list, vec!["/login", "/api/auth"]);
    assert_eq!(detail.recommendations.list.len(), 2);
    assert!(report.sections_by_category.source_code.is_empty());
}

#[tokio::test]
async fn test_application_bug_never_leaks_into_source_code() {
    let store = InMemoryStore::new();
    let project_id = seed_project(&store, "Demo").await;
    let web = TargetRepository::create(&store, project_id, "Web Application".to_string())
        .await
        .unwrap();
    let api = TargetRepository::create(&store, project_id, "API Server".to_string())
        .await
        .unwrap();

    BugRepository::create(&store, project_id, BugFactory::application(web.id, "XSS"))
        .await
        .unwrap();
    BugRepository::create(&store, project_id, BugFactory::source_code(api.id, "Hardcoded Key"))
        .await
        .unwrap();

    let report = assembler_for(&store).assemble(project_id).await.unwrap();

    let application_headings: Vec<&str> = report
        .sections_by_category
        .application
        .iter()
        .flat_map(|s| s.vulnerabilities.iter())
        .map(|v| v.vulnerability.heading.as_str())
        .collect();
    assert_eq!(application_headings, vec!["XSS"]);

    let source_headings: Vec<&str> = report
        .sections_by_category
        .source_code
        .iter()
        .flat_map(|s| s.vulnerabilities.iter())
        .map(|v| v.vulnerability.heading.as_str())
        .collect();
    assert_eq!(source_headings, vec!["Hardcoded Key"]);
}

#[tokio::test]
async fn test_assembly_is_idempotent() {
    let store = InMemoryStore::new();
    let project_id = seed_project(&store, "Demo").await;
    let web = TargetRepository::create(&store, project_id, "Web Application".to_string())
        .await
        .unwrap();
    let mobile = TargetRepository::create(&store, project_id, "Mobile App".to_string())
        .await
        .unwrap();

    BugRepository::create(&store, project_id, BugFactory::application(mobile.id, "A"))
        .await
        .unwrap();
    BugRepository::create(&store, project_id, BugFactory::application(web.id, "B"))
        .await
        .unwrap();
    BugRepository::create(&store, project_id, BugFactory::application(mobile.id, "C"))
        .await
        .unwrap();

    let assembler = assembler_for(&store);
    let first = assembler.assemble(project_id).await.unwrap();
    let second = assembler.assemble(project_id).await.unwrap();

    assert_eq!(first, second);

    // Section order follows first encounter within bug creation order.
    let headings: Vec<&str> = first
        .sections_by_category
        .application
        .iter()
        .map(|s| s.target_heading.as_str())
        .collect();
    assert_eq!(headings, vec!["Mobile App", "Web Application"]);
}

#[tokio::test]
async fn test_recommendation_content_join_order() {
    let store = InMemoryStore::new();
    let project_id = seed_project(&store, "Demo").await;
    let target = TargetRepository::create(&store, project_id, "Web Application".to_string())
        .await
        .unwrap();
    let bug = BugRepository::create(&store, project_id, BugFactory::application(target.id, "SQLi"))
        .await
        .unwrap();

    for text in ["first", "second", "third"] {
        store
            .add_recommendation(bug.id, text.to_string())
            .await
            .unwrap();
    }

    let report = assembler_for(&store).assemble(project_id).await.unwrap();
    let detail = &report.sections_by_category.application[0].vulnerabilities[0];

    assert_eq!(detail.recommendations.content, "first\nsecond\nthird");
    assert_eq!(detail.recommendations.list.len(), 3);
}

#[tokio::test]
async fn test_project_delete_cascades_everything() {
    let store = InMemoryStore::new();
    let project_id = seed_project(&store, "Doomed").await;
    let target = TargetRepository::create(&store, project_id, "Web Application".to_string())
        .await
        .unwrap();
    let bug = BugRepository::create(&store, project_id, BugFactory::application(target.id, "SQLi"))
        .await
        .unwrap();
    store
        .add_affected_object(bug.id, "/login".to_string())
        .await
        .unwrap();
    store
        .add_cve_record(
            bug.id,
            "express".to_string(),
            "CVE-2022-24999".to_string(),
            "4.18.2".to_string(),
        )
        .await
        .unwrap();

    ProjectRepository::delete(&store, project_id).await.unwrap();

    let err = assembler_for(&store)
        .assemble(project_id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    // Child rows are gone as well, not merely orphaned.
    assert!(store.list_affected_objects(bug.id).await.unwrap().is_empty());
    assert!(store.list_cve_records(bug.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_target_delete_cascades_to_bugs() {
    let store = InMemoryStore::new();
    let project_id = seed_project(&store, "Demo").await;
    let target = TargetRepository::create(&store, project_id, "Web Application".to_string())
        .await
        .unwrap();
    let survivor_target = TargetRepository::create(&store, project_id, "API Server".to_string())
        .await
        .unwrap();

    BugRepository::create(&store, project_id, BugFactory::application(target.id, "Doomed"))
        .await
        .unwrap();
    BugRepository::create(
        &store,
        project_id,
        BugFactory::application(survivor_target.id, "Survivor"),
    )
    .await
    .unwrap();

    TargetRepository::delete(&store, target.id).await.unwrap();

    let report = assembler_for(&store).assemble(project_id).await.unwrap();
    let headings: Vec<&str> = report
        .sections_by_category
        .application
        .iter()
        .flat_map(|s| s.vulnerabilities.iter())
        .map(|v| v.vulnerability.heading.as_str())
        .collect();
    assert_eq!(headings, vec!["Survivor"]);
}
