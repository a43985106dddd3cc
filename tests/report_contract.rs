//! Wire-contract tests for the report document
//!
//! The report is the payload handed to rendering and export collaborators;
//! its field names and nesting must stay byte-for-byte stable. These tests
//! pin the serialized shape.

mod common;

use common::factories::{BugFactory, assembler_for};
use common::mocks::InMemoryStore;

use redport::domain::assessment::repositories::{
    BugRepository, InformationRepository, NewProject, NewScope, ProjectRepository,
    ScopeRepository, TargetRepository,
};

#[tokio::test]
async fn test_report_serializes_with_stable_field_names() {
    let store = InMemoryStore::new();
    let project = ProjectRepository::create(
        &store,
        NewProject {
            project_name: "Demo".to_string(),
            system_name: Some("Storefront".to_string()),
        },
    )
    .await
    .unwrap();
    let target = TargetRepository::create(&store, project.id, "Web Application".to_string())
        .await
        .unwrap();
    ScopeRepository::create(
        &store,
        project.id,
        NewScope {
            subject: "Authentication".to_string(),
            info: "Login flows".to_string(),
        },
    )
    .await
    .unwrap();
    InformationRepository::create(&store, project.id, "PostgreSQL database".to_string())
        .await
        .unwrap();

    let bug = BugRepository::create(
        &store,
        project.id,
        BugFactory::application(target.id, "SQL Injection"),
    )
    .await
    .unwrap();
    store
        .add_affected_object(bug.id, "/login".to_string())
        .await
        .unwrap();
    store
        .add_recommendation(bug.id, "Use prepared statements".to_string())
        .await
        .unwrap();
    store
        .add_image(bug.id, "poc.png".to_string(), None)
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

    let report = assembler_for(&store).assemble(project.id).await.unwrap();
    let json = serde_json::to_value(&report).unwrap();

    // Top level
    let top = json.as_object().unwrap();
    for key in [
        "project_id",
        "project_name",
        "system_name",
        "updated_at",
        "targets",
        "scope",
        "application_info",
        "collected_information",
        "sections_by_category",
    ] {
        assert!(top.contains_key(key), "missing top-level key {key}");
    }
    assert_eq!(top.len(), 9);
    assert_eq!(json["system_name"], "Storefront");

    // Category partition keys
    let sections = json["sections_by_category"].as_object().unwrap();
    assert_eq!(sections.len(), 2);
    assert!(sections.contains_key("application"));
    assert!(sections.contains_key("source_code"));

    // Summaries
    assert_eq!(json["targets"][0]["name"], "Web Application");
    assert_eq!(json["scope"][0]["subject"], "Authentication");
    assert_eq!(json["scope"][0]["info"], "Login flows");
    assert_eq!(json["application_info"][0], "PostgreSQL database");
    assert_eq!(
        json["collected_information"][0]["information"],
        "PostgreSQL database"
    );

    // Section and detail nesting
    let section = &json["sections_by_category"]["application"][0];
    assert_eq!(section["target_heading"], "Web Application");

    let detail = &section["vulnerabilities"][0];
    assert_eq!(detail["vulnerability"]["heading"], "SQL Injection");
    assert_eq!(detail["vulnerability"]["severity"], "high");
    assert!(detail["description"]["text"].is_string());
    assert_eq!(detail["affected_objects"]["list"][0], "/login");
    assert_eq!(
        detail["recommendations"]["content"],
        "Use prepared statements"
    );
    assert_eq!(detail["recommendations"]["list"][0], "Use prepared statements");
    assert_eq!(detail["images"][0]["filename"], "poc.png");
    // Absent caption serializes as an empty description string.
    assert_eq!(detail["images"][0]["description"], "");
    assert_eq!(detail["cve"][0]["library"], "express");
    assert_eq!(detail["cve"][0]["cve"], "CVE-2022-24999");
    assert_eq!(detail["cve"][0]["latest_version"], "4.18.2");
}

#[tokio::test]
async fn test_report_round_trips_through_json() {
    let store = InMemoryStore::new();
    let project = ProjectRepository::create(
        &store,
        NewProject {
            project_name: "Round Trip".to_string(),
            system_name: None,
        },
    )
    .await
    .unwrap();

    let report = assembler_for(&store).assemble(project.id).await.unwrap();
    let json = serde_json::to_string(&report).unwrap();
    let parsed: redport::application::report::Report = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed, report);
    // No system name stored: the field is present but empty.
    assert_eq!(parsed.system_name, "");
}

#[tokio::test]
async fn test_updated_at_is_rfc3339() {
    let store = InMemoryStore::new();
    let project = ProjectRepository::create(
        &store,
        NewProject {
            project_name: "Timestamps".to_string(),
            system_name: None,
        },
    )
    .await
    .unwrap();

    let report = assembler_for(&store).assemble(project.id).await.unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(&report.updated_at).is_ok());
}
