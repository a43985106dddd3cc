//! Shared in-memory repository implementations for testing
//!
//! One store backs every repository trait so tests can wire the report
//! assembler and access control service without a database. Cascade
//! deletes mirror the schema: project -> everything, target -> bugs ->
//! bug children.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use redport::domain::assessment::entities::{
    AffectedObject, AssessmentScope, AssessmentTarget, Bug, BugImage, CollectedInformation,
    CveRecord, Project, ProjectAccess, Recommendation, VulnerabilityTemplate,
};
use redport::domain::assessment::repositories::{
    BugPatch, BugRepository, InformationRepository, NewBug, NewProject, NewScope, NewTemplate,
    ProjectPatch, ProjectRepository, ScopePatch, ScopeRepository, TargetRepository,
    TemplatePatch, TemplateRepository,
};
use redport::domain::assessment::value_objects::{BugId, ProjectId, TargetId, TemplateId};
use redport::domain::auth::repositories::ProjectAccessRepository;
use redport::domain::auth::value_objects::UserId;
use redport::domain::errors::DomainError;

#[derive(Default)]
struct Inner {
    next_id: i64,
    projects: Vec<Project>,
    targets: Vec<AssessmentTarget>,
    scopes: Vec<AssessmentScope>,
    information: Vec<CollectedInformation>,
    bugs: Vec<Bug>,
    affected_objects: Vec<AffectedObject>,
    recommendations: Vec<Recommendation>,
    images: Vec<BugImage>,
    cve_records: Vec<CveRecord>,
    templates: Vec<VulnerabilityTemplate>,
    access: Vec<ProjectAccess>,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn delete_bug_children(&mut self, bug_id: BugId) {
        self.affected_objects.retain(|o| o.bug_id != bug_id);
        self.recommendations.retain(|r| r.bug_id != bug_id);
        self.images.retain(|i| i.bug_id != bug_id);
        self.cve_records.retain(|c| c.bug_id != bug_id);
    }

    fn delete_bugs_where(&mut self, predicate: impl Fn(&Bug) -> bool) {
        let doomed: Vec<BugId> = self
            .bugs
            .iter()
            .filter(|b| predicate(b))
            .map(|b| b.id)
            .collect();
        for bug_id in doomed {
            self.delete_bug_children(bug_id);
        }
        self.bugs.retain(|b| !predicate(b));
    }
}

/// In-memory store implementing every repository trait
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("store mutex poisoned")
    }

    /// Record an access grant directly, bypassing the repository contract
    pub fn insert_grant(&self, user_id: UserId, project_id: ProjectId, has_access: bool) {
        let mut inner = self.lock();
        let id = inner.next_id();
        inner.access.push(ProjectAccess {
            id,
            user_id,
            project_id,
            has_access,
            granted_by: UserId::new(1),
            granted_at: Utc::now(),
        });
    }
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn create(&self, fields: NewProject) -> Result<Project, DomainError> {
        let mut inner = self.lock();
        let id = inner.next_id();
        let project = Project {
            id: ProjectId::new(id),
            project_name: fields.project_name,
            system_name: fields.system_name,
            created_at: Utc::now(),
            updated_at: None,
        };
        inner.projects.push(project.clone());
        Ok(project)
    }

    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, DomainError> {
        Ok(self.lock().projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Project>, DomainError> {
        Ok(self.lock().projects.clone())
    }

    async fn list_by_ids(&self, ids: &HashSet<ProjectId>) -> Result<Vec<Project>, DomainError> {
        Ok(self
            .lock()
            .projects
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn update(&self, id: ProjectId, patch: ProjectPatch) -> Result<Project, DomainError> {
        let mut inner = self.lock();
        let project = inner
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found("Project", id.as_i64()))?;
        if let Some(name) = patch.project_name {
            project.project_name = name;
        }
        if let Some(system_name) = patch.system_name {
            project.system_name = system_name;
        }
        project.updated_at = Some(Utc::now());
        Ok(project.clone())
    }

    async fn delete(&self, id: ProjectId) -> Result<(), DomainError> {
        let mut inner = self.lock();
        if !inner.projects.iter().any(|p| p.id == id) {
            return Err(DomainError::not_found("Project", id.as_i64()));
        }
        inner.projects.retain(|p| p.id != id);
        inner.targets.retain(|t| t.project_id != id);
        inner.scopes.retain(|s| s.project_id != id);
        inner.information.retain(|i| i.project_id != id);
        inner.delete_bugs_where(|b| b.project_id == id);
        inner.access.retain(|a| a.project_id != id);
        Ok(())
    }

    async fn exists(&self, id: ProjectId) -> Result<bool, DomainError> {
        Ok(self.lock().projects.iter().any(|p| p.id == id))
    }
}

#[async_trait]
impl TargetRepository for InMemoryStore {
    async fn create(
        &self,
        project_id: ProjectId,
        target_name: String,
    ) -> Result<AssessmentTarget, DomainError> {
        let mut inner = self.lock();
        if !inner.projects.iter().any(|p| p.id == project_id) {
            return Err(DomainError::not_found("Project", project_id.as_i64()));
        }
        let id = inner.next_id();
        let target = AssessmentTarget {
            id: TargetId::new(id),
            project_id,
            target_name,
        };
        inner.targets.push(target.clone());
        Ok(target)
    }

    async fn find_by_id(&self, id: TargetId) -> Result<Option<AssessmentTarget>, DomainError> {
        Ok(self.lock().targets.iter().find(|t| t.id == id).cloned())
    }

    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<AssessmentTarget>, DomainError> {
        Ok(self
            .lock()
            .targets
            .iter()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: TargetId,
        target_name: String,
    ) -> Result<AssessmentTarget, DomainError> {
        let mut inner = self.lock();
        let target = inner
            .targets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| DomainError::not_found("Assessment target", id.as_i64()))?;
        target.target_name = target_name;
        Ok(target.clone())
    }

    async fn delete(&self, id: TargetId) -> Result<(), DomainError> {
        let mut inner = self.lock();
        if !inner.targets.iter().any(|t| t.id == id) {
            return Err(DomainError::not_found("Assessment target", id.as_i64()));
        }
        inner.targets.retain(|t| t.id != id);
        inner.delete_bugs_where(|b| b.target_id == id);
        Ok(())
    }
}

#[async_trait]
impl ScopeRepository for InMemoryStore {
    async fn create(
        &self,
        project_id: ProjectId,
        fields: NewScope,
    ) -> Result<AssessmentScope, DomainError> {
        let mut inner = self.lock();
        if !inner.projects.iter().any(|p| p.id == project_id) {
            return Err(DomainError::not_found("Project", project_id.as_i64()));
        }
        let id = inner.next_id();
        let scope = AssessmentScope {
            id,
            project_id,
            subject: fields.subject,
            info: fields.info,
        };
        inner.scopes.push(scope.clone());
        Ok(scope)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<AssessmentScope>, DomainError> {
        Ok(self.lock().scopes.iter().find(|s| s.id == id).cloned())
    }

    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<AssessmentScope>, DomainError> {
        Ok(self
            .lock()
            .scopes
            .iter()
            .filter(|s| s.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, patch: ScopePatch) -> Result<AssessmentScope, DomainError> {
        let mut inner = self.lock();
        let scope = inner
            .scopes
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| DomainError::not_found("Assessment scope", id))?;
        if let Some(subject) = patch.subject {
            scope.subject = subject;
        }
        if let Some(info) = patch.info {
            scope.info = info;
        }
        Ok(scope.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let mut inner = self.lock();
        if !inner.scopes.iter().any(|s| s.id == id) {
            return Err(DomainError::not_found("Assessment scope", id));
        }
        inner.scopes.retain(|s| s.id != id);
        Ok(())
    }
}

#[async_trait]
impl InformationRepository for InMemoryStore {
    async fn create(
        &self,
        project_id: ProjectId,
        information: String,
    ) -> Result<CollectedInformation, DomainError> {
        let mut inner = self.lock();
        if !inner.projects.iter().any(|p| p.id == project_id) {
            return Err(DomainError::not_found("Project", project_id.as_i64()));
        }
        let id = inner.next_id();
        let note = CollectedInformation {
            id,
            project_id,
            information,
        };
        inner.information.push(note.clone());
        Ok(note)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<CollectedInformation>, DomainError> {
        Ok(self.lock().information.iter().find(|i| i.id == id).cloned())
    }

    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<CollectedInformation>, DomainError> {
        Ok(self
            .lock()
            .information
            .iter()
            .filter(|i| i.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: i64,
        information: String,
    ) -> Result<CollectedInformation, DomainError> {
        let mut inner = self.lock();
        let note = inner
            .information
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| DomainError::not_found("Collected information", id))?;
        note.information = information;
        Ok(note.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let mut inner = self.lock();
        if !inner.information.iter().any(|i| i.id == id) {
            return Err(DomainError::not_found("Collected information", id));
        }
        inner.information.retain(|i| i.id != id);
        Ok(())
    }
}

#[async_trait]
impl BugRepository for InMemoryStore {
    async fn create(&self, project_id: ProjectId, fields: NewBug) -> Result<Bug, DomainError> {
        let mut inner = self.lock();
        if !inner.projects.iter().any(|p| p.id == project_id) {
            return Err(DomainError::not_found("Project", project_id.as_i64()));
        }
        let target = inner
            .targets
            .iter()
            .find(|t| t.id == fields.target_id)
            .ok_or_else(|| {
                DomainError::not_found("Assessment target", fields.target_id.as_i64())
            })?;
        if target.project_id != project_id {
            return Err(DomainError::validation(format!(
                "Target {} does not belong to project {}",
                fields.target_id, project_id
            )));
        }
        let id = inner.next_id();
        let bug = Bug {
            id: BugId::new(id),
            project_id,
            target_id: fields.target_id,
            category: fields.category,
            heading: fields.heading,
            severity: fields.severity,
            description: fields.description,
            recommendation_content: fields.recommendation_content,
        };
        inner.bugs.push(bug.clone());
        Ok(bug)
    }

    async fn find_by_id(&self, id: BugId) -> Result<Option<Bug>, DomainError> {
        Ok(self.lock().bugs.iter().find(|b| b.id == id).cloned())
    }

    async fn list_for_project(&self, project_id: ProjectId) -> Result<Vec<Bug>, DomainError> {
        Ok(self
            .lock()
            .bugs
            .iter()
            .filter(|b| b.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: BugId, patch: BugPatch) -> Result<Bug, DomainError> {
        let mut inner = self.lock();
        let bug = inner
            .bugs
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| DomainError::not_found("Bug", id.as_i64()))?;
        if let Some(target_id) = patch.target_id {
            bug.target_id = target_id;
        }
        if let Some(category) = patch.category {
            bug.category = category;
        }
        if let Some(heading) = patch.heading {
            bug.heading = heading;
        }
        if let Some(severity) = patch.severity {
            bug.severity = severity;
        }
        if let Some(description) = patch.description {
            bug.description = description;
        }
        if let Some(content) = patch.recommendation_content {
            bug.recommendation_content = content;
        }
        Ok(bug.clone())
    }

    async fn delete(&self, id: BugId) -> Result<(), DomainError> {
        let mut inner = self.lock();
        if !inner.bugs.iter().any(|b| b.id == id) {
            return Err(DomainError::not_found("Bug", id.as_i64()));
        }
        inner.bugs.retain(|b| b.id != id);
        inner.delete_bug_children(id);
        Ok(())
    }

    async fn add_affected_object(
        &self,
        bug_id: BugId,
        object_url: String,
    ) -> Result<AffectedObject, DomainError> {
        let mut inner = self.lock();
        if !inner.bugs.iter().any(|b| b.id == bug_id) {
            return Err(DomainError::not_found("Bug", bug_id.as_i64()));
        }
        let id = inner.next_id();
        let object = AffectedObject {
            id,
            bug_id,
            object_url,
        };
        inner.affected_objects.push(object.clone());
        Ok(object)
    }

    async fn list_affected_objects(
        &self,
        bug_id: BugId,
    ) -> Result<Vec<AffectedObject>, DomainError> {
        Ok(self
            .lock()
            .affected_objects
            .iter()
            .filter(|o| o.bug_id == bug_id)
            .cloned()
            .collect())
    }

    async fn delete_affected_object(&self, id: i64) -> Result<(), DomainError> {
        let mut inner = self.lock();
        if !inner.affected_objects.iter().any(|o| o.id == id) {
            return Err(DomainError::not_found("Affected object", id));
        }
        inner.affected_objects.retain(|o| o.id != id);
        Ok(())
    }

    async fn add_recommendation(
        &self,
        bug_id: BugId,
        recommendation_text: String,
    ) -> Result<Recommendation, DomainError> {
        let mut inner = self.lock();
        if !inner.bugs.iter().any(|b| b.id == bug_id) {
            return Err(DomainError::not_found("Bug", bug_id.as_i64()));
        }
        let id = inner.next_id();
        let recommendation = Recommendation {
            id,
            bug_id,
            recommendation_text,
        };
        inner.recommendations.push(recommendation.clone());
        Ok(recommendation)
    }

    async fn list_recommendations(
        &self,
        bug_id: BugId,
    ) -> Result<Vec<Recommendation>, DomainError> {
        Ok(self
            .lock()
            .recommendations
            .iter()
            .filter(|r| r.bug_id == bug_id)
            .cloned()
            .collect())
    }

    async fn delete_recommendation(&self, id: i64) -> Result<(), DomainError> {
        let mut inner = self.lock();
        if !inner.recommendations.iter().any(|r| r.id == id) {
            return Err(DomainError::not_found("Recommendation", id));
        }
        inner.recommendations.retain(|r| r.id != id);
        Ok(())
    }

    async fn add_image(
        &self,
        bug_id: BugId,
        filename: String,
        caption: Option<String>,
    ) -> Result<BugImage, DomainError> {
        let mut inner = self.lock();
        if !inner.bugs.iter().any(|b| b.id == bug_id) {
            return Err(DomainError::not_found("Bug", bug_id.as_i64()));
        }
        let id = inner.next_id();
        let image = BugImage {
            id,
            bug_id,
            filename,
            caption,
        };
        inner.images.push(image.clone());
        Ok(image)
    }

    async fn list_images(&self, bug_id: BugId) -> Result<Vec<BugImage>, DomainError> {
        Ok(self
            .lock()
            .images
            .iter()
            .filter(|i| i.bug_id == bug_id)
            .cloned()
            .collect())
    }

    async fn delete_image(&self, id: i64) -> Result<(), DomainError> {
        let mut inner = self.lock();
        if !inner.images.iter().any(|i| i.id == id) {
            return Err(DomainError::not_found("Bug image", id));
        }
        inner.images.retain(|i| i.id != id);
        Ok(())
    }

    async fn add_cve_record(
        &self,
        bug_id: BugId,
        library: String,
        cve: String,
        latest_version: String,
    ) -> Result<CveRecord, DomainError> {
        let mut inner = self.lock();
        if !inner.bugs.iter().any(|b| b.id == bug_id) {
            return Err(DomainError::not_found("Bug", bug_id.as_i64()));
        }
        let id = inner.next_id();
        let record = CveRecord {
            id,
            bug_id,
            library,
            cve,
            latest_version,
        };
        inner.cve_records.push(record.clone());
        Ok(record)
    }

    async fn list_cve_records(&self, bug_id: BugId) -> Result<Vec<CveRecord>, DomainError> {
        Ok(self
            .lock()
            .cve_records
            .iter()
            .filter(|c| c.bug_id == bug_id)
            .cloned()
            .collect())
    }

    async fn delete_cve_record(&self, id: i64) -> Result<(), DomainError> {
        let mut inner = self.lock();
        if !inner.cve_records.iter().any(|c| c.id == id) {
            return Err(DomainError::not_found("CVE record", id));
        }
        inner.cve_records.retain(|c| c.id != id);
        Ok(())
    }

    async fn affected_objects_for_bugs(
        &self,
        bug_ids: &[BugId],
    ) -> Result<Vec<AffectedObject>, DomainError> {
        Ok(self
            .lock()
            .affected_objects
            .iter()
            .filter(|o| bug_ids.contains(&o.bug_id))
            .cloned()
            .collect())
    }

    async fn recommendations_for_bugs(
        &self,
        bug_ids: &[BugId],
    ) -> Result<Vec<Recommendation>, DomainError> {
        Ok(self
            .lock()
            .recommendations
            .iter()
            .filter(|r| bug_ids.contains(&r.bug_id))
            .cloned()
            .collect())
    }

    async fn images_for_bugs(&self, bug_ids: &[BugId]) -> Result<Vec<BugImage>, DomainError> {
        Ok(self
            .lock()
            .images
            .iter()
            .filter(|i| bug_ids.contains(&i.bug_id))
            .cloned()
            .collect())
    }

    async fn cve_records_for_bugs(
        &self,
        bug_ids: &[BugId],
    ) -> Result<Vec<CveRecord>, DomainError> {
        Ok(self
            .lock()
            .cve_records
            .iter()
            .filter(|c| bug_ids.contains(&c.bug_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TemplateRepository for InMemoryStore {
    async fn create(&self, fields: NewTemplate) -> Result<VulnerabilityTemplate, DomainError> {
        let mut inner = self.lock();
        let id = inner.next_id();
        let template = VulnerabilityTemplate {
            id: TemplateId::new(id),
            name: fields.name,
            description: fields.description,
            recommendations: fields.recommendations,
            severity: fields.severity,
            created_at: Utc::now(),
            updated_at: None,
        };
        inner.templates.push(template.clone());
        Ok(template)
    }

    async fn find_by_id(
        &self,
        id: TemplateId,
    ) -> Result<Option<VulnerabilityTemplate>, DomainError> {
        Ok(self.lock().templates.iter().find(|t| t.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<VulnerabilityTemplate>, DomainError> {
        Ok(self.lock().templates.clone())
    }

    async fn update(
        &self,
        id: TemplateId,
        patch: TemplatePatch,
    ) -> Result<VulnerabilityTemplate, DomainError> {
        let mut inner = self.lock();
        let template = inner
            .templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| DomainError::not_found("Vulnerability template", id.as_i64()))?;
        if let Some(name) = patch.name {
            template.name = name;
        }
        if let Some(description) = patch.description {
            template.description = description;
        }
        if let Some(recommendations) = patch.recommendations {
            template.recommendations = recommendations;
        }
        if let Some(severity) = patch.severity {
            template.severity = severity;
        }
        template.updated_at = Some(Utc::now());
        Ok(template.clone())
    }

    async fn delete(&self, id: TemplateId) -> Result<(), DomainError> {
        let mut inner = self.lock();
        if !inner.templates.iter().any(|t| t.id == id) {
            return Err(DomainError::not_found("Vulnerability template", id.as_i64()));
        }
        inner.templates.retain(|t| t.id != id);
        Ok(())
    }
}

#[async_trait]
impl ProjectAccessRepository for InMemoryStore {
    async fn granted_project_ids(
        &self,
        user_id: UserId,
    ) -> Result<HashSet<ProjectId>, DomainError> {
        Ok(self
            .lock()
            .access
            .iter()
            .filter(|a| a.user_id == user_id && a.has_access)
            .map(|a| a.project_id)
            .collect())
    }

    async fn grant(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        granted_by: UserId,
    ) -> Result<ProjectAccess, DomainError> {
        let mut inner = self.lock();
        if let Some(existing) = inner
            .access
            .iter_mut()
            .find(|a| a.user_id == user_id && a.project_id == project_id)
        {
            existing.has_access = true;
            existing.granted_by = granted_by;
            existing.granted_at = Utc::now();
            return Ok(existing.clone());
        }
        let id = inner.next_id();
        let grant = ProjectAccess {
            id,
            user_id,
            project_id,
            has_access: true,
            granted_by,
            granted_at: Utc::now(),
        };
        inner.access.push(grant.clone());
        Ok(grant)
    }

    async fn revoke(&self, user_id: UserId, project_id: ProjectId) -> Result<(), DomainError> {
        let mut inner = self.lock();
        let grant = inner
            .access
            .iter_mut()
            .find(|a| a.user_id == user_id && a.project_id == project_id)
            .ok_or_else(|| DomainError::not_found("Project access", project_id.as_i64()))?;
        grant.has_access = false;
        Ok(())
    }

    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<ProjectAccess>, DomainError> {
        Ok(self
            .lock()
            .access
            .iter()
            .filter(|a| a.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<ProjectAccess>, DomainError> {
        Ok(self
            .lock()
            .access
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }
}
