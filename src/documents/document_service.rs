use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;

use super::document_model::{
    active_contract_artifacts, active_documents, ContractArtifact, ContractArtifactKind, Document,
    DocumentKind, ResubmissionPolicy, ValidationStatus,
};
use super::document_traits::DocumentValidationServiceTrait;
use crate::applications::{
    ActorRole, Application, ApplicationRepositoryTrait, ApplicationStatus,
};
use crate::errors::{Error, Result};

/// Applies validation decisions to documents and contract artifacts.
///
/// Decisions are only accepted while the application sits in the matching
/// review stage: documents in `DocumentsUploaded`, contract artifacts in
/// `ContractUploaded`.
pub struct DocumentValidationService {
    repository: Arc<dyn ApplicationRepositoryTrait>,
    resubmission_policy: ResubmissionPolicy,
}

impl DocumentValidationService {
    pub fn new(
        repository: Arc<dyn ApplicationRepositoryTrait>,
        resubmission_policy: ResubmissionPolicy,
    ) -> Self {
        Self {
            repository,
            resubmission_policy,
        }
    }

    fn load_for_review(
        &self,
        application_id: &str,
        review_stage: ApplicationStatus,
        actor_role: ActorRole,
    ) -> Result<Application> {
        if !actor_role.can_validate() {
            return Err(Error::PermissionDenied(format!(
                "Role {:?} has no validation authority",
                actor_role
            )));
        }
        let application = self.repository.get_by_id(application_id)?;
        if application.status != review_stage {
            return Err(Error::IllegalTransition(format!(
                "Validation decisions require the application to be {:?}, it is {:?}",
                review_stage, application.status
            )));
        }
        Ok(application)
    }

    fn load_for_resubmission(
        &self,
        application_id: &str,
        review_stage: ApplicationStatus,
        actor_role: ActorRole,
    ) -> Result<Application> {
        if !actor_role.can_submit() {
            return Err(Error::PermissionDenied(format!(
                "Role {:?} may not resubmit artifacts",
                actor_role
            )));
        }
        if self.resubmission_policy == ResubmissionPolicy::Disallowed {
            return Err(Error::IllegalTransition(
                "Resubmission is not permitted by this workflow".to_string(),
            ));
        }
        let application = self.repository.get_by_id(application_id)?;
        if application.status != review_stage {
            return Err(Error::IllegalTransition(format!(
                "Resubmission requires the application to be {:?}, it is {:?}",
                review_stage, application.status
            )));
        }
        Ok(application)
    }
}

#[async_trait]
impl DocumentValidationServiceTrait for DocumentValidationService {
    async fn validate_document(
        &self,
        application_id: &str,
        document_id: &str,
        actor_role: ActorRole,
        expected_version: u64,
    ) -> Result<Application> {
        let mut application = self.load_for_review(
            application_id,
            ApplicationStatus::DocumentsUploaded,
            actor_role,
        )?;

        let now = Utc::now().naive_utc();
        let document = find_document_mut(&mut application.documents, document_id)?;
        ensure_pending(document.status, document_id)?;
        document.mark_validated(now);

        debug!("Document {} validated on {}", document_id, application_id);
        application.updated_at = now;
        self.repository
            .update_versioned(application, expected_version)
            .await
    }

    async fn reject_document(
        &self,
        application_id: &str,
        document_id: &str,
        reason: &str,
        actor_role: ActorRole,
        expected_version: u64,
    ) -> Result<Application> {
        let mut application = self.load_for_review(
            application_id,
            ApplicationStatus::DocumentsUploaded,
            actor_role,
        )?;

        let now = Utc::now().naive_utc();
        let document = find_document_mut(&mut application.documents, document_id)?;
        ensure_pending(document.status, document_id)?;
        document.mark_rejected(reason, now)?;

        debug!("Document {} rejected on {}", document_id, application_id);
        application.updated_at = now;
        self.repository
            .update_versioned(application, expected_version)
            .await
    }

    async fn resubmit_document(
        &self,
        application_id: &str,
        kind: DocumentKind,
        actor_role: ActorRole,
        expected_version: u64,
    ) -> Result<Application> {
        let mut application = self.load_for_resubmission(
            application_id,
            ApplicationStatus::DocumentsUploaded,
            actor_role,
        )?;

        let rejected_revision = active_documents(&application.documents)
            .iter()
            .find(|d| d.kind == kind)
            .filter(|d| d.status == ValidationStatus::Rejected)
            .map(|d| d.revision)
            .ok_or_else(|| {
                Error::IllegalTransition(format!(
                    "No rejected {} to resubmit on application '{}'",
                    kind, application_id
                ))
            })?;

        // A fresh pending record supersedes the rejected one; the rejected
        // record stays untouched in the audit trail.
        let now = Utc::now().naive_utc();
        application
            .documents
            .push(Document::new(kind, rejected_revision + 1, now));
        application.updated_at = now;
        self.repository
            .update_versioned(application, expected_version)
            .await
    }

    async fn validate_contract_artifact(
        &self,
        application_id: &str,
        artifact_id: &str,
        actor_role: ActorRole,
        expected_version: u64,
    ) -> Result<Application> {
        let mut application = self.load_for_review(
            application_id,
            ApplicationStatus::ContractUploaded,
            actor_role,
        )?;

        let now = Utc::now().naive_utc();
        let artifact = find_artifact_mut(&mut application.contract_artifacts, artifact_id)?;
        ensure_pending(artifact.status, artifact_id)?;
        artifact.mark_validated(now);

        application.updated_at = now;
        self.repository
            .update_versioned(application, expected_version)
            .await
    }

    async fn reject_contract_artifact(
        &self,
        application_id: &str,
        artifact_id: &str,
        reason: &str,
        actor_role: ActorRole,
        expected_version: u64,
    ) -> Result<Application> {
        let mut application = self.load_for_review(
            application_id,
            ApplicationStatus::ContractUploaded,
            actor_role,
        )?;

        let now = Utc::now().naive_utc();
        let artifact = find_artifact_mut(&mut application.contract_artifacts, artifact_id)?;
        ensure_pending(artifact.status, artifact_id)?;
        artifact.mark_rejected(reason, now)?;

        application.updated_at = now;
        self.repository
            .update_versioned(application, expected_version)
            .await
    }

    async fn resubmit_contract_artifact(
        &self,
        application_id: &str,
        kind: ContractArtifactKind,
        actor_role: ActorRole,
        expected_version: u64,
    ) -> Result<Application> {
        let mut application = self.load_for_resubmission(
            application_id,
            ApplicationStatus::ContractUploaded,
            actor_role,
        )?;

        let rejected_revision = active_contract_artifacts(&application.contract_artifacts)
            .iter()
            .find(|a| a.kind == kind)
            .filter(|a| a.status == ValidationStatus::Rejected)
            .map(|a| a.revision)
            .ok_or_else(|| {
                Error::IllegalTransition(format!(
                    "No rejected {} to resubmit on application '{}'",
                    kind, application_id
                ))
            })?;

        let now = Utc::now().naive_utc();
        application
            .contract_artifacts
            .push(ContractArtifact::new(kind, rejected_revision + 1, now));
        application.updated_at = now;
        self.repository
            .update_versioned(application, expected_version)
            .await
    }
}

fn find_document_mut<'a>(
    documents: &'a mut [Document],
    document_id: &str,
) -> Result<&'a mut Document> {
    documents
        .iter_mut()
        .find(|d| d.id == document_id)
        .ok_or_else(|| Error::NotFound(format!("Document '{}' not found", document_id)))
}

fn find_artifact_mut<'a>(
    artifacts: &'a mut [ContractArtifact],
    artifact_id: &str,
) -> Result<&'a mut ContractArtifact> {
    artifacts
        .iter_mut()
        .find(|a| a.id == artifact_id)
        .ok_or_else(|| Error::NotFound(format!("Contract artifact '{}' not found", artifact_id)))
}

/// A decided artifact cannot be decided again this cycle; the caller must
/// re-read and work with fresh state.
fn ensure_pending(status: ValidationStatus, artifact_id: &str) -> Result<()> {
    if status != ValidationStatus::Pending {
        return Err(Error::Conflict(format!(
            "Artifact '{}' already carries a validation decision",
            artifact_id
        )));
    }
    Ok(())
}
