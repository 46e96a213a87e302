use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;

use super::application_lifecycle::{transition_permitted, ApplicationStatus};
use super::application_model::{
    ActorRole, Application, LoanRequest, LoanRequestUpdate, OriginationStats, StatusHistoryEntry,
    TransitionOutcome, TransitionRequest,
};
use super::application_traits::{ApplicationRepositoryTrait, ApplicationServiceTrait};
use crate::documents::{
    active_contract_artifacts, active_documents, all_contract_artifacts_attached,
    all_contract_artifacts_validated, all_required_documents_validated, rejected_contract_kinds,
    rejected_document_kinds, ContractArtifact, ContractArtifactKind, Document, DocumentKind,
    ResubmissionPolicy, ValidationStatus,
};
use crate::errors::{Error, Result, ValidationError};

/// Owns the application lifecycle: submission, draft edits, artifact
/// attachment and the guarded status transitions.
pub struct ApplicationService {
    repository: Arc<dyn ApplicationRepositoryTrait>,
    resubmission_policy: ResubmissionPolicy,
}

impl ApplicationService {
    pub fn new(
        repository: Arc<dyn ApplicationRepositoryTrait>,
        resubmission_policy: ResubmissionPolicy,
    ) -> Self {
        Self {
            repository,
            resubmission_policy,
        }
    }

    /// Stage gate for the requested target. May redirect the transition to
    /// `Rejected` when a rejected artifact dooms the application and the
    /// workflow forbids resubmission.
    fn apply_stage_guards(
        &self,
        application: &Application,
        target: ApplicationStatus,
    ) -> Result<(ApplicationStatus, Option<String>)> {
        match target {
            ApplicationStatus::DocumentsUploaded => {
                let missing = missing_document_kinds(&application.documents);
                if !missing.is_empty() {
                    return Err(Error::IllegalTransition(format!(
                        "Required documents not yet attached: {}",
                        join_kinds(&missing)
                    )));
                }
                Ok((target, None))
            }
            ApplicationStatus::DocumentsValidated => {
                let rejected = rejected_document_kinds(&application.documents);
                if !rejected.is_empty() {
                    let listed = rejected
                        .iter()
                        .map(|k| k.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    return match self.resubmission_policy {
                        ResubmissionPolicy::Disallowed => Ok((
                            ApplicationStatus::Rejected,
                            Some(format!("Required documents rejected: {}", listed)),
                        )),
                        ResubmissionPolicy::Allowed => Err(Error::IllegalTransition(format!(
                            "Documents awaiting resubmission: {}",
                            listed
                        ))),
                    };
                }
                if !all_required_documents_validated(&application.documents) {
                    return Err(Error::IllegalTransition(
                        "Not every required document is validated".to_string(),
                    ));
                }
                Ok((target, None))
            }
            ApplicationStatus::ContractUploaded => {
                if !all_contract_artifacts_attached(&application.contract_artifacts) {
                    return Err(Error::IllegalTransition(
                        "Contract and promissory note must both be attached".to_string(),
                    ));
                }
                Ok((target, None))
            }
            ApplicationStatus::ContractValidated => {
                let rejected = rejected_contract_kinds(&application.contract_artifacts);
                if !rejected.is_empty() {
                    let listed = rejected
                        .iter()
                        .map(|k| k.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    return match self.resubmission_policy {
                        ResubmissionPolicy::Disallowed => Ok((
                            ApplicationStatus::Rejected,
                            Some(format!("Contract artifacts rejected: {}", listed)),
                        )),
                        ResubmissionPolicy::Allowed => Err(Error::IllegalTransition(format!(
                            "Contract artifacts awaiting resubmission: {}",
                            listed
                        ))),
                    };
                }
                if !all_contract_artifacts_validated(&application.contract_artifacts) {
                    return Err(Error::IllegalTransition(
                        "Contract and promissory note must both be validated".to_string(),
                    ));
                }
                Ok((target, None))
            }
            _ => Ok((target, None)),
        }
    }
}

#[async_trait]
impl ApplicationServiceTrait for ApplicationService {
    fn get_application(&self, id: &str) -> Result<Application> {
        self.repository.get_by_id(id)
    }

    fn get_history(&self, id: &str) -> Result<Vec<StatusHistoryEntry>> {
        Ok(self.repository.get_by_id(id)?.history)
    }

    fn origination_stats(&self) -> Result<OriginationStats> {
        let applications = self.repository.list()?;
        let mut stats = OriginationStats {
            total: applications.len(),
            ..Default::default()
        };

        for application in &applications {
            match application.status {
                ApplicationStatus::Draft => stats.drafts += 1,
                ApplicationStatus::Approved => stats.approved += 1,
                ApplicationStatus::Rejected => stats.rejected += 1,
                ApplicationStatus::Cancelled => stats.cancelled += 1,
                ApplicationStatus::Expired => stats.expired += 1,
                _ => stats.in_review += 1,
            }

            if application.status.is_terminal() {
                continue;
            }
            stats.pending_documents += active_documents(&application.documents)
                .iter()
                .filter(|d| d.status == ValidationStatus::Pending)
                .count();
            stats.pending_documents += active_contract_artifacts(&application.contract_artifacts)
                .iter()
                .filter(|a| a.status == ValidationStatus::Pending)
                .count();
        }

        Ok(stats)
    }

    async fn submit_request(
        &self,
        request: LoanRequest,
        actor_role: ActorRole,
    ) -> Result<Application> {
        if !actor_role.can_submit() {
            return Err(Error::PermissionDenied(format!(
                "Role {:?} may not submit loan requests",
                actor_role
            )));
        }
        request.validate()?;

        let now = Utc::now().naive_utc();
        let application = Application {
            id: uuid::Uuid::new_v4().to_string(),
            request,
            status: ApplicationStatus::Draft,
            version: 0,
            documents: Vec::new(),
            contract_artifacts: Vec::new(),
            history: vec![StatusHistoryEntry {
                from: None,
                to: ApplicationStatus::Draft,
                actor_role,
                reason: None,
                timestamp: now,
            }],
            created_at: now,
            updated_at: now,
        };

        debug!("Submitting loan request as application {}", application.id);
        self.repository.insert(application).await
    }

    async fn update_request(
        &self,
        id: &str,
        update: LoanRequestUpdate,
        actor_role: ActorRole,
        expected_version: u64,
    ) -> Result<Application> {
        if !actor_role.can_submit() {
            return Err(Error::PermissionDenied(format!(
                "Role {:?} may not edit loan requests",
                actor_role
            )));
        }

        let mut application = self.repository.get_by_id(id)?;
        if !application.status.is_editable() {
            return Err(Error::IllegalTransition(format!(
                "Request may only be edited in Draft, application is {:?}",
                application.status
            )));
        }

        update.apply_to(&mut application.request)?;
        application.updated_at = Utc::now().naive_utc();
        self.repository
            .update_versioned(application, expected_version)
            .await
    }

    async fn attach_document(
        &self,
        id: &str,
        kind: DocumentKind,
        actor_role: ActorRole,
        expected_version: u64,
    ) -> Result<Application> {
        if !actor_role.can_submit() {
            return Err(Error::PermissionDenied(format!(
                "Role {:?} may not attach documents",
                actor_role
            )));
        }

        let mut application = self.repository.get_by_id(id)?;
        if application.status != ApplicationStatus::Draft {
            return Err(Error::IllegalTransition(format!(
                "Documents are attached in Draft, application is {:?}",
                application.status
            )));
        }
        if active_documents(&application.documents)
            .iter()
            .any(|d| d.kind == kind)
        {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "A {} is already attached",
                kind
            ))));
        }

        let now = Utc::now().naive_utc();
        application.documents.push(Document::new(kind, 1, now));
        application.updated_at = now;
        self.repository
            .update_versioned(application, expected_version)
            .await
    }

    async fn attach_contract_artifact(
        &self,
        id: &str,
        kind: ContractArtifactKind,
        actor_role: ActorRole,
        expected_version: u64,
    ) -> Result<Application> {
        if !actor_role.can_submit() {
            return Err(Error::PermissionDenied(format!(
                "Role {:?} may not attach contract artifacts",
                actor_role
            )));
        }

        let mut application = self.repository.get_by_id(id)?;
        if application.status != ApplicationStatus::DocumentsValidated {
            return Err(Error::IllegalTransition(format!(
                "Contract artifacts are attached after document validation, application is {:?}",
                application.status
            )));
        }
        if active_contract_artifacts(&application.contract_artifacts)
            .iter()
            .any(|a| a.kind == kind)
        {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "A {} is already attached",
                kind
            ))));
        }

        let now = Utc::now().naive_utc();
        application
            .contract_artifacts
            .push(ContractArtifact::new(kind, 1, now));
        application.updated_at = now;
        self.repository
            .update_versioned(application, expected_version)
            .await
    }

    async fn transition(&self, request: TransitionRequest) -> Result<TransitionOutcome> {
        let mut application = self.repository.get_by_id(&request.application_id)?;

        if !application.status.can_transition_to(request.target) {
            return Err(Error::IllegalTransition(format!(
                "Cannot transition from {:?} to {:?}",
                application.status, request.target
            )));
        }
        if !transition_permitted(request.actor_role, request.target) {
            return Err(Error::PermissionDenied(format!(
                "Role {:?} may not transition an application to {:?}",
                request.actor_role, request.target
            )));
        }
        if matches!(
            request.target,
            ApplicationStatus::Rejected | ApplicationStatus::Cancelled | ApplicationStatus::Expired
        ) && request
            .reason
            .as_deref()
            .map_or(true, |r| r.trim().is_empty())
        {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "A reason is required to transition to {:?}",
                request.target
            ))));
        }

        let (effective_target, guard_reason) =
            self.apply_stage_guards(&application, request.target)?;
        let reason = guard_reason.or(request.reason);

        let entry = StatusHistoryEntry {
            from: Some(application.status),
            to: effective_target,
            actor_role: request.actor_role,
            reason,
            timestamp: Utc::now().naive_utc(),
        };

        debug!(
            "Application {}: {:?} -> {:?}",
            application.id, application.status, effective_target
        );

        application.status = effective_target;
        application.updated_at = entry.timestamp;
        application.history.push(entry.clone());

        let application = self
            .repository
            .update_versioned(application, request.expected_version)
            .await?;

        Ok(TransitionOutcome {
            new_state: application.status,
            history_entry: entry,
            application,
        })
    }
}

fn missing_document_kinds(documents: &[Document]) -> Vec<DocumentKind> {
    let active = active_documents(documents);
    DocumentKind::REQUIRED
        .iter()
        .copied()
        .filter(|kind| !active.iter().any(|d| d.kind == *kind))
        .collect()
}

fn join_kinds(kinds: &[DocumentKind]) -> String {
    kinds
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
