use std::sync::Arc;

use rust_decimal_macros::dec;
use tokio_test::block_on;

use origination_core::applications::{
    ActorRole, Application, ApplicationService, ApplicationServiceTrait, ApplicationStatus,
    InMemoryApplicationRepository, LoanRequest, LoanRequestUpdate, TransitionRequest,
};
use origination_core::documents::{
    ContractArtifactKind, DocumentKind, DocumentValidationService,
    DocumentValidationServiceTrait, ResubmissionPolicy, ValidationStatus,
};
use origination_core::errors::Error;

fn loan_request() -> LoanRequest {
    LoanRequest {
        applicant_id: "applicant-1".to_string(),
        vehicle_plate: "ABC-1234".to_string(),
        dealer_id: "dealer-1".to_string(),
        vendor_id: "vendor-1".to_string(),
        requested_amount: dec!(20000),
        term_months: 60,
        product_id: "auto-60".to_string(),
        down_payment: dec!(5000),
    }
}

struct Workflow {
    applications: ApplicationService,
    validation: DocumentValidationService,
}

fn workflow(policy: ResubmissionPolicy) -> Workflow {
    let repository = Arc::new(InMemoryApplicationRepository::new());
    Workflow {
        applications: ApplicationService::new(repository.clone(), policy),
        validation: DocumentValidationService::new(repository, policy),
    }
}

fn transition(
    workflow: &Workflow,
    application: &Application,
    target: ApplicationStatus,
    actor_role: ActorRole,
    reason: Option<&str>,
) -> origination_core::errors::Result<Application> {
    let outcome = block_on(workflow.applications.transition(TransitionRequest {
        application_id: application.id.clone(),
        target,
        actor_role,
        reason: reason.map(|r| r.to_string()),
        expected_version: application.version,
    }))?;
    Ok(outcome.application)
}

fn submit_draft(workflow: &Workflow) -> Application {
    block_on(
        workflow
            .applications
            .submit_request(loan_request(), ActorRole::Vendor),
    )
    .unwrap()
}

fn to_documents_uploaded(workflow: &Workflow) -> Application {
    let mut app = submit_draft(workflow);
    for kind in DocumentKind::REQUIRED {
        app = block_on(workflow.applications.attach_document(
            &app.id,
            kind,
            ActorRole::Vendor,
            app.version,
        ))
        .unwrap();
    }
    transition(
        workflow,
        &app,
        ApplicationStatus::DocumentsUploaded,
        ActorRole::Vendor,
        None,
    )
    .unwrap()
}

fn validate_all_documents(workflow: &Workflow, mut app: Application) -> Application {
    let ids: Vec<String> = app.documents.iter().map(|d| d.id.clone()).collect();
    for id in ids {
        app = block_on(workflow.validation.validate_document(
            &app.id,
            &id,
            ActorRole::Analyst,
            app.version,
        ))
        .unwrap();
    }
    app
}

#[test]
fn test_full_origination_walkthrough() {
    let workflow = workflow(ResubmissionPolicy::Allowed);

    let app = to_documents_uploaded(&workflow);
    assert_eq!(app.status, ApplicationStatus::DocumentsUploaded);

    let app = validate_all_documents(&workflow, app);
    let app = transition(
        &workflow,
        &app,
        ApplicationStatus::DocumentsValidated,
        ActorRole::Analyst,
        None,
    )
    .unwrap();

    let app = block_on(workflow.applications.attach_contract_artifact(
        &app.id,
        ContractArtifactKind::Contract,
        ActorRole::Vendor,
        app.version,
    ))
    .unwrap();
    let app = block_on(workflow.applications.attach_contract_artifact(
        &app.id,
        ContractArtifactKind::PromissoryNote,
        ActorRole::Vendor,
        app.version,
    ))
    .unwrap();

    let mut app = transition(
        &workflow,
        &app,
        ApplicationStatus::ContractUploaded,
        ActorRole::Vendor,
        None,
    )
    .unwrap();

    let artifact_ids: Vec<String> = app.contract_artifacts.iter().map(|a| a.id.clone()).collect();
    for id in artifact_ids {
        app = block_on(workflow.validation.validate_contract_artifact(
            &app.id,
            &id,
            ActorRole::Analyst,
            app.version,
        ))
        .unwrap();
    }

    let app = transition(
        &workflow,
        &app,
        ApplicationStatus::ContractValidated,
        ActorRole::Analyst,
        None,
    )
    .unwrap();
    let app = transition(
        &workflow,
        &app,
        ApplicationStatus::Approved,
        ActorRole::Administrator,
        None,
    )
    .unwrap();

    assert_eq!(app.status, ApplicationStatus::Approved);
    // submission plus five stage transitions
    assert_eq!(app.history.len(), 6);
    assert_eq!(app.history.first().unwrap().from, None);
    assert_eq!(
        app.history.last().unwrap().from,
        Some(ApplicationStatus::ContractValidated)
    );

    let history = workflow.applications.get_history(&app.id).unwrap();
    assert_eq!(history.len(), 6);
}

#[test]
fn test_skipping_a_stage_is_illegal() {
    let workflow = workflow(ResubmissionPolicy::Allowed);
    let app = submit_draft(&workflow);

    let err = transition(
        &workflow,
        &app,
        ApplicationStatus::ContractUploaded,
        ActorRole::Vendor,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, Error::IllegalTransition(_)));

    let err = transition(
        &workflow,
        &app,
        ApplicationStatus::Approved,
        ActorRole::Administrator,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, Error::IllegalTransition(_)));
}

#[test]
fn test_documents_uploaded_requires_every_kind() {
    let workflow = workflow(ResubmissionPolicy::Allowed);
    let app = submit_draft(&workflow);

    let app = block_on(workflow.applications.attach_document(
        &app.id,
        DocumentKind::IdentityCard,
        ActorRole::Vendor,
        app.version,
    ))
    .unwrap();

    let err = transition(
        &workflow,
        &app,
        ApplicationStatus::DocumentsUploaded,
        ActorRole::Vendor,
        None,
    )
    .unwrap_err();
    match err {
        Error::IllegalTransition(message) => {
            assert!(message.contains("proof of income"));
            assert!(message.contains("bank statement"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_vendor_has_no_validation_authority() {
    let workflow = workflow(ResubmissionPolicy::Allowed);
    let app = to_documents_uploaded(&workflow);

    let document_id = app.documents[0].id.clone();
    let err = block_on(workflow.validation.validate_document(
        &app.id,
        &document_id,
        ActorRole::Vendor,
        app.version,
    ))
    .unwrap_err();
    assert!(matches!(err, Error::PermissionDenied(_)));

    let err = transition(
        &workflow,
        &app,
        ApplicationStatus::DocumentsValidated,
        ActorRole::Vendor,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, Error::PermissionDenied(_)));

    // state unchanged after the denied attempts
    let reread = workflow.applications.get_application(&app.id).unwrap();
    assert_eq!(reread.status, ApplicationStatus::DocumentsUploaded);
    assert_eq!(reread.version, app.version);
}

#[test]
fn test_stale_version_is_a_conflict() {
    let workflow = workflow(ResubmissionPolicy::Allowed);
    let app = submit_draft(&workflow);

    let app = block_on(workflow.applications.attach_document(
        &app.id,
        DocumentKind::IdentityCard,
        ActorRole::Vendor,
        app.version,
    ))
    .unwrap();

    // reusing the pre-attach version must not win
    let err = block_on(workflow.applications.attach_document(
        &app.id,
        DocumentKind::ProofOfIncome,
        ActorRole::Vendor,
        app.version - 1,
    ))
    .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
}

#[test]
fn test_second_decision_on_same_document_is_a_conflict() {
    let workflow = workflow(ResubmissionPolicy::Allowed);
    let app = to_documents_uploaded(&workflow);

    let document_id = app.documents[0].id.clone();
    let app = block_on(workflow.validation.validate_document(
        &app.id,
        &document_id,
        ActorRole::Analyst,
        app.version,
    ))
    .unwrap();

    let err = block_on(workflow.validation.reject_document(
        &app.id,
        &document_id,
        "second opinion",
        ActorRole::Analyst,
        app.version,
    ))
    .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
}

#[test]
fn test_rejecting_without_reason_leaves_document_pending() {
    let workflow = workflow(ResubmissionPolicy::Allowed);
    let app = to_documents_uploaded(&workflow);

    let document_id = app.documents[0].id.clone();
    let err = block_on(workflow.validation.reject_document(
        &app.id,
        &document_id,
        "  ",
        ActorRole::Analyst,
        app.version,
    ))
    .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let reread = workflow.applications.get_application(&app.id).unwrap();
    let document = reread
        .documents
        .iter()
        .find(|d| d.id == document_id)
        .unwrap();
    assert_eq!(document.status, ValidationStatus::Pending);
}

#[test]
fn test_rejected_document_resubmission_flow() {
    let workflow = workflow(ResubmissionPolicy::Allowed);
    let app = to_documents_uploaded(&workflow);

    let document_id = app.documents[0].id.clone();
    let rejected_kind = app.documents[0].kind;
    let mut app = block_on(workflow.validation.reject_document(
        &app.id,
        &document_id,
        "illegible scan",
        ActorRole::Analyst,
        app.version,
    ))
    .unwrap();

    for id in app
        .documents
        .iter()
        .filter(|d| d.id != document_id)
        .map(|d| d.id.clone())
        .collect::<Vec<_>>()
    {
        app = block_on(workflow.validation.validate_document(
            &app.id,
            &id,
            ActorRole::Analyst,
            app.version,
        ))
        .unwrap();
    }

    // the stage gate holds while a rejected document awaits resubmission
    let err = transition(
        &workflow,
        &app,
        ApplicationStatus::DocumentsValidated,
        ActorRole::Analyst,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, Error::IllegalTransition(_)));

    let app = block_on(workflow.validation.resubmit_document(
        &app.id,
        rejected_kind,
        ActorRole::Vendor,
        app.version,
    ))
    .unwrap();

    // audit history keeps the rejected record alongside the new revision
    assert_eq!(app.documents.len(), 4);
    let replacement = app
        .documents
        .iter()
        .find(|d| d.kind == rejected_kind && d.revision == 2)
        .unwrap();
    assert_eq!(replacement.status, ValidationStatus::Pending);
    let original = app
        .documents
        .iter()
        .find(|d| d.kind == rejected_kind && d.revision == 1)
        .unwrap();
    assert_eq!(original.status, ValidationStatus::Rejected);
    assert_eq!(original.rejection_reason.as_deref(), Some("illegible scan"));

    let replacement_id = replacement.id.clone();
    let app = block_on(workflow.validation.validate_document(
        &app.id,
        &replacement_id,
        ActorRole::Analyst,
        app.version,
    ))
    .unwrap();

    let app = transition(
        &workflow,
        &app,
        ApplicationStatus::DocumentsValidated,
        ActorRole::Analyst,
        None,
    )
    .unwrap();
    assert_eq!(app.status, ApplicationStatus::DocumentsValidated);
}

#[test]
fn test_disallowed_resubmission_redirects_to_rejected() {
    let workflow = workflow(ResubmissionPolicy::Disallowed);
    let app = to_documents_uploaded(&workflow);

    let document_id = app.documents[0].id.clone();
    let rejected_kind = app.documents[0].kind;
    let app = block_on(workflow.validation.reject_document(
        &app.id,
        &document_id,
        "forged statement",
        ActorRole::Analyst,
        app.version,
    ))
    .unwrap();

    let outcome = block_on(workflow.applications.transition(TransitionRequest {
        application_id: app.id.clone(),
        target: ApplicationStatus::DocumentsValidated,
        actor_role: ActorRole::Analyst,
        reason: None,
        expected_version: app.version,
    }))
    .unwrap();

    assert_eq!(outcome.new_state, ApplicationStatus::Rejected);
    assert!(outcome
        .history_entry
        .reason
        .unwrap()
        .contains(rejected_kind.as_str()));

    // terminal: nothing leaves Rejected
    let err = transition(
        &workflow,
        &outcome.application,
        ApplicationStatus::DocumentsValidated,
        ActorRole::Analyst,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, Error::IllegalTransition(_)));
}

#[test]
fn test_explicit_rejection_requires_reason() {
    let workflow = workflow(ResubmissionPolicy::Allowed);
    let app = submit_draft(&workflow);

    let err = transition(
        &workflow,
        &app,
        ApplicationStatus::Rejected,
        ActorRole::Analyst,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let app = transition(
        &workflow,
        &app,
        ApplicationStatus::Rejected,
        ActorRole::Analyst,
        Some("applicant withdrew consent"),
    )
    .unwrap();
    assert_eq!(app.status, ApplicationStatus::Rejected);
    assert_eq!(
        app.history.last().unwrap().reason.as_deref(),
        Some("applicant withdrew consent")
    );
}

#[test]
fn test_draft_cannot_expire_but_later_stages_can() {
    let workflow = workflow(ResubmissionPolicy::Allowed);
    let app = submit_draft(&workflow);

    let err = transition(
        &workflow,
        &app,
        ApplicationStatus::Expired,
        ActorRole::Administrator,
        Some("stale"),
    )
    .unwrap_err();
    assert!(matches!(err, Error::IllegalTransition(_)));

    let workflow = self::workflow(ResubmissionPolicy::Allowed);
    let app = to_documents_uploaded(&workflow);
    let app = transition(
        &workflow,
        &app,
        ApplicationStatus::Expired,
        ActorRole::Administrator,
        Some("no activity for 90 days"),
    )
    .unwrap();
    assert_eq!(app.status, ApplicationStatus::Expired);
}

#[test]
fn test_request_editable_only_in_draft() {
    let workflow = workflow(ResubmissionPolicy::Allowed);
    let app = submit_draft(&workflow);

    let update = LoanRequestUpdate {
        requested_amount: dec!(18000),
        term_months: 48,
        product_id: "auto-48".to_string(),
        down_payment: dec!(7000),
    };

    let app = block_on(workflow.applications.update_request(
        &app.id,
        update.clone(),
        ActorRole::Vendor,
        app.version,
    ))
    .unwrap();
    assert_eq!(app.request.requested_amount, dec!(18000));
    assert_eq!(app.request.term_months, 48);

    let app = to_documents_uploaded(&workflow);
    let err = block_on(workflow.applications.update_request(
        &app.id,
        update,
        ActorRole::Vendor,
        app.version,
    ))
    .unwrap_err();
    assert!(matches!(err, Error::IllegalTransition(_)));
}

#[test]
fn test_duplicate_document_kind_is_rejected() {
    let workflow = workflow(ResubmissionPolicy::Allowed);
    let app = submit_draft(&workflow);

    let app = block_on(workflow.applications.attach_document(
        &app.id,
        DocumentKind::IdentityCard,
        ActorRole::Vendor,
        app.version,
    ))
    .unwrap();

    let err = block_on(workflow.applications.attach_document(
        &app.id,
        DocumentKind::IdentityCard,
        ActorRole::Vendor,
        app.version,
    ))
    .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn test_origination_stats_reflect_actual_state() {
    let workflow = workflow(ResubmissionPolicy::Allowed);

    // one draft with one pending document
    let draft = submit_draft(&workflow);
    block_on(workflow.applications.attach_document(
        &draft.id,
        DocumentKind::IdentityCard,
        ActorRole::Vendor,
        draft.version,
    ))
    .unwrap();

    // one application under document review, all three pending
    to_documents_uploaded(&workflow);

    // one cancelled draft
    let cancelled = submit_draft(&workflow);
    transition(
        &workflow,
        &cancelled,
        ApplicationStatus::Cancelled,
        ActorRole::Vendor,
        Some("duplicate request"),
    )
    .unwrap();

    let stats = workflow.applications.origination_stats().unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.drafts, 1);
    assert_eq!(stats.in_review, 1);
    assert_eq!(stats.cancelled, 1);
    assert_eq!(stats.approved, 0);
    assert_eq!(stats.rejected, 0);
    // one pending on the draft, three on the application in review
    assert_eq!(stats.pending_documents, 4);
}
