mod document_model;
mod document_service;
mod document_traits;

pub use document_model::{
    active_contract_artifacts, active_documents, all_contract_artifacts_attached,
    all_contract_artifacts_validated, all_required_documents_attached,
    all_required_documents_validated, rejected_contract_kinds, rejected_document_kinds,
    ContractArtifact, ContractArtifactKind, Document, DocumentKind, ResubmissionPolicy,
    ValidationStatus,
};
pub use document_service::DocumentValidationService;
pub use document_traits::DocumentValidationServiceTrait;
