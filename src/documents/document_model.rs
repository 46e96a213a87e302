use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};

/// Required identity/financial document kinds for the document stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    IdentityCard,
    ProofOfIncome,
    BankStatement,
}

impl DocumentKind {
    /// Every kind that must reach `Validated` before the document stage
    /// can be passed.
    pub const REQUIRED: [DocumentKind; 3] = [
        DocumentKind::IdentityCard,
        DocumentKind::ProofOfIncome,
        DocumentKind::BankStatement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::IdentityCard => "identity card",
            DocumentKind::ProofOfIncome => "proof of income",
            DocumentKind::BankStatement => "bank statement",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two contract-stage artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContractArtifactKind {
    Contract,
    PromissoryNote,
}

impl ContractArtifactKind {
    pub const REQUIRED: [ContractArtifactKind; 2] = [
        ContractArtifactKind::Contract,
        ContractArtifactKind::PromissoryNote,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractArtifactKind::Contract => "contract",
            ContractArtifactKind::PromissoryNote => "promissory note",
        }
    }
}

impl fmt::Display for ContractArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-artifact validation status. `Validated` and `Rejected` are terminal
/// for the record; resubmission appends a fresh `Pending` record instead of
/// reopening a rejected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationStatus {
    Pending,
    Validated,
    Rejected,
}

/// How the workflow treats a rejected artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResubmissionPolicy {
    /// A rejected artifact may be replaced by a new pending revision.
    Allowed,
    /// A rejected artifact dooms the application at the next stage gate.
    Disallowed,
}

impl Default for ResubmissionPolicy {
    fn default() -> Self {
        ResubmissionPolicy::Allowed
    }
}

/// Document metadata tracked by the engine. Binary content lives with the
/// storage collaborator; the core only ever sees kind and validation state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub kind: DocumentKind,
    pub status: ValidationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    /// Bumped on each resubmission; the highest revision per kind is the
    /// active record, earlier ones are audit history.
    pub revision: u32,
    pub uploaded_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<NaiveDateTime>,
}

impl Document {
    pub fn new(kind: DocumentKind, revision: u32, uploaded_at: NaiveDateTime) -> Self {
        Document {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            status: ValidationStatus::Pending,
            rejection_reason: None,
            revision,
            uploaded_at,
            decided_at: None,
        }
    }

    pub fn mark_validated(&mut self, decided_at: NaiveDateTime) {
        self.status = ValidationStatus::Validated;
        self.decided_at = Some(decided_at);
    }

    pub fn mark_rejected(&mut self, reason: &str, decided_at: NaiveDateTime) -> Result<()> {
        let reason = non_empty_reason(reason)?;
        self.status = ValidationStatus::Rejected;
        self.rejection_reason = Some(reason);
        self.decided_at = Some(decided_at);
        Ok(())
    }
}

/// Contract-stage artifact metadata; same sub-machine as [`Document`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub id: String,
    pub kind: ContractArtifactKind,
    pub status: ValidationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub revision: u32,
    pub uploaded_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<NaiveDateTime>,
}

impl ContractArtifact {
    pub fn new(kind: ContractArtifactKind, revision: u32, uploaded_at: NaiveDateTime) -> Self {
        ContractArtifact {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            status: ValidationStatus::Pending,
            rejection_reason: None,
            revision,
            uploaded_at,
            decided_at: None,
        }
    }

    pub fn mark_validated(&mut self, decided_at: NaiveDateTime) {
        self.status = ValidationStatus::Validated;
        self.decided_at = Some(decided_at);
    }

    pub fn mark_rejected(&mut self, reason: &str, decided_at: NaiveDateTime) -> Result<()> {
        let reason = non_empty_reason(reason)?;
        self.status = ValidationStatus::Rejected;
        self.rejection_reason = Some(reason);
        self.decided_at = Some(decided_at);
        Ok(())
    }
}

/// Rejecting without a reason is a validation failure; the artifact must
/// stay `Pending`.
fn non_empty_reason(reason: &str) -> Result<String> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Rejection requires a non-empty reason".to_string(),
        )));
    }
    Ok(trimmed.to_string())
}

/// Latest revision per kind wins; earlier records are audit history.
pub fn active_documents(documents: &[Document]) -> Vec<&Document> {
    let mut by_kind: HashMap<DocumentKind, &Document> = HashMap::new();
    for document in documents {
        match by_kind.get(&document.kind) {
            Some(current) if current.revision >= document.revision => {}
            _ => {
                by_kind.insert(document.kind, document);
            }
        }
    }
    by_kind.into_values().collect()
}

pub fn active_contract_artifacts(artifacts: &[ContractArtifact]) -> Vec<&ContractArtifact> {
    let mut by_kind: HashMap<ContractArtifactKind, &ContractArtifact> = HashMap::new();
    for artifact in artifacts {
        match by_kind.get(&artifact.kind) {
            Some(current) if current.revision >= artifact.revision => {}
            _ => {
                by_kind.insert(artifact.kind, artifact);
            }
        }
    }
    by_kind.into_values().collect()
}

/// Gate for `Draft -> DocumentsUploaded`: every required kind attached,
/// validation not yet required.
pub fn all_required_documents_attached(documents: &[Document]) -> bool {
    let active = active_documents(documents);
    DocumentKind::REQUIRED
        .iter()
        .all(|kind| active.iter().any(|d| d.kind == *kind))
}

/// Gate for `DocumentsUploaded -> DocumentsValidated`, recomputed on every
/// read.
pub fn all_required_documents_validated(documents: &[Document]) -> bool {
    let active = active_documents(documents);
    DocumentKind::REQUIRED.iter().all(|kind| {
        active
            .iter()
            .any(|d| d.kind == *kind && d.status == ValidationStatus::Validated)
    })
}

pub fn rejected_document_kinds(documents: &[Document]) -> Vec<DocumentKind> {
    let mut kinds: Vec<DocumentKind> = active_documents(documents)
        .into_iter()
        .filter(|d| d.status == ValidationStatus::Rejected)
        .map(|d| d.kind)
        .collect();
    kinds.sort_by_key(|k| DocumentKind::REQUIRED.iter().position(|r| r == k));
    kinds
}

/// Gate for `DocumentsValidated -> ContractUploaded`: exactly the two
/// contract-stage artifacts present.
pub fn all_contract_artifacts_attached(artifacts: &[ContractArtifact]) -> bool {
    let active = active_contract_artifacts(artifacts);
    ContractArtifactKind::REQUIRED
        .iter()
        .all(|kind| active.iter().any(|a| a.kind == *kind))
}

/// Gate for `ContractUploaded -> ContractValidated`.
pub fn all_contract_artifacts_validated(artifacts: &[ContractArtifact]) -> bool {
    let active = active_contract_artifacts(artifacts);
    ContractArtifactKind::REQUIRED.iter().all(|kind| {
        active
            .iter()
            .any(|a| a.kind == *kind && a.status == ValidationStatus::Validated)
    })
}

pub fn rejected_contract_kinds(artifacts: &[ContractArtifact]) -> Vec<ContractArtifactKind> {
    let mut kinds: Vec<ContractArtifactKind> = active_contract_artifacts(artifacts)
        .into_iter()
        .filter(|a| a.status == ValidationStatus::Rejected)
        .map(|a| a.kind)
        .collect();
    kinds.sort_by_key(|k| ContractArtifactKind::REQUIRED.iter().position(|r| r == k));
    kinds
}
