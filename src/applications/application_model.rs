use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::application_lifecycle::ApplicationStatus;
use crate::documents::{ContractArtifact, Document};
use crate::errors::{Error, Result, ValidationError};
use crate::scenarios::FinancingTerms;

/// Acting user's role, supplied by the identity collaborator on every call.
/// Threaded explicitly through each operation; the core holds no ambient
/// "current user" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActorRole {
    Administrator,
    Analyst,
    Vendor,
}

impl ActorRole {
    /// Authority to move documents and contracts out of `Pending`.
    pub fn can_validate(&self) -> bool {
        matches!(self, ActorRole::Administrator | ActorRole::Analyst)
    }

    /// Authority over finalization and expiry.
    pub fn can_finalize(&self) -> bool {
        matches!(self, ActorRole::Administrator)
    }

    /// Authority to submit and edit loan requests.
    pub fn can_submit(&self) -> bool {
        matches!(self, ActorRole::Administrator | ActorRole::Vendor)
    }
}

/// One origination attempt as submitted by a vendor. Immutable once the
/// application leaves `Draft`, except through [`LoanRequestUpdate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequest {
    pub applicant_id: String,
    pub vehicle_plate: String,
    pub dealer_id: String,
    pub vendor_id: String,
    pub requested_amount: Decimal,
    pub term_months: u32,
    pub product_id: String,
    pub down_payment: Decimal,
}

impl LoanRequest {
    /// Validates the request data before submission.
    pub fn validate(&self) -> Result<()> {
        for (value, field) in [
            (&self.applicant_id, "applicantId"),
            (&self.vehicle_plate, "vehiclePlate"),
            (&self.dealer_id, "dealerId"),
            (&self.vendor_id, "vendorId"),
            (&self.product_id, "productId"),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Validation(ValidationError::MissingField(
                    field.to_string(),
                )));
            }
        }
        if self.requested_amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Requested amount must be positive".to_string(),
            )));
        }
        if self.down_payment.is_sign_negative() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Down payment cannot be negative".to_string(),
            )));
        }
        if self.term_months == 0 {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Term must be at least one month".to_string(),
            )));
        }
        Ok(())
    }
}

impl From<&LoanRequest> for FinancingTerms {
    fn from(request: &LoanRequest) -> Self {
        FinancingTerms {
            requested_amount: request.requested_amount,
            down_payment: request.down_payment,
            term_months: request.term_months,
        }
    }
}

/// Fields a vendor may still change while the application is in `Draft`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequestUpdate {
    pub requested_amount: Decimal,
    pub term_months: u32,
    pub product_id: String,
    pub down_payment: Decimal,
}

impl LoanRequestUpdate {
    pub fn apply_to(&self, request: &mut LoanRequest) -> Result<()> {
        let updated = LoanRequest {
            requested_amount: self.requested_amount,
            term_months: self.term_months,
            product_id: self.product_id.clone(),
            down_payment: self.down_payment,
            ..request.clone()
        };
        updated.validate()?;
        *request = updated;
        Ok(())
    }
}

/// Immutable record of one lifecycle transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<ApplicationStatus>,
    pub to: ApplicationStatus,
    pub actor_role: ActorRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub timestamp: NaiveDateTime,
}

/// The persistent envelope for one origination attempt. Created on
/// submission, mutated only through guarded transitions, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub request: LoanRequest,
    pub status: ApplicationStatus,
    /// Optimistic-concurrency marker; every committed mutation bumps it.
    pub version: u64,
    pub documents: Vec<Document>,
    pub contract_artifacts: Vec<ContractArtifact>,
    pub history: Vec<StatusHistoryEntry>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Lifecycle transition request, as received from the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    pub application_id: String,
    pub target: ApplicationStatus,
    pub actor_role: ActorRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub expected_version: u64,
}

/// Result of a committed transition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionOutcome {
    pub new_state: ApplicationStatus,
    pub history_entry: StatusHistoryEntry,
    pub application: Application,
}

/// Aggregate counts computed from actual application and document state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginationStats {
    pub total: usize,
    pub drafts: usize,
    pub in_review: usize,
    pub approved: usize,
    pub rejected: usize,
    pub cancelled: usize,
    pub expired: usize,
    /// Artifacts still awaiting a validation decision across open
    /// applications.
    pub pending_documents: usize,
}
