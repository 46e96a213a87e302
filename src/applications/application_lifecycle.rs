use serde::{Deserialize, Serialize};

use super::application_model::ActorRole;

/// The application's stage in the origination-to-disbursement pipeline.
///
/// Wire representation matches the external contract
/// (`DRAFT`, `DOCUMENTS_UPLOADED`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Draft,
    DocumentsUploaded,
    DocumentsValidated,
    ContractUploaded,
    ContractValidated,
    Approved,
    Rejected,
    Cancelled,
    Expired,
}

impl ApplicationStatus {
    /// Terminal states are final but retained; nothing leaves them.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Approved
                | ApplicationStatus::Rejected
                | ApplicationStatus::Cancelled
                | ApplicationStatus::Expired
        )
    }

    /// Whether the loan request may still be edited.
    pub fn is_editable(&self) -> bool {
        matches!(self, ApplicationStatus::Draft)
    }

    /// Reachability before role and artifact guards. A draft cannot expire:
    /// it has no pending external action.
    pub fn can_transition_to(&self, target: ApplicationStatus) -> bool {
        use ApplicationStatus::*;

        if self.is_terminal() || *self == target {
            return false;
        }
        match (self, target) {
            (Draft, DocumentsUploaded) => true,
            (DocumentsUploaded, DocumentsValidated) => true,
            (DocumentsValidated, ContractUploaded) => true,
            (ContractUploaded, ContractValidated) => true,
            (ContractValidated, Approved) => true,
            (_, Rejected) => true,
            (_, Cancelled) => true,
            (Draft, Expired) => false,
            (_, Expired) => true,
            _ => false,
        }
    }
}

/// Role gate for a transition, independent of artifact guards.
///
/// Vendors drive the upload side, validation authority (analysts and
/// administrators) drives the review side, administrators alone finalize
/// and expire. Cancellation is open to the vendor and the administrator.
pub fn transition_permitted(
    actor_role: ActorRole,
    target: ApplicationStatus,
) -> bool {
    use ApplicationStatus::*;

    match target {
        DocumentsUploaded | ContractUploaded => {
            matches!(actor_role, ActorRole::Vendor | ActorRole::Administrator)
        }
        DocumentsValidated | ContractValidated | Rejected => actor_role.can_validate(),
        Approved | Expired => actor_role.can_finalize(),
        Cancelled => matches!(actor_role, ActorRole::Vendor | ActorRole::Administrator),
        Draft => false,
    }
}
