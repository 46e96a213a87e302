use async_trait::async_trait;

use super::document_model::{ContractArtifactKind, DocumentKind};
use crate::applications::{ActorRole, Application};
use crate::errors::Result;

/// Contract for per-artifact validation decisions and resubmission.
///
/// Every mutation is version-checked: at most one decision is committed per
/// artifact per validation cycle, the loser observes `Error::Conflict`.
#[async_trait]
pub trait DocumentValidationServiceTrait: Send + Sync {
    async fn validate_document(
        &self,
        application_id: &str,
        document_id: &str,
        actor_role: ActorRole,
        expected_version: u64,
    ) -> Result<Application>;

    async fn reject_document(
        &self,
        application_id: &str,
        document_id: &str,
        reason: &str,
        actor_role: ActorRole,
        expected_version: u64,
    ) -> Result<Application>;

    async fn resubmit_document(
        &self,
        application_id: &str,
        kind: DocumentKind,
        actor_role: ActorRole,
        expected_version: u64,
    ) -> Result<Application>;

    async fn validate_contract_artifact(
        &self,
        application_id: &str,
        artifact_id: &str,
        actor_role: ActorRole,
        expected_version: u64,
    ) -> Result<Application>;

    async fn reject_contract_artifact(
        &self,
        application_id: &str,
        artifact_id: &str,
        reason: &str,
        actor_role: ActorRole,
        expected_version: u64,
    ) -> Result<Application>;

    async fn resubmit_contract_artifact(
        &self,
        application_id: &str,
        kind: ContractArtifactKind,
        actor_role: ActorRole,
        expected_version: u64,
    ) -> Result<Application>;
}
