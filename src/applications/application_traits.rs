use async_trait::async_trait;

use super::application_model::{
    ActorRole, Application, LoanRequest, LoanRequestUpdate, OriginationStats, StatusHistoryEntry,
    TransitionOutcome, TransitionRequest,
};
use crate::documents::{ContractArtifactKind, DocumentKind};
use crate::errors::Result;

/// Contract for the application store. Implementations must support
/// conditional, version-checked writes; the core performs no last-writer-wins
/// updates.
#[async_trait]
pub trait ApplicationRepositoryTrait: Send + Sync {
    fn get_by_id(&self, id: &str) -> Result<Application>;
    fn list(&self) -> Result<Vec<Application>>;
    async fn insert(&self, application: Application) -> Result<Application>;
    /// Persists only when the stored version still equals `expected_version`;
    /// otherwise fails with `Error::Conflict` and leaves the record untouched.
    async fn update_versioned(
        &self,
        application: Application,
        expected_version: u64,
    ) -> Result<Application>;
}

/// Contract for the origination workflow operations.
#[async_trait]
pub trait ApplicationServiceTrait: Send + Sync {
    fn get_application(&self, id: &str) -> Result<Application>;
    fn get_history(&self, id: &str) -> Result<Vec<StatusHistoryEntry>>;
    fn origination_stats(&self) -> Result<OriginationStats>;
    async fn submit_request(
        &self,
        request: LoanRequest,
        actor_role: ActorRole,
    ) -> Result<Application>;
    async fn update_request(
        &self,
        id: &str,
        update: LoanRequestUpdate,
        actor_role: ActorRole,
        expected_version: u64,
    ) -> Result<Application>;
    async fn attach_document(
        &self,
        id: &str,
        kind: DocumentKind,
        actor_role: ActorRole,
        expected_version: u64,
    ) -> Result<Application>;
    async fn attach_contract_artifact(
        &self,
        id: &str,
        kind: ContractArtifactKind,
        actor_role: ActorRole,
        expected_version: u64,
    ) -> Result<Application>;
    async fn transition(&self, request: TransitionRequest) -> Result<TransitionOutcome>;
}
