mod application_lifecycle;
mod application_model;
mod application_repository;
mod application_service;
mod application_traits;

pub use application_lifecycle::{transition_permitted, ApplicationStatus};
pub use application_model::{
    ActorRole, Application, LoanRequest, LoanRequestUpdate, OriginationStats, StatusHistoryEntry,
    TransitionOutcome, TransitionRequest,
};
pub use application_repository::InMemoryApplicationRepository;
pub use application_service::ApplicationService;
pub use application_traits::{ApplicationRepositoryTrait, ApplicationServiceTrait};
