mod decision_model;
mod decision_service;

pub use decision_model::{ApprovalPolicy, Decision};
pub use decision_service::DecisionService;
