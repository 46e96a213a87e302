use serde::{Deserialize, Serialize};

/// Outcome of the approvability check for one request/scenario pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub approvable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Decision {
    pub fn approved() -> Self {
        Decision {
            approvable: true,
            reason: None,
        }
    }

    pub fn rejected(reason: String) -> Self {
        Decision {
            approvable: false,
            reason: Some(reason),
        }
    }
}

/// Which scenarios govern the request-level verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApprovalPolicy {
    /// Only the scenario the applicant actually requested must pass.
    RequestedScenario,
    /// The requested scenario and every generated alternate must pass.
    AllScenarios,
}

impl Default for ApprovalPolicy {
    fn default() -> Self {
        ApprovalPolicy::RequestedScenario
    }
}
