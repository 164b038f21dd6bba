use serde::{Deserialize, Serialize};

use crate::TestSessionItem;

/// Function response envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProvisionResponse {
    pub body: ProvisionBody,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionBody {
    pub provisioned_via_lambda_dto: ProvisionResult,
}

/// Outcome of one deploy.
///
/// `error` is set when the deploy timed out; the items are decorated either way
/// because the containers may still come up.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvisionResult {
    pub items: Vec<TestSessionItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ProvisionResult> for ProvisionResponse {
    fn from(result: ProvisionResult) -> Self {
        Self {
            body: ProvisionBody {
                provisioned_via_lambda_dto: result,
            },
        }
    }
}
