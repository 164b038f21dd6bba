use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Inbound invocation event.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionEvent {
    pub provision_via_lambda_dto: ProvisionDto,
}

/// Items to provision, one app slave each.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProvisionDto {
    pub items: Vec<TestSessionItem>,
}

/// One test session supplied by the caller.
///
/// All caller fields are passed through untouched; provisioning only adds the
/// container name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TestSessionItem {
    #[serde(
        rename = "appSlaveContainerName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub app_slave_container_name: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl TestSessionItem {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self {
            app_slave_container_name: None,
            fields,
        }
    }

    /// Copy of this item carrying the given container name.
    pub fn with_container_name(&self, name: impl Into<String>) -> Self {
        Self {
            app_slave_container_name: Some(name.into()),
            fields: self.fields.clone(),
        }
    }
}
