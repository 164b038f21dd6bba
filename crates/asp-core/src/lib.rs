pub mod provision;
pub mod wait;

pub use provision::{
    ConfigError, ProvisionContext, ProvisionError, Provisioner, TIMEOUT_MESSAGE, deploy_slaves,
    provision_app_slaves,
};
pub use wait::{AggregateError, Aggregation, PartialResolution, PendingOperation, aggregate};
