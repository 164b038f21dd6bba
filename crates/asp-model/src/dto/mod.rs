//! Wire shapes exchanged with the function's caller and with docker-compose-ui.
mod event;
pub use event::{ProvisionDto, ProvisionEvent, TestSessionItem};

mod response;
pub use response::{ProvisionBody, ProvisionResponse, ProvisionResult};

mod services;
pub use services::ServicesRequest;
