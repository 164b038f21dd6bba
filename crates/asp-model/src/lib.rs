mod domain;
pub use domain::{
    DEFAULT_PROJECT, DEFAULT_SERVICE, Flag, MAX_SLAVES, MIN_SLAVES, SlaveCount,
    compose_project_name, container_name,
};

mod dto;
pub use dto::{
    ProvisionBody, ProvisionDto, ProvisionEvent, ProvisionResponse, ProvisionResult,
    ServicesRequest, TestSessionItem,
};

mod error;
pub use error::{ModelError, ModelResult};
