//! HTTP surface for invoking the provisioner outside a function runtime.
mod adapter;
pub use adapter::ProvisionerAdapter;

mod error;
pub use error::ApiError;

mod handler;
pub use handler::ApiHandler;

mod http;
pub use http::HttpApi;
