//! Logging setup shared by the provisioner binaries.
mod logger;
pub use logger::*;
