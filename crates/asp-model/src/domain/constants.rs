//! Well-known values shared by the model and the provisioning flow.

/// Smallest number of app slaves a single request may ask for.
pub const MIN_SLAVES: usize = 1;

/// Largest number of app slaves a single request may ask for.
///
/// One slave serves one test session; the compose host is sized for twelve.
pub const MAX_SLAVES: usize = 12;

/// Compose service that runs the app-slave image.
pub const DEFAULT_SERVICE: &str = "zap";

/// Compose project the app-slave service belongs to.
pub const DEFAULT_PROJECT: &str = "app-slave";
