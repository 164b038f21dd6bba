mod constants;
pub use constants::{DEFAULT_PROJECT, DEFAULT_SERVICE, MAX_SLAVES, MIN_SLAVES};

mod count;
pub use count::SlaveCount;

mod flag;
pub use flag::Flag;

mod naming;
pub use naming::{compose_project_name, container_name};
