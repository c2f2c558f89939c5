mod gate;
mod store;

pub use gate::{GateReason, should_run};
pub use store::{RunStatus, StatusError, read_status, write_status};
