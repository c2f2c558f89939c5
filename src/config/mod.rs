mod defaults;
mod hash;
mod io;
mod schema;
mod validate;

#[cfg(test)]
pub(crate) mod fixtures;

pub use hash::config_hash;
pub use io::{load_config, resolve_config_path};
pub use schema::{Config, DayMenu};
pub use validate::ConfigError;
