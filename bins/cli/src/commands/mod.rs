//! CLI command handlers.

pub mod config;
pub mod info;
pub mod map;

pub use config::{run_config_check, run_config_schema, run_config_show};
pub use info::run_info;
pub use map::{run_map_json, run_map_violations};
