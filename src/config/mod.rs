//! TOML configuration with embedded defaults
//!
//! Structs are declared with [`config_struct!`](crate::config_struct) so every
//! field carries its default next to its type. The global instance lives in
//! [`utils::CONFIG`]; services can also be built from an explicit `Config`.

pub mod macros;
mod schemas;
mod utils;

pub use schemas::*;
pub use utils::{
    get_config_clone, install_config, load_config, load_config_from_path, parse_config_str,
    validate_config, with_config, CONFIG, CONFIG_FILE_PATH,
};
