//! Configuration loading and parsing.
//!
//! This module handles:
//! - TOML config file parsing (settings snapshot and rules)
//! - Config file lookup in the working and home directories
//! - The starter template written by `--init`

pub mod cascade;
pub mod parser;
pub mod template;
pub mod types;

pub use cascade::{CONFIG_FILE_NAME, load_config, locate_config, user_config_path};
pub use parser::{parse_config_file, parse_config_str};
pub use template::generate_init_template;
pub use types::{ADD_THOUSANDS_SEPARATOR, Config, Rule, Settings};
