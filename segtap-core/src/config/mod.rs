//! Configuration
//!
//! Board-agnostic configuration types plus a parser for the small TOML
//! subset used by `meter.toml`.

pub mod parse;
pub mod types;

pub use parse::{parse_config, parse_pin, ConfigError};
pub use types::*;
