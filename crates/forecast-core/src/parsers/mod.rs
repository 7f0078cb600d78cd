//! Parsers for forecast input files

pub mod config_parser;

pub use config_parser::{ConfigOverrides, ConfigParser};
