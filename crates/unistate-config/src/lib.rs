//! Configuration and file locations for applications built on unistate
//!
//! This crate provides:
//! - File path utilities for config and cache directories
//! - Configuration file lookup (TOML)
//! - Application configuration (AppConfig)

pub mod app_config;
pub mod config_file;
pub mod paths;

pub use app_config::{AppConfig, ConfigError};
pub use config_file::find_config_file;
pub use paths::{app_config_path, cache_dir, config_dir};
