//! Configuration module for textmetrics
//!
//! This module handles:
//! - Project-level configuration (textmetrics.toml)
//! - External scorer locations and timeouts
//! - CLI defaults

mod project_config;

pub use project_config::{
    CliDefaults,
    ConfigError,
    NgramConfig,
    ProjectConfig,
    ToolsConfig,
    CONFIG_FILENAME,
    load_project_config,
};
