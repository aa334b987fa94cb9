//! # Marquee Config
//!
//! Configuration management for Marquee.
//! Supports layered configuration from TOML files, a `.env` file and
//! environment variables, validated before it is handed out.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
