//! # warden-cli
//!
//! The `warden` binary and the pieces it is built from:
//! - [`config`]: TOML configuration with environment overrides
//! - [`config_handlers`]: `warden config path|get|init|export`
//! - [`logging`]: subscriber setup
//! - [`runtime`]: wiring the store, services and HTTP surface together

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod config_handlers;
pub mod error;
pub mod logging;
pub mod runtime;

pub use cli::{Args, Command, ConfigAction};
pub use config::WardenConfig;
pub use error::{Error, Result};
pub use runtime::Runtime;
