//! Integration test modules.

mod config_files;
mod runtime;
