//! Config file loading and the `config` handlers against real files.

use warden_cli::WardenConfig;
use warden_cli::config_handlers::{config_value, write_default_config};

use crate::common::TestHarness;

#[test]
fn test_load_explicit_path() {
    let h = TestHarness::with_toml("[server]\nbind = \"0.0.0.0:7000\"\n");
    let loaded = WardenConfig::load(h.config_path.to_str()).unwrap();

    // WARDEN_BIND may be set in the environment running the tests.
    if std::env::var("WARDEN_BIND").is_err() {
        assert_eq!(loaded.server.bind, "0.0.0.0:7000");
    }
    assert_eq!(loaded.jobs.reminder_lead_hours, 24);
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let loaded = WardenConfig::load(path.to_str()).unwrap();
    assert_eq!(loaded.logging, WardenConfig::default().logging);
    assert_eq!(loaded.permissions, WardenConfig::default().permissions);
}

#[test]
fn test_init_then_get() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("warden").join("config.toml");

    write_default_config(&path, false).unwrap();
    let loaded = WardenConfig::from_file(&path).unwrap();

    assert_eq!(config_value(&loaded, "jobs.time_zone").unwrap(), "America/New_York");
    assert_eq!(config_value(&loaded, "logging.level").unwrap(), "info,warden=debug");
}

#[test]
fn test_permissions_override_flows_into_runtime() {
    let h = TestHarness::with_toml("[permissions]\nmanage_tasks = [\"client\", \"engineer\", \"founder\", \"super_admin\"]\n");
    let authorizer = &h.runtime.authorizer;

    assert!(authorizer.can_perform_action(warden_core::Role::Client, "manage_tasks"));
    assert!(!authorizer.can_perform_action(warden_core::Role::Client, "view_analytics"));
}
