//! Tests for tracing setup.

use std::sync::Mutex;

use surface_core::tracing::{env_filter, init_tracing, DEFAULT_FILTER};
use tracing_subscriber::EnvFilter;

static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_init_tracing_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing();
}

#[test]
fn test_invalid_surface_log_falls_back() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("SURFACE_LOG", "surface=loud");
    let filter = env_filter();
    std::env::remove_var("SURFACE_LOG");

    assert_eq!(
        filter.to_string(),
        EnvFilter::new(DEFAULT_FILTER).to_string()
    );
}

#[test]
fn test_unset_surface_log_uses_default() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::remove_var("SURFACE_LOG");

    assert_eq!(
        env_filter().to_string(),
        EnvFilter::new(DEFAULT_FILTER).to_string()
    );
}

#[test]
fn test_surface_log_directives_are_used() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("SURFACE_LOG", "surface_analysis=debug");
    let filter = env_filter();
    std::env::remove_var("SURFACE_LOG");

    let installed = filter.to_string();
    assert_ne!(installed, EnvFilter::new(DEFAULT_FILTER).to_string());
    assert!(installed.contains("surface_analysis"), "got {installed}");
}
