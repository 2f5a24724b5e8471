// Shared helpers for integration tests

#![allow(dead_code)]

use std::sync::Once;

static INIT: Once = Once::new();

/// Installs a tracing subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs it.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("studio_verify=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Real-browser tests only run when explicitly requested.
pub fn browser_tests_enabled() -> bool {
    if std::env::var("STUDIO_VERIFY_BROWSER").as_deref() == Ok("1") {
        return true;
    }
    eprintln!("skipping browser test (set STUDIO_VERIFY_BROWSER=1 to run it)");
    false
}
