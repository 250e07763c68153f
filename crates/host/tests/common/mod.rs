//! Common test utilities
#![allow(unused_imports)] // Re-exports may not be used in all test files
#![allow(dead_code)]

pub mod harness;
pub mod mock_runtime;

pub use harness::TestHarness;
pub use mock_runtime::MockRuntime;

/// Install a test-writer subscriber once per test binary
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
