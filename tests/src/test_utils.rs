//! Test utility functions for integration tests
//!
//! Provides common utilities for test setup, logging, and async waits.

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;
use uenas_common::{init_logging_for_tests, LogLevel};

/// Result type for integration tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Initialize logging for tests
///
/// Uses RUST_LOG environment variable if set, otherwise defaults to "info"
pub fn init_test_logging() {
    init_logging_for_tests(LogLevel::Info);
}

/// Awaits `future`, failing the test result after `within`
pub async fn within<F, T>(limit: Duration, future: F) -> TestResult<T>
where
    F: Future<Output = T>,
{
    timeout(limit, future)
        .await
        .map_err(|_| "Operation did not complete within timeout".into())
}

/// Default timeout for test operations
pub const DEFAULT_TEST_TIMEOUT: Duration = Duration::from_secs(5);
