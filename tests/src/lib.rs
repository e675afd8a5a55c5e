//! Integration test framework for uenas
//!
//! Test utilities and mock collaborators for exercising the UE NAS layer
//! across crate boundaries.
//!
//! # Components
//!
//! - [`mock_mm`] - Channel-backed MM stub and a scripted 5GSM network peer
//! - [`test_fixtures`] - Subscriber identity and authentication vector fixtures
//! - [`test_utils`] - Logging setup and async helpers
//!
//! # Test Categories
//!
//! 1. **SM Procedure Tests** - PDU session establishment, release, timers
//! 2. **Key Hierarchy Tests** - 5G-AKA and EAP-AKA' key chains into a security context

pub mod mock_mm;
pub mod test_fixtures;
pub mod test_utils;

pub use mock_mm::{exchange, MockMm, MockNetwork, MockNetworkConfig};
pub use test_fixtures::{TestAuthVector, TestUeConfig};
pub use test_utils::{init_test_logging, TestResult, DEFAULT_TEST_TIMEOUT};
