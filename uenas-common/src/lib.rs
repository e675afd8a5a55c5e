//! Common types and utilities for uenas
//!
//! This crate provides the identifiers, configuration structures and logging
//! setup shared by the key-derivation and session-management crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::{
    PduSessionType, ReleaseRejectPolicy, SessionConfig, SmConfig, UeNasConfig, DEFAULT_T3580_SECS,
    DEFAULT_T3581_SECS, DEFAULT_T3582_SECS,
};
pub use error::Error;
pub use logging::{
    init_logging, init_logging_for_tests, init_logging_with_filter, log_sm_message, Direction,
    LogLevel,
};
pub use types::{Plmn, SNssai, Supi, SupiType};
