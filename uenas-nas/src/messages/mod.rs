//! NAS 5G Messages
//!
//! Session management messages as defined in 3GPP TS 24.501 - [`sm`]

pub mod sm;

pub use sm::*;
