//! NAS (Non-Access Stratum) Protocol Handling
//!
//! UE-side NAS layer core:
//! - `security`: the NAS security context owned by mobility management
//! - `keys`: the 5G key hierarchy (TS 33.501 Annex A) and EAP-AKA' helpers
//! - `sm`: Session Management procedures (PDU session establishment, release)
//!
//! # Reference
//!
//! Based on 3GPP TS 24.501 and TS 33.501.

pub mod keys;
pub mod security;
pub mod sm;
