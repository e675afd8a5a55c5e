//! PDU Session Release Messages (3GPP TS 24.501 Section 8.3.12-8.3.15)
//!
//! - PDU Session Release Request (UE to network, Section 8.3.12)
//! - PDU Session Release Reject (network to UE, Section 8.3.13)
//! - PDU Session Release Command (network to UE, Section 8.3.14)
//! - PDU Session Release Complete (UE to network, Section 8.3.15)

use crate::enums::{SmCause, SmMessageType};

// ============================================================================
// PDU Session Release Request (3GPP TS 24.501 Section 8.3.12)
// ============================================================================

/// PDU Session Release Request message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PduSessionReleaseRequest {
    /// PDU Session ID (from header)
    pub pdu_session_id: u8,
    /// Procedure Transaction Identity (from header)
    pub pti: u8,
    /// 5GSM cause (optional)
    pub sm_cause: Option<SmCause>,
}

impl PduSessionReleaseRequest {
    /// Create a new PDU Session Release Request without a cause
    pub fn new(pdu_session_id: u8, pti: u8) -> Self {
        Self {
            pdu_session_id,
            pti,
            sm_cause: None,
        }
    }

    /// Set the 5GSM cause
    pub fn with_cause(mut self, cause: SmCause) -> Self {
        self.sm_cause = Some(cause);
        self
    }

    /// Get the message type
    pub fn message_type() -> SmMessageType {
        SmMessageType::PduSessionReleaseRequest
    }
}

// ============================================================================
// PDU Session Release Reject (3GPP TS 24.501 Section 8.3.13)
// ============================================================================

/// PDU Session Release Reject message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PduSessionReleaseReject {
    /// PDU Session ID (from header)
    pub pdu_session_id: u8,
    /// Procedure Transaction Identity (from header)
    pub pti: u8,
    /// 5GSM cause (mandatory)
    pub sm_cause: SmCause,
}

impl PduSessionReleaseReject {
    /// Create a new PDU Session Release Reject
    pub fn new(pdu_session_id: u8, pti: u8, cause: SmCause) -> Self {
        Self {
            pdu_session_id,
            pti,
            sm_cause: cause,
        }
    }

    /// Get the message type
    pub fn message_type() -> SmMessageType {
        SmMessageType::PduSessionReleaseReject
    }
}

// ============================================================================
// PDU Session Release Command (3GPP TS 24.501 Section 8.3.14)
// ============================================================================

/// PDU Session Release Command message (network to UE)
///
/// A PTI of 0 marks a network-initiated release with no UE request pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PduSessionReleaseCommand {
    /// PDU Session ID (from header)
    pub pdu_session_id: u8,
    /// Procedure Transaction Identity (from header)
    pub pti: u8,
    /// 5GSM cause (mandatory)
    pub sm_cause: SmCause,
    /// Back-off timer value in seconds (optional)
    pub back_off_timer: Option<u32>,
}

impl PduSessionReleaseCommand {
    /// Create a new PDU Session Release Command
    pub fn new(pdu_session_id: u8, pti: u8, cause: SmCause) -> Self {
        Self {
            pdu_session_id,
            pti,
            sm_cause: cause,
            back_off_timer: None,
        }
    }

    /// Get the message type
    pub fn message_type() -> SmMessageType {
        SmMessageType::PduSessionReleaseCommand
    }
}

// ============================================================================
// PDU Session Release Complete (3GPP TS 24.501 Section 8.3.15)
// ============================================================================

/// PDU Session Release Complete message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PduSessionReleaseComplete {
    /// PDU Session ID (from header)
    pub pdu_session_id: u8,
    /// Procedure Transaction Identity (from header)
    pub pti: u8,
    /// 5GSM cause (optional)
    pub sm_cause: Option<SmCause>,
}

impl PduSessionReleaseComplete {
    /// Create a new PDU Session Release Complete
    pub fn new(pdu_session_id: u8, pti: u8) -> Self {
        Self {
            pdu_session_id,
            pti,
            sm_cause: None,
        }
    }

    /// Set the 5GSM cause
    pub fn with_cause(mut self, cause: SmCause) -> Self {
        self.sm_cause = Some(cause);
        self
    }

    /// Get the message type
    pub fn message_type() -> SmMessageType {
        SmMessageType::PduSessionReleaseComplete
    }
}
