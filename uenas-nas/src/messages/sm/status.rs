//! 5GSM Status Message (3GPP TS 24.501 Section 8.3.16)
//!
//! Sent by either side to report an error in a received 5GSM message.

use crate::enums::{SmCause, SmMessageType};

/// 5GSM Status message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiveGSmStatus {
    /// PDU Session ID (from header)
    pub pdu_session_id: u8,
    /// Procedure Transaction Identity (from header)
    pub pti: u8,
    /// 5GSM cause (mandatory)
    pub sm_cause: SmCause,
}

impl FiveGSmStatus {
    /// Create a new 5GSM Status message
    pub fn new(pdu_session_id: u8, pti: u8, cause: SmCause) -> Self {
        Self {
            pdu_session_id,
            pti,
            sm_cause: cause,
        }
    }

    /// Get the message type
    pub fn message_type() -> SmMessageType {
        SmMessageType::FiveGSmStatus
    }
}
