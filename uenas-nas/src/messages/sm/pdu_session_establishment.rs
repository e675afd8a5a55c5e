//! PDU Session Establishment Messages (3GPP TS 24.501 Section 8.3.1-8.3.3)
//!
//! - PDU Session Establishment Request (UE to network, Section 8.3.1)
//! - PDU Session Establishment Accept (network to UE, Section 8.3.2)
//! - PDU Session Establishment Reject (network to UE, Section 8.3.3)

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use uenas_common::{PduSessionType, SNssai};

use crate::enums::{RequestType, SmCause, SmMessageType};

// ============================================================================
// PDU Address (3GPP TS 24.501 Section 9.11.4.10)
// ============================================================================

/// PDU address granted by the network
///
/// For IPv6 only the 64-bit interface identifier is assigned; the prefix
/// comes later from router advertisement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PduAddress {
    /// IPv4 address
    Ipv4(Ipv4Addr),
    /// IPv6 interface identifier
    Ipv6(u64),
    /// IPv6 interface identifier and IPv4 address
    Ipv4v6 {
        /// IPv6 interface identifier
        interface_id: u64,
        /// IPv4 address
        ipv4: Ipv4Addr,
    },
}

impl PduAddress {
    /// Returns the IPv4 address, if one was assigned
    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        match self {
            PduAddress::Ipv4(addr) | PduAddress::Ipv4v6 { ipv4: addr, .. } => Some(*addr),
            PduAddress::Ipv6(_) => None,
        }
    }

    /// Returns the link-local IPv6 address built from the interface identifier
    pub fn ipv6_link_local(&self) -> Option<Ipv6Addr> {
        let iid = match self {
            PduAddress::Ipv6(iid) | PduAddress::Ipv4v6 { interface_id: iid, .. } => *iid,
            PduAddress::Ipv4(_) => return None,
        };
        Some(Ipv6Addr::from((0xfe80u128 << 112) | u128::from(iid)))
    }
}

impl fmt::Display for PduAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.ipv4(), self.ipv6_link_local()) {
            (Some(v4), Some(v6)) => write!(f, "{v4}, {v6}"),
            (Some(v4), None) => write!(f, "{v4}"),
            (None, Some(v6)) => write!(f, "{v6}"),
            (None, None) => Ok(()),
        }
    }
}

// ============================================================================
// PDU Session Establishment Request (3GPP TS 24.501 Section 8.3.1)
// ============================================================================

/// PDU Session Establishment Request message (UE to network)
///
/// `s_nssai` and `dnn` travel in the UL NAS Transport carrying the message;
/// they are kept here so the transport layer can route the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PduSessionEstablishmentRequest {
    /// PDU Session ID (from header)
    pub pdu_session_id: u8,
    /// Procedure Transaction Identity (from header)
    pub pti: u8,
    /// Requested PDU session type
    pub pdu_session_type: Option<PduSessionType>,
    /// Initial or emergency request
    pub request_type: RequestType,
    /// Requested slice
    pub s_nssai: Option<SNssai>,
    /// Data network name
    pub dnn: Option<String>,
}

impl PduSessionEstablishmentRequest {
    /// Create a new PDU Session Establishment Request
    pub fn new(pdu_session_id: u8, pti: u8) -> Self {
        Self {
            pdu_session_id,
            pti,
            pdu_session_type: None,
            request_type: RequestType::InitialRequest,
            s_nssai: None,
            dnn: None,
        }
    }

    /// Returns true for an initial emergency request
    pub fn is_emergency(&self) -> bool {
        matches!(
            self.request_type,
            RequestType::InitialEmergencyRequest | RequestType::ExistingEmergencyPduSession
        )
    }

    /// Get the message type
    pub fn message_type() -> SmMessageType {
        SmMessageType::PduSessionEstablishmentRequest
    }
}

// ============================================================================
// PDU Session Establishment Accept (3GPP TS 24.501 Section 8.3.2)
// ============================================================================

/// PDU Session Establishment Accept message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PduSessionEstablishmentAccept {
    /// PDU Session ID (from header)
    pub pdu_session_id: u8,
    /// Procedure Transaction Identity (from header)
    pub pti: u8,
    /// Selected PDU session type
    pub selected_pdu_session_type: PduSessionType,
    /// PDU address (optional)
    pub pdu_address: Option<PduAddress>,
    /// S-NSSAI (optional)
    pub s_nssai: Option<SNssai>,
    /// DNN (optional)
    pub dnn: Option<String>,
    /// 5GSM cause (optional, e.g. #50 IPv4 only allowed)
    pub sm_cause: Option<SmCause>,
}

impl PduSessionEstablishmentAccept {
    /// Create a new PDU Session Establishment Accept with the mandatory fields
    pub fn new(pdu_session_id: u8, pti: u8, selected_pdu_session_type: PduSessionType) -> Self {
        Self {
            pdu_session_id,
            pti,
            selected_pdu_session_type,
            pdu_address: None,
            s_nssai: None,
            dnn: None,
            sm_cause: None,
        }
    }

    /// Set the PDU address
    pub fn with_pdu_address(mut self, address: PduAddress) -> Self {
        self.pdu_address = Some(address);
        self
    }

    /// Get the message type
    pub fn message_type() -> SmMessageType {
        SmMessageType::PduSessionEstablishmentAccept
    }
}

// ============================================================================
// PDU Session Establishment Reject (3GPP TS 24.501 Section 8.3.3)
// ============================================================================

/// PDU Session Establishment Reject message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PduSessionEstablishmentReject {
    /// PDU Session ID (from header)
    pub pdu_session_id: u8,
    /// Procedure Transaction Identity (from header)
    pub pti: u8,
    /// 5GSM cause (mandatory)
    pub sm_cause: SmCause,
    /// Back-off timer value in seconds (optional)
    pub back_off_timer: Option<u32>,
}

impl PduSessionEstablishmentReject {
    /// Create a new PDU Session Establishment Reject
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
        SmMessageType::PduSessionEstablishmentReject
    }
}
