//! NAS session management enumerations
//!
//! Based on 3GPP TS 24.501

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// 5GSM Message Type
/// 3GPP TS 24.501 Section 9.7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum SmMessageType {
    // PDU session establishment messages
    PduSessionEstablishmentRequest = 0xC1,
    PduSessionEstablishmentAccept = 0xC2,
    PduSessionEstablishmentReject = 0xC3,

    // PDU session release messages
    PduSessionReleaseRequest = 0xD1,
    PduSessionReleaseReject = 0xD2,
    PduSessionReleaseCommand = 0xD3,
    PduSessionReleaseComplete = 0xD4,

    // Status message
    FiveGSmStatus = 0xD6,
}

impl SmMessageType {
    /// Returns true for messages only ever sent by the UE.
    pub fn is_uplink_only(&self) -> bool {
        matches!(
            self,
            SmMessageType::PduSessionEstablishmentRequest
                | SmMessageType::PduSessionReleaseRequest
                | SmMessageType::PduSessionReleaseComplete
        )
    }

    /// Message name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            SmMessageType::PduSessionEstablishmentRequest => "PduSessionEstablishmentRequest",
            SmMessageType::PduSessionEstablishmentAccept => "PduSessionEstablishmentAccept",
            SmMessageType::PduSessionEstablishmentReject => "PduSessionEstablishmentReject",
            SmMessageType::PduSessionReleaseRequest => "PduSessionReleaseRequest",
            SmMessageType::PduSessionReleaseReject => "PduSessionReleaseReject",
            SmMessageType::PduSessionReleaseCommand => "PduSessionReleaseCommand",
            SmMessageType::PduSessionReleaseComplete => "PduSessionReleaseComplete",
            SmMessageType::FiveGSmStatus => "FiveGSmStatus",
        }
    }
}

impl std::fmt::Display for SmMessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 5GSM Cause values (3GPP TS 24.501 Section 9.11.4.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum SmCause {
    /// Operator determined barring
    OperatorDeterminedBarring = 0x08,
    /// Insufficient resources
    InsufficientResources = 0x1A,
    /// Missing or unknown DNN
    MissingOrUnknownDnn = 0x1B,
    /// Unknown PDU session type
    UnknownPduSessionType = 0x1C,
    /// User authentication or authorization failed
    UserAuthFailed = 0x1D,
    /// Request rejected, unspecified
    RequestRejectedUnspecified = 0x1F,
    /// Service option not supported
    ServiceOptionNotSupported = 0x20,
    /// Requested service option not subscribed
    RequestedServiceOptionNotSubscribed = 0x21,
    /// PTI already in use
    PtiAlreadyInUse = 0x23,
    /// Regular deactivation
    RegularDeactivation = 0x24,
    /// Network failure
    NetworkFailure = 0x26,
    /// Reactivation requested
    ReactivationRequested = 0x27,
    /// Invalid PDU session identity
    InvalidPduSessionIdentity = 0x2B,
    /// Out of LADN service area
    OutOfLadnServiceArea = 0x2E,
    /// PTI mismatch
    PtiMismatch = 0x2F,
    /// PDU session type IPv4 only allowed
    PduSessionTypeIpv4OnlyAllowed = 0x32,
    /// PDU session type IPv6 only allowed
    PduSessionTypeIpv6OnlyAllowed = 0x33,
    /// PDU session does not exist
    PduSessionDoesNotExist = 0x36,
    /// Insufficient resources for specific slice and DNN
    InsufficientResourcesForSliceAndDnn = 0x43,
    /// Not supported SSC mode
    NotSupportedSscMode = 0x44,
    /// Insufficient resources for specific slice
    InsufficientResourcesForSlice = 0x45,
    /// Missing or unknown DNN in a slice
    MissingOrUnknownDnnInSlice = 0x46,
    /// Invalid PTI value
    InvalidPtiValue = 0x51,
    /// Semantically incorrect message
    SemanticallyIncorrectMessage = 0x5F,
    /// Invalid mandatory information
    InvalidMandatoryInformation = 0x60,
    /// Message type non-existent or not implemented
    MessageTypeNonExistent = 0x61,
    /// Message type not compatible with the protocol state
    MessageTypeNotCompatible = 0x62,
    /// Information element non-existent or not implemented
    IeNonExistent = 0x63,
    /// Conditional IE error
    ConditionalIeError = 0x64,
    /// Message not compatible with the protocol state
    MessageNotCompatible = 0x65,
    /// Protocol error, unspecified
    #[default]
    ProtocolErrorUnspecified = 0x6F,
}

impl SmCause {
    /// Decodes a cause octet; unknown values map to protocol error, unspecified
    /// (TS 24.501 Section 9.11.4.2).
    pub fn from_octet(value: u8) -> Self {
        Self::try_from(value).unwrap_or_default()
    }

    /// Cause number as written in TS 24.501 (`#43` and so on)
    pub fn number(&self) -> u8 {
        (*self).into()
    }
}

impl std::fmt::Display for SmCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {:?}", self.number(), self)
    }
}

/// Request type carried with an establishment request
/// (3GPP TS 24.501 Section 9.11.3.47)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum RequestType {
    /// Initial request
    #[default]
    InitialRequest = 0x01,
    /// Existing PDU session
    ExistingPduSession = 0x02,
    /// Initial emergency request
    InitialEmergencyRequest = 0x03,
    /// Existing emergency PDU session
    ExistingEmergencyPduSession = 0x04,
}
