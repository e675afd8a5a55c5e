//! NAS 5GSM (Session Management) Messages
//!
//! Messages are modelled as typed values; [`SmMessage`] is the tagged union
//! exchanged between the session management engine and the NAS transport.
//!
//! - PDU Session Establishment messages - [`pdu_session_establishment`]
//! - PDU Session Release messages - [`pdu_session_release`]
//! - 5GSM Status - [`status`]

pub mod pdu_session_establishment;
pub mod pdu_session_release;
pub mod status;

pub use pdu_session_establishment::*;
pub use pdu_session_release::*;
pub use status::*;

use crate::enums::SmMessageType;

/// Any 5GSM message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmMessage {
    /// PDU Session Establishment Request
    EstablishmentRequest(PduSessionEstablishmentRequest),
    /// PDU Session Establishment Accept
    EstablishmentAccept(PduSessionEstablishmentAccept),
    /// PDU Session Establishment Reject
    EstablishmentReject(PduSessionEstablishmentReject),
    /// PDU Session Release Request
    ReleaseRequest(PduSessionReleaseRequest),
    /// PDU Session Release Reject
    ReleaseReject(PduSessionReleaseReject),
    /// PDU Session Release Command
    ReleaseCommand(PduSessionReleaseCommand),
    /// PDU Session Release Complete
    ReleaseComplete(PduSessionReleaseComplete),
    /// 5GSM Status
    Status(FiveGSmStatus),
}

impl SmMessage {
    /// PDU session identity from the message header
    pub fn psi(&self) -> u8 {
        match self {
            SmMessage::EstablishmentRequest(m) => m.pdu_session_id,
            SmMessage::EstablishmentAccept(m) => m.pdu_session_id,
            SmMessage::EstablishmentReject(m) => m.pdu_session_id,
            SmMessage::ReleaseRequest(m) => m.pdu_session_id,
            SmMessage::ReleaseReject(m) => m.pdu_session_id,
            SmMessage::ReleaseCommand(m) => m.pdu_session_id,
            SmMessage::ReleaseComplete(m) => m.pdu_session_id,
            SmMessage::Status(m) => m.pdu_session_id,
        }
    }

    /// Procedure transaction identity from the message header
    pub fn pti(&self) -> u8 {
        match self {
            SmMessage::EstablishmentRequest(m) => m.pti,
            SmMessage::EstablishmentAccept(m) => m.pti,
            SmMessage::EstablishmentReject(m) => m.pti,
            SmMessage::ReleaseRequest(m) => m.pti,
            SmMessage::ReleaseReject(m) => m.pti,
            SmMessage::ReleaseCommand(m) => m.pti,
            SmMessage::ReleaseComplete(m) => m.pti,
            SmMessage::Status(m) => m.pti,
        }
    }

    /// Message type
    pub fn message_type(&self) -> SmMessageType {
        match self {
            SmMessage::EstablishmentRequest(_) => SmMessageType::PduSessionEstablishmentRequest,
            SmMessage::EstablishmentAccept(_) => SmMessageType::PduSessionEstablishmentAccept,
            SmMessage::EstablishmentReject(_) => SmMessageType::PduSessionEstablishmentReject,
            SmMessage::ReleaseRequest(_) => SmMessageType::PduSessionReleaseRequest,
            SmMessage::ReleaseReject(_) => SmMessageType::PduSessionReleaseReject,
            SmMessage::ReleaseCommand(_) => SmMessageType::PduSessionReleaseCommand,
            SmMessage::ReleaseComplete(_) => SmMessageType::PduSessionReleaseComplete,
            SmMessage::Status(_) => SmMessageType::FiveGSmStatus,
        }
    }
}

macro_rules! impl_from_sm_message {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for SmMessage {
                fn from(msg: $ty) -> Self {
                    SmMessage::$variant(msg)
                }
            }
        )*
    };
}

impl_from_sm_message!(
    EstablishmentRequest(PduSessionEstablishmentRequest),
    EstablishmentAccept(PduSessionEstablishmentAccept),
    EstablishmentReject(PduSessionEstablishmentReject),
    ReleaseRequest(PduSessionReleaseRequest),
    ReleaseReject(PduSessionReleaseReject),
    ReleaseCommand(PduSessionReleaseCommand),
    ReleaseComplete(PduSessionReleaseComplete),
    Status(FiveGSmStatus),
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::SmCause;

    #[test]
    fn test_header_accessors() {
        let msg: SmMessage = PduSessionReleaseCommand::new(5, 0, SmCause::RegularDeactivation).into();
        assert_eq!(msg.psi(), 5);
        assert_eq!(msg.pti(), 0);
        assert_eq!(msg.message_type(), SmMessageType::PduSessionReleaseCommand);
    }

    #[test]
    fn test_from_conversions() {
        let msg = SmMessage::from(FiveGSmStatus::new(1, 2, SmCause::InvalidPtiValue));
        assert!(matches!(msg, SmMessage::Status(_)));
        assert!(!msg.message_type().is_uplink_only());

        let msg = SmMessage::from(PduSessionEstablishmentRequest::new(1, 2));
        assert!(msg.message_type().is_uplink_only());
    }
}
