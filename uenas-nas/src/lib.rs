//! NAS (Non-Access Stratum) protocol library
//!
//! Message model for the UE side of 5G session management (3GPP TS 24.501)
//! and the EAP-AKA′ framing used during primary authentication.
//!
//! # Overview
//!
//! - [`messages`]: typed 5GSM messages and the [`SmMessage`] union
//! - [`enums`]: message types, 5GSM causes and request types
//! - [`eap`]: EAP / EAP-AKA′ messages with a byte-level encoder and decoder
//!
//! # Example
//!
//! ```rust
//! use uenas_nas::{PduSessionReleaseCommand, SmCause, SmMessage, SmMessageType};
//!
//! let msg: SmMessage = PduSessionReleaseCommand::new(1, 0, SmCause::RegularDeactivation).into();
//! assert_eq!(msg.psi(), 1);
//! assert_eq!(msg.message_type(), SmMessageType::PduSessionReleaseCommand);
//! ```

pub mod eap;
pub mod enums;
pub mod messages;

pub use eap::{
    decode_eap, encode_eap, encode_eap_to_vec, Eap, EapAkaPrime, EapAkaSubType,
    EapAttributeType, EapAttributes, EapCode, EapError, EapIdentity, EapType, EAP_AKA_MAC_SIZE,
};
pub use enums::{RequestType, SmCause, SmMessageType};
pub use messages::{
    FiveGSmStatus, PduAddress, PduSessionEstablishmentAccept, PduSessionEstablishmentReject,
    PduSessionEstablishmentRequest, PduSessionReleaseCommand, PduSessionReleaseComplete,
    PduSessionReleaseReject, PduSessionReleaseRequest, SmMessage,
};
