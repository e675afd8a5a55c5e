//! EAP (Extensible Authentication Protocol) messages
//!
//! EAP framing from RFC 3748 and the EAP-AKA′ method of RFC 5448 as carried
//! in the 5G authentication procedure.
//!
//! # Message Structure
//!
//! - Code (1 byte): Request, Response, Success, Failure
//! - Identifier (1 byte): Matches requests with responses
//! - Length (2 bytes): Total length including header
//! - Type (1 byte, optional): EAP method type
//! - Type-Data (variable): Method-specific data
//!
//! EAP-AKA′ type data is a subtype octet, two reserved octets and a list of
//! attributes `Type | Length (4-octet units) | Value`.

use bytes::{Buf, BufMut};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use thiserror::Error;

/// Length of the AT_MAC value
pub const EAP_AKA_MAC_SIZE: usize = 16;

/// Error type for EAP encoding/decoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EapError {
    /// Buffer too short for decoding
    #[error("Buffer too short: expected at least {expected} bytes, got {actual}")]
    BufferTooShort {
        /// Expected minimum bytes
        expected: usize,
        /// Actual bytes available
        actual: usize,
    },
    /// Invalid EAP code
    #[error("Invalid EAP code: {0}")]
    InvalidCode(u8),
    /// Invalid or unsupported EAP type
    #[error("Invalid EAP type: {0}")]
    InvalidType(u8),
    /// Invalid EAP-AKA′ subtype
    #[error("Invalid EAP-AKA' subtype: {0}")]
    InvalidSubType(u8),
    /// Invalid attribute type
    #[error("Invalid attribute type: {0}")]
    InvalidAttributeType(u8),
    /// Invalid attribute length
    #[error("Invalid attribute length: {0}")]
    InvalidAttributeLength(u8),
    /// Attributes overrun the declared message length
    #[error("Read bytes ({read}) exceeds message length ({length})")]
    LengthMismatch {
        /// Bytes read
        read: usize,
        /// Expected length
        length: usize,
    },
}

/// EAP Code values (RFC 3748 Section 4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum EapCode {
    /// Request
    Request = 1,
    /// Response
    Response = 2,
    /// Success
    Success = 3,
    /// Failure
    Failure = 4,
}

/// EAP Type values (RFC 3748 Section 5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum EapType {
    /// Identity
    Identity = 1,
    /// Notification
    Notification = 2,
    /// EAP-AKA
    EapAka = 23,
    /// EAP-AKA′
    EapAkaPrime = 50,
}

/// EAP-AKA′ Subtype values (RFC 4187 Section 11)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum EapAkaSubType {
    /// AKA-Challenge
    AkaChallenge = 1,
    /// AKA-Authentication-Reject
    AkaAuthenticationReject = 2,
    /// AKA-Synchronization-Failure
    AkaSynchronizationFailure = 4,
    /// AKA-Identity
    AkaIdentity = 5,
    /// AKA-Notification
    AkaNotification = 12,
    /// AKA-Reauthentication
    AkaReauthentication = 13,
    /// AKA-Client-Error
    AkaClientError = 14,
}

/// EAP-AKA′ Attribute Type values (RFC 4187 Section 11, RFC 5448)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum EapAttributeType {
    /// AT_RAND
    AtRand = 1,
    /// AT_AUTN
    AtAutn = 2,
    /// AT_RES
    AtRes = 3,
    /// AT_AUTS
    AtAuts = 4,
    /// AT_PADDING
    AtPadding = 6,
    /// AT_PERMANENT_ID_REQ
    AtPermanentIdReq = 10,
    /// AT_MAC
    AtMac = 11,
    /// AT_NOTIFICATION
    AtNotification = 12,
    /// AT_ANY_ID_REQ
    AtAnyIdReq = 13,
    /// AT_IDENTITY
    AtIdentity = 14,
    /// AT_FULLAUTH_ID_REQ
    AtFullauthIdReq = 17,
    /// AT_COUNTER
    AtCounter = 19,
    /// AT_CLIENT_ERROR_CODE
    AtClientErrorCode = 22,
    /// AT_KDF_INPUT (network name)
    AtKdfInput = 23,
    /// AT_KDF
    AtKdf = 24,
    /// AT_IV
    AtIv = 129,
    /// AT_ENCR_DATA
    AtEncrData = 130,
    /// AT_CHECKCODE
    AtCheckcode = 134,
    /// AT_RESULT_IND
    AtResultInd = 135,
    /// AT_BIDDING
    AtBidding = 136,
}

/// EAP-AKA′ attributes in wire order
///
/// Values are stored without the type and length octets. Putting an attribute
/// that already exists replaces its value in place, so re-encoding keeps the
/// order the attributes were received in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EapAttributes {
    entries: Vec<(EapAttributeType, Vec<u8>)>,
}

impl EapAttributes {
    /// Create a new empty attributes container
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw attribute value
    pub fn get_raw(&self, key: EapAttributeType) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// Value following the two reserved octets
    fn get_after_reserved(&self, key: EapAttributeType) -> Option<&[u8]> {
        self.get_raw(key).and_then(|v| v.get(2..))
    }

    /// AT_RAND value
    pub fn get_rand(&self) -> Option<&[u8]> {
        self.get_after_reserved(EapAttributeType::AtRand)
    }

    /// AT_AUTN value
    pub fn get_autn(&self) -> Option<&[u8]> {
        self.get_after_reserved(EapAttributeType::AtAutn)
    }

    /// AT_MAC value
    pub fn get_mac(&self) -> Option<&[u8]> {
        self.get_after_reserved(EapAttributeType::AtMac)
    }

    /// AT_RES value, trimmed to its bit length
    pub fn get_res(&self) -> Option<&[u8]> {
        let v = self.get_raw(EapAttributeType::AtRes)?;
        let bits = u16::from_be_bytes([*v.first()?, *v.get(1)?]) as usize;
        v.get(2..2 + bits.div_ceil(8))
    }

    /// AT_KDF value
    pub fn get_kdf(&self) -> Option<u16> {
        match self.get_raw(EapAttributeType::AtKdf)? {
            [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
            _ => None,
        }
    }

    /// AT_KDF_INPUT value (the serving network name)
    pub fn get_kdf_input(&self) -> Option<&[u8]> {
        let v = self.get_raw(EapAttributeType::AtKdfInput)?;
        let len = u16::from_be_bytes([*v.first()?, *v.get(1)?]) as usize;
        v.get(2..2 + len)
    }

    /// AT_CLIENT_ERROR_CODE value
    pub fn get_client_error_code(&self) -> Option<u16> {
        match self.get_raw(EapAttributeType::AtClientErrorCode)? {
            [hi, lo] => Some(u16::from_be_bytes([*hi, *lo])),
            _ => None,
        }
    }

    /// Put a raw attribute value, replacing an existing one in place
    pub fn put_raw_attribute(&mut self, key: EapAttributeType, value: Vec<u8>) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    fn put_with_reserved(&mut self, key: EapAttributeType, value: &[u8]) {
        let mut data = Vec::with_capacity(2 + value.len());
        data.extend_from_slice(&[0, 0]);
        data.extend_from_slice(value);
        self.put_raw_attribute(key, data);
    }

    /// Put AT_RAND
    pub fn put_rand(&mut self, rand: &[u8]) {
        self.put_with_reserved(EapAttributeType::AtRand, rand);
    }

    /// Put AT_AUTN
    pub fn put_autn(&mut self, autn: &[u8]) {
        self.put_with_reserved(EapAttributeType::AtAutn, autn);
    }

    /// Put AT_MAC
    pub fn put_mac(&mut self, mac: &[u8]) {
        self.put_with_reserved(EapAttributeType::AtMac, mac);
    }

    /// Put AT_RES with its bit-length prefix
    pub fn put_res(&mut self, res: &[u8]) {
        let bit_length = (res.len() * 8) as u16;
        let mut data = Vec::with_capacity(2 + res.len());
        data.extend_from_slice(&bit_length.to_be_bytes());
        data.extend_from_slice(res);
        self.put_raw_attribute(EapAttributeType::AtRes, data);
    }

    /// Put AT_KDF
    pub fn put_kdf(&mut self, kdf: u16) {
        self.put_raw_attribute(EapAttributeType::AtKdf, kdf.to_be_bytes().to_vec());
    }

    /// Put AT_KDF_INPUT with its length prefix
    pub fn put_kdf_input(&mut self, network_name: &[u8]) {
        let mut data = Vec::with_capacity(2 + network_name.len());
        data.extend_from_slice(&(network_name.len() as u16).to_be_bytes());
        data.extend_from_slice(network_name);
        self.put_raw_attribute(EapAttributeType::AtKdfInput, data);
    }

    /// Put AT_AUTS
    pub fn put_auts(&mut self, auts: &[u8]) {
        self.put_raw_attribute(EapAttributeType::AtAuts, auts.to_vec());
    }

    /// Put AT_CLIENT_ERROR_CODE
    pub fn put_client_error_code(&mut self, code: u16) {
        self.put_raw_attribute(EapAttributeType::AtClientErrorCode, code.to_be_bytes().to_vec());
    }

    /// Iterate over attributes in wire order
    pub fn iter(&self) -> impl Iterator<Item = (EapAttributeType, &[u8])> {
        self.entries.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Check if the container is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// EAP message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eap {
    /// Success/Failure without type data
    Simple {
        /// EAP code
        code: EapCode,
        /// Identifier
        id: u8,
    },
    /// EAP Identity
    Identity(EapIdentity),
    /// EAP-AKA′
    AkaPrime(EapAkaPrime),
}

impl Eap {
    /// EAP code
    pub fn code(&self) -> EapCode {
        match self {
            Eap::Simple { code, .. } => *code,
            Eap::Identity(e) => e.code,
            Eap::AkaPrime(e) => e.code,
        }
    }

    /// Identifier
    pub fn id(&self) -> u8 {
        match self {
            Eap::Simple { id, .. } => *id,
            Eap::Identity(e) => e.id,
            Eap::AkaPrime(e) => e.id,
        }
    }
}

/// EAP Identity message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EapIdentity {
    /// EAP code
    pub code: EapCode,
    /// Identifier
    pub id: u8,
    /// Identity bytes
    pub identity: Vec<u8>,
}

/// EAP-AKA′ message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EapAkaPrime {
    /// EAP code
    pub code: EapCode,
    /// Identifier
    pub id: u8,
    /// EAP-AKA′ subtype
    pub sub_type: EapAkaSubType,
    /// Attributes
    pub attributes: EapAttributes,
}

impl EapAkaPrime {
    /// Create a new EAP-AKA′ message
    pub fn new(code: EapCode, id: u8, sub_type: EapAkaSubType) -> Self {
        Self {
            code,
            id,
            sub_type,
            attributes: EapAttributes::new(),
        }
    }

    /// Create an AKA-Client-Error response
    pub fn client_error(id: u8, error_code: u16) -> Self {
        let mut msg = Self::new(EapCode::Response, id, EapAkaSubType::AkaClientError);
        msg.attributes.put_client_error_code(error_code);
        msg
    }
}

/// Number of zero octets appended so `2 + value_len` is a multiple of 4
fn attribute_padding(value_len: usize) -> usize {
    (4 - (value_len + 2) % 4) % 4
}

/// Encode an EAP message
pub fn encode_eap<B: BufMut>(buf: &mut B, eap: &Eap) {
    buf.put_u8(eap.code().into());
    buf.put_u8(eap.id());

    match eap {
        Eap::Simple { .. } => buf.put_u16(4),
        Eap::Identity(identity) => {
            buf.put_u16((5 + identity.identity.len()) as u16);
            buf.put_u8(EapType::Identity.into());
            buf.put_slice(&identity.identity);
        }
        Eap::AkaPrime(aka) => {
            let attr_len: usize = aka
                .attributes
                .iter()
                .map(|(_, v)| 2 + v.len() + attribute_padding(v.len()))
                .sum();
            // header (4) + type (1) + subtype (1) + reserved (2)
            buf.put_u16((8 + attr_len) as u16);
            buf.put_u8(EapType::EapAkaPrime.into());
            buf.put_u8(aka.sub_type.into());
            buf.put_u16(0);

            for (attr_type, value) in aka.attributes.iter() {
                let padding = attribute_padding(value.len());
                buf.put_u8(attr_type.into());
                buf.put_u8(((2 + value.len() + padding) / 4) as u8);
                buf.put_slice(value);
                buf.put_bytes(0, padding);
            }
        }
    }
}

/// Encode an EAP message into a new buffer
pub fn encode_eap_to_vec(eap: &Eap) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_eap(&mut buf, eap);
    buf
}

fn ensure_remaining<B: Buf>(buf: &B, expected: usize) -> Result<(), EapError> {
    if buf.remaining() < expected {
        return Err(EapError::BufferTooShort {
            expected,
            actual: buf.remaining(),
        });
    }
    Ok(())
}

/// Decode an EAP message
pub fn decode_eap<B: Buf>(buf: &mut B) -> Result<Eap, EapError> {
    ensure_remaining(buf, 4)?;

    let code_octet = buf.get_u8();
    let code = EapCode::try_from(code_octet).map_err(|_| EapError::InvalidCode(code_octet))?;
    let id = buf.get_u8();
    let length = buf.get_u16() as usize;

    if length < 4 {
        return Err(EapError::BufferTooShort {
            expected: 4,
            actual: length,
        });
    }
    if length == 4 {
        return Ok(Eap::Simple { code, id });
    }

    ensure_remaining(buf, length - 4)?;
    let type_octet = buf.get_u8();
    let inner_length = length - 5;

    match EapType::try_from(type_octet) {
        Ok(EapType::EapAkaPrime) => decode_eap_aka_prime(buf, code, id, inner_length),
        Ok(EapType::Identity) => {
            let mut identity = vec![0u8; inner_length];
            buf.copy_to_slice(&mut identity);
            Ok(Eap::Identity(EapIdentity { code, id, identity }))
        }
        _ => {
            buf.advance(inner_length);
            Err(EapError::InvalidType(type_octet))
        }
    }
}

fn decode_eap_aka_prime<B: Buf>(
    buf: &mut B,
    code: EapCode,
    id: u8,
    inner_length: usize,
) -> Result<Eap, EapError> {
    if inner_length < 3 {
        return Err(EapError::BufferTooShort {
            expected: 3,
            actual: inner_length,
        });
    }

    let sub_type_octet = buf.get_u8();
    let sub_type = EapAkaSubType::try_from(sub_type_octet)
        .map_err(|_| EapError::InvalidSubType(sub_type_octet))?;
    buf.advance(2);
    let mut read = 3;

    let mut aka = EapAkaPrime::new(code, id, sub_type);

    while read < inner_length {
        ensure_remaining(buf, 2)?;
        let type_octet = buf.get_u8();
        let attr_type = EapAttributeType::try_from(type_octet)
            .map_err(|_| EapError::InvalidAttributeType(type_octet))?;
        let units = buf.get_u8();
        if units == 0 {
            return Err(EapError::InvalidAttributeLength(units));
        }

        let value_length = usize::from(units) * 4 - 2;
        if read + 2 + value_length > inner_length {
            return Err(EapError::LengthMismatch {
                read: read + 2 + value_length,
                length: inner_length,
            });
        }
        ensure_remaining(buf, value_length)?;

        let mut value = vec![0u8; value_length];
        buf.copy_to_slice(&mut value);
        read += 2 + value_length;

        aka.attributes.put_raw_attribute(attr_type, value);
    }

    Ok(Eap::AkaPrime(aka))
}
