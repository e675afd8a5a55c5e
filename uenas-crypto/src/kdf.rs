//! Key derivation primitives for 5G security
//!
//! - the generic KDF of 3GPP TS 33.220 Annex B.2 (HMAC-SHA-256 over an
//!   FC-tagged, length-suffixed parameter string)
//! - PRF′ of RFC 5448 used for the EAP-AKA′ master key
//! - KDF string encoding of TS 33.501 Annex B.2.1.2
//!
//! The individual keys of the 5G hierarchy are built on top of these in the
//! UE's NAS key module.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// HMAC-SHA256 output size in bytes
pub const HMAC_SHA256_SIZE: usize = 32;

/// Key size for 256-bit keys
pub const KEY_256_SIZE: usize = 32;

/// Key size for 128-bit keys
pub const KEY_128_SIZE: usize = 16;

/// Largest number of PRF′ rounds (the round counter is a single octet).
pub const PRF_PRIME_MAX_ROUNDS: usize = 254;

/// Errors from the key derivation primitives
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KdfError {
    /// Requested PRF′ output is empty or needs more than 254 rounds
    #[error("invalid PRF' output length: {0} bytes")]
    InvalidPrfOutputLength(usize),
}

/// FC values for key derivation (TS 33.501 Annex A, TS 33.402 Annex A.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FcValue {
    /// FC = 0x20: Derivation of CK′ and IK′ from CK and IK
    CkPrimeIkPrime = 0x20,
    /// FC = 0x69: Derivation of `KNASint` and `KNASenc` from KAMF
    KnasIntEnc = 0x69,
    /// FC = 0x6A: Derivation of KAUSF from CK and IK
    Kausf = 0x6A,
    /// FC = 0x6B: Derivation of RES* from CK′ and IK′
    ResStar = 0x6B,
    /// FC = 0x6C: Derivation of KSEAF from KAUSF
    Kseaf = 0x6C,
    /// FC = 0x6D: Derivation of KAMF from KSEAF
    Kamf = 0x6D,
}

impl From<FcValue> for u8 {
    fn from(fc: FcValue) -> Self {
        fc as u8
    }
}

/// Algorithm type distinguisher for NAS key derivation (TS 33.501 A.8)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AlgorithmTypeDistinguisher {
    /// NAS encryption algorithm
    NasEnc = 0x01,
    /// NAS integrity algorithm
    NasInt = 0x02,
}

/// Compute HMAC-SHA256
pub fn hmac_sha256(key: &[u8], input: &[u8]) -> [u8; HMAC_SHA256_SIZE] {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .unwrap_or_else(|_| unreachable!("HMAC-SHA256 accepts keys of any size"));
    mac.update(input);
    let mut output = [0u8; HMAC_SHA256_SIZE];
    output.copy_from_slice(&mac.finalize().into_bytes());
    output
}

/// Builds the KDF input string `S = FC || P0 || L0 || ... || Pn || Ln`.
///
/// Each `Li` is the length of `Pi` as two big-endian octets.
pub fn build_kdf_input(fc: u8, parameters: &[&[u8]]) -> Vec<u8> {
    let capacity = 1 + parameters.iter().map(|p| p.len() + 2).sum::<usize>();
    let mut input = Vec::with_capacity(capacity);
    input.push(fc);

    for param in parameters {
        input.extend_from_slice(param);
        input.extend_from_slice(&(param.len() as u16).to_be_bytes());
    }
    input
}

/// Calculate a KDF key as specified in 3GPP TS 33.220 Annex B.2
///
/// `KDF(K, S) = HMAC-SHA-256(K, S)` with `S` from [`build_kdf_input`]. The key
/// may have any length (CK||IK, KAUSF, a caller-supplied RES* key).
pub fn calculate_kdf_key(key: &[u8], fc: u8, parameters: &[&[u8]]) -> [u8; KEY_256_SIZE] {
    hmac_sha256(key, &build_kdf_input(fc, parameters))
}

/// Calculate PRF′ as specified in RFC 5448 Section 3.4
///
/// ```text
/// T1 = HMAC-SHA-256(K, S | 0x01)
/// Tn = HMAC-SHA-256(K, Tn-1 | S | n)
/// PRF'(K, S) = T1 | T2 | ...
/// ```
///
/// The concatenation is truncated to `output_length` bytes.
///
/// # Errors
/// [`KdfError::InvalidPrfOutputLength`] when `output_length` is zero or
/// would need more than 254 rounds.
pub fn calculate_prf_prime(
    key: &[u8],
    input: &[u8],
    output_length: usize,
) -> Result<Vec<u8>, KdfError> {
    let rounds = output_length.div_ceil(HMAC_SHA256_SIZE);
    if rounds == 0 || rounds > PRF_PRIME_MAX_ROUNDS {
        return Err(KdfError::InvalidPrfOutputLength(output_length));
    }

    let mut result = Vec::with_capacity(rounds * HMAC_SHA256_SIZE);
    let mut previous: Option<[u8; HMAC_SHA256_SIZE]> = None;

    for counter in 1..=rounds {
        let mut s = Vec::with_capacity(HMAC_SHA256_SIZE + input.len() + 1);
        if let Some(t) = &previous {
            s.extend_from_slice(t);
        }
        s.extend_from_slice(input);
        s.push(counter as u8);

        let t = hmac_sha256(key, &s);
        result.extend_from_slice(&t);
        previous = Some(t);
    }

    result.truncate(output_length);
    Ok(result)
}

/// Encode a string for KDF input as specified in 3GPP TS 33.501 Annex B.2.1.2
///
/// Character strings are normalized using NFKC and then encoded as UTF-8.
pub fn encode_kdf_string(s: &str) -> Vec<u8> {
    let normalized: String = s.nfkc().collect();
    normalized.into_bytes()
}
