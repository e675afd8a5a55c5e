//! Cryptographic primitives for uenas
//!
//! HMAC-SHA-256 based key derivation used by the 5G key hierarchy:
//! - the 3GPP generic KDF
//! - PRF′ for EAP-AKA′
//! - KDF string encoding

pub mod kdf;

pub use kdf::{
    calculate_kdf_key, calculate_prf_prime, encode_kdf_string, hmac_sha256,
    AlgorithmTypeDistinguisher, FcValue, KdfError,
};
