//! 5G Key Hierarchy
//!
//! UE-side key derivation of 3GPP TS 33.501 Annex A and the EAP-AKA′ key
//! material of RFC 5448:
//!
//! ```text
//! CK, IK ──(0x6A)──> KAUSF ──(0x6C)──> KSEAF ──(0x6D)──> KAMF ──(0x69)──> KNASenc / KNASint
//!   │
//!   └──(0x20)──> CK′, IK′ ──PRF′──> MK (208 octets) ──> EMSK ──> KAUSF
//! ```
//!
//! Every function is pure apart from [`derive_keys_seaf_amf`] and
//! [`derive_nas_keys`], which write their results into a [`SecurityContext`].

use thiserror::Error;
use tracing::debug;

use uenas_common::{Plmn, Supi};
use uenas_crypto::kdf::{
    calculate_kdf_key, calculate_prf_prime, encode_kdf_string, hmac_sha256,
    AlgorithmTypeDistinguisher, FcValue, KdfError, KEY_128_SIZE, KEY_256_SIZE,
};
use uenas_nas::eap::{encode_eap_to_vec, Eap, EapAkaPrime, EAP_AKA_MAC_SIZE};

use super::security::SecurityContext;

/// Length of a serving network name built from a 3-digit MCC and MNC
pub const SERVING_NETWORK_NAME_LENGTH: usize = 32;

/// Length of the EAP-AKA′ master key (K_encr ‖ K_aut ‖ K_re ‖ MSK ‖ EMSK)
pub const MK_LENGTH: usize = 208;

/// Offset of EMSK inside MK
const EMSK_OFFSET: usize = 144;

/// Length of RES* / XRES*
pub const RES_STAR_LENGTH: usize = 16;

/// Error type for key derivation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyDerivationError {
    /// Serving network name is not 32 octets long
    #[error("Serving network name construction failure: {length} bytes, expected 32")]
    ServingNetworkName {
        /// Length of the formatted name
        length: usize,
    },
    /// MK is not 208 octets long
    #[error("Invalid MK length: expected {expected}, got {actual}")]
    InvalidMkLength {
        /// Required length
        expected: usize,
        /// Provided length
        actual: usize,
    },
    /// A key required by the derivation is not in the security context
    #[error("Missing key: {0}")]
    MissingKey(&'static str),
    /// Primitive failure
    #[error("KDF error: {0}")]
    Kdf(#[from] KdfError),
}

/// EAP-AKA′ keys split out of MK (RFC 5448 Section 3.3)
#[derive(Clone, PartialEq, Eq)]
pub struct EapAkaPrimeKeys {
    pub k_encr: [u8; 16],
    pub k_aut: [u8; 32],
    pub k_re: [u8; 32],
    pub msk: [u8; 64],
    pub emsk: [u8; 64],
}

impl std::fmt::Debug for EapAkaPrimeKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EapAkaPrimeKeys { .. }")
    }
}

/// Builds the serving network name `5G:mncXXX.mccYYY.3gppnetwork.org`
/// (TS 24.501 Section 9.12.1).
pub fn construct_serving_network_name(plmn: &Plmn) -> Result<String, KeyDerivationError> {
    let snn = format!("5G:mnc{:03}.mcc{:03}.3gppnetwork.org", plmn.mnc, plmn.mcc);
    if snn.len() != SERVING_NETWORK_NAME_LENGTH {
        return Err(KeyDerivationError::ServingNetworkName { length: snn.len() });
    }
    Ok(snn)
}

fn concat(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    out
}

/// KAUSF for 5G-AKA (TS 33.501 A.2)
pub fn calculate_kausf_for_5g_aka(ck: &[u8], ik: &[u8], snn: &str, sqn_xor_ak: &[u8]) -> [u8; 32] {
    let key = concat(ck, ik);
    let snn = encode_kdf_string(snn);
    calculate_kdf_key(&key, FcValue::Kausf.into(), &[&snn, sqn_xor_ak])
}

/// CK′ and IK′ (TS 33.402 A.2); CK′ has the length of CK and IK′ takes the rest
pub fn calculate_ck_prime_ik_prime(
    ck: &[u8],
    ik: &[u8],
    snn: &str,
    sqn_xor_ak: &[u8],
) -> (Vec<u8>, Vec<u8>) {
    let key = concat(ck, ik);
    let snn = encode_kdf_string(snn);
    let output = calculate_kdf_key(&key, FcValue::CkPrimeIkPrime.into(), &[&snn, sqn_xor_ak]);
    let split = ck.len().min(output.len());
    (output[..split].to_vec(), output[split..].to_vec())
}

/// EAP-AKA′ master key: PRF′(IK′ ‖ CK′, "EAP-AKA'" ‖ identity), 208 octets
pub fn calculate_mk(ck_prime: &[u8], ik_prime: &[u8], supi: &Supi) -> Result<Vec<u8>, KeyDerivationError> {
    let key = concat(ik_prime, ck_prime);
    let input = format!("EAP-AKA'{}-{}", supi.supi_type.prefix(), supi.value);
    Ok(calculate_prf_prime(&key, input.as_bytes(), MK_LENGTH)?)
}

fn check_mk(mk: &[u8]) -> Result<(), KeyDerivationError> {
    if mk.len() != MK_LENGTH {
        return Err(KeyDerivationError::InvalidMkLength {
            expected: MK_LENGTH,
            actual: mk.len(),
        });
    }
    Ok(())
}

/// Splits MK into the EAP-AKA′ keys
pub fn split_mk(mk: &[u8]) -> Result<EapAkaPrimeKeys, KeyDerivationError> {
    check_mk(mk)?;
    let mut keys = EapAkaPrimeKeys {
        k_encr: [0; 16],
        k_aut: [0; 32],
        k_re: [0; 32],
        msk: [0; 64],
        emsk: [0; 64],
    };
    keys.k_encr.copy_from_slice(&mk[0..16]);
    keys.k_aut.copy_from_slice(&mk[16..48]);
    keys.k_re.copy_from_slice(&mk[48..80]);
    keys.msk.copy_from_slice(&mk[80..EMSK_OFFSET]);
    keys.emsk.copy_from_slice(&mk[EMSK_OFFSET..MK_LENGTH]);
    Ok(keys)
}

/// KAUSF for EAP-AKA′: the first 256 bits of EMSK (TS 33.501 6.1.3.1)
pub fn calculate_kausf_for_eap_aka_prime(mk: &[u8]) -> Result<[u8; 32], KeyDerivationError> {
    check_mk(mk)?;
    let mut kausf = [0u8; KEY_256_SIZE];
    kausf.copy_from_slice(&mk[EMSK_OFFSET..EMSK_OFFSET + KEY_256_SIZE]);
    Ok(kausf)
}

/// AT_MAC value for an EAP-AKA′ message (RFC 4187 Section 10.15)
///
/// The MAC is computed over the whole EAP packet with AT_MAC zeroed. The
/// zeroing happens on a copy; `message` is left untouched.
pub fn calculate_mac_for_eap_aka_prime(kaut: &[u8], message: &EapAkaPrime) -> [u8; 16] {
    let mut copy = message.clone();
    copy.attributes.put_mac(&[0u8; EAP_AKA_MAC_SIZE]);

    let input = encode_eap_to_vec(&Eap::AkaPrime(copy));
    let digest = hmac_sha256(kaut, &input);

    let mut mac = [0u8; EAP_AKA_MAC_SIZE];
    mac.copy_from_slice(&digest[..EAP_AKA_MAC_SIZE]);
    mac
}

/// RES* (TS 33.501 A.4): the 128 least significant bits of the KDF output
pub fn calculate_res_star(key: &[u8], snn: &str, rand: &[u8], res: &[u8]) -> [u8; 16] {
    let snn = encode_kdf_string(snn);
    let output = calculate_kdf_key(key, FcValue::ResStar.into(), &[&snn, rand, res]);
    last_128_bits(&output)
}

fn last_128_bits(output: &[u8; 32]) -> [u8; 16] {
    let mut key = [0u8; KEY_128_SIZE];
    key.copy_from_slice(&output[KEY_256_SIZE - KEY_128_SIZE..]);
    key
}

/// Derives KSEAF (TS 33.501 A.6) and KAMF (A.7) from the context's KAUSF
pub fn derive_keys_seaf_amf(
    supi: &Supi,
    plmn: &Plmn,
    ctx: &mut SecurityContext,
) -> Result<(), KeyDerivationError> {
    let k_ausf = *ctx.k_ausf().ok_or(KeyDerivationError::MissingKey("KAUSF"))?;
    let snn = encode_kdf_string(&construct_serving_network_name(plmn)?);
    let supi_value = encode_kdf_string(&supi.value);
    let abba = ctx.abba().to_vec();

    let k_seaf = calculate_kdf_key(&k_ausf, FcValue::Kseaf.into(), &[&snn]);
    let k_amf = calculate_kdf_key(&k_seaf, FcValue::Kamf.into(), &[&supi_value, &abba]);

    ctx.set_k_seaf(k_seaf);
    ctx.set_k_amf(k_amf);
    debug!("Derived KSEAF and KAMF for {} on {}", supi, plmn);
    Ok(())
}

/// Derives KNASenc and KNASint (TS 33.501 A.8) for the context's algorithms
pub fn derive_nas_keys(ctx: &mut SecurityContext) -> Result<(), KeyDerivationError> {
    let k_amf = *ctx.k_amf().ok_or(KeyDerivationError::MissingKey("KAMF"))?;

    let enc = calculate_kdf_key(
        &k_amf,
        FcValue::KnasIntEnc.into(),
        &[&[AlgorithmTypeDistinguisher::NasEnc as u8], &[ctx.ciphering()]],
    );
    let int = calculate_kdf_key(
        &k_amf,
        FcValue::KnasIntEnc.into(),
        &[&[AlgorithmTypeDistinguisher::NasInt as u8], &[ctx.integrity()]],
    );

    ctx.set_nas_keys(last_128_bits(&enc), last_128_bits(&int));
    debug!(
        "Derived NAS keys for NEA{} / NIA{}",
        ctx.ciphering(),
        ctx.integrity()
    );
    Ok(())
}
