//! NAS Security Context
//!
//! Key set and negotiated algorithms owned by mobility management. Keys below
//! KAUSF are only written by the derivation functions in [`super::keys`];
//! installing a key invalidates everything derived from it.

use thiserror::Error;
use zeroize::Zeroize;

/// Highest 4-bit NAS algorithm identifier (TS 33.501 Section 5.11.1)
pub const MAX_ALGORITHM_ID: u8 = 15;

/// Error type for security context updates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecurityContextError {
    /// Algorithm identifier does not fit in four bits
    #[error("Invalid algorithm identifier: {0} (must be 0..=15)")]
    InvalidAlgorithmId(u8),
}

/// Key set of a NAS security context
#[derive(Clone, Default, PartialEq, Eq)]
pub struct NasKeys {
    k_ausf: Option<[u8; 32]>,
    k_seaf: Option<[u8; 32]>,
    k_amf: Option<[u8; 32]>,
    k_nas_enc: Option<[u8; 16]>,
    k_nas_int: Option<[u8; 16]>,
}

fn wipe<const N: usize>(key: &mut Option<[u8; N]>) {
    if let Some(k) = key.as_mut() {
        k.zeroize();
    }
    *key = None;
}

impl NasKeys {
    fn clear_nas_keys(&mut self) {
        wipe(&mut self.k_nas_enc);
        wipe(&mut self.k_nas_int);
    }

    fn clear(&mut self) {
        wipe(&mut self.k_ausf);
        wipe(&mut self.k_seaf);
        wipe(&mut self.k_amf);
        self.clear_nas_keys();
    }
}

// Key material never goes to logs
impl std::fmt::Debug for NasKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NasKeys")
            .field("k_ausf", &self.k_ausf.is_some())
            .field("k_seaf", &self.k_seaf.is_some())
            .field("k_amf", &self.k_amf.is_some())
            .field("k_nas_enc", &self.k_nas_enc.is_some())
            .field("k_nas_int", &self.k_nas_int.is_some())
            .finish()
    }
}

/// NAS security context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityContext {
    keys: NasKeys,
    ciphering: u8,
    integrity: u8,
    abba: Vec<u8>,
}

impl SecurityContext {
    /// Create an empty context (null algorithms, no keys)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn k_ausf(&self) -> Option<&[u8; 32]> {
        self.keys.k_ausf.as_ref()
    }

    pub fn k_seaf(&self) -> Option<&[u8; 32]> {
        self.keys.k_seaf.as_ref()
    }

    pub fn k_amf(&self) -> Option<&[u8; 32]> {
        self.keys.k_amf.as_ref()
    }

    pub fn k_nas_enc(&self) -> Option<&[u8; 16]> {
        self.keys.k_nas_enc.as_ref()
    }

    pub fn k_nas_int(&self) -> Option<&[u8; 16]> {
        self.keys.k_nas_int.as_ref()
    }

    /// Ciphering algorithm identifier (NEA0..)
    pub fn ciphering(&self) -> u8 {
        self.ciphering
    }

    /// Integrity algorithm identifier (NIA0..)
    pub fn integrity(&self) -> u8 {
        self.integrity
    }

    pub fn abba(&self) -> &[u8] {
        &self.abba
    }

    /// Installs the KAUSF produced by a successful authentication.
    ///
    /// Every key derived from the previous KAUSF is dropped.
    pub fn set_k_ausf(&mut self, k_ausf: [u8; 32]) {
        self.keys.clear();
        self.keys.k_ausf = Some(k_ausf);
    }

    /// Sets the negotiated algorithms; existing NAS keys are dropped because
    /// they were derived for the previous identifiers.
    pub fn set_algorithms(&mut self, ciphering: u8, integrity: u8) -> Result<(), SecurityContextError> {
        for id in [ciphering, integrity] {
            if id > MAX_ALGORITHM_ID {
                return Err(SecurityContextError::InvalidAlgorithmId(id));
            }
        }
        self.ciphering = ciphering;
        self.integrity = integrity;
        self.keys.clear_nas_keys();
        Ok(())
    }

    /// Sets the ABBA parameter received from the network
    pub fn set_abba(&mut self, abba: &[u8]) {
        self.abba = abba.to_vec();
    }

    pub(crate) fn set_k_seaf(&mut self, k_seaf: [u8; 32]) {
        wipe(&mut self.keys.k_amf);
        self.keys.clear_nas_keys();
        self.keys.k_seaf = Some(k_seaf);
    }

    pub(crate) fn set_k_amf(&mut self, k_amf: [u8; 32]) {
        self.keys.clear_nas_keys();
        self.keys.k_amf = Some(k_amf);
    }

    pub(crate) fn set_nas_keys(&mut self, k_nas_enc: [u8; 16], k_nas_int: [u8; 16]) {
        self.keys.k_nas_enc = Some(k_nas_enc);
        self.keys.k_nas_int = Some(k_nas_int);
    }

    /// Zero-fills and drops every key
    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

impl Drop for SecurityContext {
    fn drop(&mut self) {
        self.keys.clear();
    }
}
