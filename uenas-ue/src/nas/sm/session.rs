//! PDU Session Table
//!
//! PDU sessions live in a fixed table indexed by PSI. PSI 0 is reserved, so
//! slots 1..=15 are usable.

use std::fmt;

use uenas_common::{PduSessionType, SNssai, SessionConfig};
use uenas_nas::PduAddress;

/// Minimum valid PSI value
pub const PSI_MIN: u8 = 1;
/// Maximum valid PSI value
pub const PSI_MAX: u8 = 15;
/// Number of slots in the session table (PSI 0 is reserved)
pub const PSI_TABLE_SIZE: usize = 16;

/// PDU session state (3GPP TS 24.501 Section 6.1.3.2.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PsState {
    #[default]
    Inactive,
    ActivePending,
    Active,
    InactivePending,
}

impl fmt::Display for PsState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PsState::Inactive => write!(f, "PDU-SESSION-INACTIVE"),
            PsState::ActivePending => write!(f, "PDU-SESSION-ACTIVE-PENDING"),
            PsState::Active => write!(f, "PDU-SESSION-ACTIVE"),
            PsState::InactivePending => write!(f, "PDU-SESSION-INACTIVE-PENDING"),
        }
    }
}

/// PDU session context
#[derive(Debug, Clone, Default)]
pub struct PduSession {
    psi: u8,
    pub(super) state: PsState,
    pub(super) config: SessionConfig,
    pub(super) uplink_pending: bool,
    pub(super) session_type: Option<PduSessionType>,
    pub(super) pdu_address: Option<PduAddress>,
    pub(super) s_nssai: Option<SNssai>,
    pub(super) dnn: Option<String>,
    pub(super) release_retries: u32,
}

impl PduSession {
    /// Create an unused session slot
    pub fn new(psi: u8) -> Self {
        Self {
            psi,
            ..Default::default()
        }
    }

    pub fn psi(&self) -> u8 {
        self.psi
    }

    pub fn state(&self) -> PsState {
        self.state
    }

    /// True once the slot has been allocated
    pub fn is_in_use(&self) -> bool {
        self.state != PsState::Inactive
    }

    pub fn is_active(&self) -> bool {
        self.state == PsState::Active
    }

    /// Configuration the session was requested with
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_emergency(&self) -> bool {
        self.config.emergency
    }

    pub fn uplink_pending(&self) -> bool {
        self.uplink_pending
    }

    /// PDU session type selected by the network
    pub fn session_type(&self) -> Option<PduSessionType> {
        self.session_type
    }

    pub fn pdu_address(&self) -> Option<PduAddress> {
        self.pdu_address
    }

    pub fn s_nssai(&self) -> Option<SNssai> {
        self.s_nssai
    }

    pub fn dnn(&self) -> Option<&str> {
        self.dnn.as_deref()
    }

    /// Number of release requests repeated after a release reject
    pub fn release_retries(&self) -> u32 {
        self.release_retries
    }

    /// Returns the slot to the free pool
    pub(super) fn reset(&mut self) {
        *self = Self::new(self.psi);
    }
}

/// One bit per PSI, as carried in the PDU session status and uplink data
/// status IEs (3GPP TS 24.501 Section 9.11.3.44)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PsiBitmap(u16);

impl PsiBitmap {
    pub const fn new() -> Self {
        Self(0)
    }

    /// Sets the bit for `psi`; PSI 0 and out-of-range values are ignored
    pub fn set(&mut self, psi: u8) {
        if (PSI_MIN..=PSI_MAX).contains(&psi) {
            self.0 |= 1 << psi;
        }
    }

    pub fn clear(&mut self, psi: u8) {
        if psi <= PSI_MAX {
            self.0 &= !(1 << psi);
        }
    }

    pub fn is_set(&self, psi: u8) -> bool {
        psi <= PSI_MAX && self.0 & (1 << psi) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    /// Set PSIs in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (PSI_MIN..=PSI_MAX).filter(move |psi| self.is_set(*psi))
    }

    pub fn bits(&self) -> u16 {
        self.0
    }

    /// IE value part: octet 1 carries PSI 7..0, octet 2 carries PSI 15..8
    pub fn to_octets(&self) -> [u8; 2] {
        [(self.0 & 0xFF) as u8, (self.0 >> 8) as u8]
    }

    pub fn from_octets(octets: [u8; 2]) -> Self {
        // PSI 0 is spare
        Self((u16::from(octets[1]) << 8 | u16::from(octets[0])) & !1)
    }
}

impl fmt::Display for PsiBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let psis: Vec<String> = self.iter().map(|psi| psi.to_string()).collect();
        write!(f, "[{}]", psis.join(","))
    }
}
