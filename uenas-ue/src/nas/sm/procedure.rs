//! Procedure Transaction Handling
//!
//! Procedure Transaction Identity (PTI) tracks a UE-initiated SM procedure
//! until the network answers it.
//!
//! # PTI Range
//!
//! - PTI 0: no procedure transaction (network-initiated procedures)
//! - PTI 1-254: UE-initiated procedures
//!
//! Each pending transaction keeps the request it sent so the retransmission
//! timer can resend it unchanged.

use std::fmt;

use uenas_nas::SmMessage;

use crate::timer::{NasTimer, TIMER_T3580, TIMER_T3581, TIMER_T3582};

/// Minimum valid PTI value (1)
pub const PTI_MIN: u8 = 1;
/// Maximum valid PTI value (254)
pub const PTI_MAX: u8 = 254;
/// Reserved PTI meaning "no procedure transaction"
pub const PTI_UNASSIGNED: u8 = 0;
/// Number of slots in the transaction table
pub const PTI_TABLE_SIZE: usize = 255;

/// Procedure Transaction state.
///
/// 3GPP TS 24.501 Section 6.1.3.2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PtState {
    /// No procedure in progress for this PTI
    #[default]
    Inactive,
    /// Procedure initiated, waiting for network response
    Pending,
}

impl fmt::Display for PtState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PtState::Inactive => write!(f, "PROCEDURE-TRANSACTION-INACTIVE"),
            PtState::Pending => write!(f, "PROCEDURE-TRANSACTION-PENDING"),
        }
    }
}

/// UE-initiated procedure a transaction belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcedureKind {
    /// PDU session establishment, guarded by T3580
    Establishment,
    /// PDU session release, guarded by T3582
    Release,
    /// PDU session modification, guarded by T3581
    Modification,
}

impl ProcedureKind {
    /// Retransmission timer guarding this procedure
    pub fn timer_code(&self) -> u16 {
        match self {
            ProcedureKind::Establishment => TIMER_T3580,
            ProcedureKind::Release => TIMER_T3582,
            ProcedureKind::Modification => TIMER_T3581,
        }
    }
}

impl fmt::Display for ProcedureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcedureKind::Establishment => write!(f, "PDU session establishment"),
            ProcedureKind::Release => write!(f, "PDU session release"),
            ProcedureKind::Modification => write!(f, "PDU session modification"),
        }
    }
}

/// Payload of an expired transaction timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionTimerExpiry {
    pub kind: ProcedureKind,
    pub pti: u8,
}

/// Procedure Transaction context.
#[derive(Debug, Clone, Default)]
pub struct ProcedureTransaction {
    /// Procedure Transaction Identity (1-254)
    pti: u8,
    state: PtState,
    kind: Option<ProcedureKind>,
    /// Associated PDU Session Identity (1-15)
    psi: u8,
    timer: Option<NasTimer>,
    /// Last request sent, kept for retransmission
    message: Option<SmMessage>,
}

impl ProcedureTransaction {
    /// Create a new inactive procedure transaction.
    pub fn new(pti: u8) -> Self {
        Self {
            pti,
            ..Default::default()
        }
    }

    pub fn pti(&self) -> u8 {
        self.pti
    }

    pub fn state(&self) -> PtState {
        self.state
    }

    pub fn is_inactive(&self) -> bool {
        self.state == PtState::Inactive
    }

    pub fn is_pending(&self) -> bool {
        self.state == PtState::Pending
    }

    pub fn psi(&self) -> u8 {
        self.psi
    }

    pub fn kind(&self) -> Option<ProcedureKind> {
        self.kind
    }

    pub fn timer(&self) -> Option<&NasTimer> {
        self.timer.as_ref()
    }

    pub(super) fn timer_mut(&mut self) -> Option<&mut NasTimer> {
        self.timer.as_mut()
    }

    /// Request kept for retransmission
    pub fn message(&self) -> Option<&SmMessage> {
        self.message.as_ref()
    }

    /// Number of timer expiries since the procedure started
    pub fn expiry_count(&self) -> u32 {
        self.timer.as_ref().map_or(0, NasTimer::expiry_count)
    }

    /// Marks the slot as taken before the procedure is started
    pub(super) fn reserve(&mut self) {
        self.state = PtState::Pending;
    }

    /// Starts the procedure and arms its timer at tick `now`.
    pub(super) fn start(
        &mut self,
        kind: ProcedureKind,
        psi: u8,
        message: SmMessage,
        mut timer: NasTimer,
        now: u64,
    ) {
        timer.start(now, true);
        self.state = PtState::Pending;
        self.kind = Some(kind);
        self.psi = psi;
        self.timer = Some(timer);
        self.message = Some(message);
    }

    /// Stops the timer and returns the slot to the free pool.
    pub(super) fn reset(&mut self) {
        if let Some(timer) = self.timer.as_mut() {
            timer.stop(true);
        }
        *self = Self::new(self.pti);
    }
}

impl fmt::Display for ProcedureTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Some(kind) => {
                write!(f, "PTI[{}]->PSI[{}] {} ({})", self.pti, self.psi, kind, self.state)
            }
            None => write!(f, "PTI[{}] {}", self.pti, self.state),
        }
    }
}
