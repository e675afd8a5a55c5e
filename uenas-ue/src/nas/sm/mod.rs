//! 5GSM (5G Session Management) Procedures
//!
//! UE-side 5GSM sub-layer as defined in 3GPP TS 24.501 Section 6:
//! - PDU session establishment procedure (T3580)
//! - PDU session release procedure (T3582), UE- and network-initiated
//! - Procedure transaction handling and 5GSM STATUS
//!
//! [`NasSm`] is driven from three synchronous entry points:
//! [`NasSm::receive_sm_message`], [`NasSm::handle_nas_event`] and
//! [`NasSm::on_timer_tick`]. Each call runs to completion; output goes to
//! mobility management through the [`MmLink`] given to [`NasSm::on_start`].
//!
//! # Identifiers
//!
//! PDU sessions are kept in a 16-slot table indexed by PSI and procedure
//! transactions in a 255-slot table indexed by PTI. Identifier 0 is reserved
//! in both.

mod allocation;
mod establishment;
mod procedure;
mod release;
mod resource;
mod session;
mod timer;
mod transport;

pub use procedure::*;
pub use release::ReleaseRejectDisposition;
pub use session::*;
pub use transport::*;

use thiserror::Error;
use tracing::{info, warn};

use uenas_common::{SessionConfig, SmConfig};
use uenas_nas::PduSessionEstablishmentRequest;

use crate::timer::ticks_for_secs;

/// Error type for SM procedures started by the UE
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmError {
    /// All PSIs 1..=15 are in use
    #[error("PDU session identity exhausted")]
    PsiExhausted,
    /// All PTIs 1..=254 are in use
    #[error("Procedure transaction identity exhausted")]
    PtiExhausted,
    /// An emergency PDU session already exists
    #[error("Emergency PDU session already exists")]
    EmergencySessionExists,
    /// The session is not in PDU-SESSION-ACTIVE state
    #[error("PDU session {0} is not active")]
    SessionNotActive(u8),
    /// PSI outside 1..=15
    #[error("Invalid PDU session identity: {0}")]
    InvalidPsi(u8),
}

/// Commands delivered to the SM engine by MM and the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmEvent {
    /// Start a PDU session establishment
    EstablishSession(SessionConfig),
    /// Start a UE-requested release of one session
    ReleaseSession { psi: u8 },
    /// Start a UE-requested release of every active session
    ReleaseAllSessions,
    /// Release one session without signalling
    LocalReleaseSession { psi: u8 },
    /// Release all sessions without signalling
    LocalReleaseAllSessions,
    /// Uplink data became pending or was sent for a session
    UplinkStatusChange { psi: u8, pending: bool },
    /// Cancel the procedure with this PTI
    AbortProcedure { pti: u8 },
    /// The establishment request could not be routed by the AMF
    EstablishmentRoutingFailure(PduSessionEstablishmentRequest),
}

/// Per-procedure timer intervals in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TimerIntervals {
    t3580: u64,
    t3581: u64,
    t3582: u64,
}

/// UE session management engine
pub struct NasSm {
    config: SmConfig,
    intervals: TimerIntervals,
    sessions: [PduSession; PSI_TABLE_SIZE],
    transactions: [ProcedureTransaction; PTI_TABLE_SIZE],
    mm: Option<MmLink>,
    /// Logical clock advanced by `on_timer_tick`
    now: u64,
}

impl NasSm {
    /// Create an engine with empty tables
    pub fn new(config: SmConfig) -> Self {
        let tick = config.tick_period_ms;
        let intervals = TimerIntervals {
            t3580: ticks_for_secs(config.t3580_secs, tick),
            t3581: ticks_for_secs(config.t3581_secs, tick),
            t3582: ticks_for_secs(config.t3582_secs, tick),
        };

        Self {
            config,
            intervals,
            sessions: std::array::from_fn(|i| PduSession::new(i as u8)),
            transactions: std::array::from_fn(|i| ProcedureTransaction::new(i as u8)),
            mm: None,
            now: 0,
        }
    }

    pub fn config(&self) -> &SmConfig {
        &self.config
    }

    /// Attaches the MM link; output before this call is dropped
    pub fn on_start(&mut self, mm: MmLink) {
        self.mm = Some(mm);
        info!("SM started");
    }

    /// Aborts pending procedures, stops every transaction timer and
    /// detaches from MM
    pub fn on_quit(&mut self) {
        let pending: Vec<u8> = self.pending_transactions().map(|pt| pt.pti()).collect();
        for pti in pending {
            self.abort_procedure_by_pti(pti);
        }
        for pt in self.transactions.iter_mut().filter(|pt| !pt.is_inactive()) {
            pt.reset();
        }
        self.mm = None;
        info!("SM stopped");
    }

    /// Requests the sessions listed in the configuration.
    ///
    /// Returns the `(pti, psi)` pairs of the establishments that started.
    pub fn establish_initial_sessions(&mut self) -> Vec<(u8, u8)> {
        let configs = self.config.sessions.clone();
        let mut started = Vec::with_capacity(configs.len());
        for config in &configs {
            match self.send_establishment_request(config) {
                Ok(ids) => started.push(ids),
                Err(e) => warn!("Initial PDU session establishment failed: {}", e),
            }
        }
        started
    }

    /// Handles a command event
    pub fn handle_nas_event(&mut self, event: SmEvent) -> Result<(), SmError> {
        match event {
            SmEvent::EstablishSession(config) => {
                self.send_establishment_request(&config)?;
            }
            SmEvent::ReleaseSession { psi } => {
                self.send_release_request(psi)?;
            }
            SmEvent::ReleaseAllSessions => {
                self.send_release_request_for_all();
            }
            SmEvent::LocalReleaseSession { psi } => self.local_release_session(psi),
            SmEvent::LocalReleaseAllSessions => self.local_release_all_sessions(),
            SmEvent::UplinkStatusChange { psi, pending } => {
                self.handle_uplink_status_change(psi, pending)
            }
            SmEvent::AbortProcedure { pti } => self.abort_procedure_by_pti(pti),
            SmEvent::EstablishmentRoutingFailure(request) => {
                self.receive_establishment_routing_failure(&request)
            }
        }
        Ok(())
    }

    /// Session slot for `psi`, `None` outside 1..=15
    pub fn session(&self, psi: u8) -> Option<&PduSession> {
        if (PSI_MIN..=PSI_MAX).contains(&psi) {
            Some(&self.sessions[psi as usize])
        } else {
            None
        }
    }

    /// Transaction slot for `pti`, `None` outside 1..=254
    pub fn transaction(&self, pti: u8) -> Option<&ProcedureTransaction> {
        if (PTI_MIN..=PTI_MAX).contains(&pti) {
            Some(&self.transactions[pti as usize])
        } else {
            None
        }
    }

    /// Sessions that are currently allocated
    pub fn sessions_in_use(&self) -> impl Iterator<Item = &PduSession> {
        self.sessions[1..].iter().filter(|ps| ps.is_in_use())
    }

    /// Transactions that are currently pending
    pub fn pending_transactions(&self) -> impl Iterator<Item = &ProcedureTransaction> {
        self.transactions[1..].iter().filter(|pt| pt.is_pending())
    }

    /// Current value of the logical clock
    pub fn now(&self) -> u64 {
        self.now
    }
}

impl std::fmt::Debug for NasSm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sessions: Vec<_> = self
            .sessions_in_use()
            .map(|ps| format!("PSI[{}] {}", ps.psi(), ps.state()))
            .collect();
        let pending: Vec<_> = self.pending_transactions().map(|pt| pt.to_string()).collect();
        f.debug_struct("NasSm")
            .field("now", &self.now)
            .field("sessions", &sessions)
            .field("transactions", &pending)
            .finish()
    }
}
