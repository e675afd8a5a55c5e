//! SM to MM transport
//!
//! Uplink SM messages and procedure outcomes leave the engine over an
//! unbounded channel owned by the mobility management task.

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use uenas_common::{log_sm_message, Direction};
use uenas_nas::{FiveGSmStatus, SmCause, SmMessage};

use super::procedure::ProcedureKind;
use super::NasSm;

/// Result of an SM procedure, reported to the requester
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmOutcome {
    /// The network accepted the procedure
    Accepted { kind: ProcedureKind, pti: u8, psi: u8 },
    /// The network rejected the procedure
    Rejected {
        kind: ProcedureKind,
        pti: u8,
        psi: u8,
        cause: SmCause,
    },
    /// Retransmissions were exhausted without an answer
    TimedOut { kind: ProcedureKind, pti: u8, psi: u8 },
    /// The procedure was cancelled locally
    Aborted { kind: ProcedureKind, pti: u8, psi: u8 },
    /// The session was released without network signalling
    LocallyReleased { psi: u8 },
    /// The network released the session
    ReleasedByNetwork { psi: u8, cause: SmCause },
}

impl SmOutcome {
    /// PSI the outcome refers to
    pub fn psi(&self) -> u8 {
        match self {
            SmOutcome::Accepted { psi, .. }
            | SmOutcome::Rejected { psi, .. }
            | SmOutcome::TimedOut { psi, .. }
            | SmOutcome::Aborted { psi, .. }
            | SmOutcome::LocallyReleased { psi }
            | SmOutcome::ReleasedByNetwork { psi, .. } => *psi,
        }
    }
}

impl fmt::Display for SmOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmOutcome::Accepted { kind, pti, psi } => {
                write!(f, "{kind} accepted pti[{pti}] psi[{psi}]")
            }
            SmOutcome::Rejected { kind, pti, psi, cause } => {
                write!(f, "{kind} rejected pti[{pti}] psi[{psi}] cause[{cause}]")
            }
            SmOutcome::TimedOut { kind, pti, psi } => {
                write!(f, "{kind} timed out pti[{pti}] psi[{psi}]")
            }
            SmOutcome::Aborted { kind, pti, psi } => {
                write!(f, "{kind} aborted pti[{pti}] psi[{psi}]")
            }
            SmOutcome::LocallyReleased { psi } => write!(f, "psi[{psi}] locally released"),
            SmOutcome::ReleasedByNetwork { psi, cause } => {
                write!(f, "psi[{psi}] released by network cause[{cause}]")
            }
        }
    }
}

/// Output of the SM engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmToMm {
    /// SM message to carry in an UL NAS Transport
    UplinkSmMessage { psi: u8, message: SmMessage },
    /// Procedure result
    Outcome(SmOutcome),
}

/// Handle to the mobility management task
#[derive(Debug, Clone)]
pub struct MmLink {
    tx: mpsc::UnboundedSender<SmToMm>,
}

impl MmLink {
    pub fn new(tx: mpsc::UnboundedSender<SmToMm>) -> Self {
        Self { tx }
    }

    /// Creates a link together with the receiving end
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SmToMm>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Sends without blocking; returns false when the receiver is gone
    pub fn send(&self, msg: SmToMm) -> bool {
        self.tx.send(msg).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl NasSm {
    fn send_to_mm(&self, msg: SmToMm) {
        match &self.mm {
            Some(mm) => {
                if !mm.send(msg) {
                    warn!("MM task is gone, SM output dropped");
                }
            }
            None => warn!("SM not started, dropping {:?}", msg),
        }
    }

    /// Hands an SM message to MM for uplink transmission
    pub(super) fn send_sm_message(&self, psi: u8, message: SmMessage) {
        log_sm_message(Direction::Tx, message.message_type().name(), psi, message.pti());
        self.send_to_mm(SmToMm::UplinkSmMessage { psi, message });
    }

    pub(super) fn report(&self, outcome: SmOutcome) {
        debug!("SM outcome: {}", outcome);
        self.send_to_mm(SmToMm::Outcome(outcome));
    }

    /// Sends a 5GSM STATUS carrying `cause`
    pub fn send_sm_cause(&self, cause: SmCause, pti: u8, psi: u8) {
        warn!("Sending SM cause {} pti[{}] psi[{}]", cause, pti, psi);
        self.send_sm_message(psi, FiveGSmStatus::new(psi, pti, cause).into());
    }

    /// Entry point for SM messages delivered by MM
    pub fn receive_sm_message(&mut self, msg: SmMessage) {
        log_sm_message(Direction::Rx, msg.message_type().name(), msg.psi(), msg.pti());

        match &msg {
            SmMessage::EstablishmentAccept(m) => self.receive_establishment_accept(m),
            SmMessage::EstablishmentReject(m) => self.receive_establishment_reject(m),
            SmMessage::ReleaseReject(m) => self.receive_release_reject(m),
            SmMessage::ReleaseCommand(m) => self.receive_release_command(m),
            SmMessage::Status(m) => self.receive_sm_status(m),
            SmMessage::EstablishmentRequest(_)
            | SmMessage::ReleaseRequest(_)
            | SmMessage::ReleaseComplete(_) => {
                self.send_sm_cause(SmCause::MessageTypeNonExistent, msg.pti(), msg.psi());
            }
        }
    }

    /// Handles a 5GSM STATUS from the network (TS 24.501 Section 6.5.3)
    pub fn receive_sm_status(&mut self, status: &FiveGSmStatus) {
        let (pti, psi) = (status.pti, status.pdu_session_id);
        warn!("SM status received: {} pti[{}] psi[{}]", status.sm_cause, pti, psi);

        match status.sm_cause {
            SmCause::InvalidPduSessionIdentity => {
                if self.session(psi).is_some_and(|ps| ps.is_in_use()) {
                    self.local_release_session(psi);
                }
            }
            SmCause::PtiMismatch | SmCause::InvalidPtiValue | SmCause::MessageTypeNonExistent => {
                if self.transaction(pti).is_some_and(|pt| pt.is_pending()) {
                    self.abort_procedure_by_pti(pti);
                }
            }
            _ => {}
        }
    }
}
