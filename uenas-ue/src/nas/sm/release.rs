//! PDU session release (3GPP TS 24.501 Sections 6.3.3 and 6.4.3)
//!
//! UE-requested release is guarded by T3582. A Release Command from the
//! network always wins: the session is released whether or not a UE-side
//! release is pending.

use tracing::{debug, error, info, warn};

use uenas_common::ReleaseRejectPolicy;
use uenas_nas::{
    PduSessionReleaseCommand, PduSessionReleaseComplete, PduSessionReleaseReject,
    PduSessionReleaseRequest, SmCause,
};

use super::procedure::{ProcedureKind, PTI_MAX, PTI_MIN};
use super::session::{PsState, PSI_MAX, PSI_MIN};
use super::{NasSm, SmError, SmOutcome};

/// What happens to a session after its release request was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseRejectDisposition {
    /// Session goes back to PDU-SESSION-ACTIVE
    KeepSession,
    /// Session is released locally
    LocalRelease,
    /// Release is requested again
    Retry,
}

impl ReleaseRejectDisposition {
    /// Disposition for `cause` under `policy`; unlisted causes keep the session
    pub fn for_cause(policy: &ReleaseRejectPolicy, cause: SmCause) -> Self {
        let number = cause.number();
        if policy.local_release_causes.contains(&number) {
            ReleaseRejectDisposition::LocalRelease
        } else if policy.retry_causes.contains(&number) {
            ReleaseRejectDisposition::Retry
        } else {
            ReleaseRejectDisposition::KeepSession
        }
    }
}

impl NasSm {
    /// Starts a UE-requested release of an active session.
    ///
    /// Returns the PTI of the new procedure.
    pub fn send_release_request(&mut self, psi: u8) -> Result<u8, SmError> {
        info!("Sending PDU Session Release Request for PSI[{}]", psi);

        if !(PSI_MIN..=PSI_MAX).contains(&psi) {
            return Err(SmError::InvalidPsi(psi));
        }
        if self.sessions[psi as usize].state != PsState::Active {
            warn!("PDU session release ignored, PSI[{}] is not active", psi);
            return Err(SmError::SessionNotActive(psi));
        }

        let pti = self.allocate_procedure_transaction_id()?;
        self.sessions[psi as usize].state = PsState::InactivePending;

        let req = PduSessionReleaseRequest::new(psi, pti).with_cause(SmCause::RegularDeactivation);
        self.start_procedure(pti, ProcedureKind::Release, psi, req.into());
        Ok(pti)
    }

    /// Starts a release for every active session.
    ///
    /// Returns the `(psi, pti)` pairs of the releases that started.
    pub fn send_release_request_for_all(&mut self) -> Vec<(u8, u8)> {
        let active: Vec<u8> = (PSI_MIN..=PSI_MAX)
            .filter(|psi| self.sessions[*psi as usize].is_active())
            .collect();

        let mut started = Vec::with_capacity(active.len());
        for psi in active {
            match self.send_release_request(psi) {
                Ok(pti) => started.push((psi, pti)),
                Err(e) => warn!("PDU session release failed for PSI[{}]: {}", psi, e),
            }
        }
        started
    }

    pub(super) fn receive_release_reject(&mut self, msg: &PduSessionReleaseReject) {
        let (pti, psi) = (msg.pti, msg.pdu_session_id);
        error!("PDU Session Release Reject received [{}]", msg.sm_cause);

        if !self.check_pti_and_psi(pti, psi, ProcedureKind::Release) {
            return;
        }

        self.free_procedure_transaction_id(pti);
        self.report(SmOutcome::Rejected {
            kind: ProcedureKind::Release,
            pti,
            psi,
            cause: msg.sm_cause,
        });

        let disposition =
            ReleaseRejectDisposition::for_cause(&self.config.release_reject_policy, msg.sm_cause);
        debug!("Release reject disposition for PSI[{}]: {:?}", psi, disposition);

        match disposition {
            ReleaseRejectDisposition::KeepSession => {
                let ps = &mut self.sessions[psi as usize];
                ps.state = PsState::Active;
                ps.release_retries = 0;
            }
            ReleaseRejectDisposition::LocalRelease => self.local_release_session(psi),
            ReleaseRejectDisposition::Retry => {
                let ps = &mut self.sessions[psi as usize];
                ps.state = PsState::Active;
                ps.release_retries += 1;

                if ps.release_retries > self.config.max_release_retries {
                    warn!("Release retries exhausted for PSI[{}]", psi);
                    self.local_release_session(psi);
                } else if let Err(e) = self.send_release_request(psi) {
                    warn!("Release retry failed for PSI[{}]: {}", psi, e);
                    self.local_release_session(psi);
                }
            }
        }
    }

    pub(super) fn receive_release_command(&mut self, msg: &PduSessionReleaseCommand) {
        let (pti, psi) = (msg.pti, msg.pdu_session_id);
        info!("PDU Session Release Command received PSI[{}] [{}]", psi, msg.sm_cause);

        let in_use = (PSI_MIN..=PSI_MAX).contains(&psi) && self.sessions[psi as usize].is_in_use();
        if !in_use {
            warn!("PDU Session Release Command for unknown PSI[{}]", psi);
            let complete =
                PduSessionReleaseComplete::new(psi, pti).with_cause(SmCause::InvalidPduSessionIdentity);
            self.send_sm_message(psi, complete.into());
            return;
        }

        // Our own release request answered by the network
        if (PTI_MIN..=PTI_MAX).contains(&pti) {
            let pt = &self.transactions[pti as usize];
            if pt.is_pending() && pt.kind() == Some(ProcedureKind::Release) && pt.psi() == psi {
                self.free_procedure_transaction_id(pti);
                self.report(SmOutcome::Accepted {
                    kind: ProcedureKind::Release,
                    pti,
                    psi,
                });
            }
        }

        self.abort_transactions_on_psi(psi);
        self.free_pdu_session_id(psi);
        info!("PDU session released by network PSI[{}]", psi);
        self.report(SmOutcome::ReleasedByNetwork {
            psi,
            cause: msg.sm_cause,
        });

        if self.config.send_release_complete {
            self.send_sm_message(psi, PduSessionReleaseComplete::new(psi, pti).into());
        }
    }
}
