//! Session resources, aborts and PTI/PSI checks

use std::collections::BTreeSet;

use tracing::{debug, error, info, warn};

use uenas_nas::SmCause;

use super::procedure::{ProcedureKind, PTI_MAX, PTI_MIN};
use super::session::{PsState, PsiBitmap, PSI_MAX, PSI_MIN};
use super::{NasSm, SmOutcome};

impl NasSm {
    /// Validates the PTI and PSI of a network response to an `expected`
    /// procedure.
    ///
    /// On failure a 5GSM STATUS is sent (TS 24.501 Section 7.3) and `false`
    /// is returned. Tables are left untouched either way.
    pub fn check_pti_and_psi(&mut self, pti: u8, psi: u8, expected: ProcedureKind) -> bool {
        if !(PTI_MIN..=PTI_MAX).contains(&pti) {
            error!("Received PTI [{}] value is invalid", pti);
            self.send_sm_cause(SmCause::InvalidPtiValue, pti, psi);
            return false;
        }

        let pt = &self.transactions[pti as usize];
        if !pt.is_pending() {
            error!("Received PTI [{}] is unassigned", pti);
            self.send_sm_cause(SmCause::PtiMismatch, pti, psi);
            return false;
        }

        if pt.psi() != psi {
            error!("Received PSI [{}] does not match PTI [{}] (expected {})", psi, pti, pt.psi());
            self.send_sm_cause(SmCause::InvalidPduSessionIdentity, pti, psi);
            return false;
        }

        if pt.kind() != Some(expected) {
            error!("Received {} response on PTI [{}] which runs {:?}", expected, pti, pt.kind());
            self.send_sm_cause(SmCause::MessageTypeNotCompatible, pti, psi);
            return false;
        }

        true
    }

    /// Cancels the procedure on `pti` and restores its session.
    ///
    /// Establishment frees the reserved PSI; release puts the session back
    /// to PDU-SESSION-ACTIVE. Inactive PTIs are ignored.
    pub fn abort_procedure_by_pti(&mut self, pti: u8) {
        let Some(pt) = self.transaction(pti) else { return };
        if !pt.is_pending() {
            return;
        }
        let psi = pt.psi();
        let kind = pt.kind();

        self.free_procedure_transaction_id(pti);
        let Some(kind) = kind else { return };
        info!("Aborting {} PTI[{}] PSI[{}]", kind, pti, psi);

        match kind {
            ProcedureKind::Establishment => self.free_pdu_session_id(psi),
            ProcedureKind::Release => {
                if let Some(ps) = self.sessions.get_mut(psi as usize) {
                    if ps.state == PsState::InactivePending {
                        ps.state = PsState::Active;
                    }
                }
            }
            ProcedureKind::Modification => {}
        }

        self.report(SmOutcome::Aborted { kind, pti, psi });
    }

    /// Aborts `pti` and every other pending procedure on `psi`
    pub fn abort_procedure_by_pti_or_psi(&mut self, pti: u8, psi: u8) {
        let mut ptis: BTreeSet<u8> = self.pending_ptis_on(psi).into_iter().collect();
        ptis.insert(pti);
        for pti in ptis {
            self.abort_procedure_by_pti(pti);
        }
    }

    fn pending_ptis_on(&self, psi: u8) -> Vec<u8> {
        self.pending_transactions()
            .filter(|pt| pt.psi() == psi && pt.kind().is_some())
            .map(|pt| pt.pti())
            .collect()
    }

    /// Drops every pending procedure on `psi` without touching the session
    pub(super) fn abort_transactions_on_psi(&mut self, psi: u8) {
        for pti in self.pending_ptis_on(psi) {
            let kind = self.transactions[pti as usize].kind();
            self.free_procedure_transaction_id(pti);
            if let Some(kind) = kind {
                debug!("{} PTI[{}] dropped with PSI[{}]", kind, pti, psi);
                self.report(SmOutcome::Aborted { kind, pti, psi });
            }
        }
    }

    /// Releases a session without signalling
    pub fn local_release_session(&mut self, psi: u8) {
        if !(PSI_MIN..=PSI_MAX).contains(&psi) {
            warn!("Local release ignored for invalid PSI[{}]", psi);
            return;
        }

        self.abort_transactions_on_psi(psi);

        if self.sessions[psi as usize].is_in_use() {
            self.free_pdu_session_id(psi);
            info!("Local release of PDU session PSI[{}]", psi);
            self.report(SmOutcome::LocallyReleased { psi });
        }
    }

    /// Releases every session without signalling
    pub fn local_release_all_sessions(&mut self) {
        for psi in PSI_MIN..=PSI_MAX {
            self.local_release_session(psi);
        }
    }

    /// Marks uplink data as pending (or sent) for an active session
    pub fn handle_uplink_status_change(&mut self, psi: u8, pending: bool) {
        match self.sessions.get_mut(psi as usize) {
            Some(ps) if psi >= PSI_MIN && ps.is_active() => {
                ps.uplink_pending = pending;
                debug!("Uplink data status PSI[{}] pending[{}]", psi, pending);
            }
            _ => warn!("Uplink status change ignored, PSI[{}] is not active", psi),
        }
    }

    pub fn any_uplink_data_pending(&self) -> bool {
        self.sessions_in_use().any(|ps| ps.is_active() && ps.uplink_pending())
    }

    pub fn any_emergency_uplink_data_pending(&self) -> bool {
        self.sessions_in_use()
            .any(|ps| ps.is_active() && ps.is_emergency() && ps.uplink_pending())
    }

    /// True when an emergency session is active or being established
    pub fn any_emergency_session(&self) -> bool {
        self.sessions_in_use().any(|ps| {
            ps.is_emergency() && matches!(ps.state(), PsState::Active | PsState::ActivePending)
        })
    }

    /// Uplink data status IE value: active sessions with pending uplink data
    pub fn get_uplink_data_status(&self) -> PsiBitmap {
        let mut bitmap = PsiBitmap::new();
        for ps in self.sessions_in_use() {
            if ps.is_active() && ps.uplink_pending() {
                bitmap.set(ps.psi());
            }
        }
        bitmap
    }

    /// PDU session status IE value: sessions in PDU-SESSION-ACTIVE
    pub fn get_pdu_session_status(&self) -> PsiBitmap {
        let mut bitmap = PsiBitmap::new();
        for ps in self.sessions_in_use() {
            if ps.is_active() {
                bitmap.set(ps.psi());
            }
        }
        bitmap
    }
}
