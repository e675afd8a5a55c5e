//! UE-requested PDU session establishment (3GPP TS 24.501 Section 6.4.1)

use tracing::{error, info, warn};

use uenas_common::SessionConfig;
use uenas_nas::{
    PduSessionEstablishmentAccept, PduSessionEstablishmentReject, PduSessionEstablishmentRequest,
    RequestType, SmCause,
};

use super::procedure::ProcedureKind;
use super::session::PsState;
use super::{NasSm, SmError, SmOutcome};

impl NasSm {
    /// Starts a PDU session establishment.
    ///
    /// Returns the `(pti, psi)` pair of the new procedure. Nothing is sent
    /// when no identifier is available.
    pub fn send_establishment_request(&mut self, config: &SessionConfig) -> Result<(u8, u8), SmError> {
        info!("Sending PDU Session Establishment Request");

        let psi = self.allocate_pdu_session_id(config)?;
        let pti = match self.allocate_procedure_transaction_id() {
            Ok(pti) => pti,
            Err(e) => {
                self.free_pdu_session_id(psi);
                return Err(e);
            }
        };

        let mut req = PduSessionEstablishmentRequest::new(psi, pti);
        req.pdu_session_type = Some(config.session_type);
        req.request_type = if config.emergency {
            RequestType::InitialEmergencyRequest
        } else {
            RequestType::InitialRequest
        };
        req.s_nssai = config.slice;
        req.dnn = config.apn.clone();

        self.start_procedure(pti, ProcedureKind::Establishment, psi, req.into());
        Ok((pti, psi))
    }

    pub(super) fn receive_establishment_accept(&mut self, msg: &PduSessionEstablishmentAccept) {
        let (pti, psi) = (msg.pti, msg.pdu_session_id);
        info!("PDU Session Establishment Accept received");

        if !self.check_pti_and_psi(pti, psi, ProcedureKind::Establishment) {
            return;
        }

        if self.sessions[psi as usize].state != PsState::ActivePending {
            error!("PDU session state is not ACTIVE-PENDING for PSI[{}]", psi);
            self.send_sm_cause(SmCause::MessageTypeNotCompatible, pti, psi);
            return;
        }

        self.free_procedure_transaction_id(pti);

        let ps = &mut self.sessions[psi as usize];
        ps.state = PsState::Active;
        ps.release_retries = 0;
        ps.session_type = Some(msg.selected_pdu_session_type);
        ps.pdu_address = msg.pdu_address;
        ps.s_nssai = msg.s_nssai.or(ps.config.slice);
        ps.dnn = msg.dnn.clone().or_else(|| ps.config.apn.clone());

        match msg.pdu_address {
            Some(address) => {
                info!("PDU Session establishment is successful PSI[{}] address[{}]", psi, address)
            }
            None => info!("PDU Session establishment is successful PSI[{}]", psi),
        }
        if let Some(cause) = msg.sm_cause {
            info!("Establishment accepted with cause {}", cause);
        }

        self.report(SmOutcome::Accepted {
            kind: ProcedureKind::Establishment,
            pti,
            psi,
        });
    }

    pub(super) fn receive_establishment_reject(&mut self, msg: &PduSessionEstablishmentReject) {
        let (pti, psi) = (msg.pti, msg.pdu_session_id);
        error!("PDU Session Establishment Reject received [{}]", msg.sm_cause);

        if !self.check_pti_and_psi(pti, psi, ProcedureKind::Establishment) {
            return;
        }

        self.free_procedure_transaction_id(pti);
        self.free_pdu_session_id(psi);

        self.report(SmOutcome::Rejected {
            kind: ProcedureKind::Establishment,
            pti,
            psi,
            cause: msg.sm_cause,
        });
    }

    /// The request never reached an SMF; the procedure is dropped without
    /// any further signalling.
    pub fn receive_establishment_routing_failure(&mut self, msg: &PduSessionEstablishmentRequest) {
        let (pti, psi) = (msg.pti, msg.pdu_session_id);
        warn!("PDU Session Establishment Request could not be routed PTI[{}] PSI[{}]", pti, psi);

        let matches = self.transaction(pti).is_some_and(|pt| {
            pt.is_pending() && pt.kind() == Some(ProcedureKind::Establishment) && pt.psi() == psi
        });
        if !matches {
            warn!("No pending establishment for PTI[{}] PSI[{}]", pti, psi);
            return;
        }

        self.free_procedure_transaction_id(pti);
        self.free_pdu_session_id(psi);

        self.report(SmOutcome::Aborted {
            kind: ProcedureKind::Establishment,
            pti,
            psi,
        });
    }
}
