//! PSI and PTI allocation
//!
//! Both allocators hand out the lowest free identifier; a freed identifier
//! is available again immediately.

use tracing::{debug, warn};

use uenas_common::SessionConfig;

use super::session::{PsState, PSI_MAX, PSI_MIN};
use super::procedure::{PTI_MAX, PTI_MIN};
use super::{NasSm, SmError};

impl NasSm {
    /// Reserves the lowest free PSI for a new session.
    ///
    /// The slot enters PDU-SESSION-ACTIVE-PENDING with `config` attached.
    pub fn allocate_pdu_session_id(&mut self, config: &SessionConfig) -> Result<u8, SmError> {
        if config.emergency && self.any_emergency_session() {
            warn!("PDU session allocation failed, emergency session already exists");
            return Err(SmError::EmergencySessionExists);
        }

        let psi = (PSI_MIN..=PSI_MAX)
            .find(|psi| !self.sessions[*psi as usize].is_in_use())
            .ok_or_else(|| {
                warn!("PDU session allocation failed, all PSIs in use");
                SmError::PsiExhausted
            })?;

        let ps = &mut self.sessions[psi as usize];
        ps.reset();
        ps.state = PsState::ActivePending;
        ps.config = config.clone();
        debug!("PSI[{}] allocated", psi);
        Ok(psi)
    }

    /// Reserves the lowest inactive PTI
    pub fn allocate_procedure_transaction_id(&mut self) -> Result<u8, SmError> {
        let pti = (PTI_MIN..=PTI_MAX)
            .find(|pti| self.transactions[*pti as usize].is_inactive())
            .ok_or_else(|| {
                warn!("PTI allocation failed, all PTIs in use");
                SmError::PtiExhausted
            })?;

        self.transactions[pti as usize].reserve();
        debug!("PTI[{}] allocated", pti);
        Ok(pti)
    }

    /// Releases a PTI, stopping its timer first
    pub fn free_procedure_transaction_id(&mut self, pti: u8) {
        if (PTI_MIN..=PTI_MAX).contains(&pti) {
            self.transactions[pti as usize].reset();
        }
    }

    /// Releases a PSI slot
    pub fn free_pdu_session_id(&mut self, psi: u8) {
        if (PSI_MIN..=PSI_MAX).contains(&psi) {
            self.sessions[psi as usize].reset();
            debug!("PSI[{}] freed", psi);
        }
    }
}
