//! Transaction timers
//!
//! T3580 and T3582 retransmit the stored request while the expiry count is
//! within `max_retransmissions`; after that the procedure is abandoned.

use tracing::{info, warn};

use uenas_nas::SmMessage;

use super::procedure::{ProcedureKind, TransactionTimerExpiry, PTI_MAX, PTI_MIN};
use super::{NasSm, SmOutcome};
use crate::timer::NasTimer;

impl NasSm {
    fn new_transaction_timer(&self, kind: ProcedureKind) -> NasTimer {
        let interval = match kind {
            ProcedureKind::Establishment => self.intervals.t3580,
            ProcedureKind::Release => self.intervals.t3582,
            ProcedureKind::Modification => self.intervals.t3581,
        };
        NasTimer::new(kind.timer_code(), interval)
    }

    /// Records the request on its PTI, arms the procedure timer and sends it
    pub(super) fn start_procedure(&mut self, pti: u8, kind: ProcedureKind, psi: u8, message: SmMessage) {
        let timer = self.new_transaction_timer(kind);
        let now = self.now;
        self.transactions[pti as usize].start(kind, psi, message.clone(), timer, now);
        self.send_sm_message(psi, message);
    }

    /// Advances the logical clock by one tick and handles expired timers
    pub fn on_timer_tick(&mut self) {
        self.now += 1;
        let now = self.now;

        let mut expired = Vec::new();
        for pt in self.transactions[PTI_MIN as usize..=PTI_MAX as usize].iter_mut() {
            if !pt.is_pending() {
                continue;
            }
            let Some(kind) = pt.kind() else { continue };
            if pt.timer_mut().is_some_and(|timer| timer.poll(now)) {
                expired.push(TransactionTimerExpiry { kind, pti: pt.pti() });
            }
        }

        for expiry in expired {
            self.on_transaction_timer_expire(expiry);
        }
    }

    fn on_transaction_timer_expire(&mut self, expiry: TransactionTimerExpiry) {
        let TransactionTimerExpiry { kind, pti } = expiry;
        let pt = &self.transactions[pti as usize];
        if !pt.is_pending() || pt.kind() != Some(kind) {
            return;
        }
        let psi = pt.psi();
        let count = pt.expiry_count();
        let code = kind.timer_code();
        let message = pt.message().cloned();

        if count <= self.config.max_retransmissions {
            if let Some(message) = message {
                warn!("T{} expired for PTI[{}] ({}), retransmitting", code, pti, count);
                let now = self.now;
                if let Some(timer) = self.transactions[pti as usize].timer_mut() {
                    timer.start(now, false);
                }
                self.send_sm_message(psi, message);
                return;
            }
        }

        info!("T{} expired {} times for PTI[{}], abandoning {}", code, count, pti, kind);
        self.free_procedure_transaction_id(pti);
        match kind {
            ProcedureKind::Establishment | ProcedureKind::Release => {
                self.free_pdu_session_id(psi)
            }
            // The session itself is left untouched
            ProcedureKind::Modification => {}
        }
        self.report(SmOutcome::TimedOut { kind, pti, psi });
    }
}
