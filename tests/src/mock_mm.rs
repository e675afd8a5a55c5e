//! Mock MM for integration testing
//!
//! [`MockMm`] sits on the receiving end of the SM engine's [`MmLink`] and
//! sorts what arrives into uplink messages and procedure outcomes.
//! [`MockNetwork`] answers uplink 5GSM requests the way an SMF would.

use std::net::Ipv4Addr;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use uenas_common::PduSessionType;
use uenas_nas::{
    PduAddress, PduSessionEstablishmentAccept, PduSessionEstablishmentReject,
    PduSessionReleaseCommand, PduSessionReleaseReject, SmCause, SmMessage,
};
use uenas_ue::{MmLink, NasSm, SmOutcome, SmToMm};

/// Channel-backed MM stub
#[derive(Debug)]
pub struct MockMm {
    rx: UnboundedReceiver<SmToMm>,
    uplink: Vec<SmMessage>,
    outcomes: Vec<SmOutcome>,
}

impl MockMm {
    /// Creates the stub and the link to hand to `NasSm::on_start`
    pub fn new() -> (MmLink, Self) {
        let (link, rx) = MmLink::channel();
        let mm = Self {
            rx,
            uplink: Vec::new(),
            outcomes: Vec::new(),
        };
        (link, mm)
    }

    /// Moves everything queued on the channel into the buffers
    pub fn poll(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.rx.try_recv() {
            self.store(msg);
            count += 1;
        }
        count
    }

    fn store(&mut self, msg: SmToMm) {
        match msg {
            SmToMm::UplinkSmMessage { message, .. } => self.uplink.push(message),
            SmToMm::Outcome(outcome) => self.outcomes.push(outcome),
        }
    }

    pub fn take_uplink(&mut self) -> Vec<SmMessage> {
        self.poll();
        std::mem::take(&mut self.uplink)
    }

    pub fn take_outcomes(&mut self) -> Vec<SmOutcome> {
        self.poll();
        std::mem::take(&mut self.outcomes)
    }

    /// Waits for the next outcome, buffering uplink messages on the way
    pub async fn next_outcome(&mut self, within: Duration) -> Option<SmOutcome> {
        if !self.outcomes.is_empty() {
            return Some(self.outcomes.remove(0));
        }
        let wait = async {
            while let Some(msg) = self.rx.recv().await {
                match msg {
                    SmToMm::Outcome(outcome) => return Some(outcome),
                    other => self.store(other),
                }
            }
            None
        };
        tokio::time::timeout(within, wait).await.ok().flatten()
    }
}

/// Behaviour of the scripted network peer
#[derive(Debug, Clone, Default)]
pub struct MockNetworkConfig {
    /// Reject establishment requests with this cause
    pub reject_establishment: Option<SmCause>,
    /// Reject release requests with this cause
    pub reject_release: Option<SmCause>,
    /// Never answer
    pub silent: bool,
}

/// Scripted 5GSM network peer
#[derive(Debug, Default)]
pub struct MockNetwork {
    config: MockNetworkConfig,
    next_host: u8,
    received: Vec<SmMessage>,
}

impl MockNetwork {
    pub fn new(config: MockNetworkConfig) -> Self {
        Self {
            config,
            next_host: 2,
            received: Vec::new(),
        }
    }

    /// Every uplink message seen so far
    pub fn received(&self) -> &[SmMessage] {
        &self.received
    }

    /// Produces the network answer to one uplink message
    pub fn respond(&mut self, msg: &SmMessage) -> Option<SmMessage> {
        self.received.push(msg.clone());
        if self.config.silent {
            return None;
        }

        match msg {
            SmMessage::EstablishmentRequest(req) => {
                if let Some(cause) = self.config.reject_establishment {
                    return Some(
                        PduSessionEstablishmentReject::new(req.pdu_session_id, req.pti, cause).into(),
                    );
                }
                let address = Ipv4Addr::new(10, 45, 0, self.next_host);
                self.next_host = self.next_host.wrapping_add(1);

                let mut accept = PduSessionEstablishmentAccept::new(
                    req.pdu_session_id,
                    req.pti,
                    req.pdu_session_type.unwrap_or(PduSessionType::Ipv4),
                )
                .with_pdu_address(PduAddress::Ipv4(address));
                accept.s_nssai = req.s_nssai;
                accept.dnn = req.dnn.clone();
                Some(accept.into())
            }
            SmMessage::ReleaseRequest(req) => match self.config.reject_release {
                Some(cause) => {
                    Some(PduSessionReleaseReject::new(req.pdu_session_id, req.pti, cause).into())
                }
                None => Some(
                    PduSessionReleaseCommand::new(
                        req.pdu_session_id,
                        req.pti,
                        SmCause::RegularDeactivation,
                    )
                    .into(),
                ),
            },
            _ => None,
        }
    }
}

/// Delivers uplink messages to the network and its answers back to the
/// engine until both sides go quiet. Returns the uplink messages exchanged.
pub fn exchange(sm: &mut NasSm, mm: &mut MockMm, network: &mut MockNetwork) -> Vec<SmMessage> {
    let mut seen = Vec::new();
    loop {
        let uplink = mm.take_uplink();
        if uplink.is_empty() {
            break;
        }
        for msg in uplink {
            if let Some(reply) = network.respond(&msg) {
                sm.receive_sm_message(reply);
            }
            seen.push(msg);
        }
    }
    seen
}
