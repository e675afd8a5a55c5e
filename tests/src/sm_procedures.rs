//! Session management integration tests
//!
//! Drives `NasSm` through complete procedures against the mock MM and the
//! scripted network peer.

use integration_tests::{
    exchange, init_test_logging, test_utils::within, MockMm, MockNetwork, MockNetworkConfig,
    TestResult, TestUeConfig, DEFAULT_TEST_TIMEOUT,
};
use uenas_common::{PduSessionType, SessionConfig, SmConfig, UeNasConfig};
use uenas_nas::{PduAddress, PduSessionReleaseCommand, SmCause, SmMessage};
use uenas_ue::{NasSm, ProcedureKind, PsState, SmError, SmEvent, SmOutcome};

fn started(config: SmConfig) -> (NasSm, MockMm) {
    let (link, mm) = MockMm::new();
    let mut sm = NasSm::new(config);
    sm.on_start(link);
    (sm, mm)
}

fn answering_network() -> MockNetwork {
    MockNetwork::new(MockNetworkConfig::default())
}

/// Establishment with a silent network: the request goes out once, is
/// retransmitted four times, and the procedure times out on the fifth expiry.
#[test]
fn test_establishment_times_out_after_retry_limit() {
    init_test_logging();
    let (mut sm, mut mm) = started(SmConfig::default());

    let (pti, psi) = sm
        .send_establishment_request(&SessionConfig::new(PduSessionType::Ipv4, "internet"))
        .expect("establishment should start");
    let request = mm.take_uplink();
    assert_eq!(request.len(), 1);

    for _ in 0..79 {
        sm.on_timer_tick();
    }
    let retransmissions = mm.take_uplink();
    assert_eq!(retransmissions.len(), 4);
    assert!(retransmissions.iter().all(|msg| *msg == request[0]));
    assert!(mm.take_outcomes().is_empty());
    assert_eq!(sm.session(psi).map(|ps| ps.state()), Some(PsState::ActivePending));

    sm.on_timer_tick();
    assert_eq!(
        mm.take_outcomes(),
        vec![SmOutcome::TimedOut { kind: ProcedureKind::Establishment, pti, psi }]
    );
    assert!(mm.take_uplink().is_empty());
    assert!(!sm.session(psi).map_or(true, |ps| ps.is_in_use()));
    assert!(sm.transaction(pti).map_or(false, |pt| pt.is_inactive()));

    // Identifiers are reusable straight away
    let again = sm.send_establishment_request(&SessionConfig::default());
    assert_eq!(again, Ok((pti, psi)));
}

/// A network release of an active session clears its PDU session status bit
#[test]
fn test_network_release_clears_session_status() {
    init_test_logging();
    let (mut sm, mut mm) = started(SmConfig::default());
    let mut network = answering_network();

    let (_, psi) = sm.send_establishment_request(&SessionConfig::default()).unwrap();
    exchange(&mut sm, &mut mm, &mut network);
    assert!(sm.get_pdu_session_status().is_set(psi));
    assert_eq!(sm.get_pdu_session_status().to_octets(), [0x02, 0x00]);
    mm.take_outcomes();

    sm.receive_sm_message(PduSessionReleaseCommand::new(psi, 0, SmCause::RegularDeactivation).into());

    assert!(sm.get_pdu_session_status().is_empty());
    assert_eq!(
        mm.take_outcomes(),
        vec![SmOutcome::ReleasedByNetwork { psi, cause: SmCause::RegularDeactivation }]
    );
    let uplink = mm.take_uplink();
    assert_eq!(uplink.len(), 1);
    match &uplink[0] {
        SmMessage::ReleaseComplete(complete) => {
            assert_eq!(complete.pdu_session_id, psi);
            assert_eq!(complete.pti, 0);
            assert_eq!(complete.sm_cause, None);
        }
        other => panic!("expected Release Complete, got {:?}", other),
    }
}

#[test]
fn test_initial_sessions_from_yaml() -> TestResult {
    init_test_logging();
    let yaml = r#"
supi: imsi-001010000000001
hplmn:
  mcc: 1
  mnc: 1
sessions:
  - type: IPv4
    apn: internet
    slice:
      sst: 1
  - type: IPv4v6
    apn: ims
sm:
  tick_period_ms: 500
"#;
    let config = UeNasConfig::from_yaml(yaml)?;
    config.validate()?;

    let (mut sm, mut mm) = started(config.sm_config());
    assert_eq!(sm.establish_initial_sessions(), vec![(1, 1), (2, 2)]);

    let mut network = answering_network();
    let uplink = exchange(&mut sm, &mut mm, &mut network);
    assert_eq!(uplink.len(), 2);

    let internet = sm.session(1).ok_or("PSI 1 missing")?;
    assert!(internet.is_active());
    assert_eq!(internet.dnn(), Some("internet"));
    assert_eq!(internet.session_type(), Some(PduSessionType::Ipv4));
    assert_eq!(internet.pdu_address(), Some(PduAddress::Ipv4([10, 45, 0, 2].into())));

    let ims = sm.session(2).ok_or("PSI 2 missing")?;
    assert_eq!(ims.dnn(), Some("ims"));
    assert_eq!(ims.session_type(), Some(PduSessionType::Ipv4v6));

    assert_eq!(
        mm.take_outcomes(),
        vec![
            SmOutcome::Accepted { kind: ProcedureKind::Establishment, pti: 1, psi: 1 },
            SmOutcome::Accepted { kind: ProcedureKind::Establishment, pti: 2, psi: 2 },
        ]
    );
    Ok(())
}

#[test]
fn test_fixture_config_starts_sessions() {
    let fixture = TestUeConfig::default();
    let config = fixture.to_nas_config();
    assert!(config.validate().is_ok());

    let (mut sm, mut mm) = started(config.sm_config());
    assert_eq!(sm.establish_initial_sessions().len(), fixture.sessions.len());
    exchange(&mut sm, &mut mm, &mut answering_network());
    assert_eq!(sm.get_pdu_session_status().count(), 1);
}

#[test]
fn test_ue_requested_release_round_trip() {
    init_test_logging();
    let (mut sm, mut mm) = started(SmConfig::default());
    let mut network = answering_network();

    sm.handle_nas_event(SmEvent::EstablishSession(SessionConfig::default())).unwrap();
    exchange(&mut sm, &mut mm, &mut network);
    mm.take_outcomes();

    let pti = sm.send_release_request(1).unwrap();
    assert_eq!(sm.session(1).map(|ps| ps.state()), Some(PsState::InactivePending));
    let uplink = exchange(&mut sm, &mut mm, &mut network);

    // Release Request, then the Release Complete answering the command
    assert_eq!(uplink.len(), 2);
    match &uplink[0] {
        SmMessage::ReleaseRequest(req) => {
            assert_eq!(req.pti, pti);
            assert_eq!(req.sm_cause, Some(SmCause::RegularDeactivation));
        }
        other => panic!("expected Release Request, got {:?}", other),
    }
    assert!(matches!(uplink[1], SmMessage::ReleaseComplete(_)));

    assert_eq!(
        mm.take_outcomes(),
        vec![
            SmOutcome::Accepted { kind: ProcedureKind::Release, pti, psi: 1 },
            SmOutcome::ReleasedByNetwork { psi: 1, cause: SmCause::RegularDeactivation },
        ]
    );
    assert_eq!(sm.sessions_in_use().count(), 0);
    assert_eq!(sm.pending_transactions().count(), 0);
}

#[test]
fn test_release_reject_retries_then_releases_locally() {
    init_test_logging();
    let (mut sm, mut mm) = started(SmConfig::default());
    sm.send_establishment_request(&SessionConfig::default()).unwrap();
    exchange(&mut sm, &mut mm, &mut answering_network());
    mm.take_outcomes();

    let mut rejecting = MockNetwork::new(MockNetworkConfig {
        reject_release: Some(SmCause::InsufficientResources),
        ..Default::default()
    });
    sm.handle_nas_event(SmEvent::ReleaseSession { psi: 1 }).unwrap();
    let uplink = exchange(&mut sm, &mut mm, &mut rejecting);

    // The first request and two retries
    assert_eq!(uplink.len(), 3);
    assert!(uplink.iter().all(|msg| matches!(msg, SmMessage::ReleaseRequest(_))));

    let outcomes = mm.take_outcomes();
    assert_eq!(outcomes.len(), 4);
    assert!(outcomes[..3].iter().all(|o| matches!(
        o,
        SmOutcome::Rejected { kind: ProcedureKind::Release, cause: SmCause::InsufficientResources, .. }
    )));
    assert_eq!(outcomes[3], SmOutcome::LocallyReleased { psi: 1 });
    assert!(sm.get_pdu_session_status().is_empty());
}

#[test]
fn test_release_reject_keeps_session() {
    let (mut sm, mut mm) = started(SmConfig::default());
    sm.send_establishment_request(&SessionConfig::default()).unwrap();
    exchange(&mut sm, &mut mm, &mut answering_network());

    let mut rejecting = MockNetwork::new(MockNetworkConfig {
        reject_release: Some(SmCause::ProtocolErrorUnspecified),
        ..Default::default()
    });
    sm.send_release_request(1).unwrap();
    assert_eq!(exchange(&mut sm, &mut mm, &mut rejecting).len(), 1);
    assert!(sm.session(1).map_or(false, |ps| ps.is_active()));
}

#[test]
fn test_establishment_reject_frees_session() {
    let (mut sm, mut mm) = started(SmConfig::default());
    let mut network = MockNetwork::new(MockNetworkConfig {
        reject_establishment: Some(SmCause::MissingOrUnknownDnn),
        ..Default::default()
    });

    let (pti, psi) = sm.send_establishment_request(&SessionConfig::default()).unwrap();
    exchange(&mut sm, &mut mm, &mut network);

    assert_eq!(
        mm.take_outcomes(),
        vec![SmOutcome::Rejected {
            kind: ProcedureKind::Establishment,
            pti,
            psi,
            cause: SmCause::MissingOrUnknownDnn
        }]
    );
    assert_eq!(sm.sessions_in_use().count(), 0);
}

#[test]
fn test_psi_exhaustion_sends_nothing() {
    let (mut sm, mut mm) = started(SmConfig::default());
    let mut network = answering_network();
    for _ in 0..15 {
        sm.send_establishment_request(&SessionConfig::default()).unwrap();
    }
    exchange(&mut sm, &mut mm, &mut network);
    assert_eq!(sm.get_pdu_session_status().count(), 15);

    assert_eq!(
        sm.handle_nas_event(SmEvent::EstablishSession(SessionConfig::default())),
        Err(SmError::PsiExhausted)
    );
    assert!(mm.take_uplink().is_empty());

    // Releasing everything makes room again
    assert_eq!(sm.send_release_request_for_all().len(), 15);
    exchange(&mut sm, &mut mm, &mut network);
    assert!(sm.get_pdu_session_status().is_empty());
    assert!(sm.send_establishment_request(&SessionConfig::default()).is_ok());
}

#[test]
fn test_local_release_all_with_pending_procedures() {
    let (mut sm, mut mm) = started(SmConfig::default());
    sm.send_establishment_request(&SessionConfig::default()).unwrap();
    exchange(&mut sm, &mut mm, &mut answering_network());
    sm.send_release_request(1).unwrap();
    sm.send_establishment_request(&SessionConfig::emergency()).unwrap();
    assert!(sm.any_emergency_session());
    mm.take_outcomes();
    mm.take_uplink();

    sm.handle_nas_event(SmEvent::LocalReleaseAllSessions).unwrap();
    let outcomes = mm.take_outcomes();
    assert_eq!(
        outcomes,
        vec![
            SmOutcome::Aborted { kind: ProcedureKind::Release, pti: 1, psi: 1 },
            SmOutcome::LocallyReleased { psi: 1 },
            SmOutcome::Aborted { kind: ProcedureKind::Establishment, pti: 2, psi: 2 },
            SmOutcome::LocallyReleased { psi: 2 },
        ]
    );
    assert!(!sm.any_emergency_session());

    // No timer survives the release
    for _ in 0..100 {
        sm.on_timer_tick();
    }
    assert!(mm.take_uplink().is_empty());
    assert!(mm.take_outcomes().is_empty());
}

#[test]
fn test_on_quit_stops_timers() {
    let (mut sm, mut mm) = started(SmConfig::default());
    let (pti, psi) = sm.send_establishment_request(&SessionConfig::default()).unwrap();
    mm.take_uplink();

    sm.on_quit();
    assert_eq!(
        mm.take_outcomes(),
        vec![SmOutcome::Aborted { kind: ProcedureKind::Establishment, pti, psi }]
    );
    assert_eq!(sm.sessions_in_use().count(), 0);

    for _ in 0..100 {
        sm.on_timer_tick();
    }
    assert!(sm.transaction(pti).map_or(false, |pt| pt.is_inactive()));
    assert_eq!(mm.poll(), 0);
}

#[test]
fn test_on_quit_restores_release_pending_session() {
    let (mut sm, mut mm) = started(SmConfig::default());
    sm.send_establishment_request(&SessionConfig::default()).unwrap();
    exchange(&mut sm, &mut mm, &mut answering_network());
    let pti = sm.send_release_request(1).unwrap();
    mm.take_outcomes();
    mm.take_uplink();

    sm.on_quit();
    assert_eq!(
        mm.take_outcomes(),
        vec![SmOutcome::Aborted { kind: ProcedureKind::Release, pti, psi: 1 }]
    );
    assert_eq!(sm.session(1).map(|ps| ps.state()), Some(PsState::Active));
    assert_eq!(sm.pending_transactions().count(), 0);
}

#[tokio::test]
async fn test_outcomes_arrive_over_channel() -> TestResult {
    init_test_logging();
    let (mut sm, mut mm) = started(SmConfig {
        tick_period_ms: 100,
        t3580_secs: 1,
        max_retransmissions: 1,
        ..SmConfig::default()
    });

    let (pti, psi) = sm.send_establishment_request(&SessionConfig::default())?;
    // 10 ticks per expiry, one retransmission
    for _ in 0..20 {
        sm.on_timer_tick();
    }

    let outcome = within(DEFAULT_TEST_TIMEOUT, mm.next_outcome(DEFAULT_TEST_TIMEOUT)).await?;
    assert_eq!(
        outcome,
        Some(SmOutcome::TimedOut { kind: ProcedureKind::Establishment, pti, psi })
    );
    assert_eq!(mm.take_uplink().len(), 2);
    Ok(())
}
