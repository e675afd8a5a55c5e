//! Key hierarchy integration tests
//!
//! Runs the 5G-AKA and EAP-AKA' chains from CK/IK down to the NAS keys and
//! checks the result against direct KDF evaluations.

use integration_tests::{init_test_logging, TestAuthVector, TestResult, TestUeConfig};
use uenas_crypto::{calculate_kdf_key, hmac_sha256};
use uenas_nas::{decode_eap, encode_eap_to_vec, Eap, EapAkaPrime, EapAkaSubType, EapCode};
use uenas_ue::{
    calculate_ck_prime_ik_prime, calculate_kausf_for_5g_aka, calculate_kausf_for_eap_aka_prime,
    calculate_mac_for_eap_aka_prime, calculate_mk, calculate_res_star,
    construct_serving_network_name, derive_keys_seaf_amf, derive_nas_keys, split_mk,
    KeyDerivationError, SecurityContext,
};

fn ck_ik(av: &TestAuthVector) -> Vec<u8> {
    [av.ck.as_slice(), av.ik.as_slice()].concat()
}

#[test]
fn test_5g_aka_chain() -> TestResult {
    init_test_logging();
    let ue = TestUeConfig::default();
    let av = TestAuthVector::default();

    let snn = construct_serving_network_name(&ue.hplmn)?;
    assert_eq!(snn, "5G:mnc001.mcc001.3gppnetwork.org");

    let k_ausf = calculate_kausf_for_5g_aka(&av.ck, &av.ik, &snn, &av.sqn_xor_ak);
    assert_eq!(
        k_ausf,
        calculate_kdf_key(&ck_ik(&av), 0x6A, &[snn.as_bytes(), &av.sqn_xor_ak])
    );

    let mut ctx = SecurityContext::new();
    ctx.set_k_ausf(k_ausf);
    ctx.set_abba(&av.abba);
    ctx.set_algorithms(2, 2)?;
    derive_keys_seaf_amf(&ue.supi, &ue.hplmn, &mut ctx)?;
    derive_nas_keys(&mut ctx)?;

    let k_seaf = calculate_kdf_key(&k_ausf, 0x6C, &[snn.as_bytes()]);
    let k_amf = calculate_kdf_key(&k_seaf, 0x6D, &[ue.supi.value.as_bytes(), &av.abba]);
    assert_eq!(ctx.k_seaf(), Some(&k_seaf));
    assert_eq!(ctx.k_amf(), Some(&k_amf));

    let enc = calculate_kdf_key(&k_amf, 0x69, &[&[0x01], &[0x02]]);
    let int = calculate_kdf_key(&k_amf, 0x69, &[&[0x02], &[0x02]]);
    assert_eq!(ctx.k_nas_enc().map(|k| k.as_slice()), Some(&enc[16..]));
    assert_eq!(ctx.k_nas_int().map(|k| k.as_slice()), Some(&int[16..]));

    // RES* over CK||IK
    let res_star = calculate_res_star(&ck_ik(&av), &snn, &av.rand, &av.res);
    let full = calculate_kdf_key(&ck_ik(&av), 0x6B, &[snn.as_bytes(), &av.rand, &av.res]);
    assert_eq!(res_star[..], full[16..]);
    Ok(())
}

#[test]
fn test_eap_aka_prime_chain() -> TestResult {
    init_test_logging();
    let ue = TestUeConfig::default();
    let av = TestAuthVector::default();
    let snn = construct_serving_network_name(&ue.hplmn)?;

    let (ck_prime, ik_prime) = calculate_ck_prime_ik_prime(&av.ck, &av.ik, &snn, &av.sqn_xor_ak);
    let joined = calculate_kdf_key(&ck_ik(&av), 0x20, &[snn.as_bytes(), &av.sqn_xor_ak]);
    assert_eq!(ck_prime, joined[..16].to_vec());
    assert_eq!(ik_prime, joined[16..].to_vec());

    let mk = calculate_mk(&ck_prime, &ik_prime, &ue.supi)?;
    assert_eq!(mk.len(), 208);

    // First PRF' block: HMAC(IK'||CK', "EAP-AKA'imsi-<digits>" || 0x01)
    let key = [ik_prime.as_slice(), ck_prime.as_slice()].concat();
    let mut first = b"EAP-AKA'imsi-001010000000001".to_vec();
    first.push(0x01);
    assert_eq!(mk[..32], hmac_sha256(&key, &first));

    let k_ausf = calculate_kausf_for_eap_aka_prime(&mk)?;
    let keys = split_mk(&mk)?;
    assert_eq!(k_ausf[..], keys.emsk[..32]);
    assert_eq!(keys.k_encr[..], mk[..16]);

    let mut ctx = SecurityContext::new();
    ctx.set_k_ausf(k_ausf);
    derive_keys_seaf_amf(&ue.supi, &ue.hplmn, &mut ctx)?;
    assert!(ctx.k_amf().is_some());
    Ok(())
}

#[test]
fn test_eap_challenge_response_mac() -> TestResult {
    let av = TestAuthVector::default();
    let k_aut = [0x5a; 32];

    let mut response = EapAkaPrime::new(EapCode::Response, 7, EapAkaSubType::AkaChallenge);
    response.attributes.put_res(&av.res);
    response.attributes.put_mac(&[0u8; 16]);
    let mac = calculate_mac_for_eap_aka_prime(&k_aut, &response);
    response.attributes.put_mac(&mac);

    // The peer decodes the response and recomputes the MAC over it
    let encoded = encode_eap_to_vec(&Eap::AkaPrime(response.clone()));
    let decoded = match decode_eap(&mut encoded.as_slice())? {
        Eap::AkaPrime(msg) => msg,
        other => return Err(format!("unexpected EAP message {:?}", other).into()),
    };
    assert_eq!(decoded, response);
    assert_eq!(decoded.attributes.get_mac(), Some(mac.as_slice()));
    assert_eq!(calculate_mac_for_eap_aka_prime(&k_aut, &decoded), mac);

    // A different key gives a different MAC
    assert_ne!(calculate_mac_for_eap_aka_prime(&[0xa5; 32], &decoded), mac);
    Ok(())
}

#[test]
fn test_algorithm_change_requires_rederivation() -> TestResult {
    let ue = TestUeConfig::default();
    let mut ctx = SecurityContext::new();
    ctx.set_k_ausf([0x42; 32]);
    ctx.set_algorithms(1, 1)?;
    derive_keys_seaf_amf(&ue.supi, &ue.hplmn, &mut ctx)?;
    derive_nas_keys(&mut ctx)?;
    let first = ctx.k_nas_int().copied();

    ctx.set_algorithms(1, 2)?;
    assert!(ctx.k_nas_int().is_none());
    assert!(ctx.k_amf().is_some());

    derive_nas_keys(&mut ctx)?;
    assert!(ctx.k_nas_int().is_some());
    assert_ne!(ctx.k_nas_int().copied(), first);

    // A new KAUSF drops everything below it
    ctx.set_k_ausf([0x43; 32]);
    assert!(ctx.k_amf().is_none());
    assert_eq!(derive_nas_keys(&mut ctx), Err(KeyDerivationError::MissingKey("KAMF")));

    assert!(ctx.set_algorithms(16, 0).is_err());
    Ok(())
}
