//! Test fixtures and configuration helpers
//!
//! Provides a test subscriber and authentication vector material.

use uenas_common::{PduSessionType, Plmn, SNssai, SessionConfig, SmConfig, Supi, UeNasConfig};

/// Test UE configuration
#[derive(Debug, Clone)]
pub struct TestUeConfig {
    /// SUPI (IMSI)
    pub supi: Supi,
    /// Home PLMN
    pub hplmn: Plmn,
    /// Sessions requested after registration
    pub sessions: Vec<SessionConfig>,
    /// SM settings
    pub sm: SmConfig,
}

impl Default for TestUeConfig {
    fn default() -> Self {
        Self {
            supi: Supi::imsi("001010000000001"),
            hplmn: Plmn::new(1, 1, false),
            sessions: vec![
                SessionConfig::new(PduSessionType::Ipv4, "internet").with_slice(SNssai::new(1)),
            ],
            sm: SmConfig::default(),
        }
    }
}

impl TestUeConfig {
    /// Builds the UE NAS configuration for this fixture
    pub fn to_nas_config(&self) -> UeNasConfig {
        let mut config = UeNasConfig::new(self.supi.clone(), self.hplmn);
        config.sessions = self.sessions.clone();
        config.sm = self.sm.clone();
        config
    }
}

/// Authentication vector material as seen by the UE after AKA
#[derive(Debug, Clone)]
pub struct TestAuthVector {
    /// Cipher key
    pub ck: [u8; 16],
    /// Integrity key
    pub ik: [u8; 16],
    /// SQN xor AK from AUTN
    pub sqn_xor_ak: [u8; 6],
    /// Network challenge
    pub rand: [u8; 16],
    /// USIM response
    pub res: [u8; 8],
    /// ABBA parameter
    pub abba: [u8; 2],
}

impl Default for TestAuthVector {
    fn default() -> Self {
        Self {
            ck: [0x53, 0x49, 0xfb, 0xe0, 0x98, 0x64, 0x9f, 0x94,
                 0x8f, 0x5d, 0x2e, 0x97, 0x3a, 0x81, 0xc0, 0x0f],
            ik: [0x97, 0x44, 0x87, 0x1a, 0xd3, 0x2b, 0xf9, 0xbb,
                 0xd1, 0xdd, 0x5c, 0xe5, 0x4e, 0x3e, 0x2e, 0x5a],
            sqn_xor_ak: [0xbb, 0x52, 0xe9, 0x1c, 0x74, 0x7a],
            rand: [0x81, 0xe9, 0x2b, 0x6c, 0x0e, 0xe0, 0xe1, 0x2e,
                   0xbc, 0xeb, 0xa8, 0xd9, 0x2a, 0x99, 0xdf, 0xa5],
            res: [0x28, 0xd7, 0xb0, 0xf2, 0xa2, 0xec, 0x3d, 0xe5],
            abba: [0x00, 0x00],
        }
    }
}
