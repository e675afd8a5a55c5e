//! Configuration structures for the UE NAS layer
//!
//! The UE-level configuration carries the subscriber identity, the home PLMN
//! and the session management settings (timers, retransmission limits,
//! release-reject handling and the sessions established after registration).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::{Plmn, SNssai, Supi};

/// PDU session type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PduSessionType {
    /// IPv4 PDU session
    #[default]
    #[serde(rename = "IPv4")]
    Ipv4,
    /// IPv6 PDU session
    #[serde(rename = "IPv6")]
    Ipv6,
    /// IPv4v6 (dual-stack) PDU session
    #[serde(rename = "IPv4v6")]
    Ipv4v6,
    /// Ethernet PDU session
    Ethernet,
    /// Unstructured PDU session
    Unstructured,
}

/// PDU session configuration.
///
/// Describes a session the UE requests; the network may grant different
/// values in the establishment accept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// PDU session type
    #[serde(rename = "type", default)]
    pub session_type: PduSessionType,
    /// Requested S-NSSAI
    #[serde(default)]
    pub slice: Option<SNssai>,
    /// Data network name
    #[serde(default)]
    pub apn: Option<String>,
    /// Whether this is an emergency session
    #[serde(default)]
    pub emergency: bool,
}

impl SessionConfig {
    /// Creates a non-emergency session configuration for the given DNN.
    pub fn new(session_type: PduSessionType, apn: impl Into<String>) -> Self {
        Self {
            session_type,
            slice: None,
            apn: Some(apn.into()),
            emergency: false,
        }
    }

    /// Creates an emergency session configuration.
    pub fn emergency() -> Self {
        Self {
            emergency: true,
            ..Self::default()
        }
    }

    /// Sets the requested slice.
    pub fn with_slice(mut self, slice: SNssai) -> Self {
        self.slice = Some(slice);
        self
    }
}

/// How a PDU Session Release Reject is handled, keyed by 5GSM cause value.
///
/// Causes in neither list keep the session active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRejectPolicy {
    /// Causes after which the session is released locally
    #[serde(default = "default_local_release_causes")]
    pub local_release_causes: Vec<u8>,
    /// Causes after which the release request is sent again
    #[serde(default = "default_retry_causes")]
    pub retry_causes: Vec<u8>,
}

fn default_local_release_causes() -> Vec<u8> {
    // #43 invalid PDU session identity, #54 PDU session does not exist
    vec![43, 54]
}

fn default_retry_causes() -> Vec<u8> {
    // #26 insufficient resources, #38 network failure
    vec![26, 38]
}

impl Default for ReleaseRejectPolicy {
    fn default() -> Self {
        Self {
            local_release_causes: default_local_release_causes(),
            retry_causes: default_retry_causes(),
        }
    }
}

/// Default T3580 interval in seconds (TS 24.501 Table 10.3.1)
pub const DEFAULT_T3580_SECS: u32 = 16;
/// Default T3581 interval in seconds
pub const DEFAULT_T3581_SECS: u32 = 16;
/// Default T3582 interval in seconds
pub const DEFAULT_T3582_SECS: u32 = 16;

/// Session management settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmConfig {
    /// Length of one logical timer tick in milliseconds
    pub tick_period_ms: u64,
    /// T3580 (establishment) interval in seconds
    pub t3580_secs: u32,
    /// T3581 (modification) interval in seconds
    pub t3581_secs: u32,
    /// T3582 (release) interval in seconds
    pub t3582_secs: u32,
    /// Retransmissions before a procedure is abandoned
    pub max_retransmissions: u32,
    /// Release requests re-sent after a retryable release reject
    pub max_release_retries: u32,
    /// Whether a network-initiated release is answered with Release Complete
    pub send_release_complete: bool,
    /// Release reject dispositions
    pub release_reject_policy: ReleaseRejectPolicy,
    /// Sessions established once registration completes
    pub sessions: Vec<SessionConfig>,
}

impl Default for SmConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 1000,
            t3580_secs: DEFAULT_T3580_SECS,
            t3581_secs: DEFAULT_T3581_SECS,
            t3582_secs: DEFAULT_T3582_SECS,
            max_retransmissions: 4,
            max_release_retries: 2,
            send_release_complete: true,
            release_reject_policy: ReleaseRejectPolicy::default(),
            sessions: Vec::new(),
        }
    }
}

impl SmConfig {
    /// Checks the timer settings.
    pub fn validate(&self) -> Result<(), Error> {
        if self.tick_period_ms == 0 {
            return Err(Error::Config("tick_period_ms must be greater than 0".into()));
        }
        for (name, secs) in [
            ("t3580_secs", self.t3580_secs),
            ("t3581_secs", self.t3581_secs),
            ("t3582_secs", self.t3582_secs),
        ] {
            if secs == 0 {
                return Err(Error::Config(format!("{name} must be greater than 0")));
            }
        }
        Ok(())
    }
}

/// UE NAS configuration.
///
/// `sessions` at the top level follows the usual UE configuration file
/// layout; they are merged into the SM settings by [`UeNasConfig::sm_config`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UeNasConfig {
    /// Subscription Permanent Identifier
    pub supi: Supi,
    /// Home PLMN
    pub hplmn: Plmn,
    /// Sessions established once registration completes
    #[serde(default)]
    pub sessions: Vec<SessionConfig>,
    /// Session management settings
    #[serde(default)]
    pub sm: SmConfig,
}

impl UeNasConfig {
    /// Creates a configuration with default SM settings and no sessions.
    pub fn new(supi: Supi, hplmn: Plmn) -> Self {
        Self {
            supi,
            hplmn,
            sessions: Vec::new(),
            sm: SmConfig::default(),
        }
    }

    /// Returns the SM settings with the top-level sessions appended.
    pub fn sm_config(&self) -> SmConfig {
        let mut sm = self.sm.clone();
        sm.sessions.extend(self.sessions.iter().cloned());
        sm
    }

    /// Checks identifier ranges and SM settings.
    pub fn validate(&self) -> Result<(), Error> {
        if !(1..=999).contains(&self.hplmn.mcc) {
            return Err(Error::Config(format!(
                "MCC must be in 1..=999, got {}",
                self.hplmn.mcc
            )));
        }
        if self.hplmn.mnc > 999 {
            return Err(Error::Config(format!(
                "MNC must be in 0..=999, got {}",
                self.hplmn.mnc
            )));
        }
        if self.sessions.iter().chain(&self.sm.sessions).filter(|s| s.emergency).count() > 1 {
            return Err(Error::Config("at most one emergency session is allowed".into()));
        }
        self.sm.validate()
    }

    /// Parses a UE NAS configuration from a YAML string.
    ///
    /// # Example
    /// ```
    /// use uenas_common::UeNasConfig;
    ///
    /// let yaml = r#"
    /// supi: imsi-001010000000001
    /// hplmn:
    ///   mcc: 1
    ///   mnc: 1
    /// sessions:
    ///   - type: IPv4
    ///     apn: internet
    ///     slice:
    ///       sst: 1
    /// "#;
    ///
    /// let config = UeNasConfig::from_yaml(yaml).unwrap();
    /// assert_eq!(config.sessions.len(), 1);
    /// assert_eq!(config.sm.t3580_secs, 16);
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, Error> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads a UE NAS configuration from a YAML file.
    ///
    /// # Example
    /// ```no_run
    /// use uenas_common::UeNasConfig;
    ///
    /// let config = UeNasConfig::from_yaml_file("config/ue.yaml").unwrap();
    /// ```
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Serializes the configuration to a YAML string.
    pub fn to_yaml(&self) -> Result<String, Error> {
        Ok(serde_yaml::to_string(self)?)
    }
}
