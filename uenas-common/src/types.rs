//! Core 5G identifiers: PLMN, S-NSSAI, SUPI.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Public Land Mobile Network identifier.
///
/// - MCC (Mobile Country Code): 3 decimal digits
/// - MNC (Mobile Network Code): 2 or 3 decimal digits
///
/// `long_mnc` only affects display; key derivation always renders the MNC
/// with three digits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Plmn {
    /// Mobile Country Code (range 0-999)
    pub mcc: u16,
    /// Mobile Network Code (range 0-999)
    pub mnc: u16,
    /// True if MNC is 3 digits, false if 2 digits
    #[serde(default)]
    pub long_mnc: bool,
}

impl Plmn {
    /// Creates a new PLMN with the given MCC and MNC.
    pub const fn new(mcc: u16, mnc: u16, long_mnc: bool) -> Self {
        Self { mcc, mnc, long_mnc }
    }

    /// Returns true if this PLMN has valid values set.
    pub fn has_value(&self) -> bool {
        self.mcc > 0 || self.mnc > 0
    }
}

impl fmt::Debug for Plmn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.long_mnc {
            write!(f, "Plmn({:03}-{:03})", self.mcc, self.mnc)
        } else {
            write!(f, "Plmn({:03}-{:02})", self.mcc, self.mnc)
        }
    }
}

impl fmt::Display for Plmn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.long_mnc {
            write!(f, "{:03}{:03}", self.mcc, self.mnc)
        } else {
            write!(f, "{:03}{:02}", self.mcc, self.mnc)
        }
    }
}

/// Single Network Slice Selection Assistance Information (S-NSSAI)
///
/// SST selects the slice/service type, the optional 24-bit SD differentiates
/// between slices of the same type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SNssai {
    /// Slice/Service Type
    pub sst: u8,
    /// Slice Differentiator
    #[serde(default)]
    pub sd: Option<[u8; 3]>,
}

impl SNssai {
    /// Creates a new S-NSSAI with only SST.
    pub const fn new(sst: u8) -> Self {
        Self { sst, sd: None }
    }

    /// Creates a new S-NSSAI with SST and SD.
    pub const fn with_sd(sst: u8, sd: [u8; 3]) -> Self {
        Self { sst, sd: Some(sd) }
    }

    /// Returns the SD as a u32 value, or None if SD is not set.
    pub fn sd_as_u32(&self) -> Option<u32> {
        self.sd
            .map(|sd| (u32::from(sd[0]) << 16) | (u32::from(sd[1]) << 8) | u32::from(sd[2]))
    }
}

impl fmt::Debug for SNssai {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sd_as_u32() {
            Some(sd) => write!(f, "SNssai(sst={}, sd={:06X})", self.sst, sd),
            None => write!(f, "SNssai(sst={})", self.sst),
        }
    }
}

impl fmt::Display for SNssai {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sd_as_u32() {
            Some(sd) => write!(f, "{}-{:06X}", self.sst, sd),
            None => write!(f, "{}", self.sst),
        }
    }
}

/// SUPI type per 3GPP TS 23.003.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupiType {
    /// IMSI-based SUPI
    Imsi,
    /// NAI-based SUPI
    Nai,
}

impl SupiType {
    /// Returns the string prefix for this SUPI type.
    pub fn prefix(&self) -> &'static str {
        match self {
            SupiType::Imsi => "imsi",
            SupiType::Nai => "nai",
        }
    }
}

impl fmt::Display for SupiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Subscription Permanent Identifier (SUPI).
///
/// The string form `<type>-<value>` (e.g. `imsi-001010000000001`) is the
/// serialized representation and the identity input of the EAP-AKA′ MK.
/// KAMF derivation uses `value` alone.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Supi {
    /// The type of SUPI (IMSI or NAI)
    pub supi_type: SupiType,
    /// The SUPI value without the type prefix
    pub value: String,
}

impl Supi {
    /// Creates a new SUPI with the given type and value.
    pub fn new(supi_type: SupiType, value: impl Into<String>) -> Self {
        Self {
            supi_type,
            value: value.into(),
        }
    }

    /// Creates a new IMSI-based SUPI.
    pub fn imsi(value: impl Into<String>) -> Self {
        Self::new(SupiType::Imsi, value)
    }

    /// Creates a new NAI-based SUPI.
    pub fn nai(value: impl Into<String>) -> Self {
        Self::new(SupiType::Nai, value)
    }

    /// Parses a SUPI from its `type-value` form.
    ///
    /// Returns `None` for an unknown type prefix or an empty value.
    pub fn parse(s: &str) -> Option<Self> {
        let (type_str, value) = s.split_once('-')?;
        let supi_type = match type_str.to_lowercase().as_str() {
            "imsi" => SupiType::Imsi,
            "nai" => SupiType::Nai,
            _ => return None,
        };
        if value.is_empty() {
            return None;
        }
        Some(Self::new(supi_type, value))
    }
}

impl TryFrom<String> for Supi {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Supi::parse(&s).ok_or_else(|| format!("invalid SUPI: {s}"))
    }
}

impl From<Supi> for String {
    fn from(supi: Supi) -> Self {
        supi.to_string()
    }
}

impl fmt::Debug for Supi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Supi({}-{})", self.supi_type, self.value)
    }
}

impl fmt::Display for Supi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.supi_type, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plmn_display() {
        assert_eq!(Plmn::new(1, 1, false).to_string(), "00101");
        assert_eq!(Plmn::new(310, 410, true).to_string(), "310410");
        assert_eq!(format!("{:?}", Plmn::new(1, 1, false)), "Plmn(001-01)");
    }

    #[test]
    fn test_plmn_has_value() {
        assert!(!Plmn::default().has_value());
        assert!(Plmn::new(1, 0, false).has_value());
    }

    #[test]
    fn test_snssai_sd() {
        let slice = SNssai::with_sd(1, [0x01, 0x02, 0x03]);
        assert_eq!(slice.sd_as_u32(), Some(0x010203));
        assert_eq!(slice.to_string(), "1-010203");
        assert_eq!(SNssai::new(2).to_string(), "2");
        assert_eq!(SNssai::new(2).sd_as_u32(), None);
    }

    #[test]
    fn test_supi_parse() {
        let supi = Supi::parse("imsi-001010000000001").unwrap();
        assert_eq!(supi.supi_type, SupiType::Imsi);
        assert_eq!(supi.value, "001010000000001");
        assert_eq!(supi.to_string(), "imsi-001010000000001");

        assert_eq!(Supi::parse("NAI-user@realm").unwrap().supi_type, SupiType::Nai);
        assert!(Supi::parse("msisdn-123").is_none());
        assert!(Supi::parse("imsi-").is_none());
        assert!(Supi::parse("imsi").is_none());
    }

    #[test]
    fn test_supi_serde_string_form() {
        let supi = Supi::imsi("001010000000001");
        let yaml = serde_yaml::to_string(&supi).unwrap();
        assert_eq!(yaml.trim(), "imsi-001010000000001");

        let parsed: Supi = serde_yaml::from_str("imsi-001010000000001").unwrap();
        assert_eq!(parsed, supi);
        assert!(serde_yaml::from_str::<Supi>("bogus").is_err());
    }
}
