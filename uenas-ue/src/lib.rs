//! uenas UE library
//!
//! The NAS layer core of a 5G UE:
//!
//! - Security context and key derivation for 5G-AKA and EAP-AKA'
//! - Logical NAS timers driven by ticks
//! - The 5GSM engine [`NasSm`] for PDU session establishment and release

pub mod nas;
pub mod timer;

// Re-export commonly used types
pub use timer::{ticks_for_secs, NasTimer, TIMER_T3580, TIMER_T3581, TIMER_T3582};

// Re-export key hierarchy types
pub use nas::keys::{
    calculate_ck_prime_ik_prime, calculate_kausf_for_5g_aka, calculate_kausf_for_eap_aka_prime,
    calculate_mac_for_eap_aka_prime, calculate_mk, calculate_res_star,
    construct_serving_network_name, derive_keys_seaf_amf, derive_nas_keys, split_mk,
    EapAkaPrimeKeys, KeyDerivationError,
};
pub use nas::security::{NasKeys, SecurityContext, SecurityContextError};

// Re-export SM types
pub use nas::sm::{
    MmLink, NasSm, PduSession, ProcedureKind, ProcedureTransaction, PsState, PsiBitmap, PtState,
    ReleaseRejectDisposition, SmError, SmEvent, SmOutcome, SmToMm, PSI_MAX, PSI_MIN, PTI_MAX,
    PTI_MIN, PTI_UNASSIGNED,
};
