//! Choice of remote authority per country code.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Remote authority able to confirm a VAT number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Backend {
    /// EU VAT Information Exchange System (SOAP).
    Vies,
    /// UK tax authority REST lookup.
    Hmrc,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vies => write!(f, "VIES"),
            Self::Hmrc => write!(f, "HMRC"),
        }
    }
}

/// Pick the backend for a normalized country code.
///
/// `GB` goes to HMRC. `XI` returns `None`: HMRC cannot tell a Northern
/// Ireland registration apart from a mainland one, so no authority can
/// confirm it. Everything else goes to VIES.
pub fn route(country_code: &str) -> Option<Backend> {
    match country_code {
        "GB" => Some(Backend::Hmrc),
        "XI" => None,
        _ => Some(Backend::Vies),
    }
}
