//! Offline normalization and format validation of VAT numbers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::countries;
use crate::error::VatError;

/// Hyphens, periods and whitespace runs.
static SEPARATORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\s.\-]+").expect("hard-coded separator pattern should be valid")
});

/// A VAT number split into country code and separator-free number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedVatNumber {
    /// Two-letter code as used by VIES (`EL` for Greece, `XI` for Northern Ireland).
    pub country_code: String,
    /// Number without the country prefix, upper case, no separators.
    pub number: String,
}

impl fmt::Display for NormalizedVatNumber {
    /// Canonical identifier, e.g. `BE-0123456789`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.country_code, self.number)
    }
}

/// Normalize free-form input into a `(country_code, number)` pair.
///
/// When `country_hint` is `None` the country code is taken from the start of
/// the input (`"BE 0123.456.789"`, `"be-0123456789"`). Never touches the network.
///
/// # Errors
///
/// - [`VatError::MissingInput`] for empty input
/// - [`VatError::UnknownMemberState`] when no supported code can be resolved
/// - [`VatError::InvalidFormat`] when the number does not match the country's pattern
pub fn normalize(raw: &str, country_hint: Option<&str>) -> Result<NormalizedVatNumber, VatError> {
    if raw.trim().is_empty() {
        return Err(VatError::MissingInput);
    }

    let cleaned = SEPARATORS.replace_all(raw, " ").trim().to_uppercase();

    let (country, rest) = match country_hint.map(str::trim).filter(|h| !h.is_empty()) {
        Some(hint) => (hint.to_uppercase(), cleaned.as_str()),
        None => split_prefix(&cleaned)?,
    };

    if !countries::is_member_state(&country) {
        return Err(VatError::UnknownMemberState(country));
    }

    let number = compact(rest);
    if countries::matches_pattern(&country, &number) == Some(true) {
        return Ok(NormalizedVatNumber {
            country_code: country,
            number,
        });
    }

    // Tolerate a hint that repeats the prefix already present in the text.
    if let Some(stripped) = number.strip_prefix(country.as_str()) {
        if countries::matches_pattern(&country, stripped) == Some(true) {
            return Ok(NormalizedVatNumber {
                number: stripped.to_string(),
                country_code: country,
            });
        }
    }

    Err(VatError::InvalidFormat { country, number })
}

/// Validate a VAT ID that carries its country prefix (e.g. `"DE123456789"`).
///
/// Shorthand for [`normalize`] without a hint.
pub fn validate_vat_format(vat_id: &str) -> Result<NormalizedVatNumber, VatError> {
    normalize(vat_id, None)
}

fn split_prefix(cleaned: &str) -> Result<(String, &str), VatError> {
    match cleaned.get(..2) {
        Some(prefix) if countries::is_member_state(prefix) => {
            Ok((prefix.to_string(), cleaned[2..].trim_start()))
        }
        _ => Err(VatError::UnknownMemberState(cleaned.chars().take(2).collect())),
    }
}

fn compact(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
