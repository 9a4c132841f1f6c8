//! Per-country VAT number patterns.
//!
//! One pattern per supported member state, following the formats listed in
//! the VIES FAQ. `EL` is used for Greece instead of `GR`; `XI` (Northern
//! Ireland) shares the GB format. Patterns are unanchored so they can be
//! embedded elsewhere, e.g. in a client-side form.

use once_cell::sync::Lazy;
use regex::Regex;

const GB_PATTERN: &str = "[0-9]{3} ?[0-9]{4} ?[0-9]{2}(?: ?[0-9]{3})?|GD[0-9]{3}|HA[0-9]{3}";

/// Country code → pattern. Sorted for binary search.
static PATTERNS: &[(&str, &str)] = &[
    ("AT", "U[0-9]{8}"),
    ("BE", "[0-1][0-9]{9}"),
    ("BG", "[0-9]{9,10}"),
    ("CY", "[0-9]{8}[A-Za-z]"),
    ("CZ", "[0-9]{8,10}"),
    ("DE", "[0-9]{9}"),
    ("DK", "[0-9]{2} ?[0-9]{2} ?[0-9]{2} ?[0-9]{2}"),
    ("EE", "[0-9]{9}"),
    ("EL", "[0-9]{9}"),
    ("ES", "[A-Za-z0-9][0-9]{7}[A-Za-z0-9]"),
    ("FI", "[0-9]{8}"),
    ("FR", "[A-Za-z0-9]{2} ?[0-9]{9}"),
    ("GB", GB_PATTERN),
    ("HR", "[0-9]{11}"),
    ("HU", "[0-9]{8}"),
    ("IE", "[0-9][A-Za-z0-9+*][0-9]{5}[A-Za-z]{1,2}"),
    ("IT", "[0-9]{11}"),
    ("LT", "[0-9]{9}|[0-9]{12}"),
    ("LU", "[0-9]{8}"),
    ("LV", "[0-9]{11}"),
    ("MT", "[0-9]{8}"),
    ("NL", "[0-9]{9}B[0-9]{2}"),
    ("PL", "[0-9]{10}"),
    ("PT", "[0-9]{9}"),
    ("RO", "[0-9]{2,10}"),
    ("SE", "[0-9]{10}01"),
    ("SI", "[0-9]{8}"),
    ("SK", "[0-9]{10}"),
    ("XI", GB_PATTERN),
];

static ANCHORED: Lazy<Vec<Regex>> = Lazy::new(|| {
    PATTERNS
        .iter()
        .map(|(_, pattern)| {
            Regex::new(&format!("^(?:{pattern})$")).expect("hard-coded VAT pattern should be valid")
        })
        .collect()
});

/// Supported country codes, in sorted order.
pub fn member_states() -> impl Iterator<Item = &'static str> {
    PATTERNS.iter().map(|(code, _)| *code)
}

/// The full registry as `(country_code, pattern)` pairs.
pub fn regular_expressions() -> &'static [(&'static str, &'static str)] {
    PATTERNS
}

/// Whether `code` (upper case) has a registered pattern.
pub fn is_member_state(code: &str) -> bool {
    index_of(code).is_some()
}

/// Unanchored pattern for `code`, if supported.
pub fn pattern_for(code: &str) -> Option<&'static str> {
    index_of(code).map(|i| PATTERNS[i].1)
}

/// Whether `number` fully matches the pattern of `code`.
///
/// Returns `None` for unsupported codes.
pub fn matches_pattern(code: &str, number: &str) -> Option<bool> {
    index_of(code).map(|i| ANCHORED[i].is_match(number))
}

fn index_of(code: &str) -> Option<usize> {
    PATTERNS.binary_search_by(|(c, _)| (*c).cmp(code)).ok()
}
