//! # vatcheck
//!
//! Validation of EU and UK VAT identification numbers in two tiers:
//! an offline format check against per-country patterns, and an
//! existence check against the EU's VIES SOAP registry or the UK's
//! HMRC REST API.
//!
//! Every outcome is mapped onto a stable numeric taxonomy
//! ([`ErrorCode`]) so callers can tell "retry later" from "fix the
//! input" from "the upstream schema changed".
//!
//! ## Quick Start
//!
//! ```rust
//! use vatcheck::{ValidatorConfig, VatValidator, normalize};
//! # use vatcheck::transport::{RemoteRequest, RemoteResponse, Transport, TransportError};
//! # struct NoNetwork;
//! # impl Transport for NoNetwork {
//! #     fn send(&self, _: &RemoteRequest) -> Result<RemoteResponse, TransportError> {
//! #         Err(TransportError::Other("offline".into()))
//! #     }
//! # }
//!
//! let vat = normalize("BE 0123.456.789", None).unwrap();
//! assert_eq!(vat.to_string(), "BE-0123456789");
//!
//! let mut validator = VatValidator::with_transport(ValidatorConfig::default(), NoNetwork);
//! assert!(validator.local_check("ATU12345678", None));
//! assert!(!validator.local_check("AT12345678", None));
//! assert_eq!(validator.last_error_code(), 1);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `http` (default) | Blocking `reqwest` transport and `VatValidator::new` |

pub mod config;
pub mod countries;
mod error;
mod format;
pub mod hmrc;
mod outcome;
pub mod route;
pub mod transport;
mod validator;
pub mod vies;

pub use config::{ProxyConfig, ValidatorConfig};
pub use countries::{member_states, pattern_for, regular_expressions};
pub use error::VatError;
pub use format::{NormalizedVatNumber, normalize, validate_vat_format};
pub use outcome::{ErrorCode, RegistrantInfo, ValidationOutcome};
pub use route::{Backend, route};
pub use validator::VatValidator;
