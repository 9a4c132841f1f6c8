//! The validation facade: normalize, route, query, interpret.

use tracing::{debug, instrument};

use crate::config::ValidatorConfig;
use crate::countries;
use crate::error::VatError;
use crate::format::{NormalizedVatNumber, normalize};
use crate::hmrc;
use crate::outcome::{ErrorCode, RegistrantInfo, ValidationOutcome};
use crate::route::{Backend, route};
use crate::transport::Transport;
use crate::vies;

#[cfg(feature = "http")]
use crate::transport::HttpTransport;

/// Checks VAT numbers and remembers the outcome of the last call.
///
/// Every [`check`](Self::check) or [`local_check`](Self::local_check)
/// overwrites the stored outcome, so use one validator per concurrent
/// validation. `&mut self` on both methods enforces this within safe code.
///
/// ```no_run
/// use vatcheck::VatValidator;
///
/// let mut validator = VatValidator::new()?;
/// match validator.check("BE 0123.456.789", None)? {
///     Some(id) => println!("{id} is valid: {:?}", validator.information().name),
///     None if validator.last_error_kind().is_transient() => println!("retry later"),
///     None => println!("rejected: {}", validator.last_error()),
/// }
/// # Ok::<(), vatcheck::VatError>(())
/// ```
#[derive(Debug)]
pub struct VatValidator<T> {
    config: ValidatorConfig,
    transport: T,
    last: ValidationOutcome,
}

#[cfg(feature = "http")]
impl VatValidator<HttpTransport> {
    /// Validator with default endpoints and environment proxy settings.
    pub fn new() -> Result<Self, VatError> {
        Self::with_config(ValidatorConfig::default())
    }

    /// Validator using the blocking HTTP transport built from `config`.
    pub fn with_config(config: ValidatorConfig) -> Result<Self, VatError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> VatValidator<T> {
    /// Validator sending its requests through `transport`.
    pub fn with_transport(config: ValidatorConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            last: ValidationOutcome::default(),
        }
    }

    /// Check a VAT number locally, then against VIES or HMRC.
    ///
    /// Returns the canonical identifier (`"BE-0123456789"`) when the remote
    /// authority confirms the number, `Ok(None)` otherwise. On `Ok(None)`,
    /// [`last_error_code`](Self::last_error_code) says whether to retry,
    /// reject the input or alert someone.
    ///
    /// `XI` numbers are never confirmed: they pass the local format check
    /// but no authority can tell them apart from mainland GB registrations.
    ///
    /// # Errors
    ///
    /// [`VatError::MalformedRemoteResponse`] when HMRC answers 200 with a
    /// body that is not JSON. The outcome is stored before returning.
    #[instrument(skip(self), level = "debug")]
    pub fn check(
        &mut self,
        vat_number: &str,
        country_code: Option<&str>,
    ) -> Result<Option<String>, VatError> {
        self.last = ValidationOutcome::default();

        let vat = match normalize(vat_number, country_code) {
            Ok(vat) => vat,
            Err(e) => {
                self.last = failure_from(&e);
                return Ok(None);
            }
        };

        let Some(backend) = route(&vat.country_code) else {
            debug!(country = %vat.country_code, "no backend can confirm this country");
            self.last = ValidationOutcome::failure(
                ErrorCode::NotFound,
                "Northern Ireland VAT numbers cannot be confirmed remotely",
            );
            return Ok(None);
        };

        debug!(%backend, %vat, "querying remote authority");
        let outcome = match backend {
            Backend::Vies => self.query_vies(&vat)?,
            Backend::Hmrc => self.query_hmrc(&vat)?,
        };

        let valid = outcome.is_valid;
        self.last = outcome;
        Ok(valid.then(|| vat.to_string()))
    }

    /// Check only the format of a VAT number. Never touches the network.
    pub fn local_check(&mut self, vat_number: &str, country_code: Option<&str>) -> bool {
        self.last = match normalize(vat_number, country_code) {
            Ok(_) => ValidationOutcome {
                is_valid: true,
                error_code: ErrorCode::Valid,
                error_message: "Valid VAT number format".into(),
                ..ValidationOutcome::default()
            },
            Err(e) => failure_from(&e),
        };
        self.last.is_valid
    }

    fn query_vies(&self, vat: &NormalizedVatNumber) -> Result<ValidationOutcome, VatError> {
        let request = vies::build_request(&self.config.baseurl, vat)?;
        Ok(match self.transport.send(&request) {
            Ok(response) => vies::interpret(response.status, &response.body),
            Err(e) => failure_from(&VatError::from(e)),
        })
    }

    fn query_hmrc(&mut self, vat: &NormalizedVatNumber) -> Result<ValidationOutcome, VatError> {
        let request = hmrc::build_request(self.config.hmrc_url(&vat.number));
        let response = match self.transport.send(&request) {
            Ok(response) => response,
            Err(e) => return Ok(failure_from(&VatError::from(e))),
        };
        hmrc::interpret(&response).inspect_err(|e| {
            self.last = ValidationOutcome::failure(e.code(), e.to_string());
        })
    }
}

impl<T> VatValidator<T> {
    /// Registrant details from the last successful remote check.
    pub fn information(&self) -> &RegistrantInfo {
        &self.last.registrant_info
    }

    /// A single registrant field (`"name"` or `"address"`).
    pub fn information_field(&self, key: &str) -> Option<&str> {
        self.last.registrant_info.get(key)
    }

    /// Message describing the last outcome.
    pub fn last_error(&self) -> &str {
        &self.last.error_message
    }

    /// Numeric code of the last outcome (-1 when valid).
    pub fn last_error_code(&self) -> i32 {
        self.last.error_code.as_i32()
    }

    /// Typed code of the last outcome.
    pub fn last_error_kind(&self) -> ErrorCode {
        self.last.error_code
    }

    /// Raw body of the last VIES response, if the last call reached VIES.
    pub fn last_response(&self) -> Option<&str> {
        self.last.raw_response.as_deref()
    }

    /// Full outcome of the last call.
    pub fn outcome(&self) -> &ValidationOutcome {
        &self.last
    }

    /// Configuration the validator was built with.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Supported country codes.
    pub fn member_states(&self) -> Vec<&'static str> {
        countries::member_states().collect()
    }

    /// `(country_code, pattern)` pairs, e.g. for client-side form validation.
    pub fn regular_expressions(&self) -> &'static [(&'static str, &'static str)] {
        countries::regular_expressions()
    }
}

fn failure_from(e: &VatError) -> ValidationOutcome {
    ValidationOutcome::failure(e.code(), e.to_string())
}
