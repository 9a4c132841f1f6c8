use thiserror::Error;

use crate::outcome::ErrorCode;
use crate::transport::TransportError;

/// Errors that can occur while normalizing or checking a VAT number.
///
/// Most of these never reach the caller of [`VatValidator::check`]: they are
/// folded into the stored [`ValidationOutcome`]. Only
/// [`VatError::MalformedRemoteResponse`] escapes as an `Err`.
///
/// [`VatValidator::check`]: crate::VatValidator::check
/// [`ValidationOutcome`]: crate::ValidationOutcome
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VatError {
    /// The input text was empty.
    #[error("You must provide a VAT number")]
    MissingInput,

    /// No pattern is registered for the country code.
    #[error("Unknown MS code: '{0}'")]
    UnknownMemberState(String),

    /// The number does not match the country's pattern.
    #[error("Invalid VAT number format for {country}: '{number}'")]
    InvalidFormat {
        /// Resolved country code.
        country: String,
        /// Number as it was matched against the pattern.
        number: String,
    },

    /// A remote authority answered with a success status but an unreadable body.
    #[error("malformed remote response: {0}")]
    MalformedRemoteResponse(String),

    /// The transport could not complete the round trip.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Invalid construction-time configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// XML generation error.
    #[error("XML error: {0}")]
    Xml(String),
}

impl VatError {
    /// Position of this error in the numeric taxonomy.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingInput | Self::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            Self::UnknownMemberState(_) => ErrorCode::UnknownMemberState,
            Self::MalformedRemoteResponse(_) => ErrorCode::Unrecognized,
            Self::Transport(_) => ErrorCode::ConnectionFailure,
            Self::Config(_) | Self::Xml(_) => ErrorCode::Unrecognized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_are_connection_failures() {
        let errors = [
            TransportError::Connect {
                url: "http://vies.test".into(),
                message: "refused".into(),
            },
            TransportError::Timeout {
                url: "http://vies.test".into(),
            },
            TransportError::Other("reset".into()),
        ];
        for e in errors {
            let message = e.to_string();
            let e = VatError::from(e);
            assert!(matches!(e, VatError::Transport(_)));
            assert_eq!(e.code(), ErrorCode::ConnectionFailure);
            assert_eq!(e.to_string(), message);
        }
    }

    #[test]
    fn local_errors_map_to_format_codes() {
        assert_eq!(VatError::MissingInput.code(), ErrorCode::InvalidFormat);
        assert_eq!(
            VatError::UnknownMemberState("XX".into()).code(),
            ErrorCode::UnknownMemberState
        );
    }
}
