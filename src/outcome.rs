//! Result model shared by both remote backends.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric error taxonomy reported through [`VatValidator::last_error_code`].
///
/// | Code | Meaning |
/// |------|---------|
/// | -1 | valid |
/// | 0 | unknown member state |
/// | 1 | invalid local format |
/// | 2 | not found remotely |
/// | 3 | malformed per remote validator |
/// | 17, 18, 19, 21 | remote transient failure |
/// | 20 | connection failure |
/// | 257 | unrecognized response shape |
/// | 500 | remote internal server error |
///
/// [`VatValidator::last_error_code`]: crate::VatValidator::last_error_code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum ErrorCode {
    /// The number exists and is valid (-1).
    Valid,
    /// No check has run yet, or the country code is not supported (0).
    #[default]
    UnknownMemberState,
    /// The number fails the local pattern (1).
    InvalidFormat,
    /// The remote authority does not know the number (2).
    NotFound,
    /// The remote validator rejected the number as badly formed (3).
    RemoteRejected,
    /// VIES timed out (17).
    Timeout,
    /// The member state's backing service is down (18).
    MemberStateUnavailable,
    /// The EU database is too busy (19). Kept for compatibility; no current
    /// response shape produces it.
    Busy,
    /// The transport could not reach the service (20).
    ConnectionFailure,
    /// VIES could not parse the request stream (21).
    StreamParse,
    /// The response matched no known shape (257).
    Unrecognized,
    /// HMRC answered with an unexpected status, or VIES faulted with HTTP 500 (500).
    ServerError,
    /// A SOAP fault not in the list above, carrying the HTTP status.
    /// Transient for 5xx statuses. Build it with [`ErrorCode::from_http_status`].
    Http(u16),
}

impl ErrorCode {
    /// The integer value callers switch on.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Valid => -1,
            Self::UnknownMemberState => 0,
            Self::InvalidFormat => 1,
            Self::NotFound => 2,
            Self::RemoteRejected => 3,
            Self::Timeout => 17,
            Self::MemberStateUnavailable => 18,
            Self::Busy => 19,
            Self::ConnectionFailure => 20,
            Self::StreamParse => 21,
            Self::Unrecognized => 257,
            Self::ServerError => 500,
            Self::Http(status) => i32::from(status),
        }
    }

    /// Code for a SOAP fault answered with `status`.
    ///
    /// Statuses that coincide with a named code (500) map to that code, so
    /// an integer always has one variant.
    pub fn from_http_status(status: u16) -> Self {
        Self::try_from(i32::from(status)).unwrap_or(Self::Http(status))
    }

    /// Whether re-submitting the same request later may succeed.
    pub fn is_transient(self) -> bool {
        if let Self::Http(status) = self {
            return status >= 500;
        }
        matches!(
            self,
            Self::Timeout
                | Self::MemberStateUnavailable
                | Self::Busy
                | Self::ConnectionFailure
                | Self::StreamParse
                | Self::Unrecognized
                | Self::ServerError
        )
    }

    /// Whether the input itself has to change before a retry makes sense.
    pub fn is_permanent(self) -> bool {
        matches!(
            self,
            Self::UnknownMemberState | Self::InvalidFormat | Self::NotFound | Self::RemoteRejected
        )
    }

    /// Unrecognized responses usually mean the upstream schema moved.
    pub fn needs_attention(self) -> bool {
        self == Self::Unrecognized
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        code.as_i32()
    }
}

impl TryFrom<i32> for ErrorCode {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Ok(match value {
            -1 => Self::Valid,
            0 => Self::UnknownMemberState,
            1 => Self::InvalidFormat,
            2 => Self::NotFound,
            3 => Self::RemoteRejected,
            17 => Self::Timeout,
            18 => Self::MemberStateUnavailable,
            19 => Self::Busy,
            20 => Self::ConnectionFailure,
            21 => Self::StreamParse,
            257 => Self::Unrecognized,
            500 => Self::ServerError,
            other => u16::try_from(other)
                .map(Self::Http)
                .map_err(|_| format!("unknown error code {other}"))?,
        })
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}

/// Registrant details returned by a successful remote check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrantInfo {
    /// Registered trading name.
    pub name: Option<String>,
    /// Registered address, lines separated by `\n` for HMRC results.
    pub address: Option<String>,
}

impl RegistrantInfo {
    /// Look up a field by key (`"name"` or `"address"`).
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "name" => self.name.as_deref(),
            "address" => self.address.as_deref(),
            _ => None,
        }
    }

    /// True when neither field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.address.is_none()
    }
}

/// Outcome of the last `check` / `local_check` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// Whether the number was confirmed (remotely for `check`, locally for `local_check`).
    pub is_valid: bool,
    /// Position in the error taxonomy.
    pub error_code: ErrorCode,
    /// Human-readable description of `error_code`.
    pub error_message: String,
    /// Registrant details, filled only on remote success.
    pub registrant_info: RegistrantInfo,
    /// Raw body of the last VIES response (line breaks collapsed).
    pub raw_response: Option<String>,
}

impl ValidationOutcome {
    /// Successful remote confirmation.
    pub fn valid(info: RegistrantInfo) -> Self {
        Self {
            is_valid: true,
            error_code: ErrorCode::Valid,
            error_message: "Valid VAT Number".into(),
            registrant_info: info,
            raw_response: None,
        }
    }

    /// Failed check with the given code and message.
    pub fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error_code: code,
            error_message: message.into(),
            registrant_info: RegistrantInfo::default(),
            raw_response: None,
        }
    }

    pub(crate) fn with_raw_response(mut self, body: impl Into<String>) -> Self {
        self.raw_response = Some(body.into());
        self
    }
}
