//! EU VIES SOAP request building and response interpretation.
//!
//! VIES is not a stable, versioned schema: namespace prefixes and line
//! wrapping have changed over the years without notice. Responses are
//! therefore matched by local element name, ignoring whatever prefix the
//! service currently uses, instead of being validated against a WSDL.

use once_cell::sync::Lazy;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use regex::Regex;
use std::borrow::Cow;
use std::io::Cursor;
use tracing::{debug, warn};

use crate::error::VatError;
use crate::format::NormalizedVatNumber;
use crate::outcome::{ErrorCode, RegistrantInfo, ValidationOutcome};
use crate::transport::RemoteRequest;

/// SOAP 1.1 envelope namespace.
pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Namespace of the `checkVat` operation types.
pub const CHECK_VAT_NS: &str = "urn:ec.europa.eu:taxud:vies:services:checkVat:types";

/// Content type VIES expects for requests.
pub const CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// VIES' placeholder for withheld registrant details.
const WITHHELD: &str = "---";

fn element(local_name: &str) -> Regex {
    let pattern = format!(
        r"(?s)<(?:[\w.\-]+:)?{local_name}(?:\s[^>]*)?>(.*?)</(?:[\w.\-]+:)?{local_name}\s*>"
    );
    Regex::new(&pattern).expect("hard-coded element pattern should be valid")
}

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\r\n|\r|\n").expect("hard-coded line break pattern should be valid")
});

static VALID: Lazy<Regex> = Lazy::new(|| element("valid"));
static NAME: Lazy<Regex> = Lazy::new(|| element("name"));
static ADDRESS: Lazy<Regex> = Lazy::new(|| element("address"));
static FAULT_CODE: Lazy<Regex> = Lazy::new(|| element("faultcode"));
static FAULT_STRING: Lazy<Regex> = Lazy::new(|| element("faultstring"));

fn xml_io(e: std::io::Error) -> VatError {
    VatError::Xml(format!("XML write error: {e}"))
}

/// Build the SOAP 1.1 `checkVat` envelope for a normalized number.
pub fn soap_envelope(vat: &NormalizedVatNumber) -> Result<String, VatError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_io)?;

    let mut envelope = BytesStart::new("soapenv:Envelope");
    envelope.push_attribute(("xmlns:soapenv", SOAP_ENV_NS));
    envelope.push_attribute(("xmlns:urn", CHECK_VAT_NS));
    writer.write_event(Event::Start(envelope)).map_err(xml_io)?;
    writer
        .write_event(Event::Empty(BytesStart::new("soapenv:Header")))
        .map_err(xml_io)?;
    writer
        .write_event(Event::Start(BytesStart::new("soapenv:Body")))
        .map_err(xml_io)?;
    writer
        .write_event(Event::Start(BytesStart::new("urn:checkVat")))
        .map_err(xml_io)?;

    for (name, text) in [
        ("urn:countryCode", vat.country_code.as_str()),
        ("urn:vatNumber", vat.number.as_str()),
    ] {
        writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(xml_io)?;
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
    }

    for name in ["urn:checkVat", "soapenv:Body", "soapenv:Envelope"] {
        writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
    }

    let buf = writer.into_inner().into_inner();
    String::from_utf8(buf).map_err(|e| VatError::Xml(format!("XML UTF-8 error: {e}")))
}

/// POST request carrying the `checkVat` envelope to `baseurl`.
pub fn build_request(baseurl: &str, vat: &NormalizedVatNumber) -> Result<RemoteRequest, VatError> {
    Ok(RemoteRequest::post(baseurl, soap_envelope(vat)?).header("Content-Type", CONTENT_TYPE))
}

/// Classify a VIES response into a [`ValidationOutcome`].
///
/// The returned outcome always carries the body (line breaks collapsed)
/// as `raw_response`.
pub fn interpret(status: u16, body: &str) -> ValidationOutcome {
    let body = LINE_BREAKS.replace_all(body, " ").into_owned();
    let outcome = if status == 200 {
        interpret_success(&body)
    } else {
        interpret_failure(status, &body)
    };
    outcome.with_raw_response(body)
}

fn interpret_success(body: &str) -> ValidationOutcome {
    let Some(flag) = capture(&VALID, body) else {
        warn!("VIES 200 response without a valid element");
        return ValidationOutcome::failure(
            ErrorCode::Unrecognized,
            format!("Invalid response, please contact the maintainer. {body}"),
        );
    };

    debug!(valid = %flag, "VIES answered");
    if flag == "true" || flag == "1" {
        ValidationOutcome::valid(RegistrantInfo {
            name: capture(&NAME, body).and_then(registrant_field),
            address: capture(&ADDRESS, body).and_then(registrant_field),
        })
    } else {
        ValidationOutcome::failure(ErrorCode::NotFound, format!("Invalid VAT Number ({flag})"))
    }
}

fn interpret_failure(status: u16, body: &str) -> ValidationOutcome {
    if let (Some(fault_code), Some(fault_string)) =
        (capture(&FAULT_CODE, body), capture(&FAULT_STRING, body))
    {
        debug!(status, %fault_code, %fault_string, "VIES fault");
        let server_fault = local_name(fault_code) == "Server";
        return if server_fault && fault_string == "TIMEOUT" {
            ValidationOutcome::failure(
                ErrorCode::Timeout,
                "The VIES server timed out. Please re-submit your request later.",
            )
        } else if server_fault && fault_string == "MS_UNAVAILABLE" {
            ValidationOutcome::failure(
                ErrorCode::MemberStateUnavailable,
                "Member State service unavailable. Please re-submit your request later.",
            )
        } else if fault_string.starts_with("Couldn't parse stream") {
            ValidationOutcome::failure(
                ErrorCode::StreamParse,
                format!(
                    "VIES could not parse the request ({fault_string}). Please re-submit your request later."
                ),
            )
        } else {
            ValidationOutcome::failure(
                ErrorCode::from_http_status(status),
                format!("{fault_code} {fault_string}"),
            )
        };
    }

    if body.trim_start().starts_with("Can't connect to") {
        return ValidationOutcome::failure(
            ErrorCode::ConnectionFailure,
            format!("Can't connect to VIES service ({})", body.trim()),
        );
    }

    warn!(status, "unrecognized VIES response");
    ValidationOutcome::failure(
        ErrorCode::Unrecognized,
        format!("{status}: Invalid response, please contact the maintainer. {body}"),
    )
}

/// Trimmed text of the first element matching `re`.
fn capture<'a>(re: &Regex, body: &'a str) -> Option<&'a str> {
    re.captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

fn local_name(qualified: &str) -> &str {
    qualified.rsplit(':').next().unwrap_or(qualified)
}

fn registrant_field(raw: &str) -> Option<String> {
    let text = quick_xml::escape::unescape(raw).unwrap_or(Cow::Borrowed(raw));
    let text = text.trim();
    (!text.is_empty() && text != WITHHELD).then(|| text.to_string())
}
