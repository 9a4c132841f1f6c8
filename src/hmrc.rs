//! HMRC "check a UK VAT number" REST lookup.

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::VatError;
use crate::outcome::{ErrorCode, RegistrantInfo, ValidationOutcome};
use crate::transport::{RemoteRequest, RemoteResponse};

/// Media type selecting version 1.0 of the HMRC API.
pub const ACCEPT: &str = "application/vnd.hmrc.1.0+json";

/// GET request for `url` (base URL with the number appended).
pub fn build_request(url: impl Into<String>) -> RemoteRequest {
    RemoteRequest::get(url).header("Accept", ACCEPT)
}

/// Classify an HMRC response into a [`ValidationOutcome`].
///
/// # Errors
///
/// [`VatError::MalformedRemoteResponse`] when a 200 body is not JSON.
pub fn interpret(response: &RemoteResponse) -> Result<ValidationOutcome, VatError> {
    debug!(status = response.status, "HMRC answered");
    match response.status {
        200 => {
            let json: Value = serde_json::from_str(&response.body).map_err(|e| {
                warn!(error = %e, "HMRC returned 200 with a non-JSON body");
                VatError::MalformedRemoteResponse(format!("HMRC: {e}"))
            })?;
            Ok(ValidationOutcome::valid(registrant(&json["target"])))
        }
        404 => Ok(ValidationOutcome::failure(
            ErrorCode::NotFound,
            "Invalid VAT Number",
        )),
        400 => Ok(ValidationOutcome::failure(
            ErrorCode::RemoteRejected,
            "VAT number badly formed",
        )),
        _ => Ok(ValidationOutcome::failure(
            ErrorCode::ServerError,
            format!("HMRC returned code {}", response.status_line()),
        )),
    }
}

fn registrant(target: &Value) -> RegistrantInfo {
    let address = &target["address"];
    let mut lines: Vec<&str> = (1..)
        .map_while(move |n| address.get(format!("line{n}")))
        .filter_map(Value::as_str)
        .collect();
    lines.extend(["postcode", "countryCode"].iter().filter_map(move |k| address[*k].as_str()));

    RegistrantInfo {
        name: target["name"].as_str().map(str::to_string),
        address: (!lines.is_empty()).then(|| lines.join("\n")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_has_accept_header() {
        let req = build_request("https://hmrc.test/lookup/517356542");
        assert_eq!(req.method, crate::transport::Method::Get);
        assert_eq!(req.header_value("Accept"), Some(ACCEPT));
        assert!(req.body.is_none());
    }

    #[test]
    fn address_lines_in_order() {
        let json: Value = serde_json::from_str(
            r#"{"target":{"name":"ACME LTD","address":{
                "line2":"Industrial Estate","line1":"1 High Street","line3":"Leeds",
                "postcode":"LS1 1AA","countryCode":"GB"}}}"#,
        )
        .unwrap();
        let info = registrant(&json["target"]);
        assert_eq!(info.name.as_deref(), Some("ACME LTD"));
        assert_eq!(
            info.address.as_deref(),
            Some("1 High Street\nIndustrial Estate\nLeeds\nLS1 1AA\nGB")
        );
    }

    #[test]
    fn line_numbering_stops_at_gap() {
        let json: Value =
            serde_json::from_str(r#"{"target":{"address":{"line1":"A","line3":"C"}}}"#).unwrap();
        assert_eq!(registrant(&json["target"]).address.as_deref(), Some("A"));
    }

    #[test]
    fn missing_target_gives_empty_info() {
        let json: Value = serde_json::from_str("{}").unwrap();
        assert!(registrant(&json["target"]).is_empty());
    }
}
