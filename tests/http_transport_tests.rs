//! End-to-end tests of the blocking HTTP transport against a local mock server.

#![cfg(feature = "http")]

use mockito::Matcher;
use std::time::Duration;
use vatcheck::{ValidatorConfig, VatValidator};

fn config(server: &mockito::Server) -> ValidatorConfig {
    ValidatorConfig::new()
        .baseurl(format!("{}/vies", server.url()))
        .hmrc_baseurl(format!("{}/lookup/", server.url()))
        .no_proxy()
        .timeout(Duration::from_secs(5))
}

#[test]
fn vies_round_trip() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/vies")
        .match_header("content-type", "text/xml; charset=utf-8")
        .match_body(Matcher::Regex(
            "<urn:vatNumber>123456789</urn:vatNumber>".into(),
        ))
        .with_status(200)
        .with_body(
            "<soap:Envelope><soap:Body><ns2:checkVatResponse>\n\
             <ns2:valid>true</ns2:valid><ns2:name>ACME GMBH</ns2:name>\n\
             <ns2:address>MUSTERSTR 1\n10115 BERLIN</ns2:address>\n\
             </ns2:checkVatResponse></soap:Body></soap:Envelope>",
        )
        .create();

    let mut v = VatValidator::with_config(config(&server)).unwrap();
    assert_eq!(
        v.check("DE 123 456 789", None).unwrap().as_deref(),
        Some("DE-123456789")
    );
    assert_eq!(v.information_field("name"), Some("ACME GMBH"));
    mock.assert();
}

#[test]
fn vies_fault_round_trip() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/vies")
        .with_status(500)
        .with_body(
            "<soap:Envelope><soap:Body><soap:Fault>\
             <faultcode>soap:Server</faultcode><faultstring>MS_UNAVAILABLE</faultstring>\
             </soap:Fault></soap:Body></soap:Envelope>",
        )
        .create();

    let mut v = VatValidator::with_config(config(&server)).unwrap();
    assert_eq!(v.check("ATU12345678", None).unwrap(), None);
    assert_eq!(v.last_error_code(), 18);
    mock.assert();
}

#[test]
fn hmrc_round_trip() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/lookup/517356542")
        .match_header("accept", "application/vnd.hmrc.1.0+json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"target":{"name":"ACME LTD","address":{"line1":"1 HIGH ST","postcode":"LS1 1AA","countryCode":"GB"}}}"#)
        .create();

    let mut v = VatValidator::with_config(config(&server)).unwrap();
    assert!(v.check("517356542", Some("GB")).unwrap().is_some());
    assert_eq!(v.information_field("address"), Some("1 HIGH ST\nLS1 1AA\nGB"));
    mock.assert();
}

#[test]
fn hmrc_status_line_from_transport() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/lookup/517356542")
        .with_status(503)
        .create();

    let mut v = VatValidator::with_config(config(&server)).unwrap();
    assert_eq!(v.check("GB517356542", None).unwrap(), None);
    assert_eq!(v.last_error_code(), 500);
    assert!(v.last_error().contains("503 Service Unavailable"));
}

#[test]
fn unreachable_host_is_connection_failure() {
    let config = ValidatorConfig::new()
        .baseurl("http://127.0.0.1:1/vies")
        .no_proxy()
        .timeout(Duration::from_secs(2));
    let mut v = VatValidator::with_config(config).unwrap();

    assert_eq!(v.check("DE123456789", None).unwrap(), None);
    assert_eq!(v.last_error_code(), 20);
}

#[test]
fn bad_proxy_protocol_is_config_error() {
    let config = ValidatorConfig::new().proxy(["ftp"], "http://proxy:3128");
    assert!(VatValidator::with_config(config).is_err());
}
