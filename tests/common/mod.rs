#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use vatcheck::transport::{RemoteRequest, RemoteResponse, Transport, TransportError};
use vatcheck::{ValidatorConfig, VatValidator};

pub const VIES_TEST_URL: &str = "http://vies.test/checkVatService";
pub const HMRC_TEST_URL: &str = "http://hmrc.test/lookup";

/// Replays canned responses in order and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: RefCell<VecDeque<Result<RemoteResponse, TransportError>>>,
    pub requests: RefCell<Vec<RemoteRequest>>,
}

impl ScriptedTransport {
    pub fn replying(status: u16, body: &str) -> Self {
        let t = Self::default();
        t.push(Ok(RemoteResponse::new(status, body)));
        t
    }

    pub fn failing(error: TransportError) -> Self {
        let t = Self::default();
        t.push(Err(error));
        t
    }

    pub fn push(&self, reply: Result<RemoteResponse, TransportError>) {
        self.replies.borrow_mut().push_back(reply);
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &RemoteRequest) -> Result<RemoteResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted reply for {}", request.url))
    }
}

pub fn test_config() -> ValidatorConfig {
    ValidatorConfig::new()
        .baseurl(VIES_TEST_URL)
        .hmrc_baseurl(HMRC_TEST_URL)
}

pub fn validator(transport: &ScriptedTransport) -> VatValidator<&ScriptedTransport> {
    VatValidator::with_transport(test_config(), transport)
}

pub fn vies_body(valid: &str, name: &str, address: &str) -> String {
    format!(
        r#"<env:Envelope xmlns:env="http://schemas.xmlsoap.org/soap/envelope/"><env:Header/><env:Body><ns2:checkVatResponse xmlns:ns2="urn:ec.europa.eu:taxud:vies:services:checkVat:types"><ns2:countryCode>BE</ns2:countryCode><ns2:vatNumber>0123456789</ns2:vatNumber><ns2:requestDate>2024-06-15+02:00</ns2:requestDate><ns2:valid>{valid}</ns2:valid><ns2:name>{name}</ns2:name><ns2:address>{address}</ns2:address></ns2:checkVatResponse></env:Body></env:Envelope>"#
    )
}

pub fn soap_fault(code: &str, string: &str) -> String {
    format!(
        r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><soap:Fault><faultcode>{code}</faultcode><faultstring>{string}</faultstring></soap:Fault></soap:Body></soap:Envelope>"#
    )
}
