//! Construction-time options for [`VatValidator`](crate::VatValidator).

use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// Default VIES SOAP endpoint.
pub const VIES_URL: &str = "https://ec.europa.eu/taxation_customs/vies/services/checkVatService";

/// Default HMRC lookup endpoint; the VAT number is appended as a path segment.
pub const HMRC_URL: &str =
    "https://api.service.hmrc.gov.uk/organisations/vat/check-vat-number/lookup";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How the HTTP transport should reach the network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyConfig {
    /// Use `HTTP_PROXY` / `HTTPS_PROXY` / `NO_PROXY` from the environment.
    #[default]
    Environment,
    /// Connect directly, ignoring the environment.
    None,
    /// Route the listed protocols (`"http"`, `"https"`) through `url`.
    Explicit { protocols: Vec<String>, url: String },
}

/// Options recognized by the validator.
///
/// Every field has a default, so a partial document deserializes:
///
/// ```
/// let config: vatcheck::ValidatorConfig =
///     serde_json::from_str(r#"{"baseurl": "http://localhost:8080/vies"}"#).unwrap();
/// assert_eq!(config.baseurl, "http://localhost:8080/vies");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// VIES endpoint.
    pub baseurl: String,
    /// HMRC endpoint.
    pub hmrc_baseurl: String,
    /// Proxy settings for the HTTP transport.
    pub proxy: ProxyConfig,
    /// Connect and total request timeout, in seconds when deserialized.
    #[serde(
        deserialize_with = "duration_from_secs",
        serialize_with = "duration_to_secs"
    )]
    pub timeout: Duration,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            baseurl: VIES_URL.into(),
            hmrc_baseurl: HMRC_URL.into(),
            proxy: ProxyConfig::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ValidatorConfig {
    /// Same as [`ValidatorConfig::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the VIES endpoint (e.g. the VIES test service).
    pub fn baseurl(mut self, url: impl Into<String>) -> Self {
        self.baseurl = url.into();
        self
    }

    /// Override the HMRC endpoint (e.g. the HMRC sandbox).
    pub fn hmrc_baseurl(mut self, url: impl Into<String>) -> Self {
        self.hmrc_baseurl = url.into();
        self
    }

    /// Send the given protocols through a proxy.
    pub fn proxy<P, S>(mut self, protocols: P, url: impl Into<String>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.proxy = ProxyConfig::Explicit {
            protocols: protocols.into_iter().map(Into::into).collect(),
            url: url.into(),
        };
        self
    }

    /// Ignore proxy variables from the environment.
    pub fn no_proxy(mut self) -> Self {
        self.proxy = ProxyConfig::None;
        self
    }

    /// Connect and total timeout applied by the HTTP transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// HMRC lookup URL for `number`, tolerating a trailing slash on the base.
    pub(crate) fn hmrc_url(&self, number: &str) -> String {
        format!("{}/{number}", self.hmrc_baseurl.trim_end_matches('/'))
    }
}

fn duration_from_secs<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
    u64::deserialize(d).map(Duration::from_secs)
}

fn duration_to_secs<S: serde::Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(value.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ValidatorConfig::default();
        assert!(c.baseurl.starts_with("https://"));
        assert!(c.hmrc_baseurl.starts_with("https://"));
        assert_eq!(c.proxy, ProxyConfig::Environment);
        assert_eq!(c.timeout, Duration::from_secs(30));
    }

    #[test]
    fn builder_setters() {
        let c = ValidatorConfig::new()
            .baseurl("http://localhost/vies")
            .hmrc_baseurl("http://localhost/hmrc/")
            .proxy(["http", "https"], "http://proxy:3128")
            .timeout(Duration::from_secs(5));
        assert_eq!(c.baseurl, "http://localhost/vies");
        assert_eq!(
            c.proxy,
            ProxyConfig::Explicit {
                protocols: vec!["http".into(), "https".into()],
                url: "http://proxy:3128".into()
            }
        );
        assert_eq!(c.timeout, Duration::from_secs(5));
    }

    #[test]
    fn hmrc_url_joins_segment() {
        let with_slash = ValidatorConfig::new().hmrc_baseurl("http://h/lookup/");
        let without = ValidatorConfig::new().hmrc_baseurl("http://h/lookup");
        assert_eq!(with_slash.hmrc_url("123456789"), "http://h/lookup/123456789");
        assert_eq!(without.hmrc_url("123456789"), "http://h/lookup/123456789");
    }

    #[test]
    fn deserialize_partial() {
        let c: ValidatorConfig =
            serde_json::from_str(r#"{"timeout": 10, "proxy": "none"}"#).unwrap();
        assert_eq!(c.timeout, Duration::from_secs(10));
        assert_eq!(c.proxy, ProxyConfig::None);
        assert_eq!(c.baseurl, VIES_URL);
    }
}
