//! Client for the USPS Web Tools `Verify` API.
//!
//! Requests are sent as `GET {server}?API=Verify&XML=...` with an
//! `AddressValidateRequest` document; the carrier answers with an
//! `AddressValidateResponse` holding its closest match, or an `Error`
//! document.

use super::candidate::AddressCandidate;
use crate::config::CarrierConfig;
use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;

/// Production endpoint for the Web Tools API.
pub const USPS_PRODUCTION_URL: &str = "http://production.shippingapis.com/ShippingAPI.dll";

/// Bound on a single verification request, connect through body.
pub const DEFAULT_REQUEST_TTL: Duration = Duration::from_millis(10_000);

/// Delivery point validation code meaning "confirmed deliverable".
const DPV_CONFIRMED: &str = "Y";

/// The carrier's standardized version of a submitted address, together with
/// the delivery point metadata it returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosestMatch {
    pub street1: String,
    pub street2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub zip4: String,
    pub dpv_confirmation: Option<String>,
    pub dpv_cmra: Option<String>,
    pub dpv_footnotes: Option<String>,
    pub business: Option<String>,
    pub central_delivery_point: Option<String>,
    pub vacant: Option<String>,
    pub footnotes: Option<String>,
    pub return_text: Option<String>,
}

impl ClosestMatch {
    pub fn is_deliverable(&self) -> bool {
        self.dpv_confirmation.as_deref() == Some(DPV_CONFIRMED)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Network, DNS, TLS or timeout failure.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("USPS returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("USPS rejected the request ({number}): {description}")]
    Fault { number: String, description: String },
    #[error("could not encode verification request: {0}")]
    Encode(String),
    #[error("unexpected USPS response: {0}")]
    Malformed(String),
}

impl RemoteError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, RemoteError::Request(err) if err.is_timeout())
    }
}

/// One verification round trip against a carrier.
#[async_trait]
pub trait VerificationClient: Send + Sync {
    async fn verify(&self, candidate: AddressCandidate) -> Result<ClosestMatch, RemoteError>;
}

/// Builds a fresh, single-use [`VerificationClient`] for a credential.
pub trait VerificationConnector: Debug + Send + Sync {
    fn connect(&self, credential: &str) -> Result<Box<dyn VerificationClient>, RemoteError>;
}

/// Connects to the USPS endpoint with a per-request timeout. Every call to
/// [`VerificationConnector::connect`] builds its own HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UspsConnector {
    server_url: String,
    ttl: Duration,
}

impl UspsConnector {
    pub fn new(server_url: impl Into<String>, ttl: Duration) -> Self {
        Self {
            server_url: server_url.into(),
            ttl,
        }
    }

    pub fn production() -> Self {
        Self::new(USPS_PRODUCTION_URL, DEFAULT_REQUEST_TTL)
    }

    pub fn from_config(config: &CarrierConfig) -> Self {
        Self::new(config.server_url.clone(), config.ttl)
    }
}

impl Default for UspsConnector {
    fn default() -> Self {
        Self::production()
    }
}

impl VerificationConnector for UspsConnector {
    fn connect(&self, credential: &str) -> Result<Box<dyn VerificationClient>, RemoteError> {
        let client = UspsClient::new(self.server_url.clone(), credential, self.ttl)?;
        Ok(Box::new(client))
    }
}

pub struct UspsClient {
    http: reqwest::Client,
    server_url: String,
    user_id: String,
}

impl UspsClient {
    pub fn new(
        server_url: impl Into<String>,
        user_id: impl Into<String>,
        ttl: Duration,
    ) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder().timeout(ttl).build()?;
        Ok(Self {
            http,
            server_url: server_url.into(),
            user_id: user_id.into(),
        })
    }
}

impl Debug for UspsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UspsClient")
            .field("server_url", &self.server_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl VerificationClient for UspsClient {
    async fn verify(&self, candidate: AddressCandidate) -> Result<ClosestMatch, RemoteError> {
        let xml = encode_request(&self.user_id, &candidate)?;

        let response = self
            .http
            .get(&self.server_url)
            .query(&[("API", "Verify"), ("XML", xml.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RemoteError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        decode_response(&body)
    }
}

// ---- wire format ----

#[derive(Debug, Serialize)]
#[serde(rename = "AddressValidateRequest")]
struct AddressValidateRequest<'a> {
    #[serde(rename = "@USERID")]
    user_id: &'a str,
    #[serde(rename = "Revision")]
    revision: u8,
    #[serde(rename = "Address")]
    address: RequestAddress<'a>,
}

/// USPS puts the secondary line in `Address1` and the primary street in
/// `Address2`.
#[derive(Debug, Serialize)]
struct RequestAddress<'a> {
    #[serde(rename = "@ID")]
    id: u8,
    #[serde(rename = "Address1")]
    address1: &'a str,
    #[serde(rename = "Address2")]
    address2: &'a str,
    #[serde(rename = "City")]
    city: &'a str,
    #[serde(rename = "State")]
    state: &'a str,
    #[serde(rename = "Zip5")]
    zip5: &'a str,
    #[serde(rename = "Zip4")]
    zip4: &'a str,
}

#[derive(Debug, Deserialize)]
struct AddressValidateResponse {
    #[serde(rename = "Address")]
    address: ResponseAddress,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseAddress {
    #[serde(rename = "Address1", default)]
    address1: Option<String>,
    #[serde(rename = "Address2", default)]
    address2: Option<String>,
    #[serde(rename = "City", default)]
    city: Option<String>,
    #[serde(rename = "State", default)]
    state: Option<String>,
    #[serde(rename = "Zip5", default)]
    zip5: Option<String>,
    #[serde(rename = "Zip4", default)]
    zip4: Option<String>,
    #[serde(rename = "DPVConfirmation", default)]
    dpv_confirmation: Option<String>,
    #[serde(rename = "DPVCMRA", default)]
    dpv_cmra: Option<String>,
    #[serde(rename = "DPVFootnotes", default)]
    dpv_footnotes: Option<String>,
    #[serde(rename = "Business", default)]
    business: Option<String>,
    #[serde(rename = "CentralDeliveryPoint", default)]
    central_delivery_point: Option<String>,
    #[serde(rename = "Vacant", default)]
    vacant: Option<String>,
    #[serde(rename = "Footnotes", default)]
    footnotes: Option<String>,
    #[serde(rename = "ReturnText", default)]
    return_text: Option<String>,
    #[serde(rename = "Error", default)]
    error: Option<UspsFault>,
}

#[derive(Debug, Default, Deserialize)]
struct UspsFault {
    #[serde(rename = "Number", default)]
    number: Option<String>,
    #[serde(rename = "Description", default)]
    description: Option<String>,
}

impl From<UspsFault> for RemoteError {
    fn from(fault: UspsFault) -> Self {
        RemoteError::Fault {
            number: fault.number.unwrap_or_default().trim().to_string(),
            description: fault
                .description
                .unwrap_or_else(|| "no description".to_string())
                .trim()
                .to_string(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl From<ResponseAddress> for ClosestMatch {
    fn from(address: ResponseAddress) -> Self {
        Self {
            street1: address.address2.unwrap_or_default(),
            street2: address.address1.unwrap_or_default(),
            city: address.city.unwrap_or_default(),
            state: address.state.unwrap_or_default(),
            zip: address.zip5.unwrap_or_default(),
            zip4: address.zip4.unwrap_or_default(),
            dpv_confirmation: address.dpv_confirmation.filter(|code| !code.is_empty()),
            dpv_cmra: non_empty(address.dpv_cmra),
            dpv_footnotes: non_empty(address.dpv_footnotes),
            business: non_empty(address.business),
            central_delivery_point: non_empty(address.central_delivery_point),
            vacant: non_empty(address.vacant),
            footnotes: non_empty(address.footnotes),
            return_text: non_empty(address.return_text),
        }
    }
}

pub(crate) fn encode_request(
    user_id: &str,
    candidate: &AddressCandidate,
) -> Result<String, RemoteError> {
    let request = AddressValidateRequest {
        user_id,
        revision: 1,
        address: RequestAddress {
            id: 0,
            address1: candidate.street2.as_deref().unwrap_or_default(),
            address2: &candidate.street1,
            city: &candidate.city,
            state: &candidate.state,
            zip5: &candidate.zip,
            zip4: "",
        },
    };

    quick_xml::se::to_string(&request).map_err(|err| RemoteError::Encode(err.to_string()))
}

fn root_element(body: &str) -> Result<String, RemoteError> {
    let mut reader = Reader::from_str(body);
    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) | Ok(Event::Empty(element)) => {
                return Ok(String::from_utf8_lossy(element.local_name().as_ref()).into_owned());
            }
            Ok(Event::Eof) => return Err(RemoteError::Malformed("empty document".to_string())),
            Ok(_) => continue,
            Err(err) => return Err(RemoteError::Malformed(err.to_string())),
        }
    }
}

pub(crate) fn decode_response(body: &str) -> Result<ClosestMatch, RemoteError> {
    match root_element(body)?.as_str() {
        "Error" => {
            let fault: UspsFault = quick_xml::de::from_str(body)
                .map_err(|err| RemoteError::Malformed(err.to_string()))?;
            Err(fault.into())
        }
        "AddressValidateResponse" => {
            let mut response: AddressValidateResponse = quick_xml::de::from_str(body)
                .map_err(|err| RemoteError::Malformed(err.to_string()))?;
            if let Some(fault) = response.address.error.take() {
                return Err(fault.into());
            }
            Ok(response.address.into())
        }
        other => Err(RemoteError::Malformed(format!(
            "unexpected root element <{other}>"
        ))),
    }
}
