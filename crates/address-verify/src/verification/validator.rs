use super::candidate::AddressCandidate;
use super::parser::{AddressParseError, AddressParser, LibPostalAddressParser};
use super::usps::{ClosestMatch, RemoteError, UspsConnector, VerificationConnector};
use crate::config::CarrierConfig;
use std::sync::Arc;
use tracing::debug;

/// Why a validation call did not produce a deliverable address.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("could not parse address: {0}")]
    Parse(#[from] AddressParseError),
    #[error("address verification failed: {0}")]
    Remote(#[from] RemoteError),
    /// The carrier answered, but did not confirm the closest match as a
    /// deliverable point. The full record is kept for inspection.
    #[error("carrier could not confirm delivery point (DPV code {})", dpv_code(.0))]
    Unconfirmed(Box<ClosestMatch>),
}

fn dpv_code(closest: &ClosestMatch) -> &str {
    closest.dpv_confirmation.as_deref().unwrap_or("none")
}

impl ValidationError {
    pub fn closest_match(&self) -> Option<&ClosestMatch> {
        match self {
            ValidationError::Unconfirmed(closest) => Some(closest.as_ref()),
            ValidationError::Parse(_) | ValidationError::Remote(_) => None,
        }
    }
}

/// Parses a free-form address and confirms it with the carrier.
///
/// Both collaborators are injected; the validator itself holds no per-call
/// state and can be shared across tasks.
#[derive(Debug, Clone)]
pub struct AddressValidator {
    parser: Arc<dyn AddressParser>,
    connector: Arc<dyn VerificationConnector>,
}

impl AddressValidator {
    pub fn new(parser: Arc<dyn AddressParser>, connector: Arc<dyn VerificationConnector>) -> Self {
        Self { parser, connector }
    }

    /// Shared libpostal parser wired to the USPS endpoint described by
    /// `config`.
    pub async fn usps(config: &CarrierConfig) -> Result<Self, AddressParseError> {
        let parser = LibPostalAddressParser::shared().await?;
        Ok(Self::new(
            Arc::new(parser),
            Arc::new(UspsConnector::from_config(config)),
        ))
    }

    /// Resolves only when the carrier's DPV confirmation is exactly `"Y"`.
    ///
    /// Empty input is not rejected locally; the carrier still sees the call.
    pub async fn validate(
        &self,
        address: &str,
        credential: &str,
    ) -> Result<ClosestMatch, ValidationError> {
        let fragments = self.parser.parse_location(address)?;
        let candidate = AddressCandidate::from_fragments(&fragments);
        debug!(
            street1 = %candidate.street1,
            city = %candidate.city,
            state = %candidate.state,
            zip = %candidate.zip,
            "address candidate assembled"
        );

        let client = self.connector.connect(credential)?;
        let closest = client.verify(candidate).await.inspect_err(|err| {
            debug!(error = %err, timeout = err.is_timeout(), "carrier request failed");
        })?;

        if closest.is_deliverable() {
            debug!(street1 = %closest.street1, zip = %closest.zip, "delivery point confirmed");
            Ok(closest)
        } else {
            debug!(
                dpv = closest.dpv_confirmation.as_deref().unwrap_or(""),
                "closest match not confirmed deliverable"
            );
            Err(ValidationError::Unconfirmed(Box::new(closest)))
        }
    }
}

/// One-shot validation against the USPS production endpoint with the
/// default 10 second timeout.
pub async fn validate_address_string(
    address: &str,
    user_id: &str,
) -> Result<ClosestMatch, ValidationError> {
    let validator = AddressValidator::usps(&CarrierConfig::default()).await?;
    validator.validate(address, user_id).await
}
