use super::parser::ParsedAddressFragments;
use serde::Serialize;

/// The single address submitted to the carrier for one validation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressCandidate {
    pub street1: String,
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl AddressCandidate {
    /// `street1` always joins four slots with single spaces, so a missing
    /// fragment leaves its separator behind (`"123  Main St"` without a prefix).
    pub fn from_fragments(fragments: &ParsedAddressFragments) -> Self {
        let slot = |value: &Option<String>| value.clone().unwrap_or_default();

        Self {
            street1: format!(
                "{} {} {} {}",
                slot(&fragments.number),
                slot(&fragments.prefix),
                slot(&fragments.street),
                slot(&fragments.street_type),
            ),
            street2: None,
            city: slot(&fragments.city),
            state: slot(&fragments.state),
            zip: slot(&fragments.zip),
        }
    }
}
