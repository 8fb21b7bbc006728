use super::mapping::{directional, state_code, street_type};
use super::normalizer::{clean_input, strip_punctuation};
use libpostal_rs::LibPostal;
use regex::Regex;
use serde::Serialize;
use std::fmt::{self, Debug};
use std::sync::{Arc, LazyLock};
use tokio::sync::OnceCell;

static ZIP_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{5})(?:-?(\d{4}))?$").expect("valid regex"));

/// Pieces recognized in a free-text address. Every field is independently
/// optional; sparse input simply yields sparse fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedAddressFragments {
    pub number: Option<String>,
    pub prefix: Option<String>,
    pub street: Option<String>,
    pub street_type: Option<String>,
    pub suffix: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub plus4: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AddressParseError {
    #[error("address '{input}' contains no recognizable tokens")]
    Untokenizable { input: String },
    #[error("address parser unavailable: {0}")]
    Backend(#[from] libpostal_rs::Error),
}

/// Splits a raw address string into [`ParsedAddressFragments`].
pub trait AddressParser: Debug + Send + Sync {
    fn parse_location(&self, address: &str) -> Result<ParsedAddressFragments, AddressParseError>;
}

/// [`AddressParser`] backed by libpostal's statistical address labeller,
/// hinted towards English-language US addresses.
#[derive(Clone)]
pub struct LibPostalAddressParser {
    postal: Arc<LibPostal>,
}

impl LibPostalAddressParser {
    pub fn new(postal: LibPostal) -> Self {
        Self {
            postal: Arc::new(postal),
        }
    }

    /// Process-wide instance. The libpostal model is loaded on first use and
    /// reused afterwards.
    pub async fn shared() -> Result<Self, AddressParseError> {
        static SHARED: OnceCell<Arc<LibPostal>> = OnceCell::const_new();

        let postal = SHARED
            .get_or_try_init(|| async { LibPostal::new().await.map(Arc::new) })
            .await?;
        Ok(Self {
            postal: Arc::clone(postal),
        })
    }
}

impl Debug for LibPostalAddressParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibPostalAddressParser").finish_non_exhaustive()
    }
}

impl AddressParser for LibPostalAddressParser {
    fn parse_location(&self, address: &str) -> Result<ParsedAddressFragments, AddressParseError> {
        let Some(cleaned) = prepare_input(address)? else {
            return Ok(ParsedAddressFragments::default());
        };

        let parsed = self
            .postal
            .parse_address_with_hints(&cleaned, Some("en"), Some("US"))?;

        let original = |label: Option<String>| label.map(|label| restore_case(&label, &cleaned));
        Ok(LabeledComponents {
            house_number: original(parsed.house_number),
            road: original(parsed.road),
            city: original(parsed.city),
            state: original(parsed.state),
            postcode: original(parsed.postcode),
        }
        .into_fragments())
    }
}

/// `Ok(None)` for blank input, which parses to empty fragments.
fn prepare_input(address: &str) -> Result<Option<String>, AddressParseError> {
    let cleaned = clean_input(address);
    if cleaned.is_empty() {
        return Ok(None);
    }
    if !cleaned.chars().any(char::is_alphanumeric) {
        return Err(AddressParseError::Untokenizable {
            input: address.to_string(),
        });
    }
    Ok(Some(cleaned))
}

/// libpostal lowercases its labels; take the caller's spelling back from the
/// input when the label appears there verbatim.
fn restore_case(label: &str, input: &str) -> String {
    let haystack = input.to_ascii_lowercase();
    let needle = label.to_ascii_lowercase();
    haystack
        .find(&needle)
        .and_then(|start| input.get(start..start + needle.len()))
        .map(str::to_string)
        .unwrap_or_else(|| label.to_string())
}

/// The labels this crate reads from a libpostal parse. Country, unit and
/// the other labels are not part of a USPS candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct LabeledComponents {
    pub(crate) house_number: Option<String>,
    pub(crate) road: Option<String>,
    pub(crate) city: Option<String>,
    pub(crate) state: Option<String>,
    pub(crate) postcode: Option<String>,
}

impl LabeledComponents {
    pub(crate) fn into_fragments(self) -> ParsedAddressFragments {
        let mut fragments = ParsedAddressFragments {
            number: tidy(self.house_number),
            city: tidy(self.city),
            state: tidy(self.state)
                .map(|state| state_code(&state).map(str::to_string).unwrap_or(state)),
            ..ParsedAddressFragments::default()
        };

        if let Some(postcode) = tidy(self.postcode) {
            match ZIP_CODE.captures(&postcode) {
                Some(captures) => {
                    fragments.zip = captures.get(1).map(|m| m.as_str().to_string());
                    fragments.plus4 = captures.get(2).map(|m| m.as_str().to_string());
                }
                None => fragments.zip = Some(postcode),
            }
        }

        if let Some(road) = tidy(self.road) {
            split_road(&road, &mut fragments);
        }
        fragments
    }
}

fn tidy(value: Option<String>) -> Option<String> {
    value
        .map(|value| clean_input(&value))
        .filter(|value| !value.is_empty())
}

/// Splits a road label into directional prefix, name, type and
/// directional suffix. Long forms collapse to USPS abbreviations.
fn split_road(road: &str, fragments: &mut ParsedAddressFragments) {
    let tokens: Vec<&str> = road
        .split_whitespace()
        .map(strip_punctuation)
        .filter(|token| !token.is_empty())
        .collect();
    let mut rest = tokens.as_slice();

    if let Some(prefix) = rest.first().and_then(|token| directional(token)) {
        let takes_prefix = match rest.len() {
            0 | 1 => false,
            2 => street_type(rest[1]).is_none(),
            _ => true,
        };
        if takes_prefix {
            fragments.prefix = Some(prefix.to_string());
            rest = &rest[1..];
        }
    }

    if rest.len() >= 3 {
        let last = rest[rest.len() - 1];
        let before = rest[rest.len() - 2];
        if let (Some(suffix), Some(_)) = (directional(last), street_type(before)) {
            fragments.suffix = Some(suffix.to_string());
            rest = &rest[..rest.len() - 1];
        }
    }

    if rest.len() >= 2 {
        if let Some(kind) = street_type(rest[rest.len() - 1]) {
            fragments.street_type = Some(kind.to_string());
            rest = &rest[..rest.len() - 1];
        }
    }

    if !rest.is_empty() {
        fragments.street = Some(rest.join(" "));
    }
}
