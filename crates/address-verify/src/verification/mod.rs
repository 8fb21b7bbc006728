mod candidate;
mod mapping;
mod normalizer;
mod parser;
mod usps;
mod validator;

pub use candidate::AddressCandidate;
pub use parser::{
    AddressParseError, AddressParser, LibPostalAddressParser, ParsedAddressFragments,
};
pub use usps::{
    ClosestMatch, RemoteError, UspsClient, UspsConnector, VerificationClient,
    VerificationConnector, DEFAULT_REQUEST_TTL, USPS_PRODUCTION_URL,
};
pub use validator::{validate_address_string, AddressValidator, ValidationError};
