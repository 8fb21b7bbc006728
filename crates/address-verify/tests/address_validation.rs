use std::sync::{Arc, Mutex};

use address_verify::verification::{
    AddressCandidate, AddressParseError, AddressParser, AddressValidator, ClosestMatch,
    ParsedAddressFragments, RemoteError, ValidationError, VerificationClient,
    VerificationConnector,
};
use async_trait::async_trait;

#[derive(Debug, Clone)]
enum CannedReply {
    Match(ClosestMatch),
    Fault,
}

#[derive(Debug, Default)]
struct Recorded {
    credentials: Vec<String>,
    candidates: Vec<AddressCandidate>,
}

#[derive(Debug)]
struct FakeConnector {
    reply: CannedReply,
    recorded: Arc<Mutex<Recorded>>,
}

impl FakeConnector {
    fn new(reply: CannedReply) -> (Self, Arc<Mutex<Recorded>>) {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        (
            Self {
                reply,
                recorded: recorded.clone(),
            },
            recorded,
        )
    }
}

struct FakeClient {
    reply: CannedReply,
    recorded: Arc<Mutex<Recorded>>,
}

impl VerificationConnector for FakeConnector {
    fn connect(&self, credential: &str) -> Result<Box<dyn VerificationClient>, RemoteError> {
        self.recorded
            .lock()
            .expect("recorder mutex")
            .credentials
            .push(credential.to_string());
        Ok(Box::new(FakeClient {
            reply: self.reply.clone(),
            recorded: self.recorded.clone(),
        }))
    }
}

#[async_trait]
impl VerificationClient for FakeClient {
    async fn verify(&self, candidate: AddressCandidate) -> Result<ClosestMatch, RemoteError> {
        self.recorded
            .lock()
            .expect("recorder mutex")
            .candidates
            .push(candidate);
        match &self.reply {
            CannedReply::Match(closest) => Ok(closest.clone()),
            CannedReply::Fault => Err(RemoteError::Fault {
                number: "80040B1A".to_string(),
                description: "Authorization failure.".to_string(),
            }),
        }
    }
}

/// Hands back the same fragments whatever the input.
#[derive(Debug)]
struct FixedParser(ParsedAddressFragments);

impl AddressParser for FixedParser {
    fn parse_location(&self, _address: &str) -> Result<ParsedAddressFragments, AddressParseError> {
        Ok(self.0.clone())
    }
}

fn main_street_fragments() -> ParsedAddressFragments {
    ParsedAddressFragments {
        number: Some("123".to_string()),
        street: Some("Main".to_string()),
        street_type: Some("St".to_string()),
        city: Some("Springfield".to_string()),
        state: Some("IL".to_string()),
        zip: Some("62704".to_string()),
        ..ParsedAddressFragments::default()
    }
}

#[derive(Debug)]
struct FailingParser;

impl AddressParser for FailingParser {
    fn parse_location(&self, address: &str) -> Result<ParsedAddressFragments, AddressParseError> {
        Err(AddressParseError::Untokenizable {
            input: address.to_string(),
        })
    }
}

fn closest_match(dpv: Option<&str>) -> ClosestMatch {
    ClosestMatch {
        street1: "123 MAIN ST".to_string(),
        city: "SPRINGFIELD".to_string(),
        state: "IL".to_string(),
        zip: "62704".to_string(),
        zip4: "1234".to_string(),
        dpv_confirmation: dpv.map(str::to_string),
        ..ClosestMatch::default()
    }
}

fn validator_with(
    fragments: ParsedAddressFragments,
    reply: CannedReply,
) -> (AddressValidator, Arc<Mutex<Recorded>>) {
    let (connector, recorded) = FakeConnector::new(reply);
    let validator = AddressValidator::new(Arc::new(FixedParser(fragments)), Arc::new(connector));
    (validator, recorded)
}

fn validator(reply: CannedReply) -> (AddressValidator, Arc<Mutex<Recorded>>) {
    validator_with(main_street_fragments(), reply)
}

#[tokio::test]
async fn confirmed_match_resolves_with_full_record() {
    let expected = closest_match(Some("Y"));
    let (validator, recorded) = validator(CannedReply::Match(expected.clone()));

    let closest = validator
        .validate("123 Main St,Springfield,62704,IL", "123EXAMPLE456")
        .await
        .expect("address confirmed");
    assert_eq!(closest, expected);

    let recorded = recorded.lock().expect("recorder mutex");
    assert_eq!(recorded.credentials, vec!["123EXAMPLE456".to_string()]);
    assert_eq!(
        recorded.candidates,
        vec![AddressCandidate {
            street1: "123  Main St".to_string(),
            street2: None,
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip: "62704".to_string(),
        }]
    );
}

#[tokio::test]
async fn any_other_dpv_code_is_unconfirmed() {
    for code in [Some("N"), Some("S"), Some("D"), None] {
        let expected = closest_match(code);
        let (validator, _) = validator(CannedReply::Match(expected.clone()));

        let error = validator
            .validate("123 Main St,Springfield,62704,IL", "123EXAMPLE456")
            .await
            .expect_err("address should not be confirmed");

        match error {
            ValidationError::Unconfirmed(closest) => assert_eq!(*closest, expected),
            other => panic!("expected unconfirmed match for {code:?}, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn remote_errors_propagate_unchanged() {
    let (validator, recorded) = validator(CannedReply::Fault);

    let error = validator
        .validate("123 Main St,Springfield,62704,IL", "bad-id")
        .await
        .expect_err("remote fault");

    assert!(error.closest_match().is_none());
    match error {
        ValidationError::Remote(RemoteError::Fault { number, .. }) => {
            assert_eq!(number, "80040B1A")
        }
        other => panic!("expected remote fault, got {other:?}"),
    }
    assert_eq!(recorded.lock().expect("recorder mutex").candidates.len(), 1);
}

#[tokio::test]
async fn empty_input_still_reaches_the_carrier() {
    let canned = closest_match(Some("N"));
    let (validator, recorded) = validator_with(
        ParsedAddressFragments::default(),
        CannedReply::Match(canned.clone()),
    );

    let error = validator
        .validate("", "123EXAMPLE456")
        .await
        .expect_err("carrier does not confirm a blank address");
    match error {
        ValidationError::Unconfirmed(closest) => assert_eq!(*closest, canned),
        other => panic!("expected unconfirmed match, got {other:?}"),
    }

    let recorded = recorded.lock().expect("recorder mutex");
    assert_eq!(
        recorded.candidates,
        vec![AddressCandidate {
            street1: "   ".to_string(),
            street2: None,
            city: String::new(),
            state: String::new(),
            zip: String::new(),
        }]
    );
}

#[tokio::test]
async fn parse_failures_never_open_a_client() {
    let (connector, recorded) = FakeConnector::new(CannedReply::Match(closest_match(Some("Y"))));
    let validator = AddressValidator::new(Arc::new(FailingParser), Arc::new(connector));

    let error = validator
        .validate("???", "123EXAMPLE456")
        .await
        .expect_err("parser rejects input");

    assert!(matches!(error, ValidationError::Parse(_)));
    let recorded = recorded.lock().expect("recorder mutex");
    assert!(recorded.credentials.is_empty());
    assert!(recorded.candidates.is_empty());
}

#[tokio::test]
async fn each_call_connects_a_fresh_client() {
    let (validator, recorded) = validator(CannedReply::Match(closest_match(Some("Y"))));

    let first = validator.validate("1 Elm St, Salem, MA", "first-id");
    let second = validator.validate("2 Oak Ave, Salem, MA", "second-id");
    let (first, second) = tokio::join!(first, second);
    assert!(first.is_ok());
    assert!(second.is_ok());

    let recorded = recorded.lock().expect("recorder mutex");
    assert_eq!(recorded.credentials.len(), 2);
    assert!(recorded.credentials.contains(&"first-id".to_string()));
    assert!(recorded.credentials.contains(&"second-id".to_string()));
}
