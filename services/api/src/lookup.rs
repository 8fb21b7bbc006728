use address_verify::config::AppConfig;
use address_verify::error::AppError;
use address_verify::telemetry;
use crate::infra::resolve_credential;
use address_verify::verification::{AddressValidator, ClosestMatch, ValidationError};
use clap::Args;
use std::time::Duration;

#[derive(Args, Debug)]
pub(crate) struct LookupArgs {
    /// Free-form address, e.g. "123 Main St, Springfield, 62704, IL"
    pub(crate) address: String,
    /// USPS Web Tools user id (defaults to USPS_USER_ID)
    #[arg(long)]
    pub(crate) user_id: Option<String>,
    /// Override the carrier endpoint
    #[arg(long)]
    pub(crate) server_url: Option<String>,
    /// Override the request timeout in milliseconds
    #[arg(long)]
    pub(crate) ttl_ms: Option<u64>,
}

pub(crate) async fn run_lookup(args: LookupArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    if let Some(server_url) = args.server_url {
        config.carrier.server_url = server_url;
    }
    if let Some(ttl_ms) = args.ttl_ms {
        config.carrier.ttl = Duration::from_millis(ttl_ms);
    }

    let user_id = resolve_credential(args.user_id, config.carrier.user_id.as_deref())
        .ok_or(AppError::MissingCredential)?;

    let validator = AddressValidator::usps(&config.carrier)
        .await
        .map_err(ValidationError::from)?;
    match validator.validate(&args.address, &user_id).await {
        Ok(closest) => {
            print_match("Deliverable", &closest)?;
            Ok(())
        }
        Err(ValidationError::Unconfirmed(closest)) => {
            print_match("Not confirmed deliverable", &closest)?;
            Err(ValidationError::Unconfirmed(closest).into())
        }
        Err(err) => Err(err.into()),
    }
}

fn print_match(headline: &str, closest: &ClosestMatch) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(closest).map_err(std::io::Error::from)?;
    println!("{headline}");
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::infra::resolve_credential;

    #[test]
    fn blank_user_id_falls_back_to_configured_one() {
        assert_eq!(
            resolve_credential(Some(String::new()), Some("configured-id")).as_deref(),
            Some("configured-id")
        );
        assert_eq!(
            resolve_credential(Some("  ".to_string()), Some("configured-id")).as_deref(),
            Some("configured-id")
        );
        assert_eq!(
            resolve_credential(Some("cli-id".to_string()), Some("configured-id")).as_deref(),
            Some("cli-id")
        );
    }

    #[test]
    fn blank_user_id_without_default_is_missing() {
        assert_eq!(resolve_credential(Some(String::new()), None), None);
        assert_eq!(resolve_credential(Some(" ".to_string()), Some("")), None);
    }
}
