use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::verification::{AddressParseError, ValidationError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Validation(ValidationError),
    MissingCredential,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(ValidationError::Parse(AddressParseError::Untokenizable {
                ..
            }))
            | AppError::MissingCredential => StatusCode::BAD_REQUEST,
            AppError::Validation(ValidationError::Unconfirmed(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Validation(ValidationError::Remote(_)) => StatusCode::BAD_GATEWAY,
            AppError::Validation(ValidationError::Parse(AddressParseError::Backend(_)))
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Validation(err) => write!(f, "{}", err),
            AppError::MissingCredential => {
                write!(f, "no USPS user id supplied and USPS_USER_ID is not set")
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Validation(err) => Some(err),
            AppError::MissingCredential => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = json!({ "error": self.to_string() });

        if let AppError::Validation(err) = &self {
            if let Some(closest) = err.closest_match() {
                body["closest_match"] = json!(closest);
            }
        }

        (status, Json(body)).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ValidationError> for AppError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verification::{ClosestMatch, RemoteError};

    #[test]
    fn validation_failures_map_to_client_and_gateway_statuses() {
        let parse = AppError::from(ValidationError::Parse(AddressParseError::Untokenizable {
            input: "...".to_string(),
        }));
        assert_eq!(parse.status(), StatusCode::BAD_REQUEST);

        let remote = AppError::from(ValidationError::Remote(RemoteError::HttpStatus {
            status: 503,
            body: "down".to_string(),
        }));
        assert_eq!(remote.status(), StatusCode::BAD_GATEWAY);

        let unconfirmed = AppError::from(ValidationError::Unconfirmed(Box::default()));
        assert_eq!(unconfirmed.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(AppError::MissingCredential.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn server_failures_surface_as_io_errors() {
        let bind = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let error = AppError::from(bind);
        assert!(matches!(error, AppError::Io(_)));
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error.to_string().starts_with("io error"));
    }

    #[test]
    fn unconfirmed_display_names_the_dpv_code() {
        let closest = ClosestMatch {
            dpv_confirmation: Some("D".to_string()),
            ..ClosestMatch::default()
        };
        let error = AppError::from(ValidationError::Unconfirmed(Box::new(closest)));
        assert!(error.to_string().contains("DPV code D"));
    }
}
