use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::address_routes;
use address_verify::config::AppConfig;
use address_verify::error::AppError;
use address_verify::telemetry;
use address_verify::verification::{AddressValidator, ValidationError};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if config.carrier.user_id.is_none() {
        warn!("USPS_USER_ID is not set; requests must supply user_id");
    }

    let validator = AddressValidator::usps(&config.carrier)
        .await
        .map_err(ValidationError::from)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        validator,
        default_user_id: config.carrier.user_id.clone(),
    };

    let app = address_routes()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        carrier = %config.carrier.server_url,
        ttl_ms = config.carrier.ttl.as_millis() as u64,
        "address verification service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
