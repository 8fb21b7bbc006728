use address_verify::verification::AddressValidator;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) validator: AddressValidator,
    pub(crate) default_user_id: Option<String>,
}

impl AppState {
    pub(crate) fn credential_for(&self, requested: Option<String>) -> Option<String> {
        resolve_credential(requested, self.default_user_id.as_deref())
    }
}

/// A supplied credential wins over the configured default; blank values
/// count as missing.
pub(crate) fn resolve_credential(
    requested: Option<String>,
    configured: Option<&str>,
) -> Option<String> {
    requested
        .filter(|user_id| !user_id.trim().is_empty())
        .or_else(|| configured.map(str::to_string))
        .filter(|user_id| !user_id.trim().is_empty())
}
