use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    /// Whether a completion provider credential was configured at boot. The
    /// health endpoint surfaces this so operators can tell a booted-but-
    /// credential-less deployment apart from a healthy one.
    pub(crate) analysis_configured: bool,
}
