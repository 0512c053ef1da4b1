use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use maturity_ai::analysis::{AnalysisService, OpenAiClient};
use maturity_ai::config::AppConfig;
use maturity_ai::diagnostics::{DiagnosticSink, InMemoryDiagnosticLog};
use maturity_ai::error::AppError;
use maturity_ai::gate::RequestGate;
use maturity_ai::results::{InMemoryResultStore, ResultStore};
use maturity_ai::router::{assessment_router, AssessmentGateway};
use maturity_ai::telemetry;
use std::sync::atomic::Ordering;
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

    let analysis_configured = config.openai.api_key.is_some();
    if !analysis_configured {
        warn!("no completion provider credential configured; generate-analysis will report unavailable");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        analysis_configured,
    };

    let client = Arc::new(OpenAiClient::from_config(&config.openai)?);
    let diagnostics: Arc<dyn DiagnosticSink> = Arc::new(InMemoryDiagnosticLog::default());
    let store: Arc<dyn ResultStore> = Arc::new(InMemoryResultStore::with_ttl(
        chrono::Duration::days(config.storage.results_ttl_days),
    ));
    let gate = RequestGate::new(config.rate_limit.max_requests, config.rate_limit.window);

    let analysis = AnalysisService::new(client, diagnostics.clone());
    let gateway = Arc::new(AssessmentGateway::new(
        analysis,
        store,
        diagnostics,
        gate,
        config.public_origin.clone(),
    ));

    let app = with_operational_routes(assessment_router(gateway))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "data maturity assessment api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
