//! HTTP boundary for the assessment backend.
//!
//! Submissions arrive already scored; the backend generates the narrative
//! report, persists completed results, and serves them back by id. Every
//! route answers CORS preflight and carries permissive CORS headers, matching
//! a public widget embedded on arbitrary pages.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header::HeaderName, HeaderMap, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::analysis::{AnalysisError, AnalysisService, CompletionClient};
use crate::assessment::{MaturityTier, RespondentProfile, Scores};
use crate::diagnostics::{DiagnosticSink, ErrorReport};
use crate::gate::{GateDecision, RequestGate};
use crate::results::{share_url, AssessmentResults, ResultStore, StoreError};

const MISSING_REQUIRED_DATA: &str = "Missing required data";
const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please try again later.";

/// Shared state behind every assessment route.
pub struct AssessmentGateway<C> {
    analysis: AnalysisService<C>,
    store: Arc<dyn ResultStore>,
    diagnostics: Arc<dyn DiagnosticSink>,
    gate: RequestGate,
    public_origin: String,
}

impl<C> AssessmentGateway<C>
where
    C: CompletionClient + 'static,
{
    pub fn new(
        analysis: AnalysisService<C>,
        store: Arc<dyn ResultStore>,
        diagnostics: Arc<dyn DiagnosticSink>,
        gate: RequestGate,
        public_origin: impl Into<String>,
    ) -> Self {
        Self {
            analysis,
            store,
            diagnostics,
            gate,
            public_origin: public_origin.into(),
        }
    }
}

/// Router builder for the four assessment endpoints.
pub fn assessment_router<C>(gateway: Arc<AssessmentGateway<C>>) -> Router
where
    C: CompletionClient + 'static,
{
    Router::new()
        .route(
            "/api/generate-analysis",
            post(generate_handler::<C>)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/save-results",
            post(save_handler::<C>)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/get-results",
            get(retrieve_handler::<C>)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/log-error",
            post(log_error_handler::<C>)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .layer(middleware::map_response(apply_cors))
        .with_state(gateway)
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> Response {
    let payload = json!({ "error": "Method not allowed" });
    (StatusCode::METHOD_NOT_ALLOWED, axum::Json(payload)).into_response()
}

async fn apply_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static("access-control-allow-origin"),
        HeaderValue::from_static("*"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-methods"),
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-headers"),
        HeaderValue::from_static("Content-Type"),
    );
    response
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateAnalysisRequest {
    user_profile: Option<RespondentProfile>,
    scores: Option<Scores>,
    maturity_tier: Option<MaturityTier>,
}

async fn generate_handler<C>(
    State(gateway): State<Arc<AssessmentGateway<C>>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<GenerateAnalysisRequest>,
) -> Response
where
    C: CompletionClient + 'static,
{
    let key = client_key(&headers);
    if let GateDecision::Denied { retry_after_secs } = gateway.gate.admit(&key) {
        info!(client = %key, retry_after_secs, "analysis request rate limited");
        let payload = json!({
            "error": RATE_LIMITED_MESSAGE,
            "retryAfter": retry_after_secs,
        });
        let mut response =
            (StatusCode::TOO_MANY_REQUESTS, axum::Json(payload)).into_response();
        if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
            response
                .headers_mut()
                .insert(HeaderName::from_static("retry-after"), value);
        }
        return response;
    }

    let (profile, scores, tier) = match (
        request.user_profile,
        request.scores,
        request.maturity_tier,
    ) {
        (Some(profile), Some(scores), Some(tier)) => (profile, scores, tier),
        _ => return missing_data_response(),
    };

    match gateway.analysis.generate(&profile, &scores, tier).await {
        Ok(normalized) => {
            let payload = json!({
                "success": true,
                "analysis": normalized,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(failure) => {
            let status = match failure.error {
                AnalysisError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::BAD_GATEWAY,
            };
            let mut payload = json!({
                "error": failure.error.user_message(),
                "retryable": failure.error.retryable(),
            });
            if let Some(error_id) = failure.error_id {
                payload["errorId"] = json!(error_id);
            }
            (status, axum::Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveResultsRequest {
    user_profile: Option<RespondentProfile>,
    results: Option<AssessmentResults>,
}

async fn save_handler<C>(
    State(gateway): State<Arc<AssessmentGateway<C>>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<SaveResultsRequest>,
) -> Response
where
    C: CompletionClient + 'static,
{
    let (profile, results) = match (request.user_profile, request.results) {
        (Some(profile), Some(results)) => (profile, results),
        _ => return missing_data_response(),
    };

    let origin = caller_origin(&headers).unwrap_or_else(|| gateway.public_origin.clone());

    match gateway.store.put(profile, results) {
        Ok(stored) => {
            info!(result_id = %stored.id, "assessment results saved");
            let payload = json!({
                "success": true,
                "resultId": stored.id,
                "shareUrl": share_url(&origin, &stored.id),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(store_error) => {
            error!(%store_error, "failed to save assessment results");
            let payload = json!({ "error": "Failed to save results" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct RetrieveQuery {
    id: Option<String>,
}

async fn retrieve_handler<C>(
    State(gateway): State<Arc<AssessmentGateway<C>>>,
    Query(query): Query<RetrieveQuery>,
) -> Response
where
    C: CompletionClient + 'static,
{
    let id = match query.id {
        Some(id) if !id.trim().is_empty() => id,
        _ => {
            let payload = json!({ "error": "Missing result ID" });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    match gateway.store.get(&id) {
        Ok(stored) => {
            let payload = json!({ "success": true, "data": stored });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(StoreError::NotFound) => {
            let payload = json!({ "error": "Results not found or expired" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(store_error) => {
            error!(%store_error, "failed to retrieve assessment results");
            let payload = json!({ "error": "Failed to retrieve results" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

async fn log_error_handler<C>(
    State(gateway): State<Arc<AssessmentGateway<C>>>,
    axum::Json(report): axum::Json<ErrorReport>,
) -> Response
where
    C: CompletionClient + 'static,
{
    if report.error.trim().is_empty() {
        let payload = json!({ "error": "Missing error data" });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    }

    let error_id = report.id.clone();
    match gateway.diagnostics.record(report) {
        Ok(()) => {
            let payload = json!({ "success": true, "errorId": error_id });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(sink_error) => {
            error!(%sink_error, "failed to persist client error report");
            let payload = json!({ "error": "Failed to log error" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn missing_data_response() -> Response {
    let payload = json!({ "error": MISSING_REQUIRED_DATA });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

/// Identity used by the request gate: the first hop in `x-forwarded-for`, or
/// a fixed key when no proxy header is present (direct local traffic).
fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "local".to_string())
}

/// Origin the share link should point at: the `Origin` header when sent,
/// otherwise the scheme-and-host prefix of `Referer`.
fn caller_origin(headers: &HeaderMap) -> Option<String> {
    if let Some(origin) = headers
        .get("origin")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
    {
        return Some(origin.trim().to_string());
    }

    let referer = headers.get("referer").and_then(|value| value.to_str().ok())?;
    let prefix: Vec<&str> = referer.splitn(4, '/').take(3).collect();
    if prefix.len() == 3 && prefix[0].ends_with(':') && prefix[1].is_empty() {
        Some(prefix.join("/"))
    } else {
        None
    }
}
