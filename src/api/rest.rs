// =============================================================================
// HTTP API — Axum 0.7
// =============================================================================
//
//   GET /              dashboard page (compiled in)
//   GET /api/analyze   run one full scan and return the ranked results
//   GET /api/health    liveness probe, never touches the provider
//
// Failures of the analysis (benchmark unavailable) and panics inside any
// handler are both rendered as 500 `{"error": "<message>"}`.
// =============================================================================

use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Json, State},
    http::{header, Response, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};
use tracing::{error, info};

use crate::analyzer::AnalysisReport;
use crate::app_state::AppState;

const DASHBOARD_HTML: &str = include_str!("../../templates/index.html");

// =============================================================================
// Router construction
// =============================================================================

pub fn router(state: Arc<AppState>) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods(cors::Any)
        .allow_headers(cors::Any);

    Router::new()
        .route("/", get(dashboard))
        .route("/api/analyze", get(analyze))
        .route("/api/health", get(health))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors_layer)
        .with_state(state)
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(message: String) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody { error: message }),
    )
        .into_response()
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(panic = %message, "handler panicked");

    let body = serde_json::json!({ "error": message }).to_string();
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap_or_else(|_| Response::new(Body::empty()))
}

// =============================================================================
// Dashboard
// =============================================================================

async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

// =============================================================================
// Analyze
// =============================================================================

#[derive(Serialize)]
struct AnalyzeResponse {
    success: bool,
    #[serde(flatten)]
    report: AnalysisReport,
}

async fn analyze(State(state): State<Arc<AppState>>) -> axum::response::Response {
    let request_no = state.next_analysis();
    info!(request_no, "analysis requested");

    match state.analyzer.run().await {
        Ok(report) => Json(AnalyzeResponse {
            success: true,
            report,
        })
        .into_response(),
        Err(e) => {
            error!(request_no, error = %e, "analysis failed");
            error_response(e.to_string())
        }
    }
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    analyses_started: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        analyses_started: state.analyses_started(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::provider::testing::StaticProvider;
    use crate::market_data::{FetchError, PriceProvider};
    use crate::runtime_config::RuntimeConfig;
    use crate::signals::breakout::fixtures::{breakout_fixture, ramp};
    use crate::types::PriceSeries;
    use async_trait::async_trait;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    struct PanickingProvider;

    #[async_trait]
    impl PriceProvider for PanickingProvider {
        async fn daily_bars(&self, _ticker: &str) -> Result<PriceSeries, FetchError> {
            panic!("provider exploded");
        }
    }

    fn app(provider: Arc<dyn PriceProvider>) -> (Router, Arc<AppState>) {
        let state = Arc::new(AppState::new(RuntimeConfig::default(), provider));
        (router(state.clone()), state)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn analyze_without_benchmark_is_500() {
        let (app, _) = app(Arc::new(StaticProvider::new()));
        let (status, body) = get_json(app, "/api/analyze").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let msg = body["error"].as_str().unwrap();
        assert!(msg.contains("TASI"), "{msg}");
        assert!(body.get("success").is_none());
    }

    #[tokio::test]
    async fn analyze_returns_ranked_report() {
        let provider = StaticProvider::new()
            .with("^TASI.SR", ramp(30))
            .with("1213.SR", breakout_fixture())
            .with("2010.SR", ramp(30))
            .with("2110.SR", ramp(250))
            .with("2040.SR", ramp(30));
        let (app, state) = app(Arc::new(provider));

        let (status, body) = get_json(app, "/api/analyze").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], Value::Bool(true));
        assert!((body["tasi"].as_f64().unwrap() - 129.0).abs() < 1e-9);
        assert!(body["timestamp"].is_string());

        let stocks = body["stocks"].as_array().unwrap();
        assert_eq!(stocks.len(), 2);
        assert_eq!(stocks[0]["symbol"], "1213");
        assert_eq!(stocks[0]["met_conditions"], 9);
        assert_eq!(stocks[0]["conditions"]["bollinger"], Value::Bool(true));
        assert_eq!(stocks[1]["symbol"], "2110");

        let signals = body["signals"].as_array().unwrap();
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0]["symbol"], "1213");

        assert_eq!(state.analyses_started(), 1);
    }

    #[tokio::test]
    async fn panic_in_handler_is_json_500() {
        let (app, _) = app(Arc::new(PanickingProvider));
        let (status, body) = get_json(app, "/api/analyze").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "provider exploded");
    }

    #[tokio::test]
    async fn health_never_touches_provider() {
        let provider = Arc::new(StaticProvider::new());
        let (app, _) = app(provider.clone());
        let (status, body) = get_json(app, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["analyses_started"], 0);
        assert!(body["server_time"].as_i64().unwrap() > 0);
        assert!(provider.requested().is_empty());
    }

    #[tokio::test]
    async fn health_reports_analyses_started() {
        let (app, _) = app(Arc::new(StaticProvider::new()));
        let (status, _) = get_json(app.clone(), "/api/analyze").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let (_, body) = get_json(app, "/api/health").await;
        assert_eq!(body["analyses_started"], 1);
    }

    #[tokio::test]
    async fn root_serves_dashboard() {
        let (app, _) = app(Arc::new(StaticProvider::new()));
        let resp = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("/api/analyze"));
    }
}
