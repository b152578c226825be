use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

use crate::catalog::store::DiseaseCatalog;
use crate::cli::{load_catalog, ServeArgs};
use crate::matching::engine::{MatchingConfig, MatchingEngine};
use crate::utils::validation::{validate_selection, ValidationError};

/// Request body limit; a selection is a short list of short strings
pub const MAX_BODY_SIZE: usize = 64 * 1024;

/// Default and maximum number of candidates returned by `/api/analyze`
pub const DEFAULT_RESULT_LIMIT: usize = 5;
pub const MAX_RESULT_LIMIT: usize = 50;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const MAX_CONCURRENT_REQUESTS: usize = 100;

/// Shared application state
pub struct AppState {
    pub catalog: DiseaseCatalog,
    pub config: MatchingConfig,
}

impl AppState {
    #[must_use]
    pub fn new(catalog: DiseaseCatalog) -> Self {
        Self {
            catalog,
            config: MatchingConfig::default(),
        }
    }
}

/// Error body returned for every failed request
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub details: Option<String>,
}

/// Body of `POST /api/analyze`
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None,
    }
}

fn error_response(status: StatusCode, error_type: &str, message: &str) -> Response {
    (
        status,
        Json(create_safe_error_response(error_type, message, None)),
    )
        .into_response()
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the tokio runtime cannot be created, the catalog cannot be
/// loaded, or the server fails to start.
pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args).await })
}

/// Create the application router with all routes and middleware configured.
///
/// Per-IP rate limiting needs the peer address and is added by [`run`] when serving.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/catalog", get(catalog_handler))
        .route("/api/symptoms", get(symptoms_handler))
        .route("/api/analyze", post(analyze_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                // Security headers for browser protection
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("no-referrer"),
                ))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    REQUEST_TIMEOUT,
                ))
                .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
                .layer(DefaultBodyLimit::max(MAX_BODY_SIZE)),
        )
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    tracing::info!(diseases = catalog.len(), "Loaded disease catalog");

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10) // 10 requests per second per IP
        .burst_size(50)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("Invalid rate limit configuration"))?;

    let app = create_router(Arc::new(AppState::new(catalog))).layer(GovernorLayer {
        config: Arc::new(governor_conf),
    });

    let addr = format!("{}:{}", args.address, args.port);
    println!("Starting symptom-dx API at http://{addr}");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "OK",
        "message": "API is running",
    }))
}

/// Return the diseases in catalog order
async fn catalog_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "count": state.catalog.len(),
        "diseases": state.catalog.records(),
    }))
}

/// Return the symptom vocabulary
async fn symptoms_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "count": state.catalog.vocabulary().len(),
        "symptoms": state.catalog.vocabulary(),
    }))
}

/// Suggest a diagnosis for the posted symptoms
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let start_time = std::time::Instant::now();

    let Json(request) = match body {
        Ok(request) => request,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "invalid_request",
                &format!("Invalid request body: {}", rejection.body_text()),
            );
        }
    };

    let selection = match validate_selection(&request.symptoms) {
        Ok(selection) => selection,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, "validation_error", &e.to_string());
        }
    };

    if let Some(unknown) = selection
        .iter()
        .find(|s| !state.catalog.contains_symptom(s))
    {
        let e = ValidationError::UnknownSymptom(unknown.0.clone());
        return error_response(StatusCode::BAD_REQUEST, "validation_error", &e.to_string());
    }

    let limit = request
        .limit
        .unwrap_or(DEFAULT_RESULT_LIMIT)
        .min(MAX_RESULT_LIMIT);

    let engine = MatchingEngine::with_config(&state.catalog, state.config.clone());
    let (suggestion, ranking) = match (engine.analyze(&selection), engine.rank(&selection, limit)) {
        (Ok(suggestion), Ok(ranking)) => (suggestion, ranking),
        (Err(e), _) | (_, Err(e)) => {
            return error_response(StatusCode::BAD_REQUEST, "validation_error", &e.to_string());
        }
    };

    let ranked: Vec<serde_json::Value> = ranking
        .iter()
        .map(|r| {
            serde_json::json!({
                "disease": r.disease.name,
                "catalog_index": r.catalog_index,
                "match_count": r.score.match_count,
                "selection_coverage": r.score.selection_coverage,
                "disease_coverage": r.score.disease_coverage,
                "treatment": r.disease.treatment,
            })
        })
        .collect();

    #[allow(clippy::cast_possible_truncation)] // Processing time won't exceed u64
    let processing_time = start_time.elapsed().as_millis() as u64;

    Json(serde_json::json!({
        "selection": selection,
        "suggestion": suggestion,
        "ranking": ranked,
        "processing_info": {
            "processing_time_ms": processing_time,
            "min_match_count": state.config.min_match_count,
            "result_limit": limit,
        }
    }))
    .into_response()
}
