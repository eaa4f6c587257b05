use axum::extract::rejection::JsonRejection;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Response},
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
use tracing::info;

use crate::catalog::store::HashStore;
use crate::cli::ServeArgs;
use crate::core::hash::{HashConfig, HashVector};
use crate::core::types::MatchMode;
use crate::matching::engine::{Decision, MatchingConfig, MatchingEngine};
use crate::utils::validation::{parse_hash_values, ValidationError};

/// Request body size limit; a hash is a few hundred bytes of JSON
pub const MAX_REQUEST_BODY: usize = 64 * 1024;

/// Shared application state
pub struct AppState {
    pub references: HashStore,
    pub config: HashConfig,
}

/// A hash supplied either as a JSON array or as delimited text
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum HashInput {
    Values(Vec<u8>),
    Text(String),
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    /// Optional label echoed back in the response
    pub name: Option<String>,
    pub hash: HashInput,
    pub mode: Option<MatchMode>,
    /// Overrides the server's default threshold
    pub threshold: Option<i64>,
}

#[derive(Debug, Serialize)]
struct MatchResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    mode: MatchMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    threshold: Option<i64>,
    #[serde(flatten)]
    decision: Decision,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    processing_time_ms: u64,
}

#[derive(Serialize)]
struct StoreInfo {
    record_count: usize,
    skipped_lines: usize,
    hash_len: usize,
    threshold: i64,
}

/// Enhanced error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub details: Option<String>,
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

fn bad_request(error: ErrorResponse) -> Response {
    (StatusCode::BAD_REQUEST, Json(error)).into_response()
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the tokio runtime cannot be created, the reference
/// hash list cannot be read, or the server fails to start.
pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args).await })
}

/// Create the application router with all routes and middleware configured.
///
/// Rate limiting is added by [`run`] since it needs peer addresses.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/store", get(store_handler))
        .route("/api/match", post(match_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
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
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(30),
                ))
                .layer(ConcurrencyLimitLayer::new(100))
                .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY)),
        )
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let config = args.hash.config(args.threshold);
    let references = HashStore::load_from_file(&args.references, &config)?;
    info!(
        "Reference hashes in database: {} ({} lines skipped)",
        references.len(),
        references.skipped().len()
    );

    let state = Arc::new(AppState { references, config });

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10)
        .burst_size(50)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("Invalid rate limit configuration"))?;

    let app = create_router(state).layer(GovernorLayer {
        config: Arc::new(governor_conf),
    });

    let addr = format!("{}:{}", args.address, args.port);
    println!("Starting hash-match server at http://{addr}");

    if args.open {
        let _ = open::that(format!("http://{addr}"));
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Main page handler
async fn index_handler() -> Html<&'static str> {
    Html(include_str!("templates/index.html"))
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn store_handler(State(state): State<Arc<AppState>>) -> Json<StoreInfo> {
    Json(StoreInfo {
        record_count: state.references.len(),
        skipped_lines: state.references.skipped().len(),
        hash_len: state.config.hash_len,
        threshold: state.config.threshold,
    })
}

/// Convert the request's hash into a vector of the store's length
///
/// # Errors
///
/// Returns a `ValidationError` if the hash has the wrong length or holds
/// non-numeric values.
pub fn request_hash(input: &HashInput, config: &HashConfig) -> Result<HashVector, ValidationError> {
    let values = match input {
        HashInput::Values(values) if values.is_empty() => return Err(ValidationError::EmptyHash),
        HashInput::Values(values) => values.clone(),
        HashInput::Text(text) => parse_hash_values(text, config.delimiter, config.hash_len)?,
    };
    let found = values.len();
    HashVector::with_len(values, config.hash_len).ok_or(ValidationError::WrongLength {
        expected: config.hash_len,
        found,
    })
}

/// API endpoint for classifying one hash against the reference store
async fn match_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Response {
    let start_time = std::time::Instant::now();

    let Json(request) = match payload {
        Ok(request) => request,
        Err(rejection) => {
            return bad_request(create_safe_error_response(
                "invalid_request",
                "Request body must be JSON with a 'hash' field",
                Some(&rejection.body_text()),
            ));
        }
    };

    let hash = match request_hash(&request.hash, &state.config) {
        Ok(hash) => hash,
        Err(e) => {
            return bad_request(ErrorResponse {
                error: e.to_string(),
                error_type: "invalid_hash".to_string(),
                details: None,
            });
        }
    };

    let mode = request.mode.unwrap_or_default();
    let threshold = request.threshold.unwrap_or(state.config.threshold);

    // Linear scans over large stores are CPU bound; keep them off the reactor
    let worker_state = Arc::clone(&state);
    let decision = match tokio::task::spawn_blocking(move || {
        MatchingEngine::with_config(
            &worker_state.references,
            MatchingConfig {
                mode,
                threshold,
                parallel: false,
            },
        )
        .classify(&hash)
    })
    .await
    {
        Ok(decision) => decision,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(create_safe_error_response(
                    "internal_error",
                    "Matching failed",
                    Some(&e.to_string()),
                )),
            )
                .into_response();
        }
    };

    let reference_index = match decision {
        Decision::Matched(m) | Decision::Scored { closest: Some(m) } => Some(m.index),
        Decision::NoMatch | Decision::Scored { closest: None } => None,
    };

    #[allow(clippy::cast_possible_truncation)] // Processing time won't exceed u64
    let processing_time = start_time.elapsed().as_millis() as u64;

    Json(MatchResponse {
        name: request.name,
        mode,
        threshold: mode.uses_threshold().then_some(threshold),
        decision,
        reference: reference_index
            .and_then(|i| state.references.get(i))
            .map(|r| r.name.clone()),
        processing_time_ms: processing_time,
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HashConfig {
        HashConfig::default().with_hash_len(3)
    }

    #[test]
    fn test_request_hash_values() {
        let hash = request_hash(&HashInput::Values(vec![1, 2, 3]), &config()).unwrap();
        assert_eq!(hash.as_bytes(), &[1, 2, 3]);

        assert_eq!(
            request_hash(&HashInput::Values(vec![1, 2]), &config()),
            Err(ValidationError::WrongLength {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            request_hash(&HashInput::Values(vec![]), &config()),
            Err(ValidationError::EmptyHash)
        );
    }

    #[test]
    fn test_request_hash_text() {
        let hash = request_hash(&HashInput::Text("4,5,300".to_string()), &config()).unwrap();
        assert_eq!(hash.as_bytes(), &[4, 5, 44]);

        assert!(request_hash(&HashInput::Text("4,x,6".to_string()), &config()).is_err());
    }

    #[test]
    fn test_hash_input_deserializes_both_forms() {
        let values: MatchRequest = serde_json::from_str(r#"{"hash": [1, 2, 3]}"#).unwrap();
        assert!(matches!(values.hash, HashInput::Values(ref v) if v == &[1, 2, 3]));
        assert!(values.mode.is_none());

        let text: MatchRequest =
            serde_json::from_str(r#"{"hash": "1,2,3", "mode": "best", "threshold": 5}"#).unwrap();
        assert!(matches!(text.hash, HashInput::Text(_)));
        assert_eq!(text.mode, Some(MatchMode::Best));
        assert_eq!(text.threshold, Some(5));
    }
}
