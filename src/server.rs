//! HTTP API server.
//!
//! Exposes the claim-analysis pipeline and the query history over a JSON
//! HTTP API for the web frontend.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Liveness message |
//! | `POST` | `/analyze/` | Analyze a claim and persist a history record |
//! | `GET`  | `/history/` | List past analyses (searchable, paginated) |
//!
//! # Error Contract
//!
//! Error responses carry a flat JSON body: `{ "error": "<message>" }`.
//! Missing/blank claim text → `400`; a non-POST analyze request → `405`
//! (axum method routing); anything unexpected → `500`.
//!
//! # Orchestration
//!
//! One request = one synchronous pass: validate, run the inference
//! providers, branch on the configured verdict strategy (structured
//! evidence APIs + generative summarizer, or the single custom model
//! service), resolve the verdict, then append the history record. Every
//! provider degrades to an inline error value, so the only failures a
//! caller sees are validation errors and truly unexpected ones. The
//! history write happens after all computation and is independently
//! guarded: on failure it is logged and the request still succeeds.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support the
//! browser-based frontend.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

use crate::config::{Config, Secrets};
use crate::models::NewHistoryRecord;
use crate::verdict::{self, VerdictStrategy};
use crate::{custom_model, db, evidence, gemini, history, inference, similarity};

/// Shared application state passed to all route handlers via Axum's
/// `State` extractor. Built once before serving; nothing here is mutated
/// per-request.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    secrets: Arc<Secrets>,
    pool: SqlitePool,
    /// Shared client for the evidence providers, bounded by the
    /// configured evidence timeout.
    http: Client,
}

/// Starts the HTTP server.
///
/// Resolves API credentials from the environment, opens the SQLite pool,
/// and binds to the address configured in `[server].bind`. Runs until the
/// process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();

    let state = AppState {
        secrets: Arc::new(Secrets::from_env()),
        pool: db::connect(&config.db).await?,
        http: Client::builder()
            .timeout(Duration::from_secs(config.providers.timeout_secs))
            .build()?,
        config: Arc::new(config.clone()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(handle_home))
        .route("/analyze/", post(handle_analyze))
        .route("/history/", get(handle_history))
        .layer(cors)
        .with_state(state);

    println!("FactGuard API listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// Internal error type that converts into an Axum HTTP response with a
/// flat `{"error": ...}` body.
struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        message: message.into(),
    }
}

fn internal_error(err: anyhow::Error) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: err.to_string(),
    }
}

// ============ GET / ============

async fn handle_home() -> Json<Value> {
    Json(json!({ "message": "FactGuard API is running!" }))
}

// ============ POST /analyze/ ============

#[derive(Deserialize)]
struct AnalyzeRequest {
    text: Option<String>,
    text2: Option<String>,
}

/// Render a provider outcome as JSON, degrading failures to an inline
/// `{"error": ...}` object instead of failing the request.
fn or_error<T: serde::Serialize>(result: anyhow::Result<T>) -> Value {
    match result {
        Ok(v) => json!(v),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<Value>, AppError> {
    let text = req.text.unwrap_or_default().trim().to_string();
    if text.is_empty() {
        return Err(bad_request("No text provided"));
    }
    let text2 = req.text2.unwrap_or_default().trim().to_string();

    let inference_cfg = &state.config.inference;
    let hf_token = state.secrets.hf_api_token.as_deref();

    let entities = or_error(inference::extract_entities(inference_cfg, hf_token, &text).await);
    let sentiment = or_error(inference::analyze_sentiment(inference_cfg, hf_token, &text).await);
    let fake_news = or_error(inference::classify_fake_news(inference_cfg, hf_token, &text).await);
    let similarity = if text2.is_empty() {
        Value::Null
    } else {
        or_error(similarity::calculate_similarity(inference_cfg, hf_token, &text, &text2).await)
    };

    let strategy = VerdictStrategy::from_config(&state.config.verdict.strategy);
    let (body, record) = match strategy {
        VerdictStrategy::ApiPrecedence => {
            let factcheck = evidence::fetch_factcheck(
                &state.http,
                state.secrets.factcheck_api_key.as_deref(),
                &text,
            )
            .await;
            let news = evidence::fetch_live_news(
                &state.http,
                state.secrets.newsdata_api_key.as_deref(),
                &text,
                &state.config.providers,
            )
            .await;
            let serp = evidence::fetch_serpapi(
                &state.http,
                state.secrets.serpapi_api_key.as_deref(),
                &text,
                &state.config.providers,
            )
            .await;

            let generative = gemini::analyze_with_gemini(
                &state.config.gemini,
                state.secrets.gemini_api_key.as_deref(),
                &text,
                &factcheck.summary,
                &news.summary,
                &serp.summary,
            )
            .await;

            let resolved = verdict::resolve_api_precedence(&factcheck, &serp, &generative);

            let record = NewHistoryRecord {
                headline: history::headline_of(&text),
                serpapi_result: Some(serp.summary.clone()),
                gemini_result: serde_json::to_string(&generative).ok(),
                factcheck_result: serde_json::to_string(&factcheck.items).ok(),
                verdict: Some(resolved.verdict.clone()),
                credibility: Some(resolved.credibility.clone()),
            };

            let body = json!({
                "entities": entities,
                "sentiment": sentiment,
                "similarity": similarity,
                "fakeNews": fake_news,
                "googleFactCheck": factcheck.items,
                "gemini": generative,
                "verdict": resolved.verdict,
                "credibility": resolved.credibility,
            });
            (body, record)
        }
        VerdictStrategy::CustomModel => {
            let result = custom_model::call_custom_model(
                &state.config.custom_model,
                state.secrets.custom_model_url.as_deref(),
                state.secrets.custom_model_api_key.as_deref(),
                &text,
            )
            .await;

            let resolved = verdict::resolve_custom_model(&result);

            let record = NewHistoryRecord {
                headline: history::headline_of(&text),
                serpapi_result: serde_json::to_string(&result.sources).ok(),
                gemini_result: serde_json::to_string(&result).ok(),
                factcheck_result: Some(result.raw_response.to_string()),
                verdict: Some(resolved.verdict.clone()),
                credibility: Some(resolved.credibility.clone()),
            };

            let body = json!({
                "entities": entities,
                "sentiment": sentiment,
                "similarity": similarity,
                "customModel": result,
                "verdict": resolved.verdict,
                "credibility": resolved.credibility,
            });
            (body, record)
        }
    };

    // Best-effort audit write: the analysis already succeeded.
    if let Err(e) = history::create(&state.pool, &record).await {
        eprintln!("DB save error: {}", e);
    }

    Ok(Json(body))
}

// ============ GET /history/ ============

#[derive(Deserialize)]
struct HistoryQuery {
    search: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

const HISTORY_DEFAULT_LIMIT: i64 = 50;
const HISTORY_MAX_LIMIT: i64 = 500;

async fn handle_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Value>, AppError> {
    let limit = params
        .limit
        .unwrap_or(HISTORY_DEFAULT_LIMIT)
        .clamp(1, HISTORY_MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let records = history::list(&state.pool, params.search.as_deref(), limit, offset)
        .await
        .map_err(internal_error)?;

    Ok(Json(json!(records)))
}
