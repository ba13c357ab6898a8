// Empathy HTTP server
//
// JSON endpoints over the emotion-aware TTS pipeline, plus static serving of
// the generated audio files.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use empathy_core::{EmpathyEngine, EmpathyError, EmotionEngine, ProviderId};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    engine: Arc<EmpathyEngine>,
}

#[derive(Debug, Default, Deserialize)]
struct SynthesizeBody {
    text: Option<String>,
}

/// `EmpathyError` rendered as `{ "error": ... }` with a status that tells
/// bad input, exhausted providers and internal failures apart.
pub struct AppError(pub EmpathyError);

impl From<EmpathyError> for AppError {
    fn from(e: EmpathyError) -> Self {
        Self(e)
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self.0 {
            EmpathyError::EmptyText => StatusCode::BAD_REQUEST,
            EmpathyError::Exhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self.0 {
            EmpathyError::EmptyText | EmpathyError::Exhausted(_) => self.0.to_string(),
            other => format!("Internal server error: {}", other),
        };
        if status.is_server_error() {
            warn!(target = "server", status = status.as_u16(), error = %self.0, "Request failed");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Build the application router.
pub fn router(engine: Arc<EmpathyEngine>) -> Router {
    let output_dir = engine.config().output_dir.clone();
    let prefix = engine.config().url_prefix.trim_end_matches('/').to_string();
    let state = AppState { engine };

    let app = Router::new()
        .route("/synthesize", post(synthesize_handler))
        .route("/config", get(config_handler))
        .route("/health", get(health_handler));

    let app = if prefix.is_empty() {
        app.fallback_service(ServeDir::new(output_dir))
    } else {
        app.nest_service(&prefix, ServeDir::new(output_dir))
    };

    app.layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn synthesize_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<empathy_core::SynthesisResponse>, AppError> {
    // A body that is not JSON counts as "no text"
    let parsed: SynthesizeBody = serde_json::from_slice(&body).unwrap_or_default();
    let response = state.engine.process(parsed.text.as_deref()).await?;
    Ok(Json(response))
}

async fn config_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.engine.status())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.engine.health())
}

/// Bind `host:port` when a port is given; otherwise take the first free port
/// in 5000..5010, then 8080.
pub async fn bind(host: &str, port: Option<u16>) -> std::io::Result<TcpListener> {
    if let Some(port) = port {
        return TcpListener::bind((host, port)).await;
    }
    for port in 5000..5010 {
        match TcpListener::bind((host, port)).await {
            Ok(listener) => return Ok(listener),
            Err(e) => warn!(target = "server", port, error = %e, "Port busy"),
        }
    }
    TcpListener::bind((host, 8080)).await
}

/// Log the configured engines and what the probes found.
pub fn log_banner(engine: &EmpathyEngine) {
    let cfg = engine.config();
    let registry = engine.registry();
    info!(
        target = "server",
        emotion_engine = %cfg.emotion_mode,
        tts_engine = %cfg.tts_engine,
        fallback_tts = %cfg.fallback_tts,
        platform = std::env::consts::OS,
        max_text_length = cfg.max_text_length,
        "Empathy Engine starting"
    );
    for e in EmotionEngine::ALL {
        info!(
            target = "server",
            engine = e.display_name(),
            available = registry.is_available(e),
            "emotion engine"
        );
    }
    for p in ProviderId::ALL {
        info!(
            target = "server",
            provider = %p,
            available = registry.is_available(p),
            "tts provider"
        );
    }
    if !registry.any_synthesis_available() {
        error!(target = "server", "No TTS provider available; every synthesis request will fail");
    }
}

/// Serve until the process is interrupted.
pub async fn serve(listener: TcpListener, engine: Arc<EmpathyEngine>) -> std::io::Result<()> {
    let addr: SocketAddr = listener.local_addr()?;
    info!(target = "server", url = %format!("http://{}", addr), "Server ready");
    axum::serve(listener, router(engine))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!(target = "server", "Shutting down");
        })
        .await
}
