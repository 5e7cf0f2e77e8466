//! Bursar Web Server
//!
//! Axum-based REST API for the Bursar student finance analysis service.
//! One analysis endpoint plus a health probe; the handler layer is the only
//! place internal error kinds are translated to HTTP status codes.

use std::sync::Arc;

use axum::{
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use bursar_core::{Config, Error, ModelBackend, ModelClient};

mod handlers;


/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "bursar";

/// Shared application state
///
/// Immutable for the process lifetime; requests share only the config and
/// the cloneable model client (one reqwest connection pool underneath).
pub struct AppState {
    pub config: Config,
    pub model: ModelClient,
}

/// Create the application router
pub fn create_router(config: Config, model: ModelClient) -> Router {
    let state = Arc::new(AppState { config, model });

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/feature", post(handlers::analyse_finances))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the server
pub async fn serve(config: Config, host: &str, port: u16) -> anyhow::Result<()> {
    let model = ModelClient::from_config(&config)?;

    if model.health_check().await {
        info!(
            "model backend connected: {} (model: {})",
            model.host(),
            model.model()
        );
    } else {
        warn!(
            "model backend configured but not responding: {} (model: {})",
            model.host(),
            model.model()
        );
    }

    let app = create_router(config, model);
    let addr = format!("{host}:{port}");

    info!("Starting server at http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
///
/// The public message is what the caller sees; `internal` carries the full
/// detail, logged server-side and never echoed.
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unprocessable(msg: &str) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(err) = &self.internal {
            error!(error = %err, status = %self.status, "request failed");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidRequest(msg) => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: msg,
                internal: None,
            },
            Error::InvalidResponseFormat(msg) => {
                // The parse detail is surfaced: the caller can retry the
                // whole request and may get a better model reply.
                warn!(detail = %msg, "malformed model reply");
                Self {
                    status: StatusCode::BAD_REQUEST,
                    message: format!("Invalid AI response format: {msg}"),
                    internal: None,
                }
            }
            Error::ServiceUnavailable(_) | Error::Http(_) => Self {
                status: StatusCode::BAD_GATEWAY,
                message: "Financial analysis service unavailable".to_string(),
                internal: Some(err.into()),
            },
            Error::Config(_) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Internal server error".to_string(),
                internal: Some(err.into()),
            },
        }
    }
}
