//! Axum serving surface: intake endpoints, static assets, CORS.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::instrument;

use crate::{
    interaction::dialogue::{self, DialogueError},
    runtime::Runtime,
};

/// Response body for `GET /start`.
#[derive(Debug, Serialize)]
pub struct StartReply {
    pub session_id: String,
    pub message: String,
}

/// Request body for `POST /analyze`.
#[derive(Debug, Deserialize)]
pub struct UserInput {
    pub session_id: String,
    pub response: String,
}

/// Response body for `POST /analyze`.
#[derive(Debug, Serialize)]
pub struct AnalyzeReply {
    pub message: String,
}

/// Error body mirroring FastAPI-style `detail` payloads the frontend expects.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Build the application router.
///
/// # Endpoints
///
/// - `GET /start` - Open a new intake session
/// - `POST /analyze` - Run one dialogue turn
/// - `GET /assets/*` - Locally hosted media
pub fn router(runtime: Runtime) -> Router {
    let assets_dir = runtime.config.assets_dir.clone();

    Router::new()
        .route("/start", get(start_chat))
        .route("/analyze", post(analyze_user_input))
        .nest_service("/assets", ServeDir::new(assets_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(runtime)
}

#[instrument(skip_all)]
async fn start_chat(State(runtime): State<Runtime>) -> Json<StartReply> {
    let (session_id, message) = dialogue::start_session(&runtime.store);

    Json(StartReply {
        session_id,
        message: message.to_string(),
    })
}

#[instrument(skip_all)]
async fn analyze_user_input(State(runtime): State<Runtime>, Json(input): Json<UserInput>) -> Result<Json<AnalyzeReply>, (StatusCode, Json<ErrorDetail>)> {
    match dialogue::submit_response(&runtime.store, &runtime.llm, &runtime.config, &input.session_id, &input.response).await {
        Ok(message) => Ok(Json(AnalyzeReply { message })),
        Err(err @ DialogueError::SessionNotFound) => Err((StatusCode::BAD_REQUEST, Json(ErrorDetail { detail: err.to_string() }))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::config::{Config, ConfigInner};
    use std::sync::Arc;

    #[test]
    fn router_builds_with_default_runtime() {
        let config = Config {
            inner: Arc::new(ConfigInner {
                openai_api_key: "test_key".to_string(),
                ..Default::default()
            }),
        };

        let _router = router(Runtime::new(config));
    }

    #[test]
    fn session_not_found_maps_to_the_norwegian_detail() {
        assert_eq!(DialogueError::SessionNotFound.to_string(), "Session ID ikke funnet");
    }
}
