use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::post,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::analysis::DeepSeekClient;
use crate::api::models::AnalyzeRequest;
use crate::crawler;
use crate::error::{AppError, Result};
use crate::{crawl_and_analyze, AppState, CombinedResult};

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(analyze_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn analyze_handler(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    info!(url = %req.url, "processing analyze request");

    match process_analyze_request(&state, &req).await {
        Ok(result) => {
            info!(url = %req.url, "analysis complete");
            Json(result).into_response()
        }
        Err(err) => {
            error!(url = %req.url, "analysis failed: {}", err);
            err.into_response()
        }
    }
}

async fn process_analyze_request(
    state: &AppState,
    req: &AnalyzeRequest,
) -> Result<CombinedResult> {
    let url = req.url.trim();
    if url.is_empty() {
        return Err(AppError::InvalidRequest("URL must not be empty".to_string()));
    }

    // Dependency pre-check before spending time on the request
    if !crawler::browser_available() {
        return Err(AppError::MissingDependency(crawler::INSTALL_HINT.to_string()));
    }

    let client = DeepSeekClient::from_config(&state.config)?;
    crawl_and_analyze(&client, url).await
}
