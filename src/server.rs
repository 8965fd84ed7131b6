use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::error::ReportError;
use crate::loader::SalesSource;
use crate::report::SalesRow;

pub struct AppState {
    pub csv_path: PathBuf,
    pub target_sku: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Configuration of all application routes.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // The raw file is served next to the endpoint so a client that cannot
    // reach /api/sales can fetch it and run the same transform itself.
    let data_dir = state
        .csv_path
        .parent()
        .map(|dir| dir.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/sales", get(sales))
        .nest_service("/data", ServeDir::new(data_dir))
        .layer(cors)
        .with_state(state)
}

async fn sales(State(state): State<Arc<AppState>>) -> Result<Json<Vec<SalesRow>>, Response> {
    let source = SalesSource::file(&state.csv_path);

    match crate::sales_report(&source, &state.target_sku).await {
        Ok(rows) => Ok(Json(rows)),
        Err(e) => {
            tracing::error!("Failed to build sales report: {}", e);
            Err(error_response(&e))
        }
    }
}

fn error_response(err: &ReportError) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
        .into_response()
}
