use axum::response::Html;
use tracing::{debug, instrument};

use crate::error::AppError;
use crate::utils::html::render_index_page;

/// GET /
#[instrument]
pub async fn home() -> Html<String> {
    debug!("Homepage requested");
    Html(render_index_page())
}

/// Fallback for every unrouted path.
pub async fn not_found() -> AppError {
    AppError::NotFound("not found")
}
