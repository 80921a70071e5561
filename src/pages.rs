use axum::{extract::State, http::StatusCode, response::Html, routing::get, Json, Router};

use crate::{
    error::{ApiError, MessageResponse},
    state::AppState,
};

const INDEX_HTML: &str = include_str!("../static/index.html");

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health(State(state): State<AppState>) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state
        .store
        .ping()
        .await
        .map_err(|e| ApiError::internal("Store unavailable", e))?;
    Ok((StatusCode::OK, Json(MessageResponse::ok("ok"))))
}
