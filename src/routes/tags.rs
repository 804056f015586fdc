use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};

use crate::error::AppError;
use crate::store;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/tags", get(list_tags))
}

/// Tags in use, alphabetically, each with the number of links carrying it.
async fn list_tags(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let tags = store::list_tags(&state.db).await?;
    Ok(Json(tags))
}
